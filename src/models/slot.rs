//! Time slot and weekly schedule models.
//!
//! A [`TimeSlot`] is one assignment unit within a single day: either a
//! fully-specified range or a zero-duration marker.
//!
//! # Marker Encoding
//! `start == end` denotes a zero-duration marker, disambiguated only by
//! `is_checkout`:
//! - `is_checkout == false`: check-in recorded, check-out not yet known.
//! - `is_checkout == true`: check-out-only marker for an employee whose
//!   check-in time is inherited from a team slot.
//!
//! A slot with `start != end` is a fully-specified range.
//!
//! Checkout markers additionally record the owning team in
//! `linked_team_id`; cascade deletion on team removal is still decided by
//! current membership plus the `is_checkout` flag.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ScheduleError;
use crate::time::ClockTime;

/// What kind of entity a slot is assigned to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssigneeKind {
    /// A default coverage group; implicitly covers every current member.
    Team,
    /// A single employee.
    Employee,
}

/// One assignment unit within a single day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    /// Slot start.
    pub start: ClockTime,
    /// Slot end. Equal to `start` for zero-duration markers.
    pub end: ClockTime,
    /// Id of the assigned team or employee.
    pub assigned_id: String,
    /// Whether the assignee is a team or an employee.
    pub assigned_type: AssigneeKind,
    /// Display hint; not semantically load-bearing.
    #[serde(default)]
    pub color: String,
    /// Marks a check-out-only marker (see module docs).
    #[serde(default)]
    pub is_checkout: bool,
    /// Owning team of a checkout marker, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_team_id: Option<String>,
}

impl TimeSlot {
    /// Creates a range slot.
    pub fn range(
        assigned_id: impl Into<String>,
        assigned_type: AssigneeKind,
        start: ClockTime,
        end: ClockTime,
    ) -> Self {
        Self {
            start,
            end,
            assigned_id: assigned_id.into(),
            assigned_type,
            color: String::new(),
            is_checkout: false,
            linked_team_id: None,
        }
    }

    /// Creates a zero-duration check-in marker ("arrived, not yet departed").
    pub fn check_in_marker(
        assigned_id: impl Into<String>,
        assigned_type: AssigneeKind,
        at: ClockTime,
    ) -> Self {
        Self::range(assigned_id, assigned_type, at, at)
    }

    /// Creates a zero-duration checkout marker for an employee whose
    /// check-in time is inherited from the given team's slot.
    pub fn checkout_marker(
        employee_id: impl Into<String>,
        at: ClockTime,
        linked_team_id: impl Into<String>,
    ) -> Self {
        Self {
            start: at,
            end: at,
            assigned_id: employee_id.into(),
            assigned_type: AssigneeKind::Employee,
            color: String::new(),
            is_checkout: true,
            linked_team_id: Some(linked_team_id.into()),
        }
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether this slot is a zero-duration marker.
    #[inline]
    pub fn is_marker(&self) -> bool {
        self.start == self.end
    }

    /// Whether this slot belongs to the given assignee.
    #[inline]
    pub fn is_for(&self, assigned_id: &str, kind: AssigneeKind) -> bool {
        self.assigned_type == kind && self.assigned_id == assigned_id
    }
}

/// Day of week, Monday first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Weekday {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Weekday {
    /// All weekdays in Monday..Sunday order.
    pub const ALL: [Weekday; 7] = [
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
        Weekday::Sunday,
    ];

    /// The weekday of a calendar date.
    pub fn from_date(date: NaiveDate) -> Self {
        match date.weekday() {
            chrono::Weekday::Mon => Weekday::Monday,
            chrono::Weekday::Tue => Weekday::Tuesday,
            chrono::Weekday::Wed => Weekday::Wednesday,
            chrono::Weekday::Thu => Weekday::Thursday,
            chrono::Weekday::Fri => Weekday::Friday,
            chrono::Weekday::Sat => Weekday::Saturday,
            chrono::Weekday::Sun => Weekday::Sunday,
        }
    }

    /// Lowercase English name.
    pub fn name(&self) -> &'static str {
        match self {
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
            Weekday::Sunday => "sunday",
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Weekday {
    type Err = ScheduleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Weekday::ALL
            .into_iter()
            .find(|d| d.name() == s)
            .ok_or_else(|| ScheduleError::InvalidWeekday(s.to_string()))
    }
}

/// A week's worth of slot lists, keyed by weekday name.
///
/// Serves both as a reusable shift template's body and as a per-week
/// draft being edited. Within a day, slot order is insertion order and
/// carries no meaning — the list is a set in practice.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeeklySchedule {
    #[serde(default)]
    pub monday: Vec<TimeSlot>,
    #[serde(default)]
    pub tuesday: Vec<TimeSlot>,
    #[serde(default)]
    pub wednesday: Vec<TimeSlot>,
    #[serde(default)]
    pub thursday: Vec<TimeSlot>,
    #[serde(default)]
    pub friday: Vec<TimeSlot>,
    #[serde(default)]
    pub saturday: Vec<TimeSlot>,
    #[serde(default)]
    pub sunday: Vec<TimeSlot>,
}

impl WeeklySchedule {
    /// Creates an empty week.
    pub fn new() -> Self {
        Self::default()
    }

    /// The slot list for one day.
    pub fn day(&self, weekday: Weekday) -> &Vec<TimeSlot> {
        match weekday {
            Weekday::Monday => &self.monday,
            Weekday::Tuesday => &self.tuesday,
            Weekday::Wednesday => &self.wednesday,
            Weekday::Thursday => &self.thursday,
            Weekday::Friday => &self.friday,
            Weekday::Saturday => &self.saturday,
            Weekday::Sunday => &self.sunday,
        }
    }

    /// Mutable slot list for one day.
    pub fn day_mut(&mut self, weekday: Weekday) -> &mut Vec<TimeSlot> {
        match weekday {
            Weekday::Monday => &mut self.monday,
            Weekday::Tuesday => &mut self.tuesday,
            Weekday::Wednesday => &mut self.wednesday,
            Weekday::Thursday => &mut self.thursday,
            Weekday::Friday => &mut self.friday,
            Weekday::Saturday => &mut self.saturday,
            Weekday::Sunday => &mut self.sunday,
        }
    }

    /// Replaces the slot list for one day (builder form).
    pub fn with_day(mut self, weekday: Weekday, slots: Vec<TimeSlot>) -> Self {
        *self.day_mut(weekday) = slots;
        self
    }

    /// Iterates days in Monday..Sunday order.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &Vec<TimeSlot>)> {
        Weekday::ALL.into_iter().map(move |d| (d, self.day(d)))
    }

    /// Total number of slots across the week.
    pub fn slot_count(&self) -> usize {
        Weekday::ALL.iter().map(|d| self.day(*d).len()).sum()
    }

    /// Whether no day holds any slot.
    pub fn is_empty(&self) -> bool {
        self.slot_count() == 0
    }

    /// Whether two weeks hold the same slots, ignoring within-day order.
    pub fn same_slots(&self, other: &WeeklySchedule) -> bool {
        Weekday::ALL
            .iter()
            .all(|d| same_slot_set(self.day(*d), other.day(*d)))
    }
}

/// Multiset equality over slot lists.
fn same_slot_set(a: &[TimeSlot], b: &[TimeSlot]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let count = |list: &[TimeSlot], slot: &TimeSlot| list.iter().filter(|s| *s == slot).count();
    a.iter().all(|s| count(a, s) == count(b, s))
}
