//! Exception and holiday models.
//!
//! Exceptions block or override normal scheduling for one employee over an
//! inclusive date range; holidays do the same for everyone. Both win over
//! templates and direct assignments for the dates they cover.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

/// Why an employee deviates from normal scheduling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExceptionKind {
    /// Planned leave; the employee is not scheduled.
    Leave,
    /// Sick day; the employee is not scheduled.
    Sick,
    /// Working remotely; normal entries are kept but re-sourced.
    Remote,
    /// The exception's own times replace the scheduled ones.
    Override,
}

/// A per-employee scheduling exception over an inclusive date range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftException {
    /// Affected employee.
    pub employee_id: String,
    /// What the exception does.
    pub kind: ExceptionKind,
    /// First affected date (inclusive).
    pub from: NaiveDate,
    /// Last affected date (inclusive).
    pub to: NaiveDate,
    /// Replacement start, used by [`ExceptionKind::Override`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ClockTime>,
    /// Replacement end, used by [`ExceptionKind::Override`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
    /// Free-form annotation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A company-wide non-working day or range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Holiday {
    /// Display name.
    pub name: String,
    /// First blocked date (inclusive).
    pub from: NaiveDate,
    /// Last blocked date (inclusive).
    pub to: NaiveDate,
}

impl ShiftException {
    /// Creates a single-day exception.
    pub fn on(employee_id: impl Into<String>, kind: ExceptionKind, date: NaiveDate) -> Self {
        Self {
            employee_id: employee_id.into(),
            kind,
            from: date,
            to: date,
            start: None,
            end: None,
            note: None,
        }
    }

    /// Extends the exception to an inclusive range.
    pub fn until(mut self, to: NaiveDate) -> Self {
        self.to = to;
        self
    }

    /// Sets replacement times (meaningful for `Override`).
    pub fn with_times(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the annotation.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether the exception covers a date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

impl Holiday {
    /// Creates a single-day holiday.
    pub fn on(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            from: date,
            to: date,
        }
    }

    /// Extends the holiday to an inclusive range.
    pub fn until(mut self, to: NaiveDate) -> Self {
        self.to = to;
        self
    }

    /// Whether the holiday covers a date.
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_exception_range_cover() {
        let e = ShiftException::on("e1", ExceptionKind::Leave, d(2024, 7, 1)).until(d(2024, 7, 5));
        assert!(e.covers(d(2024, 7, 1)));
        assert!(e.covers(d(2024, 7, 5)));
        assert!(!e.covers(d(2024, 7, 6)));
        assert!(!e.covers(d(2024, 6, 30)));
    }

    #[test]
    fn test_holiday_single_day() {
        let h = Holiday::on("May Day", d(2024, 5, 1));
        assert!(h.covers(d(2024, 5, 1)));
        assert!(!h.covers(d(2024, 5, 2)));
    }

    #[test]
    fn test_kind_serde_tags() {
        let json = serde_json::to_string(&ExceptionKind::Sick).unwrap();
        assert_eq!(json, "\"SICK\"");
        let kind: ExceptionKind = serde_json::from_str("\"OVERRIDE\"").unwrap();
        assert_eq!(kind, ExceptionKind::Override);
    }
}
