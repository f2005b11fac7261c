//! Compiled schedule output model.
//!
//! [`ComputedSchedule`] is the only type the rendering collaborator needs:
//! one resolved, conflict-annotated entry per assignee per date. Items are
//! always derived by the compiler, never stored.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::time::ClockTime;

/// Where a compiled entry came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScheduleSource {
    /// Recurring weekly template row.
    Rule,
    /// Exception or holiday overlay.
    Exception,
    /// Direct date-specific assignment.
    Override,
}

/// One resolved schedule entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComputedSchedule {
    /// Calendar date.
    pub date: NaiveDate,
    /// Team context, when the entry is team-derived.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Scheduled employee, when resolved to a person.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,
    /// Employee display name, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_name: Option<String>,
    /// Resolved start; absent for all-day exception entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ClockTime>,
    /// Resolved end; absent for all-day exception entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
    /// Provenance of the entry.
    pub source: ScheduleSource,
    /// Display hint.
    #[serde(default)]
    pub color: String,
    /// Another entry overlaps this assignee on this date.
    #[serde(default)]
    pub has_conflict: bool,
    /// A check-in exists with no matching check-out.
    #[serde(default)]
    pub is_missing_checkout: bool,
    /// The entry is a zero-duration checkout marker.
    #[serde(default)]
    pub is_checkout_marker: bool,
}

impl ComputedSchedule {
    /// Creates an entry with the given provenance.
    pub fn new(date: NaiveDate, source: ScheduleSource) -> Self {
        Self {
            date,
            team_id: None,
            assignee_id: None,
            assignee_name: None,
            start: None,
            end: None,
            source,
            color: String::new(),
            has_conflict: false,
            is_missing_checkout: false,
            is_checkout_marker: false,
        }
    }

    /// Sets the team context.
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Sets the assignee.
    pub fn with_assignee(mut self, assignee_id: impl Into<String>) -> Self {
        self.assignee_id = Some(assignee_id.into());
        self
    }

    /// Sets the assignee display name.
    pub fn with_assignee_name(mut self, name: impl Into<String>) -> Self {
        self.assignee_name = Some(name.into());
        self
    }

    /// Sets resolved times.
    pub fn with_times(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Sets the display color.
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    /// Whether this entry's time range overlaps another's on the same date.
    ///
    /// Zero-duration markers and entries without times never overlap.
    pub fn overlaps(&self, other: &ComputedSchedule) -> bool {
        if self.date != other.date {
            return false;
        }
        match (self.start, self.end, other.start, other.end) {
            (Some(s1), Some(e1), Some(s2), Some(e2)) => s1 < e2 && s2 < e1,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    #[test]
    fn test_overlap_detection() {
        let date = d(2024, 6, 3);
        let a = ComputedSchedule::new(date, ScheduleSource::Rule).with_times(t("09:00"), t("17:00"));
        let b = ComputedSchedule::new(date, ScheduleSource::Rule).with_times(t("16:00"), t("20:00"));
        let c = ComputedSchedule::new(date, ScheduleSource::Rule).with_times(t("17:00"), t("20:00"));

        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c)); // half-open: touching ranges do not overlap

        let other_day =
            ComputedSchedule::new(d(2024, 6, 4), ScheduleSource::Rule).with_times(t("09:00"), t("17:00"));
        assert!(!a.overlaps(&other_day));
    }

    #[test]
    fn test_markers_never_overlap() {
        let date = d(2024, 6, 3);
        let marker =
            ComputedSchedule::new(date, ScheduleSource::Rule).with_times(t("09:00"), t("09:00"));
        let range =
            ComputedSchedule::new(date, ScheduleSource::Rule).with_times(t("08:00"), t("17:00"));
        assert!(!marker.overlaps(&range));
        assert!(!range.overlaps(&marker));
    }

    #[test]
    fn test_source_serde_tags() {
        assert_eq!(
            serde_json::to_string(&ScheduleSource::Override).unwrap(),
            "\"OVERRIDE\""
        );
        let s: ScheduleSource = serde_json::from_str("\"RULE\"").unwrap();
        assert_eq!(s, ScheduleSource::Rule);
    }
}
