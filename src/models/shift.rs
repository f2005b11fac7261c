//! Shift template and dated assignment models.
//!
//! A [`ShiftTemplate`] is a reusable weekly pattern; applying it to
//! concrete calendar dates produces [`Assignment`] records. An assignment
//! may override the template's times for its employee and date, and an
//! active assignment always takes precedence over the recurring pattern
//! for the same employee and day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::slot::WeeklySchedule;
use crate::time::ClockTime;

/// A reusable weekly shift pattern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftTemplate {
    /// Unique template identifier.
    pub id: String,
    /// Human-readable name.
    pub name: String,
    /// Owning team, when the template belongs to one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// The weekly pattern body.
    #[serde(default)]
    pub week: WeeklySchedule,
}

/// A concrete, dated shift instance for one employee.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    /// Assigned employee.
    pub employee_id: String,
    /// Template this assignment was produced from.
    pub template_id: String,
    /// Team context, when derived from team coverage.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team_id: Option<String>,
    /// Calendar date of the shift.
    pub date: NaiveDate,
    /// Explicit start overriding the template, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<ClockTime>,
    /// Explicit end overriding the template, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<ClockTime>,
    /// Inactive assignments are ignored by the compiler.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl ShiftTemplate {
    /// Creates a template with an empty week.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            team_id: None,
            week: WeeklySchedule::new(),
        }
    }

    /// Sets the owning team.
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Sets the weekly body.
    pub fn with_week(mut self, week: WeeklySchedule) -> Self {
        self.week = week;
        self
    }
}

impl Assignment {
    /// Creates an active assignment with template-derived times.
    pub fn new(
        employee_id: impl Into<String>,
        template_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            employee_id: employee_id.into(),
            template_id: template_id.into(),
            team_id: None,
            date,
            start: None,
            end: None,
            active: true,
        }
    }

    /// Sets the team context.
    pub fn with_team(mut self, team_id: impl Into<String>) -> Self {
        self.team_id = Some(team_id.into());
        self
    }

    /// Sets explicit times overriding the template.
    pub fn with_times(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.start = Some(start);
        self.end = Some(end);
        self
    }

    /// Deactivates the assignment.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::slot::{AssigneeKind, TimeSlot, Weekday};

    fn hour(h: u8) -> ClockTime {
        ClockTime::from_hour(h).unwrap()
    }

    #[test]
    fn test_template_builder() {
        let week = WeeklySchedule::new().with_day(
            Weekday::Monday,
            vec![TimeSlot::range("t1", AssigneeKind::Team, hour(9), hour(17))],
        );
        let tpl = ShiftTemplate::new("s1", "Week shift")
            .with_team("t1")
            .with_week(week);
        assert_eq!(tpl.team_id.as_deref(), Some("t1"));
        assert_eq!(tpl.week.day(Weekday::Monday).len(), 1);
    }

    #[test]
    fn test_assignment_defaults_and_overrides() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
        let plain = Assignment::new("e1", "s1", date);
        assert!(plain.active);
        assert!(plain.start.is_none());

        let overridden = Assignment::new("e1", "s1", date)
            .with_team("t1")
            .with_times(hour(10), hour(18));
        assert_eq!(overridden.start, Some(hour(10)));
        assert_eq!(overridden.end, Some(hour(18)));
    }

    #[test]
    fn test_assignment_active_default_on_deserialize() {
        let json = r#"{"employeeId":"e1","templateId":"s1","date":"2024-06-03"}"#;
        let a: Assignment = serde_json::from_str(json).unwrap();
        assert!(a.active);
    }
}
