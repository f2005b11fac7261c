//! Input validation for schedule compilation.
//!
//! Structural integrity checks over templates and the team directory.
//! Problems are collected into a report, never thrown — the compiler
//! excludes the affected items so one bad template cannot blank out an
//! entire date range.

use std::collections::HashSet;

use crate::models::{AssigneeKind, ShiftTemplate, Team, TimeSlot, Weekday};

/// Validation result: `Ok(())` or every detected issue.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A slot references a team that doesn't exist.
    UnknownTeam,
    /// A slot's end time precedes its start time.
    InvertedTimeRange,
    /// An assignment references a template that doesn't exist.
    UnknownTemplate,
    /// An assignment's times could not be resolved from its template.
    UnresolvedTimes,
}

impl ValidationError {
    pub(crate) fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Checks one template slot against the directory.
///
/// Zero-duration markers are legal (check-in pending / checkout marker);
/// only a strictly inverted range is an error.
pub(crate) fn check_slot(
    slot: &TimeSlot,
    weekday: Weekday,
    template_id: &str,
    teams: &[Team],
) -> Option<ValidationError> {
    if slot.end < slot.start {
        return Some(ValidationError::new(
            ValidationErrorKind::InvertedTimeRange,
            format!(
                "Template '{template_id}' {weekday}: slot for '{}' ends {} before start {}",
                slot.assigned_id, slot.end, slot.start
            ),
        ));
    }
    if slot.assigned_type == AssigneeKind::Team && !teams.iter().any(|t| t.id == slot.assigned_id)
    {
        return Some(ValidationError::new(
            ValidationErrorKind::UnknownTeam,
            format!(
                "Template '{template_id}' {weekday}: unknown team '{}'",
                slot.assigned_id
            ),
        ));
    }
    None
}

/// Validates templates against the team directory.
///
/// Checks:
/// 1. No duplicate template IDs
/// 2. No duplicate team IDs
/// 3. Every template-level team reference resolves
/// 4. Every slot passes [`check_slot`] (team reference, time ordering)
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_templates(templates: &[ShiftTemplate], teams: &[Team]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut team_ids = HashSet::new();
    for t in teams {
        if !team_ids.insert(t.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate team ID: {}", t.id),
            ));
        }
    }

    let mut template_ids = HashSet::new();
    for tpl in templates {
        if !template_ids.insert(tpl.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate template ID: {}", tpl.id),
            ));
        }

        if let Some(team_id) = &tpl.team_id {
            if !team_ids.contains(team_id.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownTeam,
                    format!("Template '{}' references unknown team '{team_id}'", tpl.id),
                ));
            }
        }

        for (weekday, slots) in tpl.week.days() {
            for slot in slots {
                if let Some(err) = check_slot(slot, weekday, &tpl.id, teams) {
                    errors.push(err);
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
