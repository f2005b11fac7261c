//! Schedule compilation.
//!
//! Merges recurring shift templates, date-specific assignments, team
//! membership, and exceptions/holidays across a date range into a flat,
//! conflict-annotated list of [`ComputedSchedule`] items — the only type
//! the rendering collaborator consumes.
//!
//! # Precedence
//! For one employee and date, lowest to highest:
//! 1. recurring template rows (team rows expand to one entry per member),
//! 2. direct date-specific assignments (suppress recurring rows),
//! 3. exceptions, and holidays above all.
//!
//! Validation problems exclude the affected item and land in the report;
//! conflicts are flagged on the output, never dropped.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{
    find_employee, find_team, team_of, AssigneeKind, Assignment, ComputedSchedule, Employee,
    ExceptionKind, Holiday, ScheduleSource, ShiftException, ShiftTemplate, Team, TimeSlot, Weekday,
};
use crate::time::ClockTime;
use crate::validation::{check_slot, ValidationError, ValidationErrorKind};

/// Everything the compiler needs, already materialized in memory.
#[derive(Debug, Clone, Default)]
pub struct CompileRequest {
    /// Recurring weekly templates.
    pub templates: Vec<ShiftTemplate>,
    /// Date-specific assignments.
    pub assignments: Vec<Assignment>,
    /// Team directory.
    pub teams: Vec<Team>,
    /// Employee directory (for display names).
    pub employees: Vec<Employee>,
    /// Per-employee exceptions.
    pub exceptions: Vec<ShiftException>,
    /// Company-wide holidays.
    pub holidays: Vec<Holiday>,
    /// First date (inclusive).
    pub from: NaiveDate,
    /// Last date (inclusive).
    pub to: NaiveDate,
    /// When set, only items for these teams are kept. Independent
    /// (no-team) employee items are never filtered out.
    pub team_filter: Option<Vec<String>>,
}

/// One double-booking, summarized for the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    /// Double-booked employee.
    pub assignee_id: String,
    /// Affected date.
    pub date: NaiveDate,
    /// How many of the employee's entries overlap that day.
    pub entries: usize,
}

/// Compilation output: resolved items plus the two reports.
#[derive(Debug, Clone, Default)]
pub struct CompileOutcome {
    /// Resolved, conflict-annotated schedule items.
    pub items: Vec<ComputedSchedule>,
    /// Problems that excluded items from the output.
    pub validation: Vec<ValidationError>,
    /// Double-bookings, one entry per assignee/date group.
    pub conflicts: Vec<Conflict>,
}

impl CompileRequest {
    /// Creates a request for an inclusive date range.
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from,
            to,
            ..Default::default()
        }
    }

    /// Sets the templates.
    pub fn with_templates(mut self, templates: Vec<ShiftTemplate>) -> Self {
        self.templates = templates;
        self
    }

    /// Sets the assignments.
    pub fn with_assignments(mut self, assignments: Vec<Assignment>) -> Self {
        self.assignments = assignments;
        self
    }

    /// Sets the team directory.
    pub fn with_teams(mut self, teams: Vec<Team>) -> Self {
        self.teams = teams;
        self
    }

    /// Sets the employee directory.
    pub fn with_employees(mut self, employees: Vec<Employee>) -> Self {
        self.employees = employees;
        self
    }

    /// Sets the exceptions.
    pub fn with_exceptions(mut self, exceptions: Vec<ShiftException>) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Sets the holidays.
    pub fn with_holidays(mut self, holidays: Vec<Holiday>) -> Self {
        self.holidays = holidays;
        self
    }

    /// Restricts output to the given teams.
    pub fn with_team_filter(mut self, team_ids: Vec<String>) -> Self {
        self.team_filter = Some(team_ids);
        self
    }
}

/// Compiles the request into resolved schedule items and reports.
pub fn compile(request: &CompileRequest) -> CompileOutcome {
    debug!(from = %request.from, to = %request.to, "compiling schedule range");

    let mut outcome = CompileOutcome::default();
    let mut date = request.from;
    while date <= request.to {
        compile_date(request, date, &mut outcome);
        match date.succ_opt() {
            Some(next) => date = next,
            None => break,
        }
    }

    debug!(
        items = outcome.items.len(),
        validation = outcome.validation.len(),
        conflicts = outcome.conflicts.len(),
        "compilation finished"
    );
    outcome
}

fn compile_date(request: &CompileRequest, date: NaiveDate, outcome: &mut CompileOutcome) {
    let weekday = Weekday::from_date(date);
    let mut day_items: Vec<ComputedSchedule> = Vec::new();

    // Direct assignments first: they suppress recurring rows for the
    // same employee and day.
    let mut overridden: HashSet<&str> = HashSet::new();
    for assignment in request
        .assignments
        .iter()
        .filter(|a| a.active && a.date == date)
    {
        match resolve_assignment_times(assignment, weekday, request) {
            Ok((start, end)) => {
                let color = assignment
                    .team_id
                    .as_deref()
                    .and_then(|id| find_team(&request.teams, id))
                    .map(|t| t.color.clone())
                    .unwrap_or_default();
                let mut item = ComputedSchedule::new(date, ScheduleSource::Override)
                    .with_assignee(&assignment.employee_id)
                    .with_times(start, end)
                    .with_color(color);
                item.team_id = assignment.team_id.clone();
                item.assignee_name = display_name(&request.employees, &assignment.employee_id);
                day_items.push(item);
                overridden.insert(&assignment.employee_id);
            }
            Err(err) => outcome.validation.push(err),
        }
    }

    // Individual template slots beat team expansion for the same member,
    // mirroring the draft-side override rule.
    let direct_in_templates: HashSet<&str> = request
        .templates
        .iter()
        .flat_map(|tpl| tpl.week.day(weekday))
        .filter(|s| s.assigned_type == AssigneeKind::Employee && !s.is_checkout)
        .map(|s| s.assigned_id.as_str())
        .collect();

    // Recurring template rows.
    for template in &request.templates {
        for slot in template.week.day(weekday) {
            if let Some(err) = check_slot(slot, weekday, &template.id, &request.teams) {
                outcome.validation.push(err);
                continue;
            }
            match slot.assigned_type {
                AssigneeKind::Team => {
                    // check_slot guarantees the team resolves.
                    let Some(team) = find_team(&request.teams, &slot.assigned_id) else {
                        continue;
                    };
                    for member in &team.members {
                        if overridden.contains(member.as_str())
                            || direct_in_templates.contains(member.as_str())
                        {
                            continue;
                        }
                        day_items.push(rule_item(
                            date,
                            slot,
                            Some(&team.id),
                            member,
                            &request.employees,
                            if slot.color.is_empty() {
                                &team.color
                            } else {
                                &slot.color
                            },
                        ));
                    }
                }
                AssigneeKind::Employee => {
                    if overridden.contains(slot.assigned_id.as_str()) {
                        continue;
                    }
                    let team_id = slot
                        .linked_team_id
                        .as_deref()
                        .or(template.team_id.as_deref())
                        .or_else(|| team_of(&request.teams, &slot.assigned_id).map(|t| t.id.as_str()));
                    day_items.push(rule_item(
                        date,
                        slot,
                        team_id,
                        &slot.assigned_id,
                        &request.employees,
                        &slot.color,
                    ));
                }
            }
        }
    }

    // Holidays block everyone; per-employee exceptions replace or
    // re-source that employee's entries.
    if let Some(holiday) = request.holidays.iter().find(|h| h.covers(date)) {
        debug!(date = %date, holiday = %holiday.name, "holiday blocks all entries");
        day_items.clear();
    } else {
        for exception in request.exceptions.iter().filter(|e| e.covers(date)) {
            apply_exception(exception, date, &mut day_items, &request.employees);
        }
    }

    flag_conflicts(date, &mut day_items, &mut outcome.conflicts);
    flag_missing_checkouts(&mut day_items);

    if let Some(filter) = &request.team_filter {
        day_items.retain(|item| match &item.team_id {
            Some(team_id) => filter.contains(team_id),
            None => true,
        });
    }

    outcome.items.append(&mut day_items);
}

fn rule_item(
    date: NaiveDate,
    slot: &TimeSlot,
    team_id: Option<&str>,
    assignee_id: &str,
    employees: &[Employee],
    color: &str,
) -> ComputedSchedule {
    let mut item = ComputedSchedule::new(date, ScheduleSource::Rule)
        .with_assignee(assignee_id)
        .with_times(slot.start, slot.end)
        .with_color(color);
    item.team_id = team_id.map(str::to_string);
    item.assignee_name = display_name(employees, assignee_id);
    item.is_checkout_marker = slot.is_marker() && slot.is_checkout;
    item
}

fn display_name(employees: &[Employee], employee_id: &str) -> Option<String> {
    find_employee(employees, employee_id).map(|e| e.name.clone())
}

/// Resolves an assignment's times: explicit override first, then the
/// referenced template's slot for that weekday (the employee's own slot,
/// or their team's).
fn resolve_assignment_times(
    assignment: &Assignment,
    weekday: Weekday,
    request: &CompileRequest,
) -> Result<(ClockTime, ClockTime), ValidationError> {
    if let (Some(start), Some(end)) = (assignment.start, assignment.end) {
        if end < start {
            return Err(ValidationError::new(
                ValidationErrorKind::InvertedTimeRange,
                format!(
                    "Assignment for '{}' on {}: end {end} before start {start}",
                    assignment.employee_id, assignment.date
                ),
            ));
        }
        return Ok((start, end));
    }

    let Some(template) = request
        .templates
        .iter()
        .find(|t| t.id == assignment.template_id)
    else {
        return Err(ValidationError::new(
            ValidationErrorKind::UnknownTemplate,
            format!(
                "Assignment for '{}' on {} references unknown template '{}'",
                assignment.employee_id, assignment.date, assignment.template_id
            ),
        ));
    };

    let day = template.week.day(weekday);
    let own = day
        .iter()
        .find(|s| s.is_for(&assignment.employee_id, AssigneeKind::Employee));
    let via_team = || {
        day.iter().find(|s| {
            s.assigned_type == AssigneeKind::Team
                && match &assignment.team_id {
                    Some(team_id) => &s.assigned_id == team_id,
                    None => find_team(&request.teams, &s.assigned_id)
                        .is_some_and(|t| t.has_member(&assignment.employee_id)),
                }
        })
    };

    own.or_else(via_team)
        .map(|s| (s.start, s.end))
        .ok_or_else(|| {
            ValidationError::new(
                ValidationErrorKind::UnresolvedTimes,
                format!(
                    "Assignment for '{}' on {}: no times and template '{}' has no matching {} slot",
                    assignment.employee_id, assignment.date, assignment.template_id, weekday
                ),
            )
        })
}

fn apply_exception(
    exception: &ShiftException,
    date: NaiveDate,
    day_items: &mut Vec<ComputedSchedule>,
    employees: &[Employee],
) {
    let affected = |item: &ComputedSchedule| {
        item.assignee_id.as_deref() == Some(exception.employee_id.as_str())
    };

    match exception.kind {
        ExceptionKind::Remote => {
            // Annotate: entries are kept, only the provenance changes.
            for item in day_items.iter_mut().filter(|i| affected(i)) {
                item.source = ScheduleSource::Exception;
            }
        }
        ExceptionKind::Leave | ExceptionKind::Sick | ExceptionKind::Override => {
            day_items.retain(|i| !affected(i));
            let mut item = ComputedSchedule::new(date, ScheduleSource::Exception)
                .with_assignee(&exception.employee_id);
            item.assignee_name = display_name(employees, &exception.employee_id);
            if let (Some(start), Some(end)) = (exception.start, exception.end) {
                item = item.with_times(start, end);
            }
            day_items.push(item);
        }
    }
}

/// Flags every entry that overlaps another entry for the same assignee,
/// and summarizes each affected group in the conflict report.
fn flag_conflicts(date: NaiveDate, day_items: &mut [ComputedSchedule], report: &mut Vec<Conflict>) {
    let assignees: Vec<String> = {
        let mut seen = Vec::new();
        for item in day_items.iter() {
            if let Some(id) = &item.assignee_id {
                if !seen.contains(id) {
                    seen.push(id.clone());
                }
            }
        }
        seen
    };

    for assignee in assignees {
        let indices: Vec<usize> = day_items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.assignee_id.as_deref() == Some(assignee.as_str()))
            .map(|(n, _)| n)
            .collect();
        if indices.len() < 2 {
            continue;
        }

        let mut flagged = 0usize;
        for &a in &indices {
            let collides = indices
                .iter()
                .any(|&b| b != a && day_items[a].overlaps(&day_items[b]));
            if collides {
                day_items[a].has_conflict = true;
                flagged += 1;
            }
        }
        if flagged > 0 {
            report.push(Conflict {
                assignee_id: assignee,
                date,
                entries: flagged,
            });
        }
    }
}

/// Applies the employee missing-checkout rule over compiled items: a day
/// consisting solely of pending check-in markers is still open.
fn flag_missing_checkouts(day_items: &mut [ComputedSchedule]) {
    let assignees: Vec<String> = day_items
        .iter()
        .filter_map(|i| i.assignee_id.clone())
        .collect();

    for assignee in assignees {
        let theirs: Vec<usize> = day_items
            .iter()
            .enumerate()
            .filter(|(_, i)| i.assignee_id.as_deref() == Some(assignee.as_str()))
            .map(|(n, _)| n)
            .collect();

        let has_checkout = theirs.iter().any(|&n| day_items[n].is_checkout_marker);
        let all_markers = !theirs.is_empty()
            && theirs.iter().all(|&n| match (day_items[n].start, day_items[n].end) {
                (Some(s), Some(e)) => s == e,
                _ => false,
            });

        if !has_checkout && all_markers {
            for &n in &theirs {
                day_items[n].is_missing_checkout = true;
            }
        }
    }
}
