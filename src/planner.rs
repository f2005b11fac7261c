//! Template application planning.
//!
//! Applying a template to concrete calendar dates is a persistence-layer
//! write (batched assignment creation with an "overwrite conflicting"
//! flag). The pure half lives here: expand the template's weekly body
//! over the requested dates into per-employee [`Assignment`] records and
//! route each collision with an existing active assignment according to
//! the overwrite flag. Nothing is persisted.

use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::debug;

use crate::models::{find_team, AssigneeKind, Assignment, ShiftTemplate, Team, Weekday};

/// What applying a template to dates would do.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApplicationPlan {
    /// Fresh assignments with no collision.
    pub create: Vec<Assignment>,
    /// Assignments that collide and would replace the existing one
    /// (overwrite requested).
    pub replace: Vec<Assignment>,
    /// Assignments that collide and are dropped (overwrite refused).
    pub skipped: Vec<Assignment>,
}

impl ApplicationPlan {
    /// Total records the persistence layer would write.
    pub fn write_count(&self) -> usize {
        self.create.len() + self.replace.len()
    }
}

/// Plans the application of a template to the given dates.
///
/// Team slots expand to one assignment per current member; an employee
/// appearing through several slots on the same date yields a single
/// record (first slot wins). A collision is an existing *active*
/// assignment for the same employee and date.
pub fn plan_template_application(
    template: &ShiftTemplate,
    dates: &[NaiveDate],
    teams: &[Team],
    existing: &[Assignment],
    overwrite: bool,
) -> ApplicationPlan {
    let mut plan = ApplicationPlan::default();
    let mut planned: HashSet<(String, NaiveDate)> = HashSet::new();

    for &date in dates {
        let weekday = Weekday::from_date(date);
        for slot in template.week.day(weekday) {
            let expansion: Vec<(String, Option<String>)> = match slot.assigned_type {
                AssigneeKind::Team => match find_team(teams, &slot.assigned_id) {
                    Some(team) => team
                        .members
                        .iter()
                        .map(|m| (m.clone(), Some(team.id.clone())))
                        .collect(),
                    None => Vec::new(),
                },
                AssigneeKind::Employee => {
                    vec![(slot.assigned_id.clone(), slot.linked_team_id.clone())]
                }
            };

            for (employee_id, team_id) in expansion {
                if !planned.insert((employee_id.clone(), date)) {
                    continue;
                }
                let mut assignment = Assignment::new(&employee_id, &template.id, date)
                    .with_times(slot.start, slot.end);
                assignment.team_id = team_id;

                let collides = existing
                    .iter()
                    .any(|a| a.active && a.employee_id == employee_id && a.date == date);
                if !collides {
                    plan.create.push(assignment);
                } else if overwrite {
                    plan.replace.push(assignment);
                } else {
                    plan.skipped.push(assignment);
                }
            }
        }
    }

    debug!(
        create = plan.create.len(),
        replace = plan.replace.len(),
        skipped = plan.skipped.len(),
        template = %template.id,
        "template application planned"
    );
    plan
}
