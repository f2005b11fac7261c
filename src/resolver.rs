//! Draft-day mutation rules.
//!
//! Pure functions that inspect a day's slot list and produce a new slot
//! list in response to one discrete action. No I/O, no UI, and inputs are
//! never mutated — every operation returns a fresh list.
//!
//! # Implicit Coverage
//! An employee with no personal slot is still "assigned" on a day if a
//! team they belong to has a slot. [`find_existing_assignment`] makes that
//! two-tier lookup a single function: direct slot first, then
//! team-membership coverage, recording which team provided it.
//!
//! # Cascade Rule
//! Removing a team's slot also removes every employee slot on the same day
//! whose assignee is a current member of that team *and* whose
//! `is_checkout` flag is set. Independent member slots (no checkout flag)
//! represent assignments unrelated to the team and are preserved.

use tracing::warn;

use crate::models::{find_team, team_of, AssigneeKind, Team, TimeSlot, Weekday, WeeklySchedule};
use crate::time::ClockTime;

/// Result of the two-tier coverage lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingAssignment {
    /// Index of the matched slot in the day's list. For team-derived
    /// coverage this is the *team's* slot index.
    pub slot_index: usize,
    /// Matched slot start.
    pub start: ClockTime,
    /// Matched slot end.
    pub end: ClockTime,
    /// The covering team's id when the match is inherited from team
    /// membership rather than a direct slot.
    pub via_team: Option<String>,
}

impl ExistingAssignment {
    /// Whether the coverage comes from the entity's own slot.
    #[inline]
    pub fn is_direct(&self) -> bool {
        self.via_team.is_none()
    }
}

/// Which follow-up actions a clicked hour permits on an existing slot.
///
/// For any clicked hour differing from the slot's start, exactly one of
/// `can_check_out` / `can_check_in` is true; `is_exact_match` is mutually
/// exclusive with both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AvailableActions {
    /// The clicked hour is later than the start: offer "set as check-out".
    pub can_check_out: bool,
    /// The clicked hour is earlier than the start: offer "set as check-in".
    pub can_check_in: bool,
    /// The clicked hour equals the start: offer toggle-off.
    pub can_toggle_off: bool,
    /// The clicked hour equals the start hour exactly.
    pub is_exact_match: bool,
}

/// One discrete mutation of a day's slot list.
#[derive(Debug, Clone, PartialEq)]
pub enum SlotAction {
    /// Append a new slot.
    Add(TimeSlot),
    /// Drop the slot at an index.
    Remove { index: usize },
    /// Replace the end time of the slot at an index.
    ModifyEnd { index: usize, end: ClockTime },
    /// Replace the start time of the slot at an index.
    ModifyStart { index: usize, start: ClockTime },
    /// Record an individual check-out against a team slot: any
    /// pre-existing slot for the employee is dropped and a zero-duration
    /// checkout marker is inserted at the given time.
    CheckoutIndividual {
        team_slot_index: usize,
        employee_id: String,
        at: ClockTime,
    },
    /// Remove the team's own slot and cascade-delete member checkout
    /// markers (see module docs).
    RemoveTeam { team_id: String },
}

/// Two-tier coverage lookup for one entity on one day.
///
/// For an employee, a direct individual slot wins; failing that, coverage
/// is inherited from any team the employee currently belongs to that has
/// a slot that day. For a team, only its own slot qualifies.
///
/// Returns `None` when the entity has no coverage at all — callers treat
/// that as "fresh check-in".
pub fn find_existing_assignment(
    entity_id: &str,
    kind: AssigneeKind,
    day_slots: &[TimeSlot],
    teams: &[Team],
) -> Option<ExistingAssignment> {
    let direct = day_slots
        .iter()
        .position(|s| s.is_for(entity_id, kind))
        .map(|index| ExistingAssignment {
            slot_index: index,
            start: day_slots[index].start,
            end: day_slots[index].end,
            via_team: None,
        });

    if direct.is_some() || kind == AssigneeKind::Team {
        return direct;
    }

    // No personal slot: the employee may still be covered via a team.
    let team = team_of(teams, entity_id)?;
    day_slots
        .iter()
        .position(|s| s.is_for(&team.id, AssigneeKind::Team))
        .map(|index| ExistingAssignment {
            slot_index: index,
            start: day_slots[index].start,
            end: day_slots[index].end,
            via_team: Some(team.id.clone()),
        })
}

/// Classifies a clicked hour against an existing slot's start hour.
pub fn compute_available_actions(
    existing: &ExistingAssignment,
    clicked_hour: u8,
) -> AvailableActions {
    let start_hour = existing.start.hour();
    if clicked_hour == start_hour {
        AvailableActions {
            can_toggle_off: true,
            is_exact_match: true,
            ..Default::default()
        }
    } else if clicked_hour > start_hour {
        AvailableActions {
            can_check_out: true,
            ..Default::default()
        }
    } else {
        AvailableActions {
            can_check_in: true,
            ..Default::default()
        }
    }
}

/// Applies one action to a day's slot list, returning the new list.
///
/// Out-of-range indices and mismatched targets are no-ops returning the
/// input unchanged — absence is a normal control path, never a crash.
pub fn apply_assignment(
    day_slots: &[TimeSlot],
    action: &SlotAction,
    teams: &[Team],
) -> Vec<TimeSlot> {
    let mut slots = day_slots.to_vec();
    match action {
        SlotAction::Add(slot) => {
            slots.push(slot.clone());
        }
        SlotAction::Remove { index } => {
            if *index < slots.len() {
                slots.remove(*index);
            } else {
                warn!(index, len = slots.len(), "remove index out of range; no-op");
            }
        }
        SlotAction::ModifyEnd { index, end } => {
            if let Some(slot) = slots.get_mut(*index) {
                slot.end = *end;
            } else {
                warn!(index, "modify-end index out of range; no-op");
            }
        }
        SlotAction::ModifyStart { index, start } => {
            if let Some(slot) = slots.get_mut(*index) {
                slot.start = *start;
            } else {
                warn!(index, "modify-start index out of range; no-op");
            }
        }
        SlotAction::CheckoutIndividual {
            team_slot_index,
            employee_id,
            at,
        } => {
            let Some(team_slot) = slots.get(*team_slot_index) else {
                warn!(
                    index = team_slot_index,
                    "checkout-individual index out of range; no-op"
                );
                return slots;
            };
            if team_slot.assigned_type != AssigneeKind::Team {
                warn!(
                    index = team_slot_index,
                    "checkout-individual target is not a team slot; no-op"
                );
                return slots;
            }
            let team_id = team_slot.assigned_id.clone();
            let color = team_slot.color.clone();
            slots.retain(|s| !s.is_for(employee_id, AssigneeKind::Employee));
            slots.push(TimeSlot::checkout_marker(employee_id.clone(), *at, team_id).with_color(color));
        }
        SlotAction::RemoveTeam { team_id } => {
            let team = find_team(teams, team_id);
            if team.is_none() {
                warn!(%team_id, "team not in directory; cascade skipped");
            }
            slots.retain(|s| {
                if s.is_for(team_id, AssigneeKind::Team) {
                    return false;
                }
                match team {
                    Some(team) => {
                        let cascades = s.assigned_type == AssigneeKind::Employee
                            && s.is_checkout
                            && team.has_member(&s.assigned_id);
                        !cascades
                    }
                    None => true,
                }
            });
        }
    }
    slots
}

/// Applies [`SlotAction::RemoveTeam`] across all seven days.
///
/// Used when a team is deleted entirely, not just unassigned from one day.
pub fn clean_orphans_on_team_remove(
    week: &WeeklySchedule,
    team_id: &str,
    teams: &[Team],
) -> WeeklySchedule {
    let action = SlotAction::RemoveTeam {
        team_id: team_id.to_string(),
    };
    let mut cleaned = WeeklySchedule::new();
    for day in Weekday::ALL {
        *cleaned.day_mut(day) = apply_assignment(week.day(day), &action, teams);
    }
    cleaned
}

/// Locates a slot to remove for the "click again to remove" gesture,
/// regardless of which hour was originally clicked.
pub fn find_slot_to_deselect(
    day_slots: &[TimeSlot],
    entity_id: &str,
    kind: AssigneeKind,
) -> Option<usize> {
    day_slots.iter().position(|s| s.is_for(entity_id, kind))
}

/// Structural "unpaired check-in" check: an odd number of slots for the
/// assignee means a check-in exists without its matching check-out.
///
/// Simpler than the aggregate rule in [`crate::status`]; used where
/// team-level nuance is unnecessary.
pub fn is_missing_checkout(day_slots: &[TimeSlot], assignee_id: &str, kind: AssigneeKind) -> bool {
    let count = day_slots
        .iter()
        .filter(|s| s.is_for(assignee_id, kind))
        .count();
    count % 2 == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hour(h: u8) -> ClockTime {
        ClockTime::from_hour(h).unwrap()
    }

    fn sample_teams() -> Vec<Team> {
        vec![
            Team::new("t1", "Front Desk")
                .with_color("#3b82f6")
                .with_members(vec!["a".into(), "b".into(), "c".into()]),
            Team::new("t2", "Kitchen").with_member("d"),
        ]
    }

    fn team_slot() -> TimeSlot {
        TimeSlot::range("t1", AssigneeKind::Team, hour(9), hour(17)).with_color("#3b82f6")
    }

    #[test]
    fn test_find_existing_direct_beats_team() {
        let teams = sample_teams();
        let day = vec![
            team_slot(),
            TimeSlot::range("a", AssigneeKind::Employee, hour(11), hour(15)),
        ];

        let found = find_existing_assignment("a", AssigneeKind::Employee, &day, &teams).unwrap();
        assert!(found.is_direct());
        assert_eq!(found.slot_index, 1);
        assert_eq!(found.start, hour(11));
    }

    #[test]
    fn test_find_existing_via_team() {
        let teams = sample_teams();
        let day = vec![team_slot()];

        let found = find_existing_assignment("b", AssigneeKind::Employee, &day, &teams).unwrap();
        assert_eq!(found.via_team.as_deref(), Some("t1"));
        assert_eq!(found.slot_index, 0);
        assert_eq!(found.start, hour(9));

        // "d" belongs to t2, which has no slot today.
        assert!(find_existing_assignment("d", AssigneeKind::Employee, &day, &teams).is_none());
    }

    #[test]
    fn test_find_existing_team_requires_own_slot() {
        let teams = sample_teams();
        let day = vec![TimeSlot::range(
            "a",
            AssigneeKind::Employee,
            hour(9),
            hour(17),
        )];
        assert!(find_existing_assignment("t1", AssigneeKind::Team, &day, &teams).is_none());
    }

    #[test]
    fn test_available_actions_exclusivity() {
        let existing = ExistingAssignment {
            slot_index: 0,
            start: hour(9),
            end: hour(17),
            via_team: None,
        };

        let exact = compute_available_actions(&existing, 9);
        assert!(exact.is_exact_match && exact.can_toggle_off);
        assert!(!exact.can_check_in && !exact.can_check_out);

        let later = compute_available_actions(&existing, 14);
        assert!(later.can_check_out);
        assert!(!later.can_check_in && !later.is_exact_match && !later.can_toggle_off);

        let earlier = compute_available_actions(&existing, 7);
        assert!(earlier.can_check_in);
        assert!(!earlier.can_check_out && !earlier.is_exact_match && !earlier.can_toggle_off);
    }

    #[test]
    fn test_add_then_remove_is_identity() {
        let teams = sample_teams();
        let original = vec![team_slot()];
        let marker = TimeSlot::check_in_marker("a", AssigneeKind::Employee, hour(10));

        let added = apply_assignment(&original, &SlotAction::Add(marker), &teams);
        assert_eq!(added.len(), 2);

        let index = find_slot_to_deselect(&added, "a", AssigneeKind::Employee).unwrap();
        let removed = apply_assignment(&added, &SlotAction::Remove { index }, &teams);
        assert_eq!(removed, original);
    }

    #[test]
    fn test_modify_preserves_other_fields() {
        let teams = sample_teams();
        let day = vec![team_slot()];

        let extended = apply_assignment(
            &day,
            &SlotAction::ModifyEnd {
                index: 0,
                end: hour(19),
            },
            &teams,
        );
        assert_eq!(extended[0].end, hour(19));
        assert_eq!(extended[0].start, hour(9));
        assert_eq!(extended[0].color, "#3b82f6");

        let shifted = apply_assignment(
            &day,
            &SlotAction::ModifyStart {
                index: 0,
                start: hour(8),
            },
            &teams,
        );
        assert_eq!(shifted[0].start, hour(8));
        assert_eq!(shifted[0].end, hour(17));
    }

    #[test]
    fn test_checkout_individual_replaces_existing_slot() {
        let teams = sample_teams();
        let day = vec![
            team_slot(),
            TimeSlot::check_in_marker("a", AssigneeKind::Employee, hour(10)),
        ];

        let result = apply_assignment(
            &day,
            &SlotAction::CheckoutIndividual {
                team_slot_index: 0,
                employee_id: "a".into(),
                at: hour(15),
            },
            &teams,
        );

        assert_eq!(result.len(), 2);
        let marker = result
            .iter()
            .find(|s| s.is_for("a", AssigneeKind::Employee))
            .unwrap();
        assert!(marker.is_checkout);
        assert!(marker.is_marker());
        assert_eq!(marker.start, hour(15));
        assert_eq!(marker.linked_team_id.as_deref(), Some("t1"));
        assert_eq!(marker.color, "#3b82f6");
    }

    #[test]
    fn test_checkout_individual_requires_team_slot() {
        let teams = sample_teams();
        let day = vec![TimeSlot::range(
            "a",
            AssigneeKind::Employee,
            hour(9),
            hour(17),
        )];

        let result = apply_assignment(
            &day,
            &SlotAction::CheckoutIndividual {
                team_slot_index: 0,
                employee_id: "a".into(),
                at: hour(15),
            },
            &teams,
        );
        assert_eq!(result, day);
    }

    #[test]
    fn test_remove_team_cascade() {
        let teams = sample_teams();
        // A has a checkout marker, B has an independent personal slot,
        // C has nothing of their own.
        let day = vec![
            team_slot(),
            TimeSlot::checkout_marker("a", hour(15), "t1"),
            TimeSlot::range("b", AssigneeKind::Employee, hour(12), hour(20)),
        ];

        let result = apply_assignment(
            &day,
            &SlotAction::RemoveTeam {
                team_id: "t1".into(),
            },
            &teams,
        );

        assert_eq!(result.len(), 1);
        assert!(result[0].is_for("b", AssigneeKind::Employee));
        assert!(!result[0].is_checkout);
    }

    #[test]
    fn test_remove_team_spares_non_members() {
        let teams = sample_teams();
        // "d" is in t2, not t1 — their checkout marker must survive.
        let day = vec![team_slot(), TimeSlot::checkout_marker("d", hour(14), "t2")];

        let result = apply_assignment(
            &day,
            &SlotAction::RemoveTeam {
                team_id: "t1".into(),
            },
            &teams,
        );
        assert_eq!(result.len(), 1);
        assert!(result[0].is_for("d", AssigneeKind::Employee));
    }

    #[test]
    fn test_remove_unknown_team_only_drops_own_slot() {
        let day = vec![
            TimeSlot::range("ghost", AssigneeKind::Team, hour(9), hour(17)),
            TimeSlot::checkout_marker("a", hour(15), "ghost"),
        ];

        let result = apply_assignment(
            &day,
            &SlotAction::RemoveTeam {
                team_id: "ghost".into(),
            },
            &[],
        );
        // Membership cannot be established, so only the team's own slot goes.
        assert_eq!(result.len(), 1);
        assert!(result[0].is_for("a", AssigneeKind::Employee));
    }

    #[test]
    fn test_out_of_range_actions_are_no_ops() {
        let teams = sample_teams();
        let day = vec![team_slot()];

        for action in [
            SlotAction::Remove { index: 5 },
            SlotAction::ModifyEnd {
                index: 5,
                end: hour(20),
            },
            SlotAction::ModifyStart {
                index: 5,
                start: hour(5),
            },
            SlotAction::CheckoutIndividual {
                team_slot_index: 5,
                employee_id: "a".into(),
                at: hour(15),
            },
        ] {
            assert_eq!(apply_assignment(&day, &action, &teams), day);
        }
    }

    #[test]
    fn test_clean_orphans_across_week() {
        let teams = sample_teams();
        let week = WeeklySchedule::new()
            .with_day(
                Weekday::Monday,
                vec![team_slot(), TimeSlot::checkout_marker("a", hour(15), "t1")],
            )
            .with_day(
                Weekday::Friday,
                vec![
                    team_slot(),
                    TimeSlot::range("b", AssigneeKind::Employee, hour(12), hour(18)),
                ],
            );

        let cleaned = clean_orphans_on_team_remove(&week, "t1", &teams);
        assert!(cleaned.day(Weekday::Monday).is_empty());
        assert_eq!(cleaned.day(Weekday::Friday).len(), 1);
        assert!(cleaned.day(Weekday::Friday)[0].is_for("b", AssigneeKind::Employee));
    }

    #[test]
    fn test_structural_missing_checkout() {
        let day = vec![
            TimeSlot::check_in_marker("a", AssigneeKind::Employee, hour(9)),
            TimeSlot::range("b", AssigneeKind::Employee, hour(9), hour(17)),
            TimeSlot::check_in_marker("b", AssigneeKind::Employee, hour(18)),
        ];

        assert!(is_missing_checkout(&day, "a", AssigneeKind::Employee)); // 1 slot
        assert!(!is_missing_checkout(&day, "b", AssigneeKind::Employee)); // 2 slots
        assert!(!is_missing_checkout(&day, "c", AssigneeKind::Employee)); // 0 slots
    }
}
