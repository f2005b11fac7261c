//! Check-in/check-out status classification.
//!
//! Read-only derivation of how a slot renders at a given hour (check-in
//! dot, check-out dot, or continuation line) and whether an assignee still
//! owes a check-out. Consumed by both the live rendering layer and the
//! draft editor's preview; no mutation capability.

use crate::models::{find_team, AssigneeKind, Team, TimeSlot};
use crate::time::ClockTime;

/// Visual role of a slot within one hour cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotVariant {
    /// Check-in: the range starts in this hour.
    Filled,
    /// Check-out: the range ends in this hour.
    Hollow,
    /// Continuation between check-in and check-out hours.
    Line,
}

/// Which wall-clock band the grid displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Ordinary daytime grid.
    #[default]
    Day,
    /// Overnight grid: hours before noon belong to the *next* morning, so
    /// they are shifted by +24 to sort continuously after the evening.
    Night,
}

/// Minutes since midnight, shifted into the continuous night band.
fn normalize_minutes(minutes: u16, mode: DisplayMode) -> u32 {
    let m = u32::from(minutes);
    match mode {
        DisplayMode::Night if m < 12 * 60 => m + 24 * 60,
        _ => m,
    }
}

/// An hour index, shifted into the continuous night band.
fn normalize_hour(hour: u8, mode: DisplayMode) -> u32 {
    let h = u32::from(hour);
    match mode {
        DisplayMode::Night if h < 12 => h + 24,
        _ => h,
    }
}

/// Classifies a slot's role within the hour cell `[slot_start_hour, +1h)`.
///
/// Returns `None` when the slot does not appear in that cell at all.
///
/// Zero-duration markers render only in the cell containing their start:
/// `Hollow` for checkout markers, `Filled` for pending check-ins. A range
/// renders `Filled` in its first overlapping cell, `Hollow` in its last,
/// and `Line` in between. In night mode both boundaries and the queried
/// hour are normalized, so a 23:00–07:00 shift classifies continuously
/// across midnight.
pub fn compute_dot_variant(
    start: ClockTime,
    end: ClockTime,
    slot_start_hour: u8,
    mode: DisplayMode,
    is_checkout: bool,
) -> Option<DotVariant> {
    let s = normalize_minutes(start.total_minutes(), mode);
    let e = normalize_minutes(end.total_minutes(), mode);
    let cell = normalize_hour(slot_start_hour, mode);

    if s == e {
        // Zero-duration marker: present only in its own hour cell.
        if cell == s / 60 {
            return Some(if is_checkout {
                DotVariant::Hollow
            } else {
                DotVariant::Filled
            });
        }
        return None;
    }

    if e < s {
        // Inverted after normalization; nothing sensible to draw.
        return None;
    }

    // Cell window [cell*60, cell*60 + 60) against the range [s, e).
    let cell_start = cell * 60;
    if cell_start + 60 <= s || e <= cell_start {
        return None;
    }

    let first_cell = s / 60;
    let last_cell = (e - 1) / 60;
    Some(if cell == first_cell {
        DotVariant::Filled
    } else if cell == last_cell {
        DotVariant::Hollow
    } else {
        DotVariant::Line
    })
}

/// Whether a check-out is outstanding for the assignee on this day.
///
/// For an employee: an explicit checkout marker settles the day; failing
/// that, the day is open exactly when every one of their slots is a
/// zero-duration check-in. An employee with no slots owes nothing.
///
/// For a team, the shift closes two ways: the team slot's own end was
/// explicitly extended (`start != end`), or every current member holds an
/// individual checkout marker. A team slot left as a marker with any
/// member unaccounted for is still open.
pub fn compute_checkout_status(
    day_slots: &[TimeSlot],
    assignee_id: &str,
    kind: AssigneeKind,
    teams: &[Team],
) -> bool {
    match kind {
        AssigneeKind::Employee => {
            let mine: Vec<&TimeSlot> = day_slots
                .iter()
                .filter(|s| s.is_for(assignee_id, kind))
                .collect();
            if mine.is_empty() {
                return false;
            }
            if mine.iter().any(|s| s.is_checkout) {
                return false;
            }
            mine.iter().all(|s| s.is_marker())
        }
        AssigneeKind::Team => {
            let own: Vec<&TimeSlot> = day_slots
                .iter()
                .filter(|s| s.is_for(assignee_id, kind))
                .collect();
            if own.is_empty() {
                return false;
            }
            if own.iter().any(|s| !s.is_marker()) {
                return false;
            }
            // Closure at the member level: every current member must have
            // checked out individually.
            let Some(team) = find_team(teams, assignee_id) else {
                return true;
            };
            let all_members_out = team.members.iter().all(|member| {
                day_slots
                    .iter()
                    .any(|s| s.is_for(member, AssigneeKind::Employee) && s.is_checkout)
            });
            !all_members_out
        }
    }
}
