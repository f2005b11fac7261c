//! Per-date coverage summaries.
//!
//! Aggregate counts over compiled items for dashboard-style consumers.
//! Derived purely from [`ComputedSchedule`]; no scheduling rules live
//! here.

use chrono::NaiveDate;

use crate::models::ComputedSchedule;

/// Headcounts for one date.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageSummary {
    /// The summarized date.
    pub date: NaiveDate,
    /// Distinct employees with at least one entry.
    pub scheduled: usize,
    /// Distinct employees with a flagged double-booking.
    pub conflicted: usize,
    /// Distinct employees still owing a check-out.
    pub missing_checkout: usize,
}

/// Summarizes compiled items into one row per date, ascending.
pub fn summarize(items: &[ComputedSchedule]) -> Vec<CoverageSummary> {
    let mut dates: Vec<NaiveDate> = items.iter().map(|i| i.date).collect();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| {
            let day: Vec<&ComputedSchedule> = items.iter().filter(|i| i.date == date).collect();
            CoverageSummary {
                date,
                scheduled: distinct_assignees(&day, |_| true),
                conflicted: distinct_assignees(&day, |i| i.has_conflict),
                missing_checkout: distinct_assignees(&day, |i| i.is_missing_checkout),
            }
        })
        .collect()
}

fn distinct_assignees(day: &[&ComputedSchedule], keep: impl Fn(&ComputedSchedule) -> bool) -> usize {
    let mut ids: Vec<&str> = day
        .iter()
        .filter(|i| keep(i))
        .filter_map(|i| i.assignee_id.as_deref())
        .collect();
    ids.sort_unstable();
    ids.dedup();
    ids.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ScheduleSource;
    use crate::time::ClockTime;

    fn t(s: &str) -> ClockTime {
        s.parse().unwrap()
    }

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
    }

    fn item(date: NaiveDate, assignee: &str) -> ComputedSchedule {
        ComputedSchedule::new(date, ScheduleSource::Rule)
            .with_assignee(assignee)
            .with_times(t("09:00"), t("17:00"))
    }

    #[test]
    fn test_counts_are_per_distinct_employee() {
        let mut conflicted = item(d(3), "a");
        conflicted.has_conflict = true;
        let mut conflicted_again = item(d(3), "a");
        conflicted_again.has_conflict = true;

        let items = vec![conflicted, conflicted_again, item(d(3), "b"), item(d(4), "c")];
        let summary = summarize(&items);

        assert_eq!(summary.len(), 2);
        assert_eq!(summary[0].date, d(3));
        assert_eq!(summary[0].scheduled, 2);
        assert_eq!(summary[0].conflicted, 1);
        assert_eq!(summary[0].missing_checkout, 0);
        assert_eq!(summary[1].scheduled, 1);
    }

    #[test]
    fn test_missing_checkout_counted() {
        let mut open = item(d(3), "a");
        open.is_missing_checkout = true;
        let summary = summarize(&[open]);
        assert_eq!(summary[0].missing_checkout, 1);
    }

    #[test]
    fn test_empty_input() {
        assert!(summarize(&[]).is_empty());
    }
}
