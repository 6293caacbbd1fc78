//! Start-of-day transformation of the daily list.
//!
//! The check runs once when the app starts. A dashboard left open across
//! midnight is reset at the next start, not at midnight.

use chrono::{DateTime, Local, TimeZone, Utc};

use crate::model::task::Task;
use crate::ops::task_ops::{display_order, renumber};

/// Whether today's reset has happened yet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResetStatus {
    /// `lastReset` falls on an earlier (or later) calendar day than now
    Pending,
    /// Reset already performed for the current calendar day
    Reset,
}

/// True iff `last_reset` and `now` fall on different calendar dates in `tz`.
pub fn should_reset_in<Tz: TimeZone>(last_reset: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> bool {
    last_reset.with_timezone(tz).date_naive() != now.with_timezone(tz).date_naive()
}

/// [`should_reset_in`] using the local time zone.
pub fn should_reset(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    should_reset_in(last_reset, now, &Local)
}

pub fn status_in<Tz: TimeZone>(last_reset: DateTime<Utc>, now: DateTime<Utc>, tz: &Tz) -> ResetStatus {
    if should_reset_in(last_reset, now, tz) {
        ResetStatus::Pending
    } else {
        ResetStatus::Reset
    }
}

pub fn status(last_reset: DateTime<Utc>, now: DateTime<Utc>) -> ResetStatus {
    status_in(last_reset, now, &Local)
}

/// Result of a daily reset: the new daily list and the new `lastReset`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResetOutcome {
    pub daily: Vec<Task>,
    pub last_reset: DateTime<Utc>,
    /// Checked one-off tasks that were removed
    pub dropped: usize,
}

/// Apply the daily reset rules, walking the list in display order:
///
/// - recurring tasks stay, unchecked, ahead of everything else;
/// - unchecked one-off tasks stay as they are;
/// - checked one-off tasks are dropped.
///
/// Recurring tasks keep their relative order among themselves, as do the
/// surviving one-off tasks. Ranks are renumbered 0..n-1.
pub fn perform_reset(daily: &[Task], now: DateTime<Utc>) -> ResetOutcome {
    let mut recurring = Vec::new();
    let mut kept = Vec::new();
    let mut dropped = 0;

    for task in display_order(daily) {
        if task.is_recurring {
            let mut task = task.clone();
            task.checked = false;
            recurring.push(task);
        } else if !task.checked {
            kept.push(task.clone());
        } else {
            dropped += 1;
        }
    }

    recurring.extend(kept);
    renumber(&mut recurring);
    ResetOutcome {
        daily: recurring,
        last_reset: now,
        dropped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, FixedOffset};
    use pretty_assertions::assert_eq;

    fn utc(s: &str) -> DateTime<Utc> {
        DateTime::parse_from_rfc3339(s).unwrap().with_timezone(&Utc)
    }

    fn task(id: &str, order: i64, checked: bool, is_recurring: bool) -> Task {
        Task {
            id: id.into(),
            text: format!("Task {}", id),
            checked,
            created_at: utc("2025-05-13T08:00:00Z"),
            order,
            is_recurring,
        }
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    // --- ShouldReset ---

    #[test]
    fn same_day_does_not_reset() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        // 00:30 and 23:59 local on the same date
        let last = utc("2025-05-13T22:30:00Z");
        let now = utc("2025-05-14T21:59:00Z");
        assert!(!should_reset_in(last, now, &tz));
        assert_eq!(status_in(last, now, &tz), ResetStatus::Reset);
    }

    #[test]
    fn one_minute_past_midnight_resets() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        // 23:59 local on the 13th, then 00:01 local on the 14th
        let last = utc("2025-05-14T04:59:00Z");
        let now = utc("2025-05-14T05:01:00Z");
        assert!(should_reset_in(last, now, &tz));
        assert_eq!(status_in(last, now, &tz), ResetStatus::Pending);
    }

    #[test]
    fn a_day_and_a_bit_resets() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let last = utc("2025-05-13T12:00:00Z");
        let now = last + Duration::hours(24) + Duration::seconds(1);
        assert!(should_reset_in(last, now, &tz));
    }

    #[test]
    fn last_reset_later_today_does_not_reset() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let now = utc("2025-05-14T09:00:00Z");
        let last = utc("2025-05-14T18:00:00Z");
        assert!(!should_reset_in(last, now, &tz));
    }

    #[test]
    fn date_comparison_depends_on_zone() {
        // Same UTC date, different local dates east of Greenwich
        let last = utc("2025-05-14T01:00:00Z");
        let now = utc("2025-05-14T23:00:00Z");
        assert!(!should_reset_in(last, now, &Utc));
        let tokyo = FixedOffset::east_opt(9 * 3600).unwrap();
        assert!(should_reset_in(last, now, &tokyo));
    }

    // --- PerformReset ---

    #[test]
    fn reset_scenario() {
        let daily = vec![
            task("x", 0, true, true),
            task("y", 1, false, false),
            task("z", 2, true, false),
        ];
        let now = utc("2025-05-14T07:00:00Z");
        let outcome = perform_reset(&daily, now);

        assert_eq!(ids(&outcome.daily), vec!["x", "y"]);
        assert!(!outcome.daily[0].checked);
        assert_eq!(outcome.daily[1], daily[1]);
        assert_eq!(outcome.daily[0].order, 0);
        assert_eq!(outcome.daily[1].order, 1);
        assert_eq!(outcome.dropped, 1);
        assert_eq!(outcome.last_reset, now);
    }

    #[test]
    fn recurring_tasks_keep_relative_order_and_lead() {
        let daily = vec![
            task("a", 0, false, false),
            task("r1", 1, true, true),
            task("b", 2, false, false),
            task("r2", 3, false, true),
            task("c", 4, true, false),
        ];
        let outcome = perform_reset(&daily, utc("2025-05-14T07:00:00Z"));
        assert_eq!(ids(&outcome.daily), vec!["r1", "r2", "a", "b"]);
        let orders: Vec<i64> = outcome.daily.iter().map(|t| t.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3]);
        assert!(outcome.daily.iter().all(|t| !t.checked));
    }

    #[test]
    fn reset_walks_display_order() {
        let daily = vec![task("late", 5, false, true), task("early", 1, false, true)];
        let outcome = perform_reset(&daily, utc("2025-05-14T07:00:00Z"));
        assert_eq!(ids(&outcome.daily), vec!["early", "late"]);
    }

    #[test]
    fn reset_of_empty_list() {
        let now = utc("2025-05-14T07:00:00Z");
        let outcome = perform_reset(&[], now);
        assert!(outcome.daily.is_empty());
        assert_eq!(outcome.dropped, 0);
        assert_eq!(outcome.last_reset, now);
    }
}
