//! Fixed-interval review scheduling
//!
//! A correct answer waits out the interval of the item's *current* level
//! and then promotes it one level. A wrong answer demotes one level, makes
//! the item due tomorrow and resets the familiarity rating to zero.

use chrono::NaiveDate;
use seedling_api::{INTERVALS, MAX_FAMILIARITY, MAX_STREAK_LEVEL};
use seedling_util::add_days;

/// New scheduling fields for a graded item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOutcome {
    pub next_due_date: NaiveDate,
    pub new_streak_level: u8,
    pub familiarity: u8,
}

/// Compute the next due date, streak level and familiarity for an answer.
///
/// Total for every input: a streak level above the table is treated as the
/// top level.
pub fn compute_outcome(streak_level: u8, succeeded: bool, today: NaiveDate) -> ReviewOutcome {
    let level = streak_level.min(MAX_STREAK_LEVEL);

    if succeeded {
        let new_streak_level = (level + 1).min(MAX_STREAK_LEVEL);
        let days = INTERVALS[level as usize];
        ReviewOutcome {
            next_due_date: add_days(today, days as u64),
            new_streak_level,
            familiarity: new_streak_level.min(MAX_FAMILIARITY),
        }
    } else {
        ReviewOutcome {
            next_due_date: add_days(today, 1),
            new_streak_level: level.saturating_sub(1),
            familiarity: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 27).unwrap()
    }

    #[test]
    fn success_promotes_and_waits_current_interval() {
        for s in 0..=MAX_STREAK_LEVEL {
            let outcome = compute_outcome(s, true, today());
            assert_eq!(outcome.new_streak_level, (s + 1).min(5));
            assert_eq!(outcome.familiarity, outcome.new_streak_level.min(5));
            assert_eq!(
                outcome.next_due_date,
                add_days(today(), INTERVALS[s as usize] as u64)
            );
        }
    }

    #[test]
    fn success_intervals_by_level() {
        let due: Vec<_> = (0..=5)
            .map(|s| (compute_outcome(s, true, today()).next_due_date - today()).num_days())
            .collect();
        assert_eq!(due, vec![1, 2, 4, 7, 15, 30]);
    }

    #[test]
    fn failure_demotes_and_is_due_tomorrow() {
        for s in 0..=MAX_STREAK_LEVEL {
            let outcome = compute_outcome(s, false, today());
            assert_eq!(outcome.new_streak_level, s.saturating_sub(1));
            assert_eq!(outcome.next_due_date, add_days(today(), 1));
        }
    }

    // Familiarity drops to zero on a wrong answer even though the streak
    // only loses one level. Kept on purpose; do not "fix" to min(level, 5).
    #[test]
    fn failure_resets_familiarity_to_zero() {
        let outcome = compute_outcome(3, false, today());
        assert_eq!(outcome.new_streak_level, 2);
        assert_eq!(outcome.familiarity, 0);

        for s in 0..=MAX_STREAK_LEVEL {
            assert_eq!(compute_outcome(s, false, today()).familiarity, 0);
        }
    }

    #[test]
    fn top_level_stays_at_top() {
        let outcome = compute_outcome(5, true, today());
        assert_eq!(outcome.new_streak_level, 5);
        assert_eq!(outcome.familiarity, 5);
    }

    #[test]
    fn out_of_range_level_is_clamped() {
        assert_eq!(compute_outcome(200, true, today()), compute_outcome(5, true, today()));
        assert_eq!(compute_outcome(200, false, today()).new_streak_level, 4);
    }

    #[test]
    fn due_date_crosses_month_end() {
        let end = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        let outcome = compute_outcome(1, true, end);
        assert_eq!(outcome.next_due_date, NaiveDate::from_ymd_opt(2024, 2, 2).unwrap());
    }
}
