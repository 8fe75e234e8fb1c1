//! Pure state transitions
//!
//! Each function takes the current state and returns the next one; nothing
//! here touches storage or reads the clock.

use chrono::{DateTime, NaiveDate, SubsecRound, Utc};
use seedling_api::{AppState, Rejected, Track, VocabularyItem};
use seedling_util::{local_day, ItemId};
use tracing::debug;

use crate::compute_outcome;

/// Clear `mastered_today` on items that were not graded today.
///
/// Idempotent; run once when a session starts.
pub fn normalize_for_today(state: &AppState, today: NaiveDate) -> AppState {
    let mut next = state.clone();
    let mut cleared = 0usize;

    for item in next.items.iter_mut().filter(|i| i.mastered_today) {
        let reviewed_today = item
            .last_reviewed
            .is_some_and(|at| local_day(&at) == today);
        if !reviewed_today {
            item.mastered_today = false;
            cleared += 1;
        }
    }

    if cleared > 0 {
        debug!(cleared, today = %today, "Day rollover cleared mastered flags");
    }
    next
}

/// Timestamps are persisted with millisecond precision
fn stored_instant(now: DateTime<Utc>) -> DateTime<Utc> {
    now.trunc_subsecs(3)
}

/// Add a new item at the front of the collection
pub fn add_item(
    state: &AppState,
    text: &str,
    track: Track,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> Result<AppState, Rejected> {
    let text = text.trim();
    if text.is_empty() {
        return Err(Rejected::EmptyText);
    }
    if state.contains_text(track, text) {
        return Err(Rejected::DuplicateItem {
            text: text.to_string(),
            track,
        });
    }

    let mut next = state.clone();
    next.items.insert(0, VocabularyItem::new(text, track, stored_instant(now), today));
    Ok(next)
}

/// Remove an item; an unknown id leaves the state as is
pub fn delete_item(state: &AppState, id: &ItemId) -> AppState {
    let mut next = state.clone();
    next.items.retain(|i| &i.id != id);
    next
}

/// Apply a graded answer to one item
pub fn grade_item(
    state: &AppState,
    id: &ItemId,
    known: bool,
    now: DateTime<Utc>,
    today: NaiveDate,
) -> AppState {
    let mut next = state.clone();
    let Some(item) = next.items.iter_mut().find(|i| &i.id == id) else {
        debug!(item_id = %id, "Grade for unknown item ignored");
        return next;
    };

    let outcome = compute_outcome(item.streak_level, known, today);
    item.next_due_date = outcome.next_due_date;
    item.streak_level = outcome.new_streak_level;
    item.familiarity = outcome.familiarity;
    item.last_reviewed = Some(stored_instant(now));
    if known {
        item.mastered_today = true;
    }
    next
}
