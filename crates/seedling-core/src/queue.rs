//! Session queue state machine
//!
//! A session works through the eligible items of one track in order of
//! addition. The queue holds item ids and a cursor; answers either send the
//! current item to the back ("don't know") or drop it ("know").
//!
//! `Building -> EmptyAtStart | Active`, `Active -> Active | Complete`.

use chrono::NaiveDate;
use seedling_api::{AppState, SessionMode, Track, VocabularyItem};
use seedling_util::ItemId;

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// Items remain to be answered
    Active,
    /// Every item was answered "know"
    Complete,
    /// Nothing was eligible when the session was built
    EmptyAtStart,
}

/// Ordered working set for one learning session
#[derive(Debug, Clone)]
pub struct SessionQueue {
    track: Track,
    mode: SessionMode,
    items: Vec<ItemId>,
    cursor: usize,
    phase: SessionPhase,
    known: usize,
}

/// Whether `item` belongs in a session of this track and mode
pub fn is_eligible(item: &VocabularyItem, track: Track, mode: SessionMode, today: NaiveDate) -> bool {
    if item.track != track || item.mastered_today {
        return false;
    }
    match mode {
        SessionMode::New => item.streak_level == 0,
        SessionMode::Review => item.streak_level > 0 && item.is_due(today),
    }
}

impl SessionQueue {
    /// Select eligible items, oldest first
    pub fn build(state: &AppState, track: Track, mode: SessionMode, today: NaiveDate) -> Self {
        let mut eligible: Vec<&VocabularyItem> = state
            .items
            .iter()
            .filter(|i| is_eligible(i, track, mode, today))
            .collect();
        eligible.sort_by_key(|i| i.added_at);

        let items: Vec<ItemId> = eligible.into_iter().map(|i| i.id.clone()).collect();
        let phase = if items.is_empty() {
            SessionPhase::EmptyAtStart
        } else {
            SessionPhase::Active
        };

        Self {
            track,
            mode,
            items,
            cursor: 0,
            phase,
            known: 0,
        }
    }

    pub fn track(&self) -> Track {
        self.track
    }

    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == SessionPhase::Active
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Number of items answered "know" so far
    pub fn known_count(&self) -> usize {
        self.known
    }

    pub fn current(&self) -> Option<&ItemId> {
        self.items.get(self.cursor)
    }

    /// 1-based position and length, for an "n / m" indicator; `(0, 0)` when empty
    pub fn position(&self) -> (usize, usize) {
        if self.items.is_empty() {
            (0, 0)
        } else {
            (self.cursor + 1, self.items.len())
        }
    }

    /// Step forward; false at the last item
    pub fn advance(&mut self) -> bool {
        if self.cursor + 1 < self.items.len() {
            self.cursor += 1;
            true
        } else {
            false
        }
    }

    /// Step back; false at the first item
    pub fn retreat(&mut self) -> bool {
        if self.cursor > 0 {
            self.cursor -= 1;
            true
        } else {
            false
        }
    }

    /// "Don't know": move the current item to the back, keeping the cursor
    /// index so the next item slides into view
    pub fn requeue_current_at_end(&mut self) -> Option<ItemId> {
        if !self.is_active() || self.cursor >= self.items.len() {
            return None;
        }
        let id = self.items.remove(self.cursor);
        self.items.push(id.clone());
        Some(id)
    }

    /// "Know": drop the current item; an emptied queue is complete
    pub fn remove_current(&mut self) -> Option<ItemId> {
        if !self.is_active() || self.cursor >= self.items.len() {
            return None;
        }
        let id = self.items.remove(self.cursor);
        self.known += 1;
        self.settle();
        Some(id)
    }

    /// Drop an item that no longer exists (e.g. deleted mid-session)
    pub fn forget(&mut self, id: &ItemId) -> bool {
        let Some(index) = self.items.iter().position(|i| i == id) else {
            return false;
        };
        self.items.remove(index);
        if index < self.cursor {
            self.cursor -= 1;
        }
        if self.is_active() {
            self.settle();
        }
        true
    }

    fn settle(&mut self) {
        if self.items.is_empty() {
            self.cursor = 0;
            self.phase = SessionPhase::Complete;
        } else {
            self.cursor = self.cursor.min(self.items.len() - 1);
        }
    }
}
