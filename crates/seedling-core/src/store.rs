//! Owner of the canonical application state

use chrono::{NaiveDate, Utc};
use seedling_api::{AppState, Rejected, Track};
use seedling_store::{load_state, save_state, PersistenceBackend};
use seedling_util::{Clock, ItemId};
use std::sync::Arc;
use tracing::{error, info};

use crate::{engagement, ops};

/// Holds the current [`AppState`] snapshot and writes it back after every
/// change.
///
/// Write failures are logged and otherwise ignored: the in-memory snapshot
/// stays authoritative for the rest of the process.
pub struct StateStore {
    backend: Arc<dyn PersistenceBackend>,
    key: String,
    clock: Arc<dyn Clock>,
    state: Arc<AppState>,
    failed_writes: u64,
}

impl StateStore {
    /// Load the stored state (or start empty) and apply day rollover
    pub fn open(
        backend: Arc<dyn PersistenceBackend>,
        key: impl Into<String>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let key = key.into();
        let loaded = load_state(backend.as_ref(), &key);
        let state = ops::normalize_for_today(&loaded, clock.today());

        info!(
            key = %key,
            items = state.items.len(),
            "State loaded"
        );

        Self {
            backend,
            key,
            clock,
            state: Arc::new(state),
            failed_writes: 0,
        }
    }

    /// Current immutable snapshot
    pub fn snapshot(&self) -> Arc<AppState> {
        Arc::clone(&self.state)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Writes that failed since the store was opened
    pub fn failed_writes(&self) -> u64 {
        self.failed_writes
    }

    /// Write the current snapshot; failures are logged, not returned
    pub fn save(&mut self) {
        if let Err(e) = save_state(self.backend.as_ref(), &self.key, &self.state) {
            self.failed_writes += 1;
            error!(key = %self.key, error = %e, "Failed to save state");
        }
    }

    /// Clear stale `mastered_today` flags
    pub fn normalize(&mut self) -> Arc<AppState> {
        let next = ops::normalize_for_today(&self.state, self.today());
        self.commit(next)
    }

    pub fn add_item(&mut self, text: &str, track: Track) -> Result<Arc<AppState>, Rejected> {
        let now = self.clock.now().with_timezone(&Utc);
        let next = ops::add_item(&self.state, text, track, now, self.today())?;
        Ok(self.commit(next))
    }

    pub fn delete_item(&mut self, id: &ItemId) -> Arc<AppState> {
        let next = ops::delete_item(&self.state, id);
        self.commit(next)
    }

    pub fn grade_item(&mut self, id: &ItemId, known: bool) -> Arc<AppState> {
        let now = self.clock.now().with_timezone(&Utc);
        let next = ops::grade_item(&self.state, id, known, now, self.today());
        self.commit(next)
    }

    pub fn mark_engagement(&mut self, track: Track) -> Arc<AppState> {
        let next = engagement::mark_done(&self.state, track, self.today());
        self.commit(next)
    }

    pub fn claim_water(&mut self, track: Track) -> Result<Arc<AppState>, Rejected> {
        let next = engagement::claim_water(&self.state, track, self.today())?;
        Ok(self.commit(next))
    }

    /// Publish `next` and persist it; unchanged states are not rewritten
    fn commit(&mut self, next: AppState) -> Arc<AppState> {
        if next != *self.state {
            self.state = Arc::new(next);
            self.save();
        }
        self.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_store::{MemoryBackend, SqliteBackend};
    use seedling_util::FixedClock;

    const KEY: &str = "test_state";

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn open(backend: Arc<dyn PersistenceBackend>, clock: Arc<FixedClock>) -> StateStore {
        StateStore::open(backend, KEY, clock)
    }

    #[test]
    fn test_first_run_is_empty() {
        let backend = Arc::new(MemoryBackend::new());
        let store = open(backend.clone(), Arc::new(FixedClock::at_noon(day(2023, 10, 27))));

        assert_eq!(*store.snapshot(), AppState::default());
        assert!(backend.is_empty());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let backend = Arc::new(SqliteBackend::in_memory().unwrap());
        let clock = Arc::new(FixedClock::at_noon(day(2023, 10, 27)));

        let mut store = open(backend.clone(), clock.clone());
        store.add_item("日", Track::Chinese).unwrap();
        store.mark_engagement(Track::Chinese);
        store.claim_water(Track::Chinese).unwrap();
        let expected = store.snapshot();

        let reopened = open(backend, clock);
        assert_eq!(reopened.snapshot(), expected);
        assert_eq!(reopened.snapshot().garden.water_level, 1);
    }

    #[test]
    fn test_rejection_leaves_state_unchanged() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = open(backend, Arc::new(FixedClock::at_noon(day(2023, 10, 27))));

        let before = store.add_item("apple", Track::English).unwrap();
        assert!(store.add_item("APPLE", Track::English).is_err());
        assert_eq!(store.snapshot(), before);

        store.claim_water(Track::English).unwrap();
        let claimed = store.snapshot();
        assert!(matches!(
            store.claim_water(Track::English),
            Err(Rejected::AlreadyClaimed { .. })
        ));
        assert_eq!(store.snapshot(), claimed);
    }

    #[test]
    fn test_write_failure_keeps_memory_state() {
        let backend = Arc::new(MemoryBackend::new());
        let mut store = open(backend.clone(), Arc::new(FixedClock::at_noon(day(2023, 10, 27))));

        backend.set_fail_writes(true);
        let state = store.add_item("日", Track::Chinese).unwrap();
        assert_eq!(state.items.len(), 1);
        assert_eq!(store.snapshot().items.len(), 1);
        assert_eq!(store.failed_writes(), 1);
        assert!(backend.is_empty());

        backend.set_fail_writes(false);
        store.save();
        assert_eq!(backend.len(), 1);
    }

    #[test]
    fn test_open_clears_yesterdays_mastery() {
        let backend = Arc::new(MemoryBackend::new());
        let clock = Arc::new(FixedClock::at_noon(day(2023, 10, 27)));

        let mut store = open(backend.clone(), clock.clone());
        let id = store.add_item("日", Track::Chinese).unwrap().items[0].id.clone();
        store.grade_item(&id, true);
        assert!(store.snapshot().get_item(&id).unwrap().mastered_today);

        clock.advance_days(1);
        let store = open(backend, clock);
        assert!(!store.snapshot().get_item(&id).unwrap().mastered_today);
    }

    #[test]
    fn test_normalize_after_midnight() {
        let backend = Arc::new(MemoryBackend::new());
        let clock = Arc::new(FixedClock::at_noon(day(2023, 10, 27)));
        let mut store = open(backend, clock.clone());

        let id = store.add_item("日", Track::Chinese).unwrap().items[0].id.clone();
        store.grade_item(&id, true);

        store.normalize();
        assert!(store.snapshot().get_item(&id).unwrap().mastered_today);

        clock.advance_days(1);
        let state = store.normalize();
        assert!(!state.get_item(&id).unwrap().mastered_today);
    }
}
