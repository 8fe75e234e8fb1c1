//! Core learning engine

use seedling_api::{AppState, Rejected, SessionMode, Track, VocabularyItem};
use seedling_util::ItemId;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::{engagement, CoreEvent, SessionPhase, SessionQueue, StateStore};

/// Drives learning sessions against a [`StateStore`]
pub struct CoreEngine {
    store: StateStore,
    session: Option<SessionQueue>,
}

impl CoreEngine {
    pub fn new(store: StateStore) -> Self {
        let state = store.snapshot();
        info!(items = state.items.len(), "Core engine initialized");

        Self {
            store,
            session: None,
        }
    }

    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// Current state snapshot
    pub fn snapshot(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    /// The current session, if one was started
    pub fn session(&self) -> Option<&SessionQueue> {
        self.session.as_ref()
    }

    /// Build a session for `track` after applying day rollover.
    ///
    /// Replaces any session in progress.
    pub fn start_session(&mut self, track: Track, mode: SessionMode) -> CoreEvent {
        let state = self.store.normalize();
        let queue = SessionQueue::build(&state, track, mode, self.store.today());

        let event = match queue.phase() {
            SessionPhase::EmptyAtStart => {
                info!(track = %track, mode = %mode, "Nothing to study");
                CoreEvent::SessionEmpty { track, mode }
            }
            _ => {
                info!(track = %track, mode = %mode, size = queue.len(), "Session started");
                CoreEvent::SessionStarted {
                    track,
                    mode,
                    size: queue.len(),
                }
            }
        };

        self.session = Some(queue);
        event
    }

    /// Abandon the current session without recording engagement
    pub fn end_session(&mut self) -> Option<SessionQueue> {
        let session = self.session.take();
        if let Some(queue) = &session
            && queue.is_active()
        {
            debug!(track = %queue.track(), remaining = queue.len(), "Session abandoned");
        }
        session
    }

    /// The item under the cursor
    pub fn current_item(&self) -> Option<VocabularyItem> {
        let id = self.session.as_ref()?.current()?;
        self.store.snapshot().get_item(id).cloned()
    }

    pub fn advance(&mut self) -> bool {
        self.session.as_mut().is_some_and(|q| q.advance())
    }

    pub fn retreat(&mut self) -> bool {
        self.session.as_mut().is_some_and(|q| q.retreat())
    }

    /// Grade the current item and move the session along
    pub fn answer(&mut self, known: bool) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        let Some(queue) = self.session.as_mut() else {
            return events;
        };
        let Some(id) = queue.current().cloned() else {
            return events;
        };

        if self.store.snapshot().get_item(&id).is_none() {
            warn!(item_id = %id, "Session item no longer exists, skipping");
            queue.forget(&id);
            events.extend(self.finish_if_complete());
            return events;
        }

        let state = self.store.grade_item(&id, known);
        if let Some(item) = state.get_item(&id) {
            debug!(
                item_id = %id,
                known,
                streak_level = item.streak_level,
                next_due = %item.next_due_date,
                "Item graded"
            );
            events.push(CoreEvent::ItemGraded {
                item_id: id.clone(),
                known,
                streak_level: item.streak_level,
                familiarity: item.familiarity,
                next_due_date: item.next_due_date,
            });
        }

        if let Some(queue) = self.session.as_mut() {
            if known {
                queue.remove_current();
            } else {
                queue.requeue_current_at_end();
            }
        }

        events.extend(self.finish_if_complete());
        events
    }

    /// On the transition into `Complete`, mark engagement exactly once
    fn finish_if_complete(&mut self) -> Vec<CoreEvent> {
        let mut events = Vec::new();

        let Some(queue) = self.session.as_ref() else {
            return events;
        };
        if queue.phase() != SessionPhase::Complete {
            return events;
        }

        let (track, mode, known) = (queue.track(), queue.mode(), queue.known_count());
        // the finished queue is dropped so a later call cannot mark twice
        self.session = None;

        info!(track = %track, mode = %mode, known, "Session complete");
        events.push(CoreEvent::SessionCompleted { track, mode, known });

        if known == 0 {
            return events;
        }

        let today = self.store.today();
        if !engagement::is_done(&self.store.snapshot(), track, today) {
            self.store.mark_engagement(track);
            info!(track = %track, day = %today, "Engagement marked");
            events.push(CoreEvent::EngagementMarked { track, day: today });
        }
        events
    }

    pub fn add_item(&mut self, text: &str, track: Track) -> Result<CoreEvent, Rejected> {
        let state = self.store.add_item(text, track)?;
        let item = &state.items[0];
        info!(item_id = %item.id, track = %track, "Item added");

        Ok(CoreEvent::ItemAdded {
            item_id: item.id.clone(),
            track,
            text: item.text.clone(),
        })
    }

    /// Remove an item; unknown ids yield no events
    pub fn delete_item(&mut self, id: &ItemId) -> Vec<CoreEvent> {
        let mut events = Vec::new();
        if self.store.snapshot().get_item(id).is_none() {
            debug!(item_id = %id, "Delete of unknown item ignored");
            return events;
        }

        self.store.delete_item(id);
        info!(item_id = %id, "Item deleted");
        events.push(CoreEvent::ItemDeleted { item_id: id.clone() });

        let forgotten = self.session.as_mut().is_some_and(|q| q.forget(id));
        if forgotten {
            events.extend(self.finish_if_complete());
        }
        events
    }

    pub fn claim_water(&mut self, track: Track) -> Result<Vec<CoreEvent>, Rejected> {
        let before = self.store.snapshot().garden.collected_count;
        let state = self.store.claim_water(track)?;
        let garden = &state.garden;

        info!(track = %track, water_level = garden.water_level, "Water claimed");
        let mut events = vec![CoreEvent::WaterClaimed {
            track,
            water_level: garden.water_level,
        }];

        if garden.collected_count > before {
            info!(collected = garden.collected_count, "Plant collected");
            events.push(CoreEvent::PlantCollected {
                collected_count: garden.collected_count,
            });
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use seedling_store::MemoryBackend;
    use seedling_util::FixedClock;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 10, 27).unwrap()
    }

    fn engine_with_clock() -> (CoreEngine, Arc<FixedClock>) {
        let clock = Arc::new(FixedClock::at_noon(today()));
        let store = StateStore::open(Arc::new(MemoryBackend::new()), "engine_test", clock.clone());
        (CoreEngine::new(store), clock)
    }

    fn engine() -> CoreEngine {
        engine_with_clock().0
    }

    #[test]
    fn test_empty_session() {
        let mut engine = engine();
        let event = engine.start_session(Track::Chinese, SessionMode::New);

        assert_eq!(
            event,
            CoreEvent::SessionEmpty { track: Track::Chinese, mode: SessionMode::New }
        );
        assert_eq!(engine.session().unwrap().phase(), SessionPhase::EmptyAtStart);
        assert!(engine.answer(true).is_empty());
        assert!(engine.snapshot().engagement_log.is_empty());
    }

    #[test]
    fn test_know_completes_and_marks_once() {
        let mut engine = engine();
        engine.add_item("日", Track::Chinese).unwrap();

        let event = engine.start_session(Track::Chinese, SessionMode::New);
        assert!(matches!(event, CoreEvent::SessionStarted { size: 1, .. }));

        let events = engine.answer(true);
        assert_eq!(events.len(), 3);
        assert!(matches!(events[0], CoreEvent::ItemGraded { known: true, streak_level: 1, .. }));
        assert!(matches!(events[1], CoreEvent::SessionCompleted { known: 1, .. }));
        assert_eq!(
            events[2],
            CoreEvent::EngagementMarked { track: Track::Chinese, day: today() }
        );

        assert!(engine.session().is_none());
        assert!(engine.answer(true).is_empty());
        assert_eq!(engine.snapshot().engagement_log.len(), 1);
    }

    #[test]
    fn test_second_session_same_day_does_not_remark() {
        let mut engine = engine();
        engine.add_item("a", Track::English).unwrap();
        engine.start_session(Track::English, SessionMode::New);
        engine.answer(true);

        engine.add_item("b", Track::English).unwrap();
        engine.start_session(Track::English, SessionMode::New);
        let events = engine.answer(true);

        assert!(events.iter().any(|e| matches!(e, CoreEvent::SessionCompleted { .. })));
        assert!(!events.iter().any(|e| matches!(e, CoreEvent::EngagementMarked { .. })));
        assert_eq!(engine.snapshot().engagement_log.len(), 1);
    }

    #[test]
    fn test_dont_know_keeps_session_active() {
        let mut engine = engine();
        engine.add_item("a", Track::English).unwrap();
        engine.add_item("b", Track::English).unwrap();
        engine.start_session(Track::English, SessionMode::New);

        assert_eq!(engine.current_item().unwrap().text, "a");
        let events = engine.answer(false);
        assert_eq!(events.len(), 1);
        assert_eq!(engine.current_item().unwrap().text, "b");
        assert_eq!(engine.session().unwrap().len(), 2);
        assert!(engine.snapshot().engagement_log.is_empty());
    }

    #[test]
    fn test_deleting_last_item_ends_session_without_mark() {
        let mut engine = engine();
        engine.add_item("a", Track::English).unwrap();
        engine.start_session(Track::English, SessionMode::New);

        let id = engine.current_item().unwrap().id;
        let events = engine.delete_item(&id);

        assert!(matches!(events[0], CoreEvent::ItemDeleted { .. }));
        assert!(matches!(events[1], CoreEvent::SessionCompleted { known: 0, .. }));
        assert_eq!(events.len(), 2);
        assert!(engine.snapshot().engagement_log.is_empty());
        assert!(engine.delete_item(&id).is_empty());
    }

    #[test]
    fn test_claim_water_events() {
        let (mut engine, clock) = engine_with_clock();

        let events = engine.claim_water(Track::Chinese).unwrap();
        assert_eq!(
            events,
            vec![CoreEvent::WaterClaimed { track: Track::Chinese, water_level: 1 }]
        );
        assert!(engine.claim_water(Track::Chinese).is_err());

        for _ in 1..29 {
            clock.advance_days(1);
            engine.claim_water(Track::Chinese).unwrap();
        }
        clock.advance_days(1);
        let events = engine.claim_water(Track::Chinese).unwrap();
        assert_eq!(events[1], CoreEvent::PlantCollected { collected_count: 1 });
        assert_eq!(engine.snapshot().garden.water_level, 0);
    }

    #[test]
    fn test_navigation_passthrough() {
        let mut engine = engine();
        assert!(!engine.advance());

        engine.add_item("a", Track::English).unwrap();
        engine.add_item("b", Track::English).unwrap();
        engine.start_session(Track::English, SessionMode::New);

        assert!(engine.advance());
        assert_eq!(engine.current_item().unwrap().text, "b");
        assert!(engine.retreat());
        assert!(!engine.retreat());
    }
}
