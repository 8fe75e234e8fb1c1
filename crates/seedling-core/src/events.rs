//! Core events emitted by the engine

use chrono::NaiveDate;
use seedling_api::{SessionMode, Track};
use seedling_util::ItemId;

/// Events emitted by the core engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreEvent {
    /// A new item joined the collection
    ItemAdded {
        item_id: ItemId,
        track: Track,
        text: String,
    },

    /// An item was removed
    ItemDeleted {
        item_id: ItemId,
    },

    /// An answer was recorded against an item
    ItemGraded {
        item_id: ItemId,
        known: bool,
        streak_level: u8,
        familiarity: u8,
        next_due_date: NaiveDate,
    },

    /// A session was built with at least one item
    SessionStarted {
        track: Track,
        mode: SessionMode,
        size: usize,
    },

    /// Nothing was eligible for the requested session
    SessionEmpty {
        track: Track,
        mode: SessionMode,
    },

    /// Every item in the session was answered "know"
    SessionCompleted {
        track: Track,
        mode: SessionMode,
        known: usize,
    },

    /// Today's engagement mark was recorded for a track
    EngagementMarked {
        track: Track,
        day: NaiveDate,
    },

    /// A daily water claim succeeded
    WaterClaimed {
        track: Track,
        water_level: u32,
    },

    /// The water can filled up and a plant was collected
    PlantCollected {
        collected_count: u32,
    },
}
