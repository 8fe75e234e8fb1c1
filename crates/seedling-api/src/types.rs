//! Shared types for seedling

use chrono::{DateTime, NaiveDate, Utc};
use seedling_util::{format_day, parse_day, ItemId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{ParseModeError, ParseTrackError, CURRENT_SCHEMA_VERSION};

/// Review intervals in days, indexed by streak level
pub const INTERVALS: [u32; 6] = [1, 2, 4, 7, 15, 30];

/// Highest streak level (last index of [`INTERVALS`])
pub const MAX_STREAK_LEVEL: u8 = (INTERVALS.len() - 1) as u8;

/// Highest familiarity (star) rating
pub const MAX_FAMILIARITY: u8 = 5;

/// Water claims needed to grow one plant
pub const COLLECTION_THRESHOLD: u32 = 30;

/// Vocabulary category; each track has its own schedule and daily tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    Chinese,
    English,
}

impl Track {
    pub const ALL: [Track; 2] = [Track::Chinese, Track::English];

    pub fn as_str(&self) -> &'static str {
        match self {
            Track::Chinese => "chinese",
            Track::English => "english",
        }
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Track {
    type Err = ParseTrackError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "chinese" | "zh" => Ok(Track::Chinese),
            "english" | "en" => Ok(Track::English),
            other => Err(ParseTrackError(other.to_string())),
        }
    }
}

/// Which items a learning session draws from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionMode {
    /// Items never learned (streak level 0)
    New,
    /// Learned items whose due date has arrived
    Review,
}

impl SessionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionMode::New => "new",
            SessionMode::Review => "review",
        }
    }
}

impl fmt::Display for SessionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" | "learn" => Ok(SessionMode::New),
            "review" => Ok(SessionMode::Review),
            other => Err(ParseModeError(other.to_string())),
        }
    }
}

/// Build the `"<date>:<track>"` key used by day logs
pub fn day_key(day: NaiveDate, track: Track) -> String {
    format!("{}:{}", format_day(day), track)
}

/// Split a `"<date>:<track>"` key; `None` for anything malformed
pub fn parse_day_key(key: &str) -> Option<(NaiveDate, Track)> {
    let (day, track) = key.split_once(':')?;
    Some((parse_day(day)?, track.parse().ok()?))
}

/// Append-only set of `"<date>:<track>"` keys.
///
/// Insertion order is kept so the persisted document round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayLog(Vec<String>);

impl DayLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, day: NaiveDate, track: Track) -> bool {
        let key = day_key(day, track);
        self.0.iter().any(|k| *k == key)
    }

    /// Record a key; returns false if it was already present
    pub fn insert(&mut self, day: NaiveDate, track: Track) -> bool {
        if self.contains(day, track) {
            return false;
        }
        self.0.push(day_key(day, track));
        true
    }

    /// Well-formed entries; malformed keys are skipped
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, Track)> + '_ {
        self.0.iter().filter_map(|k| parse_day_key(k))
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<String>> for DayLog {
    fn from(keys: Vec<String>) -> Self {
        Self(keys)
    }
}

/// One memorized unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VocabularyItem {
    pub id: ItemId,

    /// Trimmed content, pre-validated against the track's script
    pub text: String,

    pub track: Track,

    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub added_at: DateTime<Utc>,

    /// Last graded instant; `None` until first graded
    #[serde(default, with = "chrono::serde::ts_milliseconds_option")]
    pub last_reviewed: Option<DateTime<Utc>>,

    /// Eligible for review once today reaches this day
    pub next_due_date: NaiveDate,

    /// Index into [`INTERVALS`]; 0 means new or reset
    pub streak_level: u8,

    /// 0-5 star rating, maintained by the scheduler
    pub familiarity: u8,

    /// Graded "known" today; cleared on day rollover
    #[serde(default)]
    pub mastered_today: bool,
}

impl VocabularyItem {
    pub fn new(text: impl Into<String>, track: Track, now: DateTime<Utc>, today: NaiveDate) -> Self {
        Self {
            id: ItemId::generate(),
            text: text.into(),
            track,
            added_at: now,
            last_reviewed: None,
            next_due_date: today,
            streak_level: 0,
            familiarity: 0,
            mastered_today: false,
        }
    }

    /// True when the item is in the learning (not yet reviewed) stage
    pub fn is_new(&self) -> bool {
        self.streak_level == 0
    }

    pub fn is_due(&self, today: NaiveDate) -> bool {
        self.next_due_date <= today
    }
}

/// Gamification counter fed by daily water claims
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenState {
    /// Always below [`COLLECTION_THRESHOLD`]
    pub water_level: u32,

    /// Lifetime count of fully grown plants
    pub collected_count: u32,

    /// Claimed `"<date>:<track>"` keys
    #[serde(default)]
    pub water_claims: DayLog,
}

/// Completion ratio shown while learning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackProgress {
    pub mastered_today: usize,
    pub total: usize,
}

impl TrackProgress {
    /// Fraction in `[0, 1]`; an empty track counts as 0
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.mastered_today as f64 / self.total as f64
        }
    }
}

/// The aggregate root persisted as a single document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppState {
    pub schema_version: u32,

    /// Newest first
    #[serde(default)]
    pub items: Vec<VocabularyItem>,

    #[serde(default)]
    pub engagement_log: DayLog,

    #[serde(default)]
    pub garden: GardenState,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            items: Vec::new(),
            engagement_log: DayLog::new(),
            garden: GardenState::default(),
        }
    }
}

impl AppState {
    pub fn get_item(&self, id: &ItemId) -> Option<&VocabularyItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Items of one track
    pub fn track_items(&self, track: Track) -> impl Iterator<Item = &VocabularyItem> + '_ {
        self.items.iter().filter(move |i| i.track == track)
    }

    /// Whether `text` (case-insensitive, trimmed) already exists in `track`
    pub fn contains_text(&self, track: Track, text: &str) -> bool {
        let needle = text.trim().to_lowercase();
        self.track_items(track)
            .any(|i| i.text.to_lowercase() == needle)
    }

    /// A track's items newest-first, optionally narrowed by a
    /// case-insensitive substring
    pub fn library(&self, track: Track, query: Option<&str>) -> Vec<&VocabularyItem> {
        let query = query
            .map(|q| q.trim().to_lowercase())
            .filter(|q| !q.is_empty());

        let mut items: Vec<&VocabularyItem> = self
            .track_items(track)
            .filter(|i| match &query {
                Some(q) => i.text.to_lowercase().contains(q.as_str()),
                None => true,
            })
            .collect();

        items.sort_by(|a, b| b.added_at.cmp(&a.added_at));
        items
    }

    pub fn progress(&self, track: Track) -> TrackProgress {
        let mut progress = TrackProgress { mastered_today: 0, total: 0 };
        for item in self.track_items(track) {
            progress.total += 1;
            if item.mastered_today {
                progress.mastered_today += 1;
            }
        }
        progress
    }
}
