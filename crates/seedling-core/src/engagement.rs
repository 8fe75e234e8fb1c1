//! Daily engagement marks and the watering counter

use chrono::{Datelike, NaiveDate};
use seedling_api::{AppState, DayLog, Rejected, Track, COLLECTION_THRESHOLD};
use tracing::debug;

/// Record that a session for `track` was finished on `today`
pub fn mark_done(state: &AppState, track: Track, today: NaiveDate) -> AppState {
    let mut next = state.clone();
    if !next.engagement_log.insert(today, track) {
        debug!(track = %track, day = %today, "Engagement already marked");
    }
    next
}

pub fn is_done(state: &AppState, track: Track, day: NaiveDate) -> bool {
    state.engagement_log.contains(day, track)
}

pub fn is_claimed(state: &AppState, track: Track, day: NaiveDate) -> bool {
    state.garden.water_claims.contains(day, track)
}

/// Whether the day's water reward for `track` is waiting to be collected
pub fn can_claim(state: &AppState, track: Track, today: NaiveDate) -> bool {
    is_done(state, track, today) && !is_claimed(state, track, today)
}

/// Add one unit of water for `track`, at most once per day.
///
/// Reaching [`COLLECTION_THRESHOLD`] empties the can and collects a plant.
/// Whether the track was actually completed today is left to the caller.
pub fn claim_water(state: &AppState, track: Track, today: NaiveDate) -> Result<AppState, Rejected> {
    if is_claimed(state, track, today) {
        return Err(Rejected::AlreadyClaimed { track });
    }

    let mut next = state.clone();
    let garden = &mut next.garden;
    garden.water_level = garden.water_level.saturating_add(1);
    if garden.water_level >= COLLECTION_THRESHOLD {
        garden.water_level = 0;
        garden.collected_count = garden.collected_count.saturating_add(1);
    }
    garden.water_claims.insert(today, track);
    Ok(next)
}

/// Tracks completed on one calendar day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayMarks {
    pub day: NaiveDate,
    pub tracks: Vec<Track>,
}

impl DayMarks {
    /// At least one track done (partially checked)
    pub fn any(&self) -> bool {
        !self.tracks.is_empty()
    }

    /// Every track done (fully checked)
    pub fn all(&self) -> bool {
        Track::ALL.iter().all(|t| self.tracks.contains(t))
    }
}

/// One entry per day of the month; empty for an invalid month
pub fn month_summary(log: &DayLog, year: i32, month: u32) -> Vec<DayMarks> {
    let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
        return Vec::new();
    };

    let mut days: Vec<DayMarks> = first
        .iter_days()
        .take_while(|d| d.month() == month)
        .map(|day| DayMarks { day, tracks: Vec::new() })
        .collect();

    for (day, track) in log.entries() {
        if day.year() != year || day.month() != month {
            continue;
        }
        let marks = &mut days[day.day0() as usize];
        if !marks.tracks.contains(&track) {
            marks.tracks.push(track);
        }
    }

    for marks in &mut days {
        marks.tracks.sort();
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use seedling_util::add_days;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mark_done_is_idempotent() {
        let today = day(2023, 10, 27);
        let once = mark_done(&AppState::default(), Track::Chinese, today);
        let twice = mark_done(&once, Track::Chinese, today);

        assert_eq!(once, twice);
        assert_eq!(once.engagement_log.keys(), ["2023-10-27:chinese".to_string()]);
        assert!(is_done(&once, Track::Chinese, today));
        assert!(!is_done(&once, Track::English, today));
        assert!(!is_done(&once, Track::Chinese, add_days(today, 1)));
    }

    #[test]
    fn claim_once_per_track_per_day() {
        let today = day(2023, 10, 27);
        let state = claim_water(&AppState::default(), Track::English, today).unwrap();
        assert_eq!(state.garden.water_level, 1);

        let again = claim_water(&state, Track::English, today);
        assert_eq!(again, Err(Rejected::AlreadyClaimed { track: Track::English }));

        let other = claim_water(&state, Track::Chinese, today).unwrap();
        assert_eq!(other.garden.water_level, 2);

        let tomorrow = claim_water(&state, Track::English, add_days(today, 1)).unwrap();
        assert_eq!(tomorrow.garden.water_level, 2);
    }

    #[test]
    fn thirty_claims_collect_one_plant() {
        let start = day(2023, 1, 1);
        let mut state = AppState::default();
        for i in 0..30 {
            state = claim_water(&state, Track::Chinese, add_days(start, i)).unwrap();
            if i < 29 {
                assert_eq!(state.garden.water_level, i as u32 + 1);
            }
        }
        assert_eq!(state.garden.water_level, 0);
        assert_eq!(state.garden.collected_count, 1);
        assert_eq!(state.garden.water_claims.len(), 30);
    }

    #[test]
    fn collected_count_saturates() {
        let today = day(2023, 10, 27);
        let mut state = AppState::default();
        state.garden.water_level = COLLECTION_THRESHOLD - 1;
        state.garden.collected_count = u32::MAX;

        let state = claim_water(&state, Track::English, today).unwrap();
        assert_eq!(state.garden.water_level, 0);
        assert_eq!(state.garden.collected_count, u32::MAX);
    }

    #[test]
    fn can_claim_requires_done_and_unclaimed() {
        let today = day(2023, 10, 27);
        let state = AppState::default();
        assert!(!can_claim(&state, Track::Chinese, today));

        let state = mark_done(&state, Track::Chinese, today);
        assert!(can_claim(&state, Track::Chinese, today));

        let state = claim_water(&state, Track::Chinese, today).unwrap();
        assert!(!can_claim(&state, Track::Chinese, today));
    }

    #[test]
    fn month_summary_groups_by_day() {
        let mut log = DayLog::new();
        log.insert(day(2024, 2, 3), Track::English);
        log.insert(day(2024, 2, 3), Track::Chinese);
        log.insert(day(2024, 2, 29), Track::Chinese);
        log.insert(day(2024, 3, 1), Track::Chinese);

        let summary = month_summary(&log, 2024, 2);
        assert_eq!(summary.len(), 29);
        assert_eq!(summary[2].tracks, vec![Track::Chinese, Track::English]);
        assert!(summary[2].all());
        assert!(summary[28].any());
        assert!(!summary[28].all());
        assert!(!summary[0].any());

        assert!(month_summary(&log, 2024, 13).is_empty());
    }
}
