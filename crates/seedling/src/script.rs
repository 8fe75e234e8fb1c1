//! Input script checks for each track

use seedling_api::Track;

/// CJK unified ideographs accepted for the Chinese track
const CJK_RANGE: std::ops::RangeInclusive<char> = '\u{4E00}'..='\u{9FA5}';

/// Whether `text` is written in the track's script: Chinese characters
/// only, or English letters and spaces
pub fn matches_script(text: &str, track: Track) -> bool {
    let text = text.trim();
    if text.is_empty() {
        return false;
    }
    match track {
        Track::Chinese => text.chars().all(|c| CJK_RANGE.contains(&c)),
        Track::English => text.chars().all(|c| c.is_ascii_alphabetic() || c.is_whitespace()),
    }
}

/// Hint shown when the script check fails
pub fn script_hint(track: Track) -> &'static str {
    match track {
        Track::Chinese => "only Chinese characters are allowed",
        Track::English => "only English letters and spaces are allowed",
    }
}
