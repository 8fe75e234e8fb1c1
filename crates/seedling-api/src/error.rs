//! Rejections returned by state mutations

use thiserror::Error;

use crate::Track;

/// A mutation was refused; the state is unchanged
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejected {
    #[error("'{text}' already exists in the {track} track")]
    DuplicateItem { text: String, track: Track },

    #[error("Water for the {track} track was already claimed today")]
    AlreadyClaimed { track: Track },

    #[error("Item text is empty")]
    EmptyText,
}

/// Unknown track name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown track '{0}' (expected 'chinese' or 'english')")]
pub struct ParseTrackError(pub String);

/// Unknown session mode name
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown session mode '{0}' (expected 'new' or 'review')")]
pub struct ParseModeError(pub String);
