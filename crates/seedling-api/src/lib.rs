//! Data model for seedling
//!
//! This crate defines the types shared between the store, the core engine
//! and the presentation layer:
//! - Tracks and session modes
//! - Vocabulary items and the aggregate application state
//! - Day-keyed logs (engagement marks, water claims)
//! - Rejections returned by state mutations
//! - Schema versioning

mod error;
mod types;

pub use error::*;
pub use types::*;

/// Current persisted document version
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// Storage key for the state document, shared with documents written by
/// earlier builds
pub const DEFAULT_STORAGE_KEY: &str = "little_linguist_db_v1";
