//! Shared utilities for seedling
//!
//! This crate provides:
//! - ID types (ItemId)
//! - The clock seam (wall-clock time and calendar days, mockable)
//! - Calendar-day helpers
//! - Default paths for config and data directories

mod ids;
mod paths;
mod time;

pub use ids::*;
pub use paths::*;
pub use time::*;
