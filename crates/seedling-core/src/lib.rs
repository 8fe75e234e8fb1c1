//! Learning engine for seedling
//!
//! This crate holds every rule with real invariants:
//! - Review scheduling over a fixed interval table
//! - Pure state transitions (add, delete, grade, day rollover)
//! - Engagement marks and the watering counter
//! - The session queue state machine (EmptyAtStart | Active -> Complete)
//! - The state store that persists after each change, and the engine on top

mod engagement;
mod engine;
mod events;
mod ops;
mod queue;
mod scheduler;
mod store;

pub use engagement::*;
pub use engine::*;
pub use events::*;
pub use ops::*;
pub use queue::*;
pub use scheduler::*;
pub use store::*;
