//! Level progression for STARSTRIKE.
//!
//! Owns the hecs world of in-flight enemies, the deadline scheduler, the
//! lifecycle tracker that tallies outcomes and reports completion, and the
//! session controller that turns player input into `SessionSnapshot`s.

pub mod catalog;
pub mod high_score;
pub mod presentation;
pub mod progress;
pub mod scheduler;
pub mod session;
pub mod systems;
pub mod tracker;
pub mod world_setup;

pub use starstrike_core as core;
pub use session::{GameSession, SessionConfig};
pub use tracker::{EnemyLifecycleTracker, TrackerConfig};

#[cfg(test)]
mod tests;
