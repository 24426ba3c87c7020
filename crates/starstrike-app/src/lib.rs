//! STARSTRIKE headless runner.
//!
//! Hosts a game session on its own thread, plays it with an autopilot
//! presentation, and reports how the level went.

pub mod autopilot;
pub mod game_loop;
pub mod state;

pub use starstrike_core as core;
