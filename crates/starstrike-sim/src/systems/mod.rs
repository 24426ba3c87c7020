//! Systems that operate on the enemy world.
//!
//! Systems are pure functions that take `&mut World` (or `&World` for read-only).
//! They do not own state; all state lives in components.

pub mod boundary;
pub mod cleanup;
pub mod movement;
pub mod snapshot;
