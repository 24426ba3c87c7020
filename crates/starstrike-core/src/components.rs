//! ECS components for hecs entities.
//!
//! Components are plain data structs with no methods.
//! Game logic lives in the enemy state machine and the sim systems.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Point};

/// Identity of an in-flight enemy. Immutable for the entity's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EnemyId,
    pub enemy_type: EnemyType,
}

/// Mutable combat state of an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyState {
    /// Remaining health. Never increases while alive.
    pub health: i32,
    pub max_health: i32,
    /// Flips to false exactly once, on death.
    pub alive: bool,
    pub phase: EnemyPhase,
}

/// Movement plan attached at spawn. The movement system derives the
/// entity's `Point` from it every tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Trajectory {
    pub pattern: MovementPattern,
    /// Spawn point; pattern offsets are relative to it.
    pub origin: Point,
    /// Scene height at spawn time (scales descent distance).
    pub scene_height: f64,
    /// Tick at which movement started.
    pub started_at_tick: u64,
    /// Total movement time in ticks. Movement completes exactly then.
    pub duration_ticks: u64,
}
