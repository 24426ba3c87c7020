//! Session snapshot: the complete visible state handed to presentation each tick.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::events::GameEvent;
use crate::types::{EnemyId, Point, SimTime};

/// Complete session state produced after each tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub time: SimTime,
    pub phase: GamePhase,
    /// Current 1-based level, 0 before any level was started.
    pub level: usize,
    pub score: u32,
    pub best_score: u32,
    pub progress: ProgressView,
    /// Stars the attempt would earn right now.
    pub stars: u8,
    pub enemies: Vec<EnemyView>,
    pub events: Vec<GameEvent>,
    /// Present once the level attempt completed.
    pub result: Option<LevelResult>,
}

/// Read-only tally of the current level attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressView {
    pub killed: u32,
    pub escaped: u32,
    pub total: u32,
}

/// An in-flight enemy for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: EnemyId,
    pub enemy_type: EnemyType,
    pub position: Point,
    pub health: i32,
    pub max_health: i32,
    pub phase: EnemyPhase,
    pub pattern: MovementPattern,
}

/// Summary shown on the level-complete screen.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelResult {
    pub level: usize,
    pub stars: u8,
    pub score: u32,
    /// Seconds from level start until the last enemy's outcome.
    pub elapsed_secs: f64,
}

impl LevelResult {
    /// Elapsed time as `MM:SS`.
    pub fn formatted_time(&self) -> String {
        let total = self.elapsed_secs.max(0.0) as u64;
        format!("{:02}:{:02}", total / 60, total % 60)
    }
}
