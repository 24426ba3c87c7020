//! Events emitted by the simulation for presentation and audio feedback.

use serde::{Deserialize, Serialize};

use crate::enums::*;
use crate::types::{EnemyId, Point};

/// Something the presentation layer may want to animate or play a sound for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    /// An enemy entered the scene.
    EnemySpawned {
        id: EnemyId,
        enemy_type: EnemyType,
        position: Point,
    },
    /// An enemy took non-lethal damage.
    EnemyHit {
        id: EnemyId,
        health: i32,
        max_health: i32,
    },
    /// An enemy was destroyed; `score` was awarded.
    EnemyDestroyed {
        id: EnemyId,
        enemy_type: EnemyType,
        position: Point,
        score: u32,
    },
    /// An enemy left the playfield alive.
    EnemyEscaped { id: EnemyId, cause: EscapeCause },
    /// An enemy fired a shot from `origin`.
    EnemyFired { id: EnemyId, origin: Point },
    /// The level attempt finished.
    LevelComplete { level: usize, stars: u8 },
}
