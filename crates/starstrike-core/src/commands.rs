//! Session commands sent from the presentation/input layer.
//!
//! Commands are queued and processed at the next tick boundary.

use serde::{Deserialize, Serialize};

use crate::types::EnemyId;

/// All possible actions delivered into a game session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SessionCommand {
    // --- Level flow ---
    /// Start the given 1-based level.
    StartLevel { level: usize },
    /// Tear down and replay the current level.
    RestartLevel,
    /// Tear down and start the level after the current one.
    NextLevel,
    /// Tear down and go back to the menu.
    ReturnToMenu,
    /// Pause the simulation.
    Pause,
    /// Resume the simulation.
    Resume,

    // --- Gameplay events ---
    /// A player bullet hit an enemy.
    HitEnemy { id: EnemyId, damage: i32 },
    /// The player ship collided with an enemy (one-shot kill).
    RamEnemy { id: EnemyId },
    /// Presentation geometry saw the enemy leave the screen.
    BoundaryEscape { id: EnemyId },
    /// The player ship was destroyed.
    PlayerDestroyed,
}
