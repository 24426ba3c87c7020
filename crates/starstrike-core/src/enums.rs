//! Enumeration types used throughout the simulation.

use serde::{Deserialize, Serialize};

/// Enemy archetype. Determines health, score, movement and firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EnemyType {
    /// Light fighter, zigzags down the screen.
    Scout,
    /// Slow bomber on a sine path.
    Bomber,
    /// Armored cruiser flying straight down.
    HeavyCruiser,
    /// Suicide diver. Never fires.
    Kamikaze,
    /// Hovers before descending, long fire interval.
    Sniper,
    /// High value strafing ace.
    Elite,
}

impl EnemyType {
    /// Every enemy type, in declaration order.
    pub const ALL: [EnemyType; 6] = [
        EnemyType::Scout,
        EnemyType::Bomber,
        EnemyType::HeavyCruiser,
        EnemyType::Kamikaze,
        EnemyType::Sniper,
        EnemyType::Elite,
    ];
}

/// Trajectory shape followed by an enemy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementPattern {
    #[default]
    Straight,
    Zigzag,
    Sine,
    Dive,
    Hover,
    Circle,
    Strafe,
}

/// Enemy lifecycle phase.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyPhase {
    /// Alive at full health.
    #[default]
    Spawned,
    /// Alive, took damage.
    Damaged,
    /// Destroyed by damage. Terminal.
    Dead,
    /// Left the playfield alive. Terminal.
    Escaped,
}

impl EnemyPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, EnemyPhase::Dead | EnemyPhase::Escaped)
    }
}

/// Terminal classification of an enemy for the level tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Killed,
    Escaped,
}

/// What observed an enemy leaving the playfield.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EscapeCause {
    /// Boundary poll saw the enemy below the escape line.
    Boundary,
    /// The movement trajectory ran to completion.
    PathComplete,
    /// The presentation layer reported the escape.
    Reported,
}

/// Game phase (top-level session state).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    #[default]
    MainMenu,
    Active,
    Paused,
    LevelComplete,
    GameOver,
}
