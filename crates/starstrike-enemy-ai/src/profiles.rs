//! Archetype-specific behavioral profiles.
//!
//! Consolidates per-type parameters and the difficulty-scaled timing formulas.

use starstrike_core::constants::*;
use starstrike_core::enums::{EnemyType, MovementPattern};

/// Behavioral profile for an enemy type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyProfile {
    /// Health at spawn.
    pub base_health: i32,
    /// Score awarded on kill.
    pub score_value: u32,
    /// Trajectory used unless overridden.
    pub default_pattern: MovementPattern,
    /// Move duration before difficulty scaling (seconds).
    pub base_move_duration: f64,
    /// Fire interval before difficulty scaling (seconds), None if the type never fires.
    pub base_fire_interval: Option<f64>,
}

/// Get the behavioral profile for a given type.
pub fn get_profile(enemy_type: EnemyType) -> EnemyProfile {
    match enemy_type {
        EnemyType::Scout => EnemyProfile {
            base_health: 1,
            score_value: 100,
            default_pattern: MovementPattern::Zigzag,
            base_move_duration: 5.0,
            base_fire_interval: Some(2.5),
        },
        EnemyType::Bomber => EnemyProfile {
            base_health: 3,
            score_value: 250,
            default_pattern: MovementPattern::Sine,
            base_move_duration: 6.0,
            base_fire_interval: Some(2.0),
        },
        EnemyType::HeavyCruiser => EnemyProfile {
            base_health: 5,
            score_value: 500,
            default_pattern: MovementPattern::Straight,
            base_move_duration: 8.0,
            base_fire_interval: Some(1.5),
        },
        EnemyType::Kamikaze => EnemyProfile {
            base_health: 1,
            score_value: 150,
            default_pattern: MovementPattern::Dive,
            base_move_duration: 3.0,
            base_fire_interval: None,
        },
        EnemyType::Sniper => EnemyProfile {
            base_health: 2,
            score_value: 300,
            default_pattern: MovementPattern::Hover,
            base_move_duration: 7.0,
            base_fire_interval: Some(3.0),
        },
        EnemyType::Elite => EnemyProfile {
            base_health: 8,
            score_value: 1000,
            default_pattern: MovementPattern::Strafe,
            base_move_duration: 10.0,
            base_fire_interval: Some(1.0),
        },
    }
}

pub fn score_value(enemy_type: EnemyType) -> u32 {
    get_profile(enemy_type).score_value
}

pub fn base_health(enemy_type: EnemyType) -> i32 {
    get_profile(enemy_type).base_health
}

pub fn default_pattern(enemy_type: EnemyType) -> MovementPattern {
    get_profile(enemy_type).default_pattern
}

/// Seconds an enemy of this type takes to run its trajectory.
pub fn move_duration(enemy_type: EnemyType, difficulty: u32) -> f64 {
    let base = get_profile(enemy_type).base_move_duration;
    (base - MOVE_DURATION_PER_DIFFICULTY * difficulty as f64).max(MIN_MOVE_DURATION_SECS)
}

/// Seconds between shots, or None when the type never fires.
pub fn fire_interval(enemy_type: EnemyType, difficulty: u32) -> Option<f64> {
    get_profile(enemy_type).base_fire_interval.map(|base| {
        (base - FIRE_INTERVAL_PER_DIFFICULTY * difficulty as f64).max(MIN_FIRE_INTERVAL_SECS)
    })
}
