//! Enemy health state machine.
//!
//! `Spawned -> Damaged -> Dead`, or `Spawned/Damaged -> Escaped`.
//! Dead and Escaped are terminal and mutually exclusive. Pure functions over
//! `EnemyState`; the tracker decides what to do with the results.

use starstrike_core::components::EnemyState;
use starstrike_core::enums::{EnemyPhase, EnemyType};

use crate::profiles;

/// Result of applying damage to an enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageResult {
    /// Enemy was not accepting damage (dead, escaped, or no damage dealt).
    Ignored,
    /// Enemy survived with `remaining` health.
    Hit { remaining: i32 },
    /// This hit killed the enemy. Returned at most once per enemy.
    Destroyed,
}

/// State of a freshly spawned enemy: full health, alive.
pub fn spawn_state(enemy_type: EnemyType) -> EnemyState {
    let health = profiles::base_health(enemy_type);
    EnemyState {
        health,
        max_health: health,
        alive: true,
        phase: EnemyPhase::Spawned,
    }
}

/// Whether the enemy still takes damage, moves and fires.
pub fn is_active(state: &EnemyState) -> bool {
    state.alive && !state.phase.is_terminal()
}

/// Apply `amount` damage.
pub fn take_damage(state: &mut EnemyState, amount: i32) -> DamageResult {
    if !is_active(state) || amount <= 0 {
        return DamageResult::Ignored;
    }

    state.health -= amount;
    if state.health <= 0 {
        state.health = 0;
        state.alive = false;
        state.phase = EnemyPhase::Dead;
        DamageResult::Destroyed
    } else {
        state.phase = EnemyPhase::Damaged;
        DamageResult::Hit {
            remaining: state.health,
        }
    }
}

/// One-shot kill (collision with the player ship).
pub fn force_destroy(state: &mut EnemyState) -> DamageResult {
    let remaining = state.health.max(1);
    take_damage(state, remaining)
}

/// Mark the enemy as having left the playfield. Returns false if it was
/// already dead or escaped.
pub fn mark_escaped(state: &mut EnemyState) -> bool {
    if !is_active(state) {
        return false;
    }
    state.phase = EnemyPhase::Escaped;
    true
}
