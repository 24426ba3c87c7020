//! Entity spawn factories for the enemy world.

use hecs::World;

use starstrike_core::components::{Enemy, Trajectory};
use starstrike_core::enums::EnemyType;
use starstrike_core::types::{EnemyId, Point};
use starstrike_enemy_ai::fsm;

/// Spawn one enemy at full health following `trajectory`.
pub fn spawn_enemy(
    world: &mut World,
    id: EnemyId,
    enemy_type: EnemyType,
    position: Point,
    trajectory: Trajectory,
) -> hecs::Entity {
    world.spawn((
        Enemy { id, enemy_type },
        fsm::spawn_state(enemy_type),
        position,
        trajectory,
    ))
}
