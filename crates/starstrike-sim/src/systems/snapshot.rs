//! Snapshot system: read-only views of the enemy world for rendering.

use hecs::{Entity, World};

use starstrike_core::components::{Enemy, EnemyState, Trajectory};
use starstrike_core::state::EnemyView;
use starstrike_core::types::Point;

/// All in-flight enemies, ordered by id.
pub fn build_enemy_views(world: &World) -> Vec<EnemyView> {
    let mut views: Vec<EnemyView> = world
        .query::<(&Enemy, &EnemyState, &Point, &Trajectory)>()
        .iter()
        .map(|(_, (enemy, state, pos, plan))| make_view(enemy, state, pos, plan))
        .collect();
    views.sort_by_key(|v| v.id);
    views
}

/// View of a single enemy, if it is still in the world.
pub fn enemy_view(world: &World, entity: Entity) -> Option<EnemyView> {
    let mut query = world
        .query_one::<(&Enemy, &EnemyState, &Point, &Trajectory)>(entity)
        .ok()?;
    query
        .get()
        .map(|(enemy, state, pos, plan)| make_view(enemy, state, pos, plan))
}

fn make_view(enemy: &Enemy, state: &EnemyState, pos: &Point, plan: &Trajectory) -> EnemyView {
    EnemyView {
        id: enemy.id,
        enemy_type: enemy.enemy_type,
        position: *pos,
        health: state.health,
        max_health: state.max_health,
        phase: state.phase,
        pattern: plan.pattern,
    }
}
