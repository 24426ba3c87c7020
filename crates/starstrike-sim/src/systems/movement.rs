//! Movement system: places every active enemy on its trajectory.

use hecs::World;

use starstrike_core::components::{EnemyState, Trajectory};
use starstrike_core::types::Point;
use starstrike_enemy_ai::{fsm, trajectory};

/// Set positions for `tick`. Dead or escaped enemies stay where they are.
pub fn run(world: &mut World, tick: u64) {
    for (_entity, (pos, plan, state)) in
        world.query_mut::<(&mut Point, &Trajectory, &EnemyState)>()
    {
        if fsm::is_active(state) {
            *pos = trajectory::position_at(plan, tick);
        }
    }
}
