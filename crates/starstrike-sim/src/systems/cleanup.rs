//! Cleanup system: removes retired enemies from the world.

use hecs::{Entity, World};

/// Despawn every entity in the world.
/// Uses a pre-allocated buffer to avoid allocating on every teardown.
pub fn despawn_all(world: &mut World, despawn_buffer: &mut Vec<Entity>) {
    despawn_buffer.clear();
    despawn_buffer.extend(world.iter().map(|entity_ref| entity_ref.entity()));

    for entity in despawn_buffer.drain(..) {
        let _ = world.despawn(entity);
    }
}

/// Despawn one entity. Already-despawned entities are ignored.
pub fn despawn(world: &mut World, entity: Entity) -> bool {
    world.despawn(entity).is_ok()
}
