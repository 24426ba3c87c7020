//! Escape boundary checks.

use hecs::{Entity, World};

use starstrike_core::types::{Point, SceneSize};

/// Whether `position` is below the scene's escape line.
pub fn is_past_escape_line(position: &Point, scene: &SceneSize) -> bool {
    position.y < scene.escape_line()
}

/// Boundary check for one entity. Missing entities are never past the line.
pub fn entity_escaped(world: &World, entity: Entity, scene: &SceneSize) -> bool {
    world
        .get::<&Point>(entity)
        .map(|pos| is_past_escape_line(&pos, scene))
        .unwrap_or(false)
}
