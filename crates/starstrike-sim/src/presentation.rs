//! The presentation collaborator.
//!
//! The lifecycle tracker never owns the presentation layer. It holds a
//! `PresentationHandle` (a weak reference) and calls through it; once the
//! presentation is dropped every call becomes a no-op.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use rand::{Rng, RngCore};

use starstrike_core::constants::{SPAWN_X_MARGIN, SPAWN_Y_OFFSET};
use starstrike_core::state::EnemyView;
use starstrike_core::types::{EnemyId, Point, SceneSize};

/// Calls the core makes into the presentation layer.
///
/// Only `scene_size` is required; notifications default to no-ops.
pub trait PresentationPort {
    /// Current visible scene dimensions.
    fn scene_size(&self) -> SceneSize;

    /// Where a new enemy enters the scene.
    fn spawn_position_for(&mut self, scene: SceneSize, rng: &mut dyn RngCore) -> Point {
        default_spawn_position(scene, rng)
    }

    fn enemy_spawned(&mut self, _enemy: &EnemyView) {}

    fn enemy_hit(&mut self, _id: EnemyId, _health: i32, _max_health: i32) {}

    fn enemy_destroyed(&mut self, _id: EnemyId, _position: Point) {}

    fn enemy_escaped(&mut self, _id: EnemyId) {}

    fn enemy_fired(&mut self, _id: EnemyId, _origin: Point) {}

    fn level_complete(&mut self, _stars: u8) {}
}

/// Random X inside the side margins, fixed Y above the top edge.
pub fn default_spawn_position(scene: SceneSize, rng: &mut dyn RngCore) -> Point {
    let half_width = scene.width / 2.0;
    let min_x = -half_width + SPAWN_X_MARGIN;
    let max_x = half_width - SPAWN_X_MARGIN;
    let x = if min_x < max_x {
        rng.gen_range(min_x..=max_x)
    } else {
        0.0
    };
    Point::new(x, scene.height / 2.0 + SPAWN_Y_OFFSET)
}

/// Non-owning reference to the presentation layer.
#[derive(Clone)]
pub struct PresentationHandle {
    port: Weak<RefCell<dyn PresentationPort>>,
}

impl PresentationHandle {
    pub fn new<P: PresentationPort + 'static>(port: &Rc<RefCell<P>>) -> Self {
        let port: Rc<RefCell<dyn PresentationPort>> = port.clone();
        Self {
            port: Rc::downgrade(&port),
        }
    }

    /// A handle with nothing behind it (torn-down presentation).
    pub fn detached() -> Self {
        let port: Weak<RefCell<dyn PresentationPort>> = Weak::<RefCell<HeadlessPresentation>>::new();
        Self { port }
    }

    pub fn is_attached(&self) -> bool {
        self.port.strong_count() > 0
    }

    /// Run `f` against the presentation if it is still alive and not already
    /// borrowed (re-entrant calls are dropped).
    pub fn with<R>(&self, f: impl FnOnce(&mut dyn PresentationPort) -> R) -> Option<R> {
        let port = self.port.upgrade()?;
        let mut guard = port.try_borrow_mut().ok()?;
        Some(f(&mut *guard))
    }
}

impl fmt::Debug for PresentationHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PresentationHandle")
            .field("attached", &self.is_attached())
            .finish()
    }
}

/// Presentation with a fixed scene and no rendering.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeadlessPresentation {
    pub scene: SceneSize,
}

impl HeadlessPresentation {
    pub fn new(scene: SceneSize) -> Self {
        Self { scene }
    }
}

impl PresentationPort for HeadlessPresentation {
    fn scene_size(&self) -> SceneSize {
        self.scene
    }
}
