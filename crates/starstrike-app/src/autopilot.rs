//! Headless presentation that plays the level itself.
//!
//! Each enemy is either targeted (with probability `accuracy`) or let
//! through when it first appears. Targeted enemies take one damage per tick
//! until they die; the rest run off the bottom of the scene.

use std::collections::HashMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use starstrike_core::commands::SessionCommand;
use starstrike_core::state::{EnemyView, SessionSnapshot};
use starstrike_core::types::{EnemyId, Point, SceneSize};
use starstrike_sim::presentation::PresentationPort;

pub struct Autopilot {
    scene: SceneSize,
    accuracy: f64,
    rng: ChaCha8Rng,
    targets: HashMap<EnemyId, bool>,
    shots_taken: u32,
}

impl Autopilot {
    pub fn new(scene: SceneSize, accuracy: f64, seed: u64) -> Self {
        Self {
            scene,
            accuracy: accuracy.clamp(0.0, 1.0),
            rng: ChaCha8Rng::seed_from_u64(seed),
            targets: HashMap::new(),
            shots_taken: 0,
        }
    }

    /// Commands to send in response to `snapshot`.
    pub fn plan_shots(&mut self, snapshot: &SessionSnapshot) -> Vec<SessionCommand> {
        self.targets
            .retain(|id, _| snapshot.enemies.iter().any(|e| e.id == *id));

        let mut shots = Vec::new();
        for enemy in &snapshot.enemies {
            let accuracy = self.accuracy;
            let rng = &mut self.rng;
            let targeted = *self
                .targets
                .entry(enemy.id)
                .or_insert_with(|| rng.gen_bool(accuracy));
            if targeted {
                shots.push(SessionCommand::HitEnemy {
                    id: enemy.id,
                    damage: 1,
                });
            }
        }
        self.shots_taken += shots.len() as u32;
        shots
    }

    pub fn shots_taken(&self) -> u32 {
        self.shots_taken
    }
}

impl PresentationPort for Autopilot {
    fn scene_size(&self) -> SceneSize {
        self.scene
    }

    fn enemy_spawned(&mut self, enemy: &EnemyView) {
        tracing::trace!(id = %enemy.id, enemy_type = ?enemy.enemy_type, x = enemy.position.x, "enemy on screen");
    }

    fn enemy_destroyed(&mut self, id: EnemyId, position: Point) {
        tracing::trace!(%id, x = position.x, y = position.y, "explosion");
    }

    fn enemy_escaped(&mut self, id: EnemyId) {
        tracing::trace!(%id, "enemy off screen");
    }

    fn level_complete(&mut self, stars: u8) {
        tracing::debug!(stars, shots = self.shots_taken, "level complete screen");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use starstrike_core::enums::{EnemyPhase, EnemyType, MovementPattern};

    fn snapshot_with(ids: &[u32]) -> SessionSnapshot {
        SessionSnapshot {
            enemies: ids
                .iter()
                .map(|&n| EnemyView {
                    id: EnemyId(n),
                    enemy_type: EnemyType::Scout,
                    position: Point::default(),
                    health: 1,
                    max_health: 1,
                    phase: EnemyPhase::Spawned,
                    pattern: MovementPattern::Zigzag,
                })
                .collect(),
            ..Default::default()
        }
    }

    #[test]
    fn test_full_accuracy_targets_everything() {
        let mut pilot = Autopilot::new(SceneSize::default(), 1.0, 7);
        let shots = pilot.plan_shots(&snapshot_with(&[0, 1, 2]));
        assert_eq!(shots.len(), 3);
        assert_eq!(pilot.shots_taken(), 3);
    }

    #[test]
    fn test_zero_accuracy_holds_fire() {
        let mut pilot = Autopilot::new(SceneSize::default(), 0.0, 7);
        assert!(pilot.plan_shots(&snapshot_with(&[0, 1, 2])).is_empty());
    }

    #[test]
    fn test_target_decision_is_sticky() {
        let mut pilot = Autopilot::new(SceneSize::default(), 0.5, 99);
        let first = pilot.plan_shots(&snapshot_with(&[0, 1, 2, 3, 4, 5]));
        let second = pilot.plan_shots(&snapshot_with(&[0, 1, 2, 3, 4, 5]));
        assert_eq!(first, second);

        // Enemies that left the screen are forgotten.
        pilot.plan_shots(&snapshot_with(&[]));
        assert!(pilot.targets.is_empty());
    }

    #[test]
    fn test_accuracy_is_clamped() {
        let pilot = Autopilot::new(SceneSize::default(), 3.0, 1);
        assert_eq!(pilot.accuracy, 1.0);
    }
}
