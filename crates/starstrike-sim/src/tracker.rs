//! Enemy lifecycle tracker, the level progression core.
//!
//! `EnemyLifecycleTracker` owns the in-flight enemies of one level attempt,
//! their timers, and the outcome tally. Spawn, movement, boundary and player
//! events all arrive at different times and may race for the same enemy; the
//! tracked set makes every outcome record-once: an id leaves the set at the
//! moment its first outcome is recorded, and later events for it are no-ops.

use std::collections::{BTreeSet, HashMap};

use hecs::World;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use starstrike_core::components::{Enemy, EnemyState, Trajectory};
use starstrike_core::constants::*;
use starstrike_core::enums::{EnemyType, EscapeCause, Outcome};
use starstrike_core::error::{GameError, GameResult};
use starstrike_core::events::GameEvent;
use starstrike_core::state::{EnemyView, ProgressView};
use starstrike_core::types::{secs_to_ticks, EnemyId, Point, SceneSize};
use starstrike_enemy_ai::fsm::{self, DamageResult};
use starstrike_enemy_ai::{profiles, trajectory};

use crate::catalog::LevelConfig;
use crate::presentation::PresentationHandle;
use crate::progress::LevelProgress;
use crate::scheduler::{DueTimer, Scheduler, TimerHandle, TimerTask};
use crate::systems;
use crate::world_setup;

/// Called once with the star rating when a level attempt completes.
pub type CompletionCallback = Box<dyn FnOnce(u8)>;

/// Tuning for a tracker.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// RNG seed for spawn order and spawn positions. Same seed = same level.
    pub seed: u64,
    /// Difficulty fed to the movement policy.
    pub difficulty: u32,
    /// Seconds between consecutive spawns.
    pub spawn_delay_secs: f64,
    /// Seconds between completion detection and callback dispatch.
    pub completion_delay_secs: f64,
    /// Seconds between boundary polls per enemy.
    pub boundary_poll_secs: f64,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: DEFAULT_DIFFICULTY,
            spawn_delay_secs: SPAWN_DELAY_SECS,
            completion_delay_secs: COMPLETION_DELAY_SECS,
            boundary_poll_secs: BOUNDARY_POLL_SECS,
        }
    }
}

pub struct EnemyLifecycleTracker {
    config: TrackerConfig,
    presentation: PresentationHandle,
    rng: ChaCha8Rng,

    world: World,
    /// In-flight enemies by id.
    in_flight: HashMap<EnemyId, hecs::Entity>,
    /// Ids whose outcome has not been recorded in this attempt.
    tracked: BTreeSet<EnemyId>,
    progress: LevelProgress,
    scheduler: Scheduler,
    scene: SceneSize,

    completion: Option<CompletionCallback>,
    completion_reported: bool,
    pending_completion: Option<(CompletionCallback, u8)>,
    completion_timer: Option<TimerHandle>,
    /// Tick on which the last outcome of the attempt was recorded.
    completed_at_tick: Option<u64>,
    attempt_active: bool,

    now_tick: u64,
    next_enemy_id: u32,
    spawned_count: u32,
    events: Vec<GameEvent>,
    despawn_buffer: Vec<hecs::Entity>,
}

impl EnemyLifecycleTracker {
    pub fn new(presentation: PresentationHandle, config: TrackerConfig) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            config,
            presentation,
            world: World::new(),
            in_flight: HashMap::new(),
            tracked: BTreeSet::new(),
            progress: LevelProgress::default(),
            scheduler: Scheduler::new(),
            scene: SceneSize::default(),
            completion: None,
            completion_reported: false,
            pending_completion: None,
            completion_timer: None,
            completed_at_tick: None,
            attempt_active: false,
            now_tick: 0,
            next_enemy_id: 0,
            spawned_count: 0,
            events: Vec::new(),
            despawn_buffer: Vec::new(),
        }
    }

    /// Begin a level attempt.
    ///
    /// Any previous attempt is torn down first. Enemies spawn in shuffled
    /// order, the i-th at `i * spawn_delay` after now. `on_complete` replaces
    /// any stored callback and fires at most once for this attempt.
    /// Returns the number of enemies the attempt will spawn.
    pub fn start_level(
        &mut self,
        config: &LevelConfig,
        on_complete: impl FnOnce(u8) + 'static,
    ) -> GameResult<u32> {
        if config.is_empty() {
            tracing::warn!("refusing to start a level with no enemies");
            return Err(GameError::EmptyLevel);
        }
        let scene = self.presentation.with(|p| p.scene_size()).ok_or_else(|| {
            tracing::warn!("cannot start level: presentation detached");
            GameError::MissingCollaborator("presentation")
        })?;

        self.cleanup();
        self.scene = scene;

        let mut spawn_list = config.spawn_list();
        spawn_list.shuffle(&mut self.rng);

        self.progress = LevelProgress::new(spawn_list.len() as u32);
        self.completion = Some(Box::new(on_complete));
        self.attempt_active = true;

        let delay_ticks = secs_to_ticks(self.config.spawn_delay_secs);
        for (i, &enemy_type) in spawn_list.iter().enumerate() {
            let due = self.now_tick + i as u64 * delay_ticks;
            self.scheduler.schedule_at(due, TimerTask::Spawn { enemy_type });
        }

        tracing::info!(
            total = self.progress.total,
            config = ?config.enemies,
            "level started"
        );
        tracing::debug!(order = ?spawn_list, "spawn order");
        Ok(self.progress.total)
    }

    /// Spawn one enemy right now, outside the level's spawn schedule.
    /// It counts toward the level total. No-op without an active attempt or
    /// without a presentation.
    pub fn spawn_one(&mut self, enemy_type: EnemyType) -> Option<EnemyId> {
        if !self.attempt_active || self.completion_reported {
            return None;
        }
        let id = self.spawn_at(enemy_type, self.now_tick)?;
        self.progress.total += 1;
        Some(id)
    }

    fn spawn_at(&mut self, enemy_type: EnemyType, tick: u64) -> Option<EnemyId> {
        let Some(scene) = self.presentation.with(|p| p.scene_size()) else {
            tracing::warn!(?enemy_type, "spawn skipped: presentation detached");
            return None;
        };
        let rng = &mut self.rng;
        let position = self
            .presentation
            .with(|p| p.spawn_position_for(scene, rng))?;

        let id = EnemyId(self.next_enemy_id);
        self.next_enemy_id += 1;

        let difficulty = self.config.difficulty;
        let plan = trajectory::plan(enemy_type, difficulty, position, scene.height, tick);
        let entity = world_setup::spawn_enemy(&mut self.world, id, enemy_type, position, plan);
        self.in_flight.insert(id, entity);
        self.tracked.insert(id);
        self.spawned_count += 1;

        self.scheduler.schedule_at(
            trajectory::completion_tick(&plan),
            TimerTask::MovementComplete { id },
        );
        let poll_ticks = secs_to_ticks(self.config.boundary_poll_secs);
        self.scheduler
            .schedule_repeating(tick + poll_ticks, poll_ticks, TimerTask::BoundaryPoll { id });
        if let Some(interval) = profiles::fire_interval(enemy_type, difficulty) {
            self.scheduler
                .schedule_repeating(tick, secs_to_ticks(interval), TimerTask::Fire { id });
        }

        self.events.push(GameEvent::EnemySpawned {
            id,
            enemy_type,
            position,
        });
        if let Some(view) = systems::snapshot::enemy_view(&self.world, entity) {
            self.presentation.with(|p| p.enemy_spawned(&view));
        }

        tracing::debug!(
            %id,
            ?enemy_type,
            x = position.x,
            spawned = self.spawned_count,
            total = self.progress.total,
            "enemy spawned"
        );
        Some(id)
    }

    // --- Outcome recording ---

    /// Record that `id` was killed. Returns false if its outcome was
    /// already recorded (or it was never tracked).
    pub fn record_killed(&mut self, id: EnemyId) -> bool {
        self.record(id, Outcome::Killed)
    }

    /// Record that `id` escaped. Returns false if its outcome was already
    /// recorded (or it was never tracked).
    pub fn record_escaped(&mut self, id: EnemyId) -> bool {
        self.record(id, Outcome::Escaped)
    }

    fn record(&mut self, id: EnemyId, outcome: Outcome) -> bool {
        match self.try_record(id, outcome) {
            Ok(()) => true,
            Err(err) => {
                tracing::trace!(?outcome, "{err}");
                false
            }
        }
    }

    fn try_record(&mut self, id: EnemyId, outcome: Outcome) -> GameResult<()> {
        // Removal from the tracked set is the record-once guard.
        if !self.tracked.remove(&id) {
            return Err(GameError::DuplicateOutcome { id });
        }
        // The first outcome ends the enemy: no more damage, firing or escapes.
        self.retire(id);
        self.progress.record(outcome);

        tracing::debug!(
            %id,
            ?outcome,
            killed = self.progress.killed,
            escaped = self.progress.escaped,
            total = self.progress.total,
            "outcome recorded"
        );
        self.check_completion();
        Ok(())
    }

    fn check_completion(&mut self) {
        if !self.progress.is_complete() || self.completion_reported {
            return;
        }
        self.completion_reported = true;
        self.completed_at_tick = Some(self.now_tick);
        self.attempt_active = false;

        let stars = self.progress.stars();
        tracing::info!(
            stars,
            killed = self.progress.killed,
            escaped = self.progress.escaped,
            total = self.progress.total,
            "level complete"
        );

        if let Some(callback) = self.completion.take() {
            self.pending_completion = Some((callback, stars));
            let due = self.now_tick + secs_to_ticks(self.config.completion_delay_secs);
            self.completion_timer = Some(
                self.scheduler
                    .schedule_at(due, TimerTask::DispatchCompletion),
            );
        }
    }

    /// Deliver a pending completion callback now instead of waiting for its
    /// timer. Returns the stars delivered, if any.
    pub fn flush_completion(&mut self) -> Option<u8> {
        if let Some(handle) = self.completion_timer.take() {
            self.scheduler.cancel(handle);
        }
        let (callback, stars) = self.pending_completion.take()?;
        self.presentation.with(|p| p.level_complete(stars));
        callback(stars);
        Some(stars)
    }

    // --- Player and presentation events ---

    /// Apply `damage` to an enemy. Returns the score awarded: its score value
    /// if this hit killed it, otherwise 0 (including unknown, dead or escaped
    /// enemies).
    pub fn destroy_enemy(&mut self, id: EnemyId, damage: i32) -> u32 {
        self.apply_damage(id, |state| fsm::take_damage(state, damage))
    }

    /// One-shot kill from a collision with the player ship.
    pub fn ram_enemy(&mut self, id: EnemyId) -> u32 {
        self.apply_damage(id, fsm::force_destroy)
    }

    fn apply_damage(
        &mut self,
        id: EnemyId,
        hit: impl FnOnce(&mut EnemyState) -> DamageResult,
    ) -> u32 {
        let Some(&entity) = self.in_flight.get(&id) else {
            return 0;
        };
        let Ok((enemy, result, state)) = self
            .world
            .query_one_mut::<(&Enemy, &mut EnemyState)>(entity)
            .map(|(enemy, state)| {
                let result = hit(&mut *state);
                (*enemy, result, *state)
            })
        else {
            return 0;
        };

        match result {
            DamageResult::Ignored => 0,
            DamageResult::Hit { remaining } => {
                self.events.push(GameEvent::EnemyHit {
                    id,
                    health: remaining,
                    max_health: state.max_health,
                });
                self.presentation
                    .with(|p| p.enemy_hit(id, remaining, state.max_health));
                0
            }
            DamageResult::Destroyed => {
                let position = self.position_of(entity);
                let score = profiles::score_value(enemy.enemy_type);
                self.events.push(GameEvent::EnemyDestroyed {
                    id,
                    enemy_type: enemy.enemy_type,
                    position,
                    score,
                });
                self.presentation.with(|p| p.enemy_destroyed(id, position));
                tracing::debug!(%id, enemy_type = ?enemy.enemy_type, score, "enemy destroyed");
                self.record_killed(id);
                score
            }
        }
    }

    /// The presentation saw the enemy leave the screen.
    pub fn notify_boundary_escape(&mut self, id: EnemyId) -> bool {
        self.escape(id, EscapeCause::Reported)
    }

    fn escape(&mut self, id: EnemyId, cause: EscapeCause) -> bool {
        let Some(&entity) = self.in_flight.get(&id) else {
            return false;
        };
        let marked = self
            .world
            .get::<&mut EnemyState>(entity)
            .map(|mut state| fsm::mark_escaped(&mut state))
            .unwrap_or(false);
        if !marked {
            return false;
        }

        self.events.push(GameEvent::EnemyEscaped { id, cause });
        self.presentation.with(|p| p.enemy_escaped(id));
        tracing::debug!(%id, ?cause, "enemy escaped");
        self.record_escaped(id)
    }

    /// Stop all processing for an enemy: cancel its timers and remove it
    /// from the world.
    fn retire(&mut self, id: EnemyId) {
        self.scheduler.cancel_enemy(id);
        if let Some(entity) = self.in_flight.remove(&id) {
            systems::cleanup::despawn(&mut self.world, entity);
        }
    }

    fn position_of(&self, entity: hecs::Entity) -> Point {
        self.world
            .get::<&Point>(entity)
            .map(|pos| *pos)
            .unwrap_or_default()
    }

    fn is_active(&self, entity: hecs::Entity) -> bool {
        self.world
            .get::<&EnemyState>(entity)
            .map(|state| fsm::is_active(&state))
            .unwrap_or(false)
    }

    // --- Time ---

    /// Advance the tracker clock by one tick.
    pub fn tick(&mut self) {
        self.advance_to(self.now_tick + 1);
    }

    /// Advance the tracker clock by `ticks` ticks.
    pub fn advance(&mut self, ticks: u64) {
        self.advance_to(self.now_tick + ticks);
    }

    /// Advance tick by tick up to `target`: move enemies, then run every
    /// timer that came due, in deadline order.
    pub fn advance_to(&mut self, target: u64) {
        while self.now_tick < target {
            self.now_tick += 1;
            systems::movement::run(&mut self.world, self.now_tick);
            while let Some(due) = self.scheduler.pop_due(self.now_tick) {
                self.run_timer(due);
            }
        }
    }

    fn run_timer(&mut self, due: DueTimer) {
        match due.task {
            TimerTask::Spawn { enemy_type } => {
                if self.spawn_at(enemy_type, due.due_tick).is_none() {
                    // The enemy can never be spawned; drop it from the attempt
                    // so the level is not stuck waiting for it.
                    self.progress.total = self.progress.total.saturating_sub(1);
                    self.check_completion();
                }
            }
            TimerTask::MovementComplete { id } => {
                self.escape(id, EscapeCause::PathComplete);
            }
            TimerTask::BoundaryPoll { id } => {
                let Some(&entity) = self.in_flight.get(&id) else {
                    return;
                };
                if self.is_active(entity)
                    && systems::boundary::entity_escaped(&self.world, entity, &self.scene)
                {
                    self.escape(id, EscapeCause::Boundary);
                }
            }
            TimerTask::Fire { id } => {
                let Some(&entity) = self.in_flight.get(&id) else {
                    return;
                };
                if self.is_active(entity) {
                    let origin = self.position_of(entity);
                    self.events.push(GameEvent::EnemyFired { id, origin });
                    self.presentation.with(|p| p.enemy_fired(id, origin));
                }
            }
            TimerTask::DispatchCompletion => {
                self.completion_timer = None;
                self.flush_completion();
            }
        }
    }

    /// Tear down the current attempt: cancel all timers, remove all enemies,
    /// reset the tally, drop any pending callback. Safe to call at any time.
    pub fn cleanup(&mut self) {
        let in_flight = self.in_flight.len();
        self.scheduler.cancel_all();
        systems::cleanup::despawn_all(&mut self.world, &mut self.despawn_buffer);
        self.in_flight.clear();
        self.tracked.clear();
        self.progress = LevelProgress::default();
        self.completion = None;
        self.pending_completion = None;
        self.completion_timer = None;
        self.completed_at_tick = None;
        self.completion_reported = false;
        self.attempt_active = false;
        self.spawned_count = 0;
        self.events.clear();
        tracing::info!(in_flight, "tracker cleaned up");
    }

    // --- Read-only views ---

    pub fn progress(&self) -> ProgressView {
        self.progress.view()
    }

    pub fn enemies(&self) -> Vec<EnemyView> {
        systems::snapshot::build_enemy_views(&self.world)
    }

    pub fn enemy(&self, id: EnemyId) -> Option<EnemyView> {
        let entity = *self.in_flight.get(&id)?;
        systems::snapshot::enemy_view(&self.world, entity)
    }

    pub fn current_stars(&self) -> u8 {
        self.progress.stars()
    }

    pub fn is_level_complete(&self) -> bool {
        self.progress.is_complete()
    }

    /// Whether the completion callback has been handed off for this attempt.
    pub fn completion_reported(&self) -> bool {
        self.completion_reported
    }

    /// Tick on which completion was detected, if it has been.
    pub fn completed_at_tick(&self) -> Option<u64> {
        self.completed_at_tick
    }

    pub fn is_tracked(&self, id: EnemyId) -> bool {
        self.tracked.contains(&id)
    }

    pub fn tracked_count(&self) -> usize {
        self.tracked.len()
    }

    pub fn enemy_count(&self) -> usize {
        self.in_flight.len()
    }

    /// Enemies spawned in this attempt (diagnostic).
    pub fn spawned_count(&self) -> u32 {
        self.spawned_count
    }

    /// Live timers owned by `id`.
    pub fn pending_timers_for(&self, id: EnemyId) -> usize {
        self.scheduler.pending_for(id)
    }

    pub fn pending_timer_count(&self) -> usize {
        self.scheduler.len()
    }

    pub fn now_tick(&self) -> u64 {
        self.now_tick
    }

    pub fn scene(&self) -> SceneSize {
        self.scene
    }

    /// Take the events emitted since the last drain.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Trajectory of an in-flight enemy.
    pub fn trajectory_of(&self, id: EnemyId) -> Option<Trajectory> {
        let entity = *self.in_flight.get(&id)?;
        self.world.get::<&Trajectory>(entity).ok().map(|t| *t)
    }
}
