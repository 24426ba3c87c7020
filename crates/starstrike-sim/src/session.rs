//! Game session controller.
//!
//! `GameSession` owns the level catalog, the lifecycle tracker and the score,
//! processes `SessionCommand`s at tick boundaries, and produces a
//! `SessionSnapshot` per tick. Completion notices arrive from the tracker's
//! callback over a channel tagged with the attempt number, so a notice from a
//! torn-down attempt can never complete the current one.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};

use starstrike_core::commands::SessionCommand;
use starstrike_core::constants::DEFAULT_DIFFICULTY;
use starstrike_core::enums::GamePhase;
use starstrike_core::error::GameResult;
use starstrike_core::events::GameEvent;
use starstrike_core::state::{LevelResult, SessionSnapshot};
use starstrike_core::types::{ticks_to_secs, EnemyId, SimTime};

use crate::catalog::LevelCatalog;
use crate::high_score::HighScoreStore;
use crate::presentation::PresentationHandle;
use crate::tracker::{EnemyLifecycleTracker, TrackerConfig};

/// Configuration for a new session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// RNG seed for determinism. Same seed = same session.
    pub seed: u64,
    pub difficulty: u32,
    pub catalog: LevelCatalog,
    /// Where the best score is kept. `None` keeps it in memory only.
    pub high_score_path: Option<PathBuf>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            difficulty: DEFAULT_DIFFICULTY,
            catalog: LevelCatalog::builtin(),
            high_score_path: None,
        }
    }
}

/// Completion notice: (attempt, stars).
type CompletionNotice = (u64, u8);

pub struct GameSession {
    catalog: LevelCatalog,
    tracker: EnemyLifecycleTracker,
    high_scores: HighScoreStore,
    phase: GamePhase,
    level: usize,
    score: u32,
    time: SimTime,
    /// Tracker tick at which the current attempt started.
    started_at_tick: u64,
    attempt: u64,
    result: Option<LevelResult>,
    command_queue: VecDeque<SessionCommand>,
    events: Vec<GameEvent>,
    completion_tx: Sender<CompletionNotice>,
    completion_rx: Receiver<CompletionNotice>,
}

impl GameSession {
    pub fn new(presentation: PresentationHandle, config: SessionConfig) -> Self {
        let tracker_config = TrackerConfig {
            seed: config.seed,
            difficulty: config.difficulty,
            ..Default::default()
        };
        let high_scores = match &config.high_score_path {
            Some(path) => HighScoreStore::open(path),
            None => HighScoreStore::in_memory(),
        };
        let (completion_tx, completion_rx) = mpsc::channel();

        Self {
            catalog: config.catalog,
            tracker: EnemyLifecycleTracker::new(presentation, tracker_config),
            high_scores,
            phase: GamePhase::default(),
            level: 0,
            score: 0,
            time: SimTime::default(),
            started_at_tick: 0,
            attempt: 0,
            result: None,
            command_queue: VecDeque::new(),
            events: Vec::new(),
            completion_tx,
            completion_rx,
        }
    }

    /// Queue a command for processing at the next tick boundary.
    pub fn queue_command(&mut self, command: SessionCommand) {
        self.command_queue.push_back(command);
    }

    pub fn queue_commands(&mut self, commands: impl IntoIterator<Item = SessionCommand>) {
        self.command_queue.extend(commands);
    }

    /// Process queued commands, advance one tick while Active, and return
    /// the resulting snapshot.
    pub fn tick(&mut self) -> SessionSnapshot {
        self.process_commands();

        if self.phase == GamePhase::Active {
            self.tracker.tick();
            self.time.advance();
        }
        self.drain_completions();

        self.snapshot()
    }

    // --- Level flow ---

    /// Start the 1-based level `index`. An invalid index starts nothing.
    /// Returns the number of enemies in the attempt.
    pub fn start_level(&mut self, index: usize) -> GameResult<u32> {
        let config = self.catalog.get_level(index)?.clone();

        self.teardown();
        self.attempt += 1;
        let attempt = self.attempt;
        let tx = self.completion_tx.clone();
        let started = self.tracker.start_level(&config, move |stars| {
            // Receiver only goes away with the session.
            let _ = tx.send((attempt, stars));
        });
        let total = match started {
            Ok(total) => total,
            Err(err) => {
                self.phase = GamePhase::MainMenu;
                return Err(err);
            }
        };

        self.catalog.start_level(index)?;
        self.level = index;
        self.score = 0;
        self.time = SimTime::default();
        self.started_at_tick = self.tracker.now_tick();
        self.result = None;
        self.phase = GamePhase::Active;
        tracing::info!(level = index, total, attempt, "session level started");
        Ok(total)
    }

    pub fn restart_level(&mut self) -> GameResult<u32> {
        self.teardown();
        self.start_or_menu(self.catalog.current_level())
    }

    pub fn next_level(&mut self) -> GameResult<u32> {
        self.teardown();
        self.start_or_menu(self.catalog.current_level() + 1)
    }

    fn start_or_menu(&mut self, index: usize) -> GameResult<u32> {
        let started = self.start_level(index);
        if started.is_err() {
            self.phase = GamePhase::MainMenu;
        }
        started
    }

    pub fn return_to_menu(&mut self) {
        self.teardown();
        self.result = None;
        self.phase = GamePhase::MainMenu;
    }

    pub fn pause(&mut self) {
        if self.phase == GamePhase::Active {
            self.phase = GamePhase::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.phase == GamePhase::Paused {
            self.phase = GamePhase::Active;
        }
    }

    /// The player ship was lost. Ends the attempt without a result.
    pub fn player_destroyed(&mut self) {
        if !matches!(self.phase, GamePhase::Active | GamePhase::Paused) {
            return;
        }
        self.teardown();
        self.high_scores.record(self.score);
        self.phase = GamePhase::GameOver;
        tracing::info!(level = self.level, score = self.score, "game over");
    }

    fn teardown(&mut self) {
        self.tracker.cleanup();
        self.events.clear();
    }

    // --- Gameplay input ---

    /// Damage an enemy. Returns the score awarded (0 unless this killed it).
    pub fn hit_enemy(&mut self, id: EnemyId, damage: i32) -> u32 {
        if self.phase != GamePhase::Active {
            return 0;
        }
        let awarded = self.tracker.destroy_enemy(id, damage);
        self.score += awarded;
        awarded
    }

    /// Collision between the player ship and an enemy.
    pub fn ram_enemy(&mut self, id: EnemyId) -> u32 {
        if self.phase != GamePhase::Active {
            return 0;
        }
        let awarded = self.tracker.ram_enemy(id);
        self.score += awarded;
        awarded
    }

    pub fn notify_boundary_escape(&mut self, id: EnemyId) -> bool {
        if self.phase != GamePhase::Active {
            return false;
        }
        self.tracker.notify_boundary_escape(id)
    }

    fn process_commands(&mut self) {
        while let Some(command) = self.command_queue.pop_front() {
            self.handle_command(command);
        }
    }

    fn handle_command(&mut self, command: SessionCommand) {
        let outcome = match command {
            SessionCommand::StartLevel { level } => self.start_level(level).map(drop),
            SessionCommand::RestartLevel => self.restart_level().map(drop),
            SessionCommand::NextLevel => self.next_level().map(drop),
            SessionCommand::ReturnToMenu => {
                self.return_to_menu();
                Ok(())
            }
            SessionCommand::Pause => {
                self.pause();
                Ok(())
            }
            SessionCommand::Resume => {
                self.resume();
                Ok(())
            }
            SessionCommand::HitEnemy { id, damage } => {
                self.hit_enemy(id, damage);
                Ok(())
            }
            SessionCommand::RamEnemy { id } => {
                self.ram_enemy(id);
                Ok(())
            }
            SessionCommand::BoundaryEscape { id } => {
                self.notify_boundary_escape(id);
                Ok(())
            }
            SessionCommand::PlayerDestroyed => {
                self.player_destroyed();
                Ok(())
            }
        };
        if let Err(err) = outcome {
            tracing::warn!(?command, "command rejected: {err}");
        }
    }

    fn drain_completions(&mut self) {
        while let Ok((attempt, stars)) = self.completion_rx.try_recv() {
            if attempt != self.attempt || self.phase != GamePhase::Active {
                tracing::trace!(attempt, current = self.attempt, phase = ?self.phase, "stale completion ignored");
                continue;
            }
            self.complete_level(stars);
        }
    }

    fn complete_level(&mut self, stars: u8) {
        let result = LevelResult {
            level: self.level,
            stars,
            score: self.score,
            elapsed_secs: self.completion_elapsed_secs(),
        };
        if self.high_scores.record(self.score) {
            tracing::info!(best = self.score, "new best score");
        }
        self.events.push(GameEvent::LevelComplete {
            level: self.level,
            stars,
        });
        self.result = Some(result);
        self.phase = GamePhase::LevelComplete;
        tracing::info!(
            level = self.level,
            stars,
            score = self.score,
            time = %result.formatted_time(),
            "session level complete"
        );
    }

    /// Play time up to the last outcome, excluding the dispatch delay.
    fn completion_elapsed_secs(&self) -> f64 {
        match self.tracker.completed_at_tick() {
            Some(tick) => ticks_to_secs(tick.saturating_sub(self.started_at_tick)),
            None => self.time.elapsed_secs,
        }
    }

    fn snapshot(&mut self) -> SessionSnapshot {
        let mut events = self.tracker.drain_events();
        events.append(&mut self.events);

        SessionSnapshot {
            time: self.time,
            phase: self.phase,
            level: self.level,
            score: self.score,
            best_score: self.high_scores.best(),
            progress: self.tracker.progress(),
            stars: self.tracker.current_stars(),
            enemies: self.tracker.enemies(),
            events,
            result: self.result,
        }
    }

    // --- Accessors ---

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn level(&self) -> usize {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn best_score(&self) -> u32 {
        self.high_scores.best()
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn result(&self) -> Option<LevelResult> {
        self.result
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    /// Read-only access to the tracker.
    pub fn tracker(&self) -> &EnemyLifecycleTracker {
        &self.tracker
    }

    #[cfg(test)]
    pub(crate) fn tracker_mut(&mut self) -> &mut EnemyLifecycleTracker {
        &mut self.tracker
    }
}
