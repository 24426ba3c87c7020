//! State shared between the runner and the game loop thread.

use std::sync::{Arc, Mutex};

use serde::Serialize;

use starstrike_core::commands::SessionCommand;
use starstrike_core::enums::GamePhase;
use starstrike_core::state::{LevelResult, SessionSnapshot};

/// Commands sent from the runner to the game loop thread.
#[derive(Debug)]
pub enum GameLoopCommand {
    /// A session command to forward to the game session.
    Session(SessionCommand),
    /// Shut down the game loop thread gracefully.
    Shutdown,
}

/// Latest snapshot, written by the game loop after every tick.
pub type SharedSnapshot = Arc<Mutex<Option<SessionSnapshot>>>;

/// How a run ended.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    pub level: usize,
    pub phase: GamePhase,
    pub score: u32,
    pub best_score: u32,
    pub ticks: u64,
    pub result: Option<LevelResult>,
}

impl RunSummary {
    pub fn from_snapshot(snapshot: &SessionSnapshot) -> Self {
        Self {
            level: snapshot.level,
            phase: snapshot.phase,
            score: snapshot.score,
            best_score: snapshot.best_score,
            ticks: snapshot.time.tick,
            result: snapshot.result,
        }
    }
}
