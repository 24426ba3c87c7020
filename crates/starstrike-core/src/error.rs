//! Error taxonomy for the game core.

use std::fmt;

use crate::types::EnemyId;

/// Errors surfaced by the level catalog, lifecycle tracker and session.
///
/// None of these are fatal. Callers treat them as "nothing happened".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Requested level is outside `1..=level_count`.
    InvalidLevelIndex { index: usize, level_count: usize },
    /// Level config contains no enemies; such a level is never started.
    EmptyLevel,
    /// Outcome event for an enemy that is no longer tracked.
    DuplicateOutcome { id: EnemyId },
    /// The presentation collaborator is gone (torn down).
    MissingCollaborator(&'static str),
    /// Level catalog could not be parsed.
    Catalog(String),
    /// Best-score file could not be read or written.
    Persistence(String),
}

/// Type alias for Results using GameError.
pub type GameResult<T> = Result<T, GameError>;

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::InvalidLevelIndex { index, level_count } => write!(
                f,
                "invalid level index {index}, available levels: 1-{level_count}"
            ),
            GameError::EmptyLevel => write!(f, "level has no enemies"),
            GameError::DuplicateOutcome { id } => {
                write!(f, "outcome for {id} already recorded")
            }
            GameError::MissingCollaborator(what) => write!(f, "{what} is not available"),
            GameError::Catalog(msg) => write!(f, "level catalog error: {msg}"),
            GameError::Persistence(msg) => write!(f, "persistence error: {msg}"),
        }
    }
}

impl std::error::Error for GameError {}

impl From<serde_json::Error> for GameError {
    fn from(err: serde_json::Error) -> Self {
        GameError::Catalog(err.to_string())
    }
}
