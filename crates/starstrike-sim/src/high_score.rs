//! Best-score persistence.
//!
//! The best score lives in a small JSON object keyed by `"HighScore"`.
//! Reads and writes are opportunistic: failures are logged and the game
//! carries on with what it has in memory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use starstrike_core::constants::HIGH_SCORE_KEY;
use starstrike_core::error::{GameError, GameResult};

#[derive(Debug, Clone, Default)]
pub struct HighScoreStore {
    path: Option<PathBuf>,
    best: u32,
}

impl HighScoreStore {
    /// In-memory only store.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Open a file-backed store, loading the stored best score if readable.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let best = match load_from_file(&path) {
            Ok(best) => best,
            Err(err) => {
                tracing::warn!(path = %path.display(), "{err}");
                0
            }
        };
        Self {
            path: Some(path),
            best,
        }
    }

    pub fn best(&self) -> u32 {
        self.best
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Offer a score. Returns true if it is a new best (and was persisted
    /// when the store is file-backed).
    pub fn record(&mut self, score: u32) -> bool {
        if score <= self.best {
            return false;
        }
        self.best = score;
        if let Some(path) = &self.path {
            if let Err(err) = save_to_file(path, score) {
                tracing::warn!(path = %path.display(), "{err}");
            }
        }
        true
    }
}

/// Read the best score. A missing file is a best of 0, not an error.
pub fn load_from_file(path: &Path) -> GameResult<u32> {
    if !path.exists() {
        return Ok(0);
    }
    let json = fs::read_to_string(path)
        .map_err(|e| GameError::Persistence(format!("failed to read high score file: {e}")))?;
    let data: BTreeMap<String, u32> = serde_json::from_str(&json)
        .map_err(|e| GameError::Persistence(format!("failed to parse high score file: {e}")))?;
    Ok(data.get(HIGH_SCORE_KEY).copied().unwrap_or(0))
}

pub fn save_to_file(path: &Path, best: u32) -> GameResult<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir).map_err(|e| {
            GameError::Persistence(format!("failed to create high score directory: {e}"))
        })?;
    }
    let data = BTreeMap::from([(HIGH_SCORE_KEY.to_string(), best)]);
    let json = serde_json::to_string_pretty(&data)
        .map_err(|e| GameError::Persistence(format!("failed to serialize high score: {e}")))?;
    fs::write(path, json)
        .map_err(|e| GameError::Persistence(format!("failed to write high score file: {e}")))?;
    Ok(())
}
