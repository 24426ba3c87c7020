//! Level catalog: the ordered list of level configurations.
//!
//! Levels are addressed 1-based, the way level buttons are numbered.

use serde::{Deserialize, Serialize};

use starstrike_core::enums::EnemyType;
use starstrike_core::error::{GameError, GameResult};

/// Enemy composition of one level: (type, count) pairs in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub enemies: Vec<(EnemyType, u32)>,
}

impl LevelConfig {
    pub fn new(enemies: Vec<(EnemyType, u32)>) -> Self {
        Self { enemies }
    }

    /// Total number of enemies across all entries.
    pub fn total(&self) -> u32 {
        self.enemies.iter().map(|(_, count)| count).sum()
    }

    /// A level with no enemies can never complete.
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }

    /// Expand (type, count) pairs into one entry per enemy, unshuffled.
    pub fn spawn_list(&self) -> Vec<EnemyType> {
        self.enemies
            .iter()
            .flat_map(|&(enemy_type, count)| std::iter::repeat(enemy_type).take(count as usize))
            .collect()
    }
}

/// Ordered level configurations plus the level most recently started.
#[derive(Debug, Clone)]
pub struct LevelCatalog {
    levels: Vec<LevelConfig>,
    current_level: usize,
}

impl Default for LevelCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl LevelCatalog {
    /// The four shipped levels.
    pub fn builtin() -> Self {
        use EnemyType::*;

        Self::from_levels(vec![
            LevelConfig::new(vec![(Scout, 5)]),
            LevelConfig::new(vec![(Scout, 3), (Bomber, 2)]),
            LevelConfig::new(vec![(Bomber, 5), (HeavyCruiser, 1)]),
            LevelConfig::new(vec![(Scout, 5), (Bomber, 3), (HeavyCruiser, 2)]),
        ])
    }

    pub fn from_levels(levels: Vec<LevelConfig>) -> Self {
        Self {
            levels,
            current_level: 0,
        }
    }

    /// Parse a JSON array of level configs, e.g.
    /// `[{"enemies": [["Scout", 5], ["Bomber", 1]]}]`.
    pub fn from_json(json: &str) -> GameResult<Self> {
        let levels: Vec<LevelConfig> = serde_json::from_str(json)?;
        if levels.is_empty() {
            return Err(GameError::Catalog("catalog has no levels".into()));
        }
        Ok(Self::from_levels(levels))
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Level most recently started, 0 if none.
    pub fn current_level(&self) -> usize {
        self.current_level
    }

    /// Look up a 1-based level without changing the current level.
    pub fn get_level(&self, index: usize) -> GameResult<&LevelConfig> {
        index
            .checked_sub(1)
            .and_then(|i| self.levels.get(i))
            .ok_or(GameError::InvalidLevelIndex {
                index,
                level_count: self.levels.len(),
            })
    }

    /// Look up a 1-based level and remember it as the current level.
    pub fn start_level(&mut self, index: usize) -> GameResult<LevelConfig> {
        let config = self.get_level(index)?.clone();
        self.current_level = index;
        Ok(config)
    }

    /// Equivalent to `start_level(current_level + 1)`.
    pub fn next_level(&mut self) -> GameResult<LevelConfig> {
        self.start_level(self.current_level + 1)
    }
}
