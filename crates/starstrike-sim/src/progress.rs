//! Per-attempt outcome tally and star rating.

use starstrike_core::constants::{MAX_STARS, TWO_STAR_KILL_RATE};
use starstrike_core::enums::Outcome;
use starstrike_core::state::ProgressView;

/// Counters for one level attempt. `killed + escaped <= total` always holds
/// because each tracked enemy contributes exactly one outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelProgress {
    pub total: u32,
    pub killed: u32,
    pub escaped: u32,
}

impl LevelProgress {
    pub fn new(total: u32) -> Self {
        Self {
            total,
            ..Default::default()
        }
    }

    pub fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Killed => self.killed += 1,
            Outcome::Escaped => self.escaped += 1,
        }
    }

    pub fn processed(&self) -> u32 {
        self.killed + self.escaped
    }

    /// Every enemy has an outcome. An empty level never completes.
    pub fn is_complete(&self) -> bool {
        self.total > 0 && self.processed() >= self.total
    }

    pub fn stars(&self) -> u8 {
        calculate_stars(self.killed, self.total)
    }

    pub fn view(&self) -> ProgressView {
        ProgressView {
            killed: self.killed,
            escaped: self.escaped,
            total: self.total,
        }
    }
}

/// Star rating from the kill rate: all killed 3, at least 75% 2, any kill 1.
pub fn calculate_stars(killed: u32, total: u32) -> u8 {
    if total == 0 {
        return 0;
    }

    let kill_rate = killed as f64 / total as f64;
    if kill_rate >= 1.0 {
        MAX_STARS
    } else if kill_rate >= TWO_STAR_KILL_RATE {
        2
    } else if kill_rate > 0.0 {
        1
    } else {
        0
    }
}
