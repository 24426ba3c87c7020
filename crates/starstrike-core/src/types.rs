//! Fundamental geometric and simulation types.

use std::fmt;

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Stable identity of one spawned enemy.
///
/// Assigned from a monotonically increasing counter at spawn time and never
/// reused by the tracker that issued it.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EnemyId(pub u32);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}", self.0)
    }
}

/// 2D position in scene space (points, origin at scene center, y up).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn as_dvec2(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }
}

impl From<DVec2> for Point {
    fn from(v: DVec2) -> Self {
        Self { x: v.x, y: v.y }
    }
}

impl std::ops::Add<DVec2> for Point {
    type Output = Point;

    fn add(self, offset: DVec2) -> Point {
        Point::from(self.as_dvec2() + offset)
    }
}

/// Visible scene dimensions reported by the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneSize {
    pub width: f64,
    pub height: f64,
}

impl SceneSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Y coordinate below which a live enemy counts as escaped.
    pub fn escape_line(&self) -> f64 {
        -self.height / 2.0 - crate::constants::ESCAPE_MARGIN
    }
}

impl Default for SceneSize {
    fn default() -> Self {
        Self {
            width: crate::constants::DEFAULT_SCENE_WIDTH,
            height: crate::constants::DEFAULT_SCENE_HEIGHT,
        }
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Current tick number (increments by 1 each tick).
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Seconds per tick at the default tick rate.
    pub fn dt(&self) -> f64 {
        crate::constants::DT
    }

    /// Advance by one tick.
    pub fn advance(&mut self) {
        self.tick += 1;
        self.elapsed_secs = self.tick as f64 * self.dt();
    }
}

/// Convert a duration in seconds to whole ticks (nearest tick).
pub fn secs_to_ticks(secs: f64) -> u64 {
    (secs * crate::constants::TICK_RATE as f64).round().max(0.0) as u64
}

/// Convert ticks back to seconds.
pub fn ticks_to_secs(ticks: u64) -> f64 {
    ticks as f64 * crate::constants::DT
}
