//! Trajectory generators for each movement pattern.
//!
//! A trajectory is a function of normalized progress `p` in `[0, 1]` returning
//! an offset from the spawn point. The only timing contract is that progress
//! reaches 1 exactly `duration_ticks` after movement starts; that is the
//! tick on which the movement-complete event fires.

use std::f64::consts::TAU;

use glam::DVec2;

use starstrike_core::components::Trajectory;
use starstrike_core::constants::PATH_OVERSHOOT;
use starstrike_core::enums::{EnemyType, MovementPattern};
use starstrike_core::types::{secs_to_ticks, Point};

use crate::profiles;

const ZIGZAG_SEGMENTS: usize = 5;
const ZIGZAG_SWING: f64 = 100.0;
const SINE_AMPLITUDE: f64 = 150.0;
const SINE_FREQUENCY: f64 = 10.0;
const DIVE_HOLD: f64 = 1.0 / 3.0;
const HOVER_HOLD: f64 = 0.5;
const CIRCLE_RADIUS: f64 = 150.0;
const CIRCLE_LAPS: f64 = 3.0;
const CIRCLE_SHARE: f64 = 0.75;
const STRAFE_LEGS: [f64; 3] = [120.0, -120.0, 120.0];

/// Build the trajectory for a freshly spawned enemy of `enemy_type`.
pub fn plan(
    enemy_type: EnemyType,
    difficulty: u32,
    origin: Point,
    scene_height: f64,
    now_tick: u64,
) -> Trajectory {
    Trajectory {
        pattern: profiles::default_pattern(enemy_type),
        origin,
        scene_height,
        started_at_tick: now_tick,
        duration_ticks: secs_to_ticks(profiles::move_duration(enemy_type, difficulty)),
    }
}

/// Tick on which the movement-complete event fires.
pub fn completion_tick(trajectory: &Trajectory) -> u64 {
    trajectory.started_at_tick + trajectory.duration_ticks
}

/// Whether movement has run to completion at `tick`.
pub fn is_complete(trajectory: &Trajectory, tick: u64) -> bool {
    tick >= completion_tick(trajectory)
}

/// Normalized progress in `[0, 1]` at `tick`.
pub fn progress(trajectory: &Trajectory, tick: u64) -> f64 {
    if trajectory.duration_ticks == 0 {
        return 1.0;
    }
    let elapsed = tick.saturating_sub(trajectory.started_at_tick) as f64;
    (elapsed / trajectory.duration_ticks as f64).clamp(0.0, 1.0)
}

/// Scene position along the trajectory at `tick`.
pub fn position_at(trajectory: &Trajectory, tick: u64) -> Point {
    let p = progress(trajectory, tick);
    trajectory.origin + offset(trajectory.pattern, p, trajectory.scene_height)
}

/// Offset from the spawn point at progress `p` for a scene of `scene_height`.
pub fn offset(pattern: MovementPattern, p: f64, scene_height: f64) -> DVec2 {
    let p = p.clamp(0.0, 1.0);
    let descent = scene_height + PATH_OVERSHOOT;

    match pattern {
        MovementPattern::Straight => DVec2::new(0.0, -descent * p),
        MovementPattern::Zigzag => {
            let x = segmented_swing(p, &[ZIGZAG_SWING, -ZIGZAG_SWING], ZIGZAG_SEGMENTS);
            DVec2::new(x, -descent * p)
        }
        MovementPattern::Sine => DVec2::new(
            (p * SINE_FREQUENCY).sin() * SINE_AMPLITUDE,
            -descent * p,
        ),
        MovementPattern::Dive => {
            let dive = rescale(p, DIVE_HOLD, 1.0);
            DVec2::new(0.0, -descent * dive)
        }
        MovementPattern::Hover => {
            let drop = rescale(p, HOVER_HOLD, 1.0);
            DVec2::new(0.0, -(scene_height / 2.0) * drop)
        }
        MovementPattern::Circle => {
            if p < CIRCLE_SHARE {
                let angle = TAU * CIRCLE_LAPS * (p / CIRCLE_SHARE);
                DVec2::new(
                    CIRCLE_RADIUS * angle.cos() - CIRCLE_RADIUS,
                    CIRCLE_RADIUS * angle.sin(),
                )
            } else {
                let drop = rescale(p, CIRCLE_SHARE, 1.0);
                DVec2::new(0.0, -descent * drop)
            }
        }
        MovementPattern::Strafe => {
            let x = segmented_swing(p, &STRAFE_LEGS, STRAFE_LEGS.len());
            DVec2::new(x, -scene_height * p)
        }
    }
}

/// Map `p` from `[start, end]` onto `[0, 1]`, clamping outside.
fn rescale(p: f64, start: f64, end: f64) -> f64 {
    ((p - start) / (end - start)).clamp(0.0, 1.0)
}

/// Horizontal position for a path of `segments` equal legs whose horizontal
/// displacement cycles through `swings`.
fn segmented_swing(p: f64, swings: &[f64], segments: usize) -> f64 {
    let scaled = p * segments as f64;
    let full = (scaled.floor() as usize).min(segments);
    let mut x: f64 = (0..full).map(|i| swings[i % swings.len()]).sum();
    if full < segments {
        x += swings[full % swings.len()] * (scaled - full as f64);
    }
    x
}
