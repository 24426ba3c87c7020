//! Simulation constants and tuning parameters.

/// Simulation tick rate (Hz).
pub const TICK_RATE: u32 = 60;

/// Seconds per tick.
pub const DT: f64 = 1.0 / TICK_RATE as f64;

// --- Scene ---

/// Default scene width in points (portrait phone scene).
pub const DEFAULT_SCENE_WIDTH: f64 = 750.0;

/// Default scene height in points.
pub const DEFAULT_SCENE_HEIGHT: f64 = 1334.0;

/// Horizontal keep-out at each scene edge for spawn points.
pub const SPAWN_X_MARGIN: f64 = 90.0;

/// Spawn height above the top edge of the scene.
pub const SPAWN_Y_OFFSET: f64 = 200.0;

/// Distance below the bottom edge at which a live enemy has escaped.
pub const ESCAPE_MARGIN: f64 = 100.0;

/// Extra descent beyond the scene height covered by a full trajectory.
pub const PATH_OVERSHOOT: f64 = 400.0;

// --- Level flow ---

/// Delay between consecutive enemy spawns within a level (seconds).
pub const SPAWN_DELAY_SECS: f64 = 2.0;

/// Delay between completion detection and completion dispatch (seconds).
pub const COMPLETION_DELAY_SECS: f64 = 0.5;

/// Interval of the per-enemy escape boundary poll (seconds).
pub const BOUNDARY_POLL_SECS: f64 = 0.1;

/// Difficulty used when nothing else is configured.
pub const DEFAULT_DIFFICULTY: u32 = 1;

// --- Movement policy ---

/// Lower bound on any enemy's move duration (seconds).
pub const MIN_MOVE_DURATION_SECS: f64 = 2.0;

/// Move duration reduction per difficulty step (seconds).
pub const MOVE_DURATION_PER_DIFFICULTY: f64 = 0.3;

/// Lower bound on any firing enemy's fire interval (seconds).
pub const MIN_FIRE_INTERVAL_SECS: f64 = 0.5;

/// Fire interval reduction per difficulty step (seconds).
pub const FIRE_INTERVAL_PER_DIFFICULTY: f64 = 0.1;

// --- Star rating ---

/// Kill rate required for two stars.
pub const TWO_STAR_KILL_RATE: f64 = 0.75;

/// Maximum star rating.
pub const MAX_STARS: u8 = 3;

// --- Persistence ---

/// Key under which the best score is persisted.
pub const HIGH_SCORE_KEY: &str = "HighScore";
