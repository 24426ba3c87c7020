//! Game loop thread: runs the game session at 60Hz and publishes snapshots.
//!
//! The session is created inside this thread because its presentation handle
//! is not `Send`. Commands arrive via `mpsc` channel. Snapshots are stored in
//! shared state for polling.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc;
use std::sync::Mutex;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use starstrike_core::commands::SessionCommand;
use starstrike_core::constants::TICK_RATE;
use starstrike_core::enums::GamePhase;
use starstrike_core::state::SessionSnapshot;
use starstrike_core::types::SceneSize;
use starstrike_sim::presentation::PresentationHandle;
use starstrike_sim::{GameSession, SessionConfig};

use crate::autopilot::Autopilot;
use crate::state::{GameLoopCommand, RunSummary, SharedSnapshot};

/// Nominal duration of one tick.
const TICK_DURATION: Duration = Duration::from_nanos(1_000_000_000 / TICK_RATE as u64);

/// Everything the loop needs to play one level.
#[derive(Debug, Clone)]
pub struct LoopConfig {
    pub session: SessionConfig,
    pub level: usize,
    /// Chance the autopilot targets an enemy.
    pub accuracy: f64,
    /// Stop after this many ticks even if the level is still running.
    pub max_ticks: u64,
    /// Sleep between ticks to run at wall-clock speed.
    pub realtime: bool,
}

/// Spawns the game loop in a new thread.
///
/// Returns the command sender and the handle yielding the run summary.
pub fn spawn_game_loop(
    config: LoopConfig,
    latest_snapshot: SharedSnapshot,
) -> std::io::Result<(mpsc::Sender<GameLoopCommand>, JoinHandle<RunSummary>)> {
    let (cmd_tx, cmd_rx) = mpsc::channel::<GameLoopCommand>();

    let handle = std::thread::Builder::new()
        .name("starstrike-game-loop".into())
        .spawn(move || run_game_loop(&config, cmd_rx, &latest_snapshot))?;

    Ok((cmd_tx, handle))
}

/// The game loop. Runs until the level ends, the tick limit, a Shutdown
/// command or channel disconnect.
pub fn run_game_loop(
    config: &LoopConfig,
    cmd_rx: mpsc::Receiver<GameLoopCommand>,
    latest_snapshot: &Mutex<Option<SessionSnapshot>>,
) -> RunSummary {
    let autopilot = Rc::new(RefCell::new(Autopilot::new(
        SceneSize::default(),
        config.accuracy,
        config.session.seed,
    )));
    let mut session = GameSession::new(
        PresentationHandle::new(&autopilot),
        config.session.clone(),
    );
    session.queue_command(SessionCommand::StartLevel {
        level: config.level,
    });

    let mut next_tick_time = Instant::now();
    let mut snapshot = SessionSnapshot::default();
    let mut ticks = 0u64;

    loop {
        // 1. Drain all pending commands
        loop {
            match cmd_rx.try_recv() {
                Ok(GameLoopCommand::Session(cmd)) => session.queue_command(cmd),
                Ok(GameLoopCommand::Shutdown) => return finish(&snapshot),
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => return finish(&snapshot),
            }
        }

        // 2. Advance one tick (session handles pause semantics internally)
        snapshot = session.tick();
        ticks += 1;

        // 3. Let the autopilot react to what is on screen
        let shots = autopilot.borrow_mut().plan_shots(&snapshot);
        session.queue_commands(shots);

        // 4. Store latest snapshot for polling
        if let Ok(mut lock) = latest_snapshot.lock() {
            *lock = Some(snapshot.clone());
        }

        if !matches!(snapshot.phase, GamePhase::Active | GamePhase::Paused) {
            return finish(&snapshot);
        }
        if ticks >= config.max_ticks {
            tracing::warn!(ticks, "tick limit reached before the level ended");
            return finish(&snapshot);
        }

        // 5. Sleep until next tick
        if config.realtime {
            next_tick_time += TICK_DURATION;
            let now = Instant::now();
            if next_tick_time > now {
                std::thread::sleep(next_tick_time - now);
            } else if now - next_tick_time > TICK_DURATION * 2 {
                // Too far behind, reset to avoid catch-up spiral
                next_tick_time = now;
            }
        }
    }
}

fn finish(snapshot: &SessionSnapshot) -> RunSummary {
    let summary = RunSummary::from_snapshot(snapshot);
    tracing::info!(
        phase = ?summary.phase,
        score = summary.score,
        ticks = summary.ticks,
        "game loop stopped"
    );
    summary
}
