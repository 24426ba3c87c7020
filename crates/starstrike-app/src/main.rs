//! Headless runner: plays one level with the autopilot and prints the result.
//!
//! Usage:
//!   cargo run -p starstrike-app -- --level 2 --accuracy 0.8
//!   RUST_LOG=starstrike_sim=debug cargo run -p starstrike-app -- --realtime

use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Parser;

use starstrike_app::game_loop::{self, LoopConfig};
use starstrike_app::state::SharedSnapshot;
use starstrike_core::constants::{DEFAULT_DIFFICULTY, TICK_RATE};
use starstrike_core::enums::GamePhase;
use starstrike_sim::catalog::LevelCatalog;
use starstrike_sim::SessionConfig;

#[derive(Parser)]
#[command(name = "starstrike")]
#[command(about = "Play a STARSTRIKE level headless with an autopilot")]
struct Args {
    /// 1-based level to play
    #[arg(long, default_value_t = 1)]
    level: usize,

    /// RNG seed for spawn order and positions
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Difficulty fed to enemy movement and fire rates
    #[arg(long, default_value_t = DEFAULT_DIFFICULTY)]
    difficulty: u32,

    /// Chance the autopilot goes after each enemy (0.0 - 1.0)
    #[arg(long, default_value_t = 0.8)]
    accuracy: f64,

    /// Give up after this many simulated seconds
    #[arg(long, default_value_t = 120.0)]
    max_secs: f64,

    /// Run at wall-clock speed instead of as fast as possible
    #[arg(long)]
    realtime: bool,

    /// JSON file holding the best score
    #[arg(long)]
    high_score_file: Option<PathBuf>,

    /// JSON file with a custom level catalog
    #[arg(long)]
    catalog: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::filter::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let catalog = match &args.catalog {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read catalog {}", path.display()))?;
            LevelCatalog::from_json(&json)?
        }
        None => LevelCatalog::builtin(),
    };
    if catalog.get_level(args.level).is_err() {
        bail!(
            "level {} does not exist, available levels: 1-{}",
            args.level,
            catalog.level_count()
        );
    }

    let config = LoopConfig {
        session: SessionConfig {
            seed: args.seed,
            difficulty: args.difficulty,
            catalog,
            high_score_path: args.high_score_file.clone(),
        },
        level: args.level,
        accuracy: args.accuracy,
        max_ticks: (args.max_secs.max(0.0) * TICK_RATE as f64) as u64,
        realtime: args.realtime,
    };

    println!("Playing level {} (seed {}, accuracy {:.2})", args.level, args.seed, args.accuracy);
    let latest = SharedSnapshot::default();
    let (_cmd_tx, handle) =
        game_loop::spawn_game_loop(config, latest).context("failed to spawn game loop thread")?;
    let summary = handle
        .join()
        .map_err(|_| anyhow::anyhow!("game loop thread panicked"))?;

    println!();
    match (summary.phase, summary.result) {
        (GamePhase::LevelComplete, Some(result)) => {
            println!("=== LEVEL {} COMPLETE ===", result.level);
            println!("  Stars:  {}", "*".repeat(result.stars as usize));
            println!("  Score:  {}", result.score);
            println!("  Time:   {}", result.formatted_time());
        }
        (phase, _) => {
            println!("=== LEVEL {} ENDED ({:?}) ===", summary.level, phase);
            println!("  Score:  {}", summary.score);
        }
    }
    println!("  Best:   {}", summary.best_score);
    println!();
    println!("{}", serde_json::to_string(&summary)?);

    Ok(())
}
