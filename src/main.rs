//! # Tithe Main Entry Point
//!
//! Parses flags, restores or starts a game, spins up the background
//! runtime and hands control to the macroquad scene loop.

use clap::Parser;
use log::info;
use macroquad::prelude::*;
use std::path::PathBuf;
use std::sync::Arc;
use tithe::{
    GameController, GameRules, GenerationConfig, JsonFileStore, SceneManager, TitheError,
    TitheResult,
};

/// Command line arguments for Tithe.
#[derive(Parser, Debug)]
#[command(name = "tithe")]
#[command(about = "Farm, harvest and meet the quota before the season ends")]
#[command(version)]
struct Args {
    /// Random seed for farm generation and growth rolls
    #[arg(short, long)]
    seed: Option<u64>,

    /// Where the save file lives
    #[arg(long, default_value = "saves/tithe.json")]
    save_path: PathBuf,

    /// Crops that must be harvested to win
    #[arg(long, default_value_t = tithe::config::QUOTA_TARGET)]
    quota: u32,

    /// Number of days in the season
    #[arg(long, default_value_t = tithe::config::MAX_DAYS)]
    max_days: u32,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn window_conf() -> Conf {
    Conf {
        window_title: "Tithe".to_string(),
        window_width: 1024,
        window_height: 768,
        high_dpi: true,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() -> TitheResult<()> {
    let args = Args::parse();

    initialize_logging(&args.log_level);

    info!("Starting Tithe v{}", tithe::VERSION);

    run_game(&args).await
}

/// Initializes env_logger; `RUST_LOG` wins over the flag when set.
fn initialize_logging(log_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_target(false)
        .init();
}

async fn run_game(args: &Args) -> TitheResult<()> {
    if args.max_days == 0 {
        return Err(TitheError::InvalidState(
            "The season needs at least one day".to_string(),
        ));
    }

    let seed = args.seed.unwrap_or_else(::rand::random);
    info!("Using seed {}", seed);
    let config = GenerationConfig::new(seed);
    let rules = GameRules {
        max_days: args.max_days,
        quota_target: args.quota,
    };
    let store = Arc::new(JsonFileStore::new(&args.save_path));
    info!("Save file: {}", store.path().display());

    // Timers run on their own threads; the render loop stays on macroquad's.
    let runtime = tokio::runtime::Runtime::new()?;
    let _guard = runtime.enter();

    let controller = GameController::new(config, rules, store)?;
    controller.start_background()?;

    let mut scenes = SceneManager::new(controller);
    scenes.run().await?;

    info!("Game loop ended");
    Ok(())
}
