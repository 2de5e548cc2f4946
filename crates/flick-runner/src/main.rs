//! Headless flick runner.
//!
//! Loads a level catalog, plays a scripted list of shots against one level and
//! reports the outcome.

mod script;

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use flick_core::{
    AssetRegistry, Game, GameConfig, GamePhase, LevelCatalog, LevelEvent, RecordingSurface,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::script::ShotScript;

/// Frame length fed to the game, as a display running at 60Hz would.
const FRAME: f32 = 1.0 / 60.0;

#[derive(Parser)]
#[command(version, about = "Plays scripted shots against a flick level")]
struct Cli {
    /// Level catalog (JSON array). Defaults to the bundled levels.
    #[arg(long, value_name = "PATH")]
    levels: Option<PathBuf>,

    /// Index of the level to play.
    #[arg(long, default_value_t = 0)]
    level: usize,

    /// Game config (JSON). Missing fields keep their defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Shot script (JSON array of `{ "wait": seconds, "target": [x, y] }`).
    #[arg(long, value_name = "PATH")]
    shots: Option<PathBuf>,

    /// Seconds to keep simulating after the last shot.
    #[arg(long, default_value_t = 10.0)]
    settle: f32,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let catalog = match &cli.levels {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read level catalog {}", path.display()))?;
            LevelCatalog::from_json(&json)?
        }
        None => LevelCatalog::builtin()?,
    };
    let description = catalog
        .get(cli.level)
        .with_context(|| format!("level {} not found ({} levels)", cli.level, catalog.len()))?
        .clone();

    let config = match &cli.config {
        Some(path) => {
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read config {}", path.display()))?;
            GameConfig::from_json(&json)?
        }
        None => GameConfig::default(),
    };

    let script = match &cli.shots {
        Some(path) => ShotScript::load(path)?,
        None => ShotScript::default(),
    };

    let mut game = Game::new(description, config, AssetRegistry::with_defaults())?;
    tracing::info!(level = %game.level().name(), shots = script.shots.len(), "starting");
    game.start();

    for shot in &script.shots {
        run(&mut game, shot.wait);
        if !game.shoot(shot.target) {
            tracing::warn!(phase = ?game.phase(), "level over, remaining shots skipped");
            break;
        }
    }
    run(&mut game, cli.settle);

    let mut surface = RecordingSurface::new();
    game.frame_drawn(&mut surface)?;

    let level = game.level();
    tracing::info!(
        phase = ?game.phase(),
        shots = game.shots(),
        stars = game.stars(),
        coins = %format!("{}/{}", level.coins_collected(), level.total_coins()),
        frames = level.world().current_frame(),
        hash = %format!("{:016x}", level.world().compute_hash()),
        draw_calls = surface.commands.len(),
        "finished"
    );
    Ok(())
}

/// Feeds `seconds` of frames while the level is playing.
fn run(game: &mut Game, seconds: f32) {
    let mut elapsed = 0.0;
    while elapsed < seconds && game.phase() == GamePhase::Playing {
        for event in game.update(FRAME) {
            if let LevelEvent::CoinCollected { collected, total, .. } = event {
                tracing::info!(collected, total, "coin");
            }
        }
        elapsed += FRAME;
    }
}
