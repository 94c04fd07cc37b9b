// Replays a recorded game session through the trade tracker plugin

use anyhow::Result;
use log::info;
use std::env;

use tradetracker::host::session::{replay, replay_config_dir};
use tradetracker::prelude::*;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables and initialize logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Trade Tracker v{}", tradetracker::VERSION);

    let session_path = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: tradetracker <session.yaml>"))?;

    let config_dir = replay_config_dir();
    info!("Replay configuration lives in {}", config_dir.display());

    let config_manager = ConfigurationManager::new(&config_dir);
    config_manager.initialize().await?;

    let script = SessionScript::load(&session_path).await?;
    let report = replay(script, &config_manager).await?;

    info!("Session stats: {}", serde_json::to_string_pretty(&report.stats)?);
    Ok(())
}
