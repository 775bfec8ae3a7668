//! Bot server command handler.

use marquee_error::MarqueeResult;
use marquee_server::{MarqueeConfig, MarqueeServer};
use std::path::PathBuf;
use std::sync::Arc;

use super::wire;

/// Handle the `serve` command.
pub async fn handle_serve_command(config_path: PathBuf) -> MarqueeResult<()> {
    tracing::info!(config_file = %config_path.display(), "Loading configuration");
    let config = MarqueeConfig::from_file(&config_path)?;

    let ledger = wire::open_ledger()?;
    let generation = Arc::new(wire::generation_orchestrator(ledger.clone())?);
    let sharing = Arc::new(wire::share_orchestrator(ledger.clone())?);

    tracing::info!("Starting bot server. Press Ctrl+C to stop.");
    MarqueeServer::new(config, ledger, generation, sharing, wire::SOCIAL_PLATFORM)
        .run()
        .await
}
