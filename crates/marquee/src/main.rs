//! Marquee command-line entry point.
//!
//! One binary covers the whole pipeline: `serve` runs the scheduled
//! bots, while `generate`, `share`, `status`, and `sweep` run single
//! operations for cron jobs and operator use.

mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env before anything reads credentials.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Serve { config } => cli::handle_serve_command(config).await?,
        Commands::Generate {
            kind,
            platform,
            count,
        } => cli::handle_generate_command(kind, platform, count).await?,
        Commands::Share { content_id, config } => {
            cli::handle_share_command(content_id, config).await?;
        }
        Commands::Cancel { record_id, deleted } => {
            cli::handle_cancel_command(record_id, deleted)?;
        }
        Commands::Status => cli::handle_status_command()?,
        Commands::Sweep { days } => cli::handle_sweep_command(days)?,
    }

    Ok(())
}
