//! CLI argument definitions.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Marquee editorial pipeline.
#[derive(Parser, Debug)]
#[command(name = "marquee")]
#[command(about = "Scheduled article generation and social sharing for streaming roundups")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bot server until interrupted
    Serve {
        /// Path to the server configuration file
        #[arg(short, long, default_value = "marquee.toml")]
        config: PathBuf,
    },
    /// Run one generation job and print the resulting record
    Generate {
        /// Article kind: weekly, trending, spotlight, monthly, top10, seasonal
        #[arg(short, long)]
        kind: String,
        /// Platform key, e.g. netflix, max, hulu, or all
        #[arg(short, long)]
        platform: String,
        /// Number of titles to cover, overriding the kind's default
        #[arg(long)]
        count: Option<usize>,
    },
    /// Share one published article to the configured social platform
    Share {
        /// Content id of the published article
        #[arg(long)]
        content_id: i64,
        /// Path to the server configuration file (for link and message settings)
        #[arg(short, long, default_value = "marquee.toml")]
        config: PathBuf,
    },
    /// Cancel a stuck generation record, or mark a published one deleted
    Cancel {
        /// Ledger record id
        #[arg(long)]
        record_id: i32,
        /// Mark a successful record deleted (its article was removed
        /// from the host) instead of cancelling a pending one
        #[arg(long)]
        deleted: bool,
    },
    /// Print the ledger summary, recent failures, and environment checks
    Status,
    /// Delete failed and cancelled records older than the retention window
    Sweep {
        /// Retention window in days
        #[arg(long, default_value_t = 90)]
        days: i64,
    },
}
