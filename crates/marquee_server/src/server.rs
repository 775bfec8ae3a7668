//! The scheduled trigger: spawns the bots and drives them by cadence.

use crate::bots::{GenerationBot, GenerationMessage, ShareBot, ShareMessage};
use crate::config::MarqueeConfig;
#[cfg(feature = "metrics")]
use crate::metrics::BotMetrics;
use chrono::{DateTime, Duration, Utc};
use marquee_error::{MarqueeResult, ServerError, ServerErrorKind};
use marquee_ledger::Ledger;
use marquee_pipeline::{GenerationOrchestrator, ShareOrchestrator};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::{error, info, instrument};

/// How often the trigger loop re-checks every cadence.
const POLL_SECS: u64 = 30;
/// Bot command channel depth.
const CHANNEL_DEPTH: usize = 8;

/// Owns the bot loops and the trigger that feeds them.
pub struct MarqueeServer {
    config: MarqueeConfig,
    ledger: Ledger,
    generation: Arc<GenerationOrchestrator>,
    sharing: Arc<ShareOrchestrator>,
    platform: &'static str,
}

impl MarqueeServer {
    /// Creates a server over the given orchestrators. `platform` is the
    /// social platform key the share bot posts to.
    pub fn new(
        config: MarqueeConfig,
        ledger: Ledger,
        generation: Arc<GenerationOrchestrator>,
        sharing: Arc<ShareOrchestrator>,
        platform: &'static str,
    ) -> Self {
        Self { config, ledger, generation, sharing, platform }
    }

    /// Runs until interrupted. Delivery is best-effort: a job fires on
    /// the first poll after its due time.
    ///
    /// # Errors
    ///
    /// Returns an error when a bot channel closes unexpectedly.
    #[instrument(skip(self))]
    pub async fn run(self) -> MarqueeResult<()> {
        let (gen_tx, gen_rx) = mpsc::channel(CHANNEL_DEPTH);
        let (share_tx, share_rx) = mpsc::channel(CHANNEL_DEPTH);

        #[cfg(feature = "metrics")]
        let metrics = Arc::new(BotMetrics::new());

        let generation_bot = GenerationBot::new(
            self.config.generation().clone(),
            Arc::clone(&self.generation),
            gen_rx,
            #[cfg(feature = "metrics")]
            Arc::clone(&metrics),
        );
        let share_bot = ShareBot::new(
            self.config.sharing().clone(),
            self.ledger.clone(),
            Arc::clone(&self.sharing),
            self.platform,
            share_rx,
            #[cfg(feature = "metrics")]
            Arc::clone(&metrics),
        );
        let gen_handle = tokio::spawn(generation_bot.run());
        let share_handle = tokio::spawn(share_bot.run());

        info!(poll_secs = POLL_SECS, "Trigger loop started");
        let mut last_generation: Option<DateTime<Utc>> = None;
        let mut last_share: Option<DateTime<Utc>> = None;
        let mut last_sweep: Option<DateTime<Utc>> = None;
        let mut ticker = tokio::time::interval(std::time::Duration::from_secs(POLL_SECS));

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let now = Utc::now();

                    if *self.config.generation().enabled()
                        && self.config.generation().cadence().check(last_generation).should_run
                    {
                        last_generation = Some(now);
                        gen_tx.send(GenerationMessage::Generate).await.map_err(|e| {
                            ServerError::new(ServerErrorKind::Channel(e.to_string()))
                        })?;
                    }

                    if *self.config.sharing().enabled()
                        && self.config.sharing().cadence().check(last_share).should_run
                    {
                        last_share = Some(now);
                        share_tx.send(ShareMessage::Share).await.map_err(|e| {
                            ServerError::new(ServerErrorKind::Channel(e.to_string()))
                        })?;
                    }

                    if *self.config.retention().enabled()
                        && self.config.retention().cadence().check(last_sweep).should_run
                    {
                        last_sweep = Some(now);
                        let cutoff = now - Duration::days(*self.config.retention().days());
                        match self.ledger.sweep_retention(cutoff) {
                            Ok(swept) => info!(swept, "Retention sweep ran"),
                            Err(e) => error!(error = %e, "Retention sweep failed"),
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    info!("Interrupt received, stopping bots");
                    let _ = gen_tx.send(GenerationMessage::Shutdown).await;
                    let _ = share_tx.send(ShareMessage::Shutdown).await;
                    break;
                }
            }
        }

        let _ = gen_handle.await;
        let _ = share_handle.await;
        info!("Server stopped");
        Ok(())
    }
}
