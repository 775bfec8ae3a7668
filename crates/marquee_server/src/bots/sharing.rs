//! The share bot: scans for shareable content and posts with jitter
//! spacing.

use crate::config::ShareBotConfig;
#[cfg(feature = "metrics")]
use crate::metrics::BotMetrics;
use chrono::Utc;
use marquee_core::SocialPost;
use marquee_ledger::Ledger;
use marquee_pipeline::{ShareOrchestrator, ShareOutcome};
use rand::Rng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Commands accepted by the share bot.
#[derive(Debug)]
pub enum ShareMessage {
    /// Scan and post one batch
    Share,
    /// Stop the loop
    Shutdown,
}

/// Bot that shares published articles to the social platform.
///
/// Each tick it takes one batch: first-time shares for successes with
/// no record yet, then deferred shares whose attempt time has passed.
pub struct ShareBot {
    config: ShareBotConfig,
    ledger: Ledger,
    orchestrator: Arc<ShareOrchestrator>,
    platform: &'static str,
    rx: mpsc::Receiver<ShareMessage>,
    #[cfg(feature = "metrics")]
    metrics: Arc<BotMetrics>,
}

impl ShareBot {
    /// Creates a new share bot posting to `platform`.
    pub fn new(
        config: ShareBotConfig,
        ledger: Ledger,
        orchestrator: Arc<ShareOrchestrator>,
        platform: &'static str,
        rx: mpsc::Receiver<ShareMessage>,
        #[cfg(feature = "metrics")] metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            config,
            ledger,
            orchestrator,
            platform,
            rx,
            #[cfg(feature = "metrics")]
            metrics,
        }
    }

    /// Runs the bot loop until shutdown or channel close.
    #[instrument(skip(self), fields(platform = self.platform))]
    pub async fn run(mut self) {
        info!("Share bot started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                ShareMessage::Share => {
                    if let Err(e) = self.share_batch().await {
                        error!(error = %e, "Share batch failed");
                    }
                }
                ShareMessage::Shutdown => {
                    info!("Share bot shutting down");
                    break;
                }
            }
        }
    }

    /// Content ids due for an attempt this tick, oldest first.
    fn due_content(&self) -> marquee_error::MarqueeResult<Vec<i64>> {
        let batch = self.config.batch_size();
        let mut ids: Vec<i64> = Vec::new();

        for record in self
            .ledger
            .unshared_successes(self.platform, *batch as i64)?
        {
            if let Some(content_id) = record.linked_content_id() {
                ids.push(*content_id);
            }
        }
        for record in self.ledger.due_shares(Utc::now())? {
            if ids.len() >= *batch {
                break;
            }
            if *record.platform() == self.platform && !ids.contains(record.content_id()) {
                ids.push(*record.content_id());
            }
        }
        ids.truncate(*batch);
        Ok(ids)
    }

    async fn share_batch(&self) -> marquee_error::MarqueeResult<()> {
        let ids = self.due_content()?;
        #[cfg(feature = "metrics")]
        self.metrics.update_queue_depth("share", ids.len() as u64);
        if ids.is_empty() {
            return Ok(());
        }
        info!(count = ids.len(), "Sharing batch");

        let mut first = true;
        for content_id in ids {
            if !first {
                tokio::time::sleep(self.spacing()).await;
            }
            first = false;

            let post = SocialPost {
                message: self.config.message_for(content_id),
                link: self.config.article_link(content_id),
            };
            match self.orchestrator.share(content_id, &post).await {
                Ok(outcome) => {
                    let failed = matches!(outcome, ShareOutcome::Failed(_));
                    info!(content_id, shared = outcome.is_shared(), "Share attempt finished");
                    #[cfg(feature = "metrics")]
                    if failed {
                        self.metrics.record_failure("share");
                    } else {
                        self.metrics.record_execution("share", 0.0);
                    }
                    #[cfg(not(feature = "metrics"))]
                    let _ = failed;
                }
                Err(e) => {
                    // Ledger trouble on one item; the rest still get
                    // their attempt.
                    warn!(content_id, error = %e, "Share attempt errored");
                    #[cfg(feature = "metrics")]
                    self.metrics.record_failure("share");
                }
            }
        }
        Ok(())
    }

    /// Random pause between posts in a batch.
    fn spacing(&self) -> Duration {
        let jitter = *self.config.jitter_secs();
        if jitter == 0 {
            return Duration::from_secs(1);
        }
        let secs = rand::thread_rng().gen_range(1..=jitter);
        Duration::from_secs(secs)
    }
}
