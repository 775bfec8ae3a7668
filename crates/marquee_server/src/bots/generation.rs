//! The generation bot: walks the configured job list on each trigger.

use crate::config::GenerationBotConfig;
#[cfg(feature = "metrics")]
use crate::metrics::BotMetrics;
use marquee_pipeline::GenerationOrchestrator;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::{error, info, instrument, warn};

/// Commands accepted by the generation bot.
#[derive(Debug)]
pub enum GenerationMessage {
    /// Run every configured job once
    Generate,
    /// Stop the loop
    Shutdown,
}

/// Bot that runs generation jobs when told to.
///
/// Each job's failure is isolated: one platform's error never aborts
/// its siblings in the same tick.
pub struct GenerationBot {
    config: GenerationBotConfig,
    orchestrator: Arc<GenerationOrchestrator>,
    rx: mpsc::Receiver<GenerationMessage>,
    #[cfg(feature = "metrics")]
    metrics: Arc<BotMetrics>,
}

impl GenerationBot {
    /// Creates a new generation bot.
    pub fn new(
        config: GenerationBotConfig,
        orchestrator: Arc<GenerationOrchestrator>,
        rx: mpsc::Receiver<GenerationMessage>,
        #[cfg(feature = "metrics")] metrics: Arc<BotMetrics>,
    ) -> Self {
        Self {
            config,
            orchestrator,
            rx,
            #[cfg(feature = "metrics")]
            metrics,
        }
    }

    /// Runs the bot loop until shutdown or channel close.
    #[instrument(skip(self))]
    pub async fn run(mut self) {
        info!(jobs = self.config.jobs().len(), "Generation bot started");

        while let Some(msg) = self.rx.recv().await {
            match msg {
                GenerationMessage::Generate => self.run_jobs().await,
                GenerationMessage::Shutdown => {
                    info!("Generation bot shutting down");
                    break;
                }
            }
        }
    }

    async fn run_jobs(&self) {
        for job in self.config.jobs() {
            let Some(platform) = job.resolve_platform() else {
                warn!(platform = %job.platform(), "Skipping job with unknown platform");
                continue;
            };

            let start = Instant::now();
            let result = self
                .orchestrator
                .run(*job.kind(), platform, job.parameters())
                .await;
            let duration = start.elapsed();

            match result {
                Ok(record) => {
                    info!(
                        kind = %job.kind(),
                        platform = %platform,
                        record_id = record.id(),
                        status = %record.status(),
                        duration_ms = duration.as_millis(),
                        "Generation job finished"
                    );
                    #[cfg(feature = "metrics")]
                    self.metrics.record_execution("generation", duration.as_secs_f64());
                }
                Err(e) => {
                    error!(
                        kind = %job.kind(),
                        platform = %platform,
                        error = %e,
                        "Generation job errored"
                    );
                    #[cfg(feature = "metrics")]
                    self.metrics.record_failure("generation");
                }
            }
        }
    }
}
