//! The share run: guard, claim, publish, record.

use chrono::{Duration, Utc};
use marquee_core::{ContentHost, SocialPost, SocialPostOutcome, SocialPoster};
use marquee_database::ShareRecordRow;
use marquee_error::MarqueeResult;
use marquee_ledger::{Ledger, ShareGuardDecision};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Host metadata key prefix recording the vendor post id per platform.
const SHARE_MARKER_PREFIX: &str = "marquee_share_";
/// Deferral horizon when the vendor exhausts its retries on transport.
const TRANSPORT_DEFER_HOURS: i64 = 1;

/// Outcome of one share run.
#[derive(Debug, Clone)]
pub enum ShareOutcome {
    /// The post went out (or the vendor confirmed it already existed).
    Shared(ShareRecordRow),
    /// A successful share record already existed; nothing was written.
    AlreadyShared(ShareRecordRow),
    /// The host content item already carries a vendor post id marker.
    HostMarked(String),
    /// Another share attempt holds a live processing marker.
    InFlight(ShareRecordRow),
    /// The vendor rate-limited us; the record is pending with a future
    /// attempt time.
    Deferred(ShareRecordRow),
    /// A non-retryable failure; the record carries the reason.
    Failed(ShareRecordRow),
}

impl ShareOutcome {
    /// Whether the content is now (or was already) shared.
    pub fn is_shared(&self) -> bool {
        matches!(self, ShareOutcome::Shared(_) | ShareOutcome::AlreadyShared(_))
    }
}

/// Runs share jobs end to end and records every outcome on the ledger.
pub struct ShareOrchestrator {
    ledger: Ledger,
    poster: Arc<dyn SocialPoster>,
    host: Arc<dyn ContentHost>,
}

impl ShareOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(ledger: Ledger, poster: Arc<dyn SocialPoster>, host: Arc<dyn ContentHost>) -> Self {
        Self { ledger, poster, host }
    }

    /// Share one content item to the poster's platform.
    ///
    /// # Errors
    ///
    /// Returns an error when the ledger itself cannot be read or
    /// written.
    #[instrument(skip(self, post), fields(content_id, platform = self.poster.platform()))]
    pub async fn share(&self, content_id: i64, post: &SocialPost) -> MarqueeResult<ShareOutcome> {
        let platform = self.poster.platform();
        let marker_key = format!("{SHARE_MARKER_PREFIX}{platform}");

        // The host marker is advisory; failing to read it must not stop
        // the run, the ledger is the authority.
        let host_marker = match self.host.read_meta(content_id, &marker_key).await {
            Ok(marker) => marker,
            Err(e) => {
                warn!(content_id, error = %e, "Host marker read failed");
                None
            }
        };

        match self.ledger.guard().may_share(content_id, platform, host_marker)? {
            ShareGuardDecision::Allowed => {}
            ShareGuardDecision::AlreadyShared(existing) => {
                info!(record_id = existing.id(), "Share refused: already shared");
                return Ok(ShareOutcome::AlreadyShared(existing));
            }
            ShareGuardDecision::HostMarked(marker) => {
                info!(content_id, "Share refused: host carries a post marker");
                return Ok(ShareOutcome::HostMarked(marker));
            }
            ShareGuardDecision::InFlight(existing) => {
                info!(record_id = existing.id(), "Share refused: attempt in flight");
                return Ok(ShareOutcome::InFlight(existing));
            }
        }

        let record = self.ledger.begin_share(content_id, platform)?;

        match self.poster.publish(post).await {
            Ok(SocialPostOutcome::Posted { post_id }) => {
                info!(record_id = record.id(), post_id = %post_id, "Share posted");
                let row = self
                    .ledger
                    .complete_share(*record.id(), Some(post_id.clone()))?;
                if let Err(e) = self.host.write_meta(content_id, &marker_key, &post_id).await {
                    warn!(content_id, error = %e, "Host marker write failed");
                }
                Ok(ShareOutcome::Shared(row))
            }
            Ok(SocialPostOutcome::Duplicate) => {
                info!(record_id = record.id(), "Vendor reported duplicate; counted as shared");
                let row = self.ledger.complete_share(*record.id(), None)?;
                Ok(ShareOutcome::Shared(row))
            }
            Ok(SocialPostOutcome::Deferred { retry_at }) => {
                info!(record_id = record.id(), retry_at = %retry_at, "Share deferred");
                let row = self.ledger.defer_share(*record.id(), retry_at)?;
                Ok(ShareOutcome::Deferred(row))
            }
            Err(e) if e.is_retryable() => {
                // Retries are exhausted but nothing says a later attempt
                // cannot succeed; reschedule instead of failing.
                let retry_at = Utc::now() + Duration::hours(TRANSPORT_DEFER_HOURS);
                warn!(record_id = record.id(), error = %e, "Share deferred after transient failure");
                let row = self.ledger.defer_share(*record.id(), retry_at)?;
                Ok(ShareOutcome::Deferred(row))
            }
            Err(e) => {
                error!(record_id = record.id(), error = %e, "Share failed");
                let row = self.ledger.fail_share(*record.id(), &e.to_string())?;
                Ok(ShareOutcome::Failed(row))
            }
        }
    }
}
