//! The Duplicate Guard: decides whether a new generation or share
//! attempt may proceed given existing ledger state.
//!
//! All checks are pure reads. Callers transition state immediately after
//! an allowed answer to keep the race window short; with no cross-process
//! locking the short-timeout markers reduce, not eliminate, double
//! processing.

use crate::Ledger;
use chrono::{DateTime, Duration, Utc};
use marquee_core::{GeneratorKind, Platform};
use marquee_database::{GenerationRecordRow, ShareRecordRow};
use marquee_error::MarqueeResult;
use tracing::instrument;

/// Age after which a stuck processing marker is treated as abandoned.
pub fn reclaim_timeout() -> Duration {
    Duration::hours(1)
}

/// Whether a record created at `created_at` falls inside the trailing
/// dedup window ending at `now`.
pub fn within_window(created_at: DateTime<Utc>, now: DateTime<Utc>, window: Duration) -> bool {
    now.signed_duration_since(created_at) < window
}

/// Whether a processing marker still blocks new work.
///
/// A missing marker means the claim never stamped one; such a record is
/// treated as abandoned and does not block.
pub fn marker_blocks(
    processing_started_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    timeout: Duration,
) -> bool {
    match processing_started_at {
        Some(started) => now.signed_duration_since(started) < timeout,
        None => false,
    }
}

/// Outcome of a generation guard check.
#[derive(Debug, Clone)]
pub enum GenerationGuardDecision {
    /// No blocker; the caller may claim a new record.
    Allowed,
    /// A success inside the dedup window blocks this run. Carries the
    /// existing record so callers can return it.
    BlockedBySuccess(GenerationRecordRow),
    /// Another run holds a live processing marker.
    BlockedByProcessing(GenerationRecordRow),
}

impl GenerationGuardDecision {
    /// Whether the attempt may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GenerationGuardDecision::Allowed)
    }
}

/// Outcome of a share guard check.
#[derive(Debug, Clone)]
pub enum ShareGuardDecision {
    /// No blocker; the caller may claim the share.
    Allowed,
    /// A successful share already exists for this (content, platform).
    AlreadyShared(ShareRecordRow),
    /// The host carries a vendor post-id marker for this platform.
    HostMarked(String),
    /// Another share attempt holds a live processing marker.
    InFlight(ShareRecordRow),
}

impl ShareGuardDecision {
    /// Whether the attempt may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, ShareGuardDecision::Allowed)
    }
}

/// Read-only duplicate checks over the ledger.
#[derive(Debug, Clone, Copy)]
pub struct DuplicateGuard<'a> {
    ledger: &'a Ledger,
}

impl<'a> DuplicateGuard<'a> {
    /// Creates a guard over the given ledger.
    pub fn new(ledger: &'a Ledger) -> Self {
        Self { ledger }
    }

    /// May a new generation for (kind, platform) proceed?
    ///
    /// Refused when a success exists inside `window`, or another record
    /// is processing with a marker younger than the reclaim timeout.
    #[instrument(skip(self), fields(kind = %kind, platform = %platform))]
    pub fn may_generate(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        window: Duration,
    ) -> MarqueeResult<GenerationGuardDecision> {
        let now = Utc::now();

        if let Some(success) = self.ledger.latest_success(kind, platform)? {
            if within_window(*success.created_at(), now, window) {
                tracing::debug!(record_id = success.id(), "Blocked by recent success");
                return Ok(GenerationGuardDecision::BlockedBySuccess(success));
            }
        }

        if let Some(processing) = self.ledger.latest_processing(kind, platform)? {
            if marker_blocks(*processing.processing_started_at(), now, reclaim_timeout()) {
                tracing::debug!(record_id = processing.id(), "Blocked by live processing marker");
                return Ok(GenerationGuardDecision::BlockedByProcessing(processing));
            }
            tracing::warn!(
                record_id = processing.id(),
                "Reclaiming abandoned processing record"
            );
        }

        Ok(GenerationGuardDecision::Allowed)
    }

    /// May a share of `content_id` to `platform` proceed?
    ///
    /// `host_marker` is the vendor post-id metadata read from the host
    /// content item, when present.
    #[instrument(skip(self, host_marker))]
    pub fn may_share(
        &self,
        content_id: i64,
        platform: &str,
        host_marker: Option<String>,
    ) -> MarqueeResult<ShareGuardDecision> {
        let now = Utc::now();

        if let Some(success) = self.ledger.successful_share(content_id, platform)? {
            tracing::debug!(record_id = success.id(), "Blocked by prior successful share");
            return Ok(ShareGuardDecision::AlreadyShared(success));
        }

        if let Some(marker) = host_marker {
            if !marker.trim().is_empty() {
                tracing::debug!("Blocked by host vendor-post marker");
                return Ok(ShareGuardDecision::HostMarked(marker));
            }
        }

        if let Some(in_flight) = self.ledger.share_in_flight(content_id, platform)? {
            if marker_blocks(*in_flight.processing_started_at(), now, reclaim_timeout()) {
                tracing::debug!(record_id = in_flight.id(), "Blocked by in-flight share");
                return Ok(ShareGuardDecision::InFlight(in_flight));
            }
        }

        Ok(ShareGuardDecision::Allowed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_one_hour_old_blocks_weekly_window() {
        // Scenario: weekly success at T0, new run at T0 + 1 hour.
        let now = Utc::now();
        let created = now - Duration::hours(1);
        assert!(within_window(created, now, Duration::days(7)));
    }

    #[test]
    fn success_outside_window_does_not_block() {
        let now = Utc::now();
        let created = now - Duration::days(8);
        assert!(!within_window(created, now, Duration::days(7)));
    }

    #[test]
    fn ten_minute_marker_blocks_under_reclaim_timeout() {
        // Scenario: processing marker 10 minutes old, 1 hour reclaim.
        let now = Utc::now();
        let started = Some(now - Duration::minutes(10));
        assert!(marker_blocks(started, now, reclaim_timeout()));
    }

    #[test]
    fn stale_marker_is_reclaimed() {
        let now = Utc::now();
        let started = Some(now - Duration::hours(2));
        assert!(!marker_blocks(started, now, reclaim_timeout()));
    }

    #[test]
    fn missing_marker_never_blocks() {
        let now = Utc::now();
        assert!(!marker_blocks(None, now, reclaim_timeout()));
    }
}
