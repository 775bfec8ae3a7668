//! Request pacing with cooldown for the text provider.
//!
//! The governor crate (GCRA algorithm) spaces outbound calls to one per
//! configured interval. A vendor 429 opens a cooldown window during which
//! `acquire` refuses immediately instead of waiting, so the current
//! attempt surfaces a rate-limited error rather than auto-retrying
//! in-process.

use crate::{RateLimitError, RateLimitErrorKind};
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use parking_lot::Mutex;
use std::num::NonZeroU32;
use std::time::{Duration, Instant};

// Type alias for our direct rate limiter
type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Paces calls to a vendor API and enforces post-429 cooldowns.
pub struct Pacer {
    limiter: DirectRateLimiter,
    cooldown: Duration,
    cooldown_until: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer that allows one call per `min_interval`, with a
    /// `cooldown` window opened by [`Pacer::begin_cooldown`].
    ///
    /// # Errors
    ///
    /// Returns an error if `min_interval` is zero.
    pub fn new(min_interval: Duration, cooldown: Duration) -> Result<Self, RateLimitError> {
        let quota = Quota::with_period(min_interval).ok_or_else(|| {
            RateLimitError::new(RateLimitErrorKind::InvalidQuota(format!(
                "interval {:?} is not a valid pacing period",
                min_interval
            )))
        })?;
        // Burst of 1: strictly one call per interval.
        let quota = quota.allow_burst(NonZeroU32::MIN);

        Ok(Self {
            limiter: GovernorRateLimiter::direct(quota),
            cooldown,
            cooldown_until: Mutex::new(None),
        })
    }

    /// Wait for pacing clearance, or refuse if a cooldown is open.
    ///
    /// # Errors
    ///
    /// Returns `CoolingDown` when a vendor rate limit has opened a
    /// cooldown window that has not yet elapsed.
    #[tracing::instrument(skip(self))]
    pub async fn acquire(&self) -> Result<(), RateLimitError> {
        if let Some(remaining) = self.cooldown_remaining() {
            tracing::warn!(
                remaining_secs = remaining.as_secs(),
                "Refusing call during cooldown"
            );
            return Err(RateLimitError::new(RateLimitErrorKind::CoolingDown {
                remaining_secs: remaining.as_secs().max(1),
            }));
        }

        self.limiter.until_ready().await;
        Ok(())
    }

    /// Open the cooldown window. Called when the vendor returns 429.
    pub fn begin_cooldown(&self) {
        let until = Instant::now() + self.cooldown;
        tracing::warn!(cooldown_secs = self.cooldown.as_secs(), "Opening cooldown window");
        *self.cooldown_until.lock() = Some(until);
    }

    /// Time left on the cooldown window, if one is open.
    pub fn cooldown_remaining(&self) -> Option<Duration> {
        let mut guard = self.cooldown_until.lock();
        match *guard {
            Some(until) => {
                let now = Instant::now();
                if now < until {
                    Some(until - now)
                } else {
                    // Window elapsed; clear the marker.
                    *guard = None;
                    None
                }
            }
            None => None,
        }
    }

    /// Cooldown duration configured for this pacer.
    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }
}

impl std::fmt::Debug for Pacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pacer")
            .field("cooldown", &self.cooldown)
            .field("cooldown_until", &*self.cooldown_until.lock())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn acquire_allows_first_call() {
        let pacer = Pacer::new(Duration::from_millis(10), Duration::from_secs(60)).unwrap();
        assert!(pacer.acquire().await.is_ok());
    }

    #[tokio::test]
    async fn cooldown_refuses_without_waiting() {
        let pacer = Pacer::new(Duration::from_millis(10), Duration::from_secs(60)).unwrap();
        pacer.begin_cooldown();

        let start = Instant::now();
        let result = pacer.acquire().await;
        assert!(start.elapsed() < Duration::from_secs(1));

        match result {
            Err(e) => assert!(matches!(
                e.kind(),
                RateLimitErrorKind::CoolingDown { .. }
            )),
            Ok(_) => panic!("expected cooldown refusal"),
        }
    }

    #[tokio::test]
    async fn cooldown_clears_after_window() {
        let pacer = Pacer::new(Duration::from_millis(1), Duration::from_millis(20)).unwrap();
        pacer.begin_cooldown();
        assert!(pacer.cooldown_remaining().is_some());

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(pacer.cooldown_remaining().is_none());
        assert!(pacer.acquire().await.is_ok());
    }

    #[test]
    fn zero_interval_is_rejected() {
        assert!(Pacer::new(Duration::ZERO, Duration::from_secs(60)).is_err());
    }
}
