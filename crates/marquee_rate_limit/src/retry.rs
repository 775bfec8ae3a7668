//! Retry strategies for vendor calls.
//!
//! Each external dependency carries its own rules. The metadata provider
//! gets a single attempt with no retry; callers tolerate missing data.
//! The social provider retries transport failures and 5xx a small fixed
//! number of times, and defers the whole post on a vendor rate limit
//! rather than retrying immediately.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_retry2::strategy::FixedInterval;

/// Retry policy for social publish attempts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_getters::Getters)]
pub struct SocialRetryPolicy {
    /// Retries after the initial attempt (total attempts = retries + 1)
    max_retries: usize,
    /// Pause between attempts in milliseconds
    pause_ms: u64,
    /// How far in the future a rate-limited post is rescheduled, seconds
    defer_secs: u64,
}

impl SocialRetryPolicy {
    /// Creates a policy with explicit knobs.
    pub fn new(max_retries: usize, pause: Duration, defer: Duration) -> Self {
        Self {
            max_retries,
            pause_ms: pause.as_millis() as u64,
            defer_secs: defer.as_secs(),
        }
    }

    /// Fixed-interval retry iterator for use with `tokio_retry2::Retry`.
    pub fn strategy(&self) -> std::iter::Take<FixedInterval> {
        FixedInterval::from_millis(self.pause_ms).take(self.max_retries)
    }

    /// Deferral horizon for rate-limited posts.
    pub fn defer_interval(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.defer_secs as i64)
    }

    /// When a rate-limited post should be attempted again.
    pub fn defer_until(&self, now: chrono::DateTime<chrono::Utc>) -> chrono::DateTime<chrono::Utc> {
        now + self.defer_interval()
    }
}

impl Default for SocialRetryPolicy {
    /// Two retries with a 2 second pause; rate-limited posts come back
    /// roughly an hour later.
    fn default() -> Self {
        Self::new(2, Duration::from_secs(2), Duration::from_secs(3600))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_matches_vendor_rules() {
        let policy = SocialRetryPolicy::default();
        assert_eq!(*policy.max_retries(), 2);
        assert_eq!(*policy.pause_ms(), 2000);
        assert_eq!(*policy.defer_secs(), 3600);
    }

    #[test]
    fn strategy_yields_exactly_max_retries_pauses() {
        let policy = SocialRetryPolicy::default();
        let pauses: Vec<Duration> = policy.strategy().collect();
        assert_eq!(pauses.len(), 2);
        assert!(pauses.iter().all(|p| *p == Duration::from_secs(2)));
    }

    #[test]
    fn defer_until_is_an_hour_out() {
        let policy = SocialRetryPolicy::default();
        let now = chrono::Utc::now();
        let retry_at = policy.defer_until(now);
        assert_eq!(retry_at - now, chrono::Duration::hours(1));
    }
}
