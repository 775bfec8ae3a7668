//! Vendor rate limiting and retry policies for Marquee.
//!
//! Three external dependencies, three sets of rules:
//! - metadata provider: single attempt, no retry
//! - text provider: paced to one call per interval, 60s cooldown on 429
//! - social provider: bounded transport retries, hour-scale deferral on
//!   vendor rate limits

mod error;
mod pacer;
mod retry;

pub use error::{RateLimitError, RateLimitErrorKind};
pub use pacer::Pacer;
pub use retry::SocialRetryPolicy;

use std::time::Duration;

/// Default pacing interval for the text provider: one call every 2 seconds.
pub const TEXT_MIN_INTERVAL: Duration = Duration::from_secs(2);

/// Default cooldown after a text-provider 429.
pub const TEXT_COOLDOWN: Duration = Duration::from_secs(60);

/// Build the default text-provider pacer.
///
/// # Errors
///
/// Never fails with the default constants; the `Result` mirrors
/// [`Pacer::new`].
pub fn text_pacer() -> Result<Pacer, RateLimitError> {
    Pacer::new(TEXT_MIN_INTERVAL, TEXT_COOLDOWN)
}
