//! Client for page feed publishing.
//!
//! Transport failures and 5xx responses are retried on a short fixed
//! interval. A throttling code stops the retry loop and defers the post
//! by the policy's horizon; a duplicate-content refusal counts as the
//! post already existing.

use crate::facebook::dto::{
    FeedPostRequest, FeedPostResponse, GraphErrorClass, GraphErrorEnvelope,
};
use chrono::{DateTime, Utc};
use marquee_core::{SocialPost, SocialPostOutcome, SocialPoster};
use marquee_error::{ConfigError, MarqueeResult, ProviderError, ProviderErrorKind};
use marquee_rate_limit::SocialRetryPolicy;
use reqwest::{Client, StatusCode};
use tokio_retry2::{Retry, RetryError};
use tracing::{debug, error, info, instrument, warn};

const PROVIDER: &str = "facebook";
const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v19.0";

/// Outcome of a single wire attempt, before the retry policy is applied.
#[derive(Debug, PartialEq, Eq)]
enum Attempt {
    Created(String),
    Duplicate,
    RateLimited,
}

/// Classify a feed-post response. Transport never reaches here; 5xx is
/// transient, a 200 without a post id is a permanent failure, and the
/// vendor's throttling and duplicate codes resolve without retrying.
fn classify_response(status: StatusCode, text: &str) -> Result<Attempt, RetryError<ProviderError>> {
    if status.is_success() {
        let parsed: FeedPostResponse = serde_json::from_str(text).map_err(|e| {
            RetryError::permanent(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Malformed(e.to_string()),
            ))
        })?;
        return match parsed.id {
            Some(id) => Ok(Attempt::Created(id)),
            // A 200 without a post id is not a success.
            None => Err(RetryError::permanent(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::MissingField("id".to_string()),
            ))),
        };
    }

    if status.is_server_error() {
        warn!(status = %status, "Feed post server error, will retry");
        return Err(RetryError::transient(ProviderError::new(
            PROVIDER,
            ProviderErrorKind::Api {
                status: status.as_u16(),
                message: text.to_string(),
            },
        )));
    }

    match serde_json::from_str::<GraphErrorEnvelope>(text) {
        Ok(envelope) => match envelope.error.classify() {
            GraphErrorClass::RateLimited => {
                warn!(code = envelope.error.code, "Feed post throttled");
                Ok(Attempt::RateLimited)
            }
            GraphErrorClass::DuplicateContent => {
                debug!("Vendor refused duplicate content");
                Ok(Attempt::Duplicate)
            }
            GraphErrorClass::Other => Err(RetryError::permanent(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message: envelope.error.message,
                },
            ))),
        },
        Err(_) => Err(RetryError::permanent(ProviderError::new(
            PROVIDER,
            ProviderErrorKind::Api {
                status: status.as_u16(),
                message: text.to_string(),
            },
        ))),
    }
}

/// Map a resolved attempt to the caller-facing outcome.
fn resolve_outcome(
    attempt: Attempt,
    policy: &SocialRetryPolicy,
    now: DateTime<Utc>,
) -> SocialPostOutcome {
    match attempt {
        Attempt::Created(post_id) => {
            info!(post_id = %post_id, "Feed post created");
            SocialPostOutcome::Posted { post_id }
        }
        Attempt::Duplicate => SocialPostOutcome::Duplicate,
        Attempt::RateLimited => {
            let retry_at = policy.defer_until(now);
            info!(retry_at = %retry_at, "Feed post deferred");
            SocialPostOutcome::Deferred { retry_at }
        }
    }
}

/// Page feed publisher.
#[derive(Debug, Clone)]
pub struct FacebookClient {
    client: Client,
    page_id: String,
    access_token: String,
    base_url: String,
    policy: SocialRetryPolicy,
}

impl FacebookClient {
    /// Creates a publisher for the given page with the default policy.
    pub fn new(page_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            page_id: page_id.into(),
            access_token: access_token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            policy: SocialRetryPolicy::default(),
        }
    }

    /// Creates a publisher from `FACEBOOK_PAGE_ID` and `FACEBOOK_ACCESS_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let page_id = std::env::var("FACEBOOK_PAGE_ID")
            .map_err(|_| ConfigError::missing_env("FACEBOOK_PAGE_ID"))?;
        let access_token = std::env::var("FACEBOOK_ACCESS_TOKEN")
            .map_err(|_| ConfigError::missing_env("FACEBOOK_ACCESS_TOKEN"))?;
        Ok(Self::new(page_id, access_token))
    }

    /// Override the base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Override the retry policy.
    pub fn with_policy(mut self, policy: SocialRetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// One wire attempt. Transport failures and 5xx are transient;
    /// everything else resolves here.
    async fn attempt(&self, post: &SocialPost) -> Result<Attempt, RetryError<ProviderError>> {
        let url = format!("{}/{}/feed", self.base_url, self.page_id);
        let body = FeedPostRequest {
            message: post.message.clone(),
            link: post.link.clone(),
            access_token: self.access_token.clone(),
        };

        let response = self.client.post(&url).form(&body).send().await.map_err(|e| {
            warn!(error = ?e, "Feed post transport failure");
            RetryError::transient(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Transport(e.to_string()),
            ))
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            RetryError::transient(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Transport(e.to_string()),
            ))
        })?;

        classify_response(status, &text)
    }

    /// Publishes a post, applying the retry policy.
    ///
    /// # Errors
    ///
    /// Returns a provider error when all attempts fail on transport/5xx
    /// or the vendor rejects the post with a non-throttling code.
    #[instrument(skip(self, post), fields(provider = PROVIDER, page_id = %self.page_id))]
    pub async fn publish_post(&self, post: &SocialPost) -> Result<SocialPostOutcome, ProviderError> {
        let attempt = Retry::spawn(self.policy.strategy(), || self.attempt(post))
            .await
            .map_err(|e| {
                error!(error = %e, "Feed post failed after retries");
                e
            })?;

        Ok(resolve_outcome(attempt, &self.policy, Utc::now()))
    }
}

#[async_trait::async_trait]
impl SocialPoster for FacebookClient {
    async fn publish(&self, post: &SocialPost) -> MarqueeResult<SocialPostOutcome> {
        Ok(self.publish_post(post).await?)
    }

    fn platform(&self) -> &'static str {
        PROVIDER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn throttled_body(code: u32) -> String {
        format!(
            r#"{{"error":{{"message":"limit reached","type":"OAuthException","code":{code}}}}}"#
        )
    }

    #[test]
    fn created_post_carries_the_vendor_id() {
        let attempt = classify_response(StatusCode::OK, r#"{"id":"123_456"}"#).unwrap();
        assert_eq!(attempt, Attempt::Created("123_456".to_string()));
    }

    #[test]
    fn id_less_success_fails_without_retry() {
        let err = classify_response(StatusCode::OK, "{}").unwrap_err();
        match err {
            RetryError::Permanent(e) => {
                assert!(matches!(e.kind(), ProviderErrorKind::MissingField(field) if field == "id"));
            }
            RetryError::Transient { .. } => panic!("an id-less 200 must not be retried"),
        }
    }

    #[test]
    fn server_error_is_transient() {
        let err = classify_response(StatusCode::INTERNAL_SERVER_ERROR, "oops").unwrap_err();
        assert!(matches!(err, RetryError::Transient { .. }));
    }

    #[test]
    fn throttling_codes_stop_the_retry_loop() {
        for code in [4, 17, 32, 613] {
            let attempt =
                classify_response(StatusCode::BAD_REQUEST, &throttled_body(code)).unwrap();
            assert_eq!(attempt, Attempt::RateLimited, "code {code}");
        }
    }

    #[test]
    fn duplicate_refusal_counts_as_posted() {
        let attempt =
            classify_response(StatusCode::BAD_REQUEST, &throttled_body(506)).unwrap();
        assert_eq!(attempt, Attempt::Duplicate);
        let outcome = resolve_outcome(attempt, &SocialRetryPolicy::default(), Utc::now());
        assert_eq!(outcome, SocialPostOutcome::Duplicate);
    }

    #[test]
    fn rate_limited_attempt_defers_by_the_policy_horizon() {
        let policy = SocialRetryPolicy::default();
        let now = Utc::now();
        let outcome = resolve_outcome(Attempt::RateLimited, &policy, now);
        match outcome {
            SocialPostOutcome::Deferred { retry_at } => {
                assert_eq!(retry_at - now, chrono::Duration::hours(1));
            }
            other => panic!("expected a deferral, got {other:?}"),
        }
    }
}
