//! Trait seams for external collaborators.
//!
//! Provider crates supply the real reqwest-backed implementations; tests
//! substitute mocks. The orchestrators only ever see these traits.

use crate::{ArticleDraft, TextRequest, TextResponse};
use chrono::{DateTime, Utc};
use marquee_error::MarqueeResult;

/// Identifier for a content item on the host platform.
pub type ContentId = i64;

/// A text-generation backend.
#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generate text for the given request.
    async fn generate(&self, req: &TextRequest) -> MarqueeResult<TextResponse>;

    /// Provider name for logging and tracing.
    fn provider_name(&self) -> &'static str;

    /// Model identifier in use.
    fn model_name(&self) -> &str;
}

/// The host content platform: create articles, attach media, assign
/// taxonomy, and read/write key-value metadata on a content item.
#[async_trait::async_trait]
pub trait ContentHost: Send + Sync {
    /// Create a content item and return its id.
    async fn create_article(&self, draft: &ArticleDraft) -> MarqueeResult<ContentId>;

    /// Attach a hero image to a content item.
    async fn attach_hero_image(&self, content_id: ContentId, image_ref: &str)
    -> MarqueeResult<()>;

    /// Assign categories and tags to a content item.
    async fn assign_taxonomy(
        &self,
        content_id: ContentId,
        categories: &[String],
        tags: &[String],
    ) -> MarqueeResult<()>;

    /// Read a metadata value from a content item.
    async fn read_meta(&self, content_id: ContentId, key: &str) -> MarqueeResult<Option<String>>;

    /// Write a metadata value on a content item.
    async fn write_meta(&self, content_id: ContentId, key: &str, value: &str)
    -> MarqueeResult<()>;
}

/// A social post ready to publish: a message plus the article link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialPost {
    /// Post message or caption
    pub message: String,
    /// Link back to the published article
    pub link: String,
}

/// Outcome of a social publish attempt after the retry policy ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocialPostOutcome {
    /// The vendor created a post.
    Posted {
        /// Vendor's id for the created post
        post_id: String,
    },
    /// The vendor rejected the post as duplicate content. The target
    /// state ("shared") is considered achieved.
    Duplicate,
    /// The vendor rate-limited us; retry no earlier than `retry_at`.
    Deferred {
        /// Earliest time a new attempt should run
        retry_at: DateTime<Utc>,
    },
}

/// A social platform publisher. One-way: no read-back verification
/// beyond the immediate response.
#[async_trait::async_trait]
pub trait SocialPoster: Send + Sync {
    /// Publish a post, applying the vendor retry policy internally.
    async fn publish(&self, post: &SocialPost) -> MarqueeResult<SocialPostOutcome>;

    /// Platform key for ledger records, e.g. "facebook".
    fn platform(&self) -> &'static str;
}
