//! Wire types for the content host REST API.

use marquee_core::ArticleDraft;
use serde::{Deserialize, Serialize};

/// Article creation payload.
#[derive(Debug, Clone, Serialize)]
pub struct ArticlePayload {
    /// Headline
    pub title: String,
    /// Body markup
    pub body: String,
    /// Listing summary
    pub excerpt: String,
}

impl ArticlePayload {
    /// Builds the creation payload from a draft. Taxonomy and hero
    /// image go through their own endpoints after creation.
    pub fn from_draft(draft: &ArticleDraft) -> Self {
        Self {
            title: draft.title().clone(),
            body: draft.body().clone(),
            excerpt: draft.excerpt().clone(),
        }
    }
}

/// Creation response.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedArticle {
    /// Host id for the new content item
    pub id: i64,
}

/// Taxonomy assignment payload.
#[derive(Debug, Clone, Serialize)]
pub struct TaxonomyPayload {
    /// Categories to assign
    pub categories: Vec<String>,
    /// Tags to assign
    pub tags: Vec<String>,
}

/// Metadata write payload.
#[derive(Debug, Clone, Serialize)]
pub struct MetaEntry {
    /// Metadata key
    pub key: String,
    /// Metadata value
    pub value: String,
}

/// Metadata read response.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaValue {
    /// Stored value, if the key exists
    pub value: Option<String>,
}
