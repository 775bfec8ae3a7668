//! Assembled article payloads bound for the content host.

use serde::{Deserialize, Serialize};

/// The final content payload produced by a generation run.
#[derive(
    Debug,
    Clone,
    PartialEq,
    Serialize,
    Deserialize,
    derive_getters::Getters,
    derive_builder::Builder,
)]
#[builder(setter(into))]
pub struct ArticleDraft {
    /// Article headline
    title: String,
    /// Article body (markup handled by the host)
    body: String,
    /// Short summary for listings
    excerpt: String,
    /// Category assignments
    #[builder(default)]
    categories: Vec<String>,
    /// Tag assignments
    #[builder(default)]
    tags: Vec<String>,
    /// Hero image reference (vendor image path or URL)
    #[builder(default)]
    hero_image: Option<String>,
}

impl ArticleDraft {
    /// Returns a builder for constructing an ArticleDraft.
    pub fn builder() -> ArticleDraftBuilder {
        ArticleDraftBuilder::default()
    }
}

/// Derived statistics included in roundup article payloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct WindowStats {
    /// Average vote rating across the selected items
    average_rating: f64,
    /// Most frequent genre names, best first
    top_genres: Vec<String>,
    /// Number of items aggregated
    item_count: usize,
}

impl WindowStats {
    /// Creates window statistics.
    pub fn new(average_rating: f64, top_genres: Vec<String>, item_count: usize) -> Self {
        Self {
            average_rating,
            top_genres,
            item_count,
        }
    }
}
