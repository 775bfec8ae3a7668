//! In-memory content host for tests and dry runs.

use marquee_core::{ArticleDraft, ContentHost, ContentId};
use marquee_error::MarqueeResult;
use parking_lot::Mutex;
use std::collections::HashMap;

/// A stored article with its taxonomy, hero image, and metadata.
#[derive(Debug, Clone, Default)]
pub struct StoredArticle {
    /// The draft as submitted
    pub draft: Option<ArticleDraft>,
    /// Hero image reference, once attached
    pub hero_image: Option<String>,
    /// Assigned categories
    pub categories: Vec<String>,
    /// Assigned tags
    pub tags: Vec<String>,
    /// Key-value metadata
    pub meta: HashMap<String, String>,
}

/// Content host backed by process memory. Ids are assigned sequentially
/// starting at 1.
#[derive(Debug, Default)]
pub struct MemoryHost {
    articles: Mutex<HashMap<ContentId, StoredArticle>>,
    next_id: Mutex<ContentId>,
}

impl MemoryHost {
    /// Creates an empty host.
    pub fn new() -> Self {
        Self {
            articles: Mutex::new(HashMap::new()),
            next_id: Mutex::new(1),
        }
    }

    /// Number of stored articles.
    pub fn article_count(&self) -> usize {
        self.articles.lock().len()
    }

    /// Snapshot of a stored article.
    pub fn article(&self, content_id: ContentId) -> Option<StoredArticle> {
        self.articles.lock().get(&content_id).cloned()
    }
}

#[async_trait::async_trait]
impl ContentHost for MemoryHost {
    async fn create_article(&self, draft: &ArticleDraft) -> MarqueeResult<ContentId> {
        let id = {
            let mut next = self.next_id.lock();
            let id = *next;
            *next += 1;
            id
        };
        self.articles.lock().insert(
            id,
            StoredArticle {
                draft: Some(draft.clone()),
                ..StoredArticle::default()
            },
        );
        Ok(id)
    }

    async fn attach_hero_image(&self, content_id: ContentId, image_ref: &str)
    -> MarqueeResult<()> {
        if let Some(article) = self.articles.lock().get_mut(&content_id) {
            article.hero_image = Some(image_ref.to_string());
        }
        Ok(())
    }

    async fn assign_taxonomy(
        &self,
        content_id: ContentId,
        categories: &[String],
        tags: &[String],
    ) -> MarqueeResult<()> {
        if let Some(article) = self.articles.lock().get_mut(&content_id) {
            article.categories = categories.to_vec();
            article.tags = tags.to_vec();
        }
        Ok(())
    }

    async fn read_meta(&self, content_id: ContentId, key: &str) -> MarqueeResult<Option<String>> {
        Ok(self
            .articles
            .lock()
            .get(&content_id)
            .and_then(|a| a.meta.get(key).cloned()))
    }

    async fn write_meta(&self, content_id: ContentId, key: &str, value: &str)
    -> MarqueeResult<()> {
        if let Some(article) = self.articles.lock().get_mut(&content_id) {
            article.meta.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_and_enrich_article() {
        let host = MemoryHost::new();
        let draft = ArticleDraft::builder()
            .title("What's New This Week")
            .body("body")
            .excerpt("excerpt")
            .build()
            .unwrap();

        let id = host.create_article(&draft).await.unwrap();
        assert_eq!(id, 1);

        host.attach_hero_image(id, "/images/hero.jpg").await.unwrap();
        host.assign_taxonomy(id, &["Streaming".to_string()], &["netflix".to_string()])
            .await
            .unwrap();
        host.write_meta(id, "shared_facebook", "1").await.unwrap();

        let stored = host.article(id).unwrap();
        assert_eq!(stored.hero_image.as_deref(), Some("/images/hero.jpg"));
        assert_eq!(stored.categories, vec!["Streaming".to_string()]);
        assert_eq!(
            host.read_meta(id, "shared_facebook").await.unwrap().as_deref(),
            Some("1")
        );
        assert!(host.read_meta(id, "absent").await.unwrap().is_none());
    }
}
