//! REST client for the content host.
//!
//! Single-attempt calls with bearer auth. Separate endpoints for article
//! creation, hero images, taxonomy, and per-item metadata so that image
//! or taxonomy failures after a successful create can be tolerated by
//! the caller without losing the article.

use crate::host::dto::{
    ArticlePayload, CreatedArticle, MetaEntry, MetaValue, TaxonomyPayload,
};
use marquee_core::{ArticleDraft, ContentHost, ContentId};
use marquee_error::{ConfigError, MarqueeResult, ProviderError, ProviderErrorKind};
use reqwest::Client;
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "host";

/// REST-backed content host.
#[derive(Debug, Clone)]
pub struct RestHost {
    client: Client,
    base_url: String,
    token: String,
}

impl RestHost {
    /// Creates a host client against `base_url` with a bearer token.
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            token: token.into(),
        }
    }

    /// Creates a host client from `HOST_BASE_URL` and `HOST_API_TOKEN`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if either variable is unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let base_url = std::env::var("HOST_BASE_URL")
            .map_err(|_| ConfigError::missing_env("HOST_BASE_URL"))?;
        let token = std::env::var("HOST_API_TOKEN")
            .map_err(|_| ConfigError::missing_env("HOST_API_TOKEN"))?;
        Ok(Self::new(base_url, token))
    }

    async fn post<T, R>(&self, path: &str, body: &T) -> Result<R, ProviderError>
    where
        T: serde::Serialize + ?Sized,
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(path, error = ?e, "Host request failed");
                ProviderError::new(PROVIDER, ProviderErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(path, status = %status, "Host API error");
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message,
                },
            ));
        }

        response.json().await.map_err(|e| {
            ProviderError::new(PROVIDER, ProviderErrorKind::Malformed(e.to_string()))
        })
    }

    async fn get<R>(&self, path: &str) -> Result<R, ProviderError>
    where
        R: serde::de::DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| {
                ProviderError::new(PROVIDER, ProviderErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::NotFound(path.to_string()),
            ));
        }
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message,
                },
            ));
        }

        response.json().await.map_err(|e| {
            ProviderError::new(PROVIDER, ProviderErrorKind::Malformed(e.to_string()))
        })
    }
}

#[async_trait::async_trait]
impl ContentHost for RestHost {
    #[instrument(skip(self, draft), fields(title = %draft.title()))]
    async fn create_article(&self, draft: &ArticleDraft) -> MarqueeResult<ContentId> {
        let payload = ArticlePayload::from_draft(draft);
        let created: CreatedArticle = self.post("/api/articles", &payload).await?;
        info!(content_id = created.id, "Article created on host");
        Ok(created.id)
    }

    async fn attach_hero_image(&self, content_id: ContentId, image_ref: &str)
    -> MarqueeResult<()> {
        debug!(content_id, image_ref, "Attaching hero image");
        let _: serde_json::Value = self
            .post(
                &format!("/api/articles/{content_id}/hero"),
                &serde_json::json!({ "image": image_ref }),
            )
            .await?;
        Ok(())
    }

    async fn assign_taxonomy(
        &self,
        content_id: ContentId,
        categories: &[String],
        tags: &[String],
    ) -> MarqueeResult<()> {
        let payload = TaxonomyPayload {
            categories: categories.to_vec(),
            tags: tags.to_vec(),
        };
        let _: serde_json::Value = self
            .post(&format!("/api/articles/{content_id}/taxonomy"), &payload)
            .await?;
        Ok(())
    }

    async fn read_meta(&self, content_id: ContentId, key: &str) -> MarqueeResult<Option<String>> {
        match self
            .get::<MetaValue>(&format!("/api/articles/{content_id}/meta/{key}"))
            .await
        {
            Ok(meta) => Ok(meta.value),
            Err(e) if matches!(e.kind(), ProviderErrorKind::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn write_meta(&self, content_id: ContentId, key: &str, value: &str)
    -> MarqueeResult<()> {
        let entry = MetaEntry {
            key: key.to_string(),
            value: value.to_string(),
        };
        let _: serde_json::Value = self
            .post(&format!("/api/articles/{content_id}/meta"), &entry)
            .await?;
        Ok(())
    }
}
