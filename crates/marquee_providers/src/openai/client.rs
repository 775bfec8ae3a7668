//! Client for the chat-completions text provider.
//!
//! Calls are paced to one per interval process-wide. A vendor 429 opens
//! the pacer's cooldown window and surfaces a rate-limited error for the
//! current attempt; there is no in-process auto-retry.

use crate::openai::{ChatResponse, conversions};
use marquee_core::{TextGenerator, TextRequest, TextResponse};
use marquee_error::{ConfigError, MarqueeResult, ProviderError, ProviderErrorKind};
use marquee_rate_limit::{Pacer, RateLimitErrorKind, text_pacer};
use reqwest::Client;
use std::sync::Arc;
use tracing::{debug, error, instrument};

const PROVIDER: &str = "openai";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Paced client for a chat-completions API.
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    pacer: Arc<Pacer>,
}

impl OpenAiClient {
    /// Creates a new text-provider client with the default pacer.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the pacer cannot be built.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ConfigError> {
        let pacer = text_pacer().map_err(|e| ConfigError::new(e.to_string()))?;
        Ok(Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            pacer: Arc::new(pacer),
        })
    }

    /// Creates a client from `OPENAI_API_KEY` and optional `OPENAI_MODEL`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the key is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("OPENAI_API_KEY")
            .map_err(|_| ConfigError::missing_env("OPENAI_API_KEY"))?;
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        Self::new(api_key, model)
    }

    /// Override the base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Generates a response from the API.
    ///
    /// # Errors
    ///
    /// Returns `RateLimited` when the pacer is cooling down or the
    /// vendor returns 429; other failures map to the provider taxonomy.
    #[instrument(skip(self, req), fields(provider = PROVIDER, model = %self.model))]
    pub async fn generate_text(&self, req: &TextRequest) -> Result<TextResponse, ProviderError> {
        if let Err(e) = self.pacer.acquire().await {
            let cooldown_secs = match e.kind() {
                RateLimitErrorKind::CoolingDown { remaining_secs } => *remaining_secs,
                _ => self.pacer.cooldown().as_secs(),
            };
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::RateLimited { cooldown_secs },
            ));
        }

        let chat_request = conversions::to_chat_request(req, &self.model)?;
        debug!(message_count = chat_request.messages().len(), "Sending text request");

        let response = self
            .client
            .post(&self.base_url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Text request failed");
                ProviderError::new(PROVIDER, ProviderErrorKind::Transport(e.to_string()))
            })?;

        let status = response.status();
        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            self.pacer.begin_cooldown();
            error!("Text provider rate limited; cooldown opened");
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::RateLimited {
                    cooldown_secs: self.pacer.cooldown().as_secs(),
                },
            ));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Text API error");
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message: body,
                },
            ));
        }

        let chat_response: ChatResponse = response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse text response");
            ProviderError::new(PROVIDER, ProviderErrorKind::Malformed(e.to_string()))
        })?;

        conversions::from_chat_response(&chat_response)
    }
}

#[async_trait::async_trait]
impl TextGenerator for OpenAiClient {
    async fn generate(&self, req: &TextRequest) -> MarqueeResult<TextResponse> {
        Ok(self.generate_text(req).await?)
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
