//! Client for the metadata provider API.
//!
//! Single attempt per call, no retry: a non-success status or malformed
//! body surfaces immediately as a typed error and callers tolerate
//! missing data.

use crate::tmdb::dto::{
    DetailsDto, MovieDto, PagedResults, TrendingDto, TvDto, WatchProvidersDto,
};
use marquee_core::{MediaDetails, MediaItem, MediaKey, MediaType, Platform};
use marquee_error::{ConfigError, ProviderError, ProviderErrorKind};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

const PROVIDER: &str = "tmdb";
const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Client for discovery, trending, details, search, and watch-provider
/// lookups. Treats the vendor as a read-only, eventually-stale oracle.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    client: Client,
    api_key: String,
    base_url: String,
    region: String,
}

impl TmdbClient {
    /// Creates a new metadata client.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            region: "US".to_string(),
        }
    }

    /// Creates a client from `TMDB_API_KEY`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the variable is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = std::env::var("TMDB_API_KEY")
            .map_err(|_| ConfigError::missing_env("TMDB_API_KEY"))?;
        Ok(Self::new(api_key))
    }

    /// Override the base URL (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Watch region used for availability filters.
    pub fn region(&self) -> &str {
        &self.region
    }

    #[instrument(skip(self, params), fields(provider = PROVIDER))]
    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ProviderError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(path, "Metadata request");

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|e| {
                error!(error = ?e, "Metadata request failed");
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
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Metadata API error");
            return Err(ProviderError::new(
                PROVIDER,
                ProviderErrorKind::Api {
                    status: status.as_u16(),
                    message: body,
                },
            ));
        }

        response.json().await.map_err(|e| {
            error!(error = ?e, "Failed to parse metadata response");
            ProviderError::new(PROVIDER, ProviderErrorKind::Malformed(e.to_string()))
        })
    }

    /// Discover movies with raw vendor filter params.
    pub async fn discover_movies(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<MediaItem>, ProviderError> {
        let page: PagedResults<MovieDto> = self.get("/discover/movie", params).await?;
        Ok(page.results.into_iter().map(MovieDto::into_media_item).collect())
    }

    /// Discover TV shows with raw vendor filter params.
    pub async fn discover_tv(
        &self,
        params: &[(&str, String)],
    ) -> Result<Vec<MediaItem>, ProviderError> {
        let page: PagedResults<TvDto> = self.get("/discover/tv", params).await?;
        Ok(page.results.into_iter().map(TvDto::into_media_item).collect())
    }

    /// Globally trending items for the trailing week.
    pub async fn trending_week(&self) -> Result<Vec<MediaItem>, ProviderError> {
        let page: PagedResults<TrendingDto> = self.get("/trending/all/week", &[]).await?;
        Ok(page
            .results
            .into_iter()
            .filter_map(TrendingDto::into_media_item)
            .collect())
    }

    /// Fetch one item by id as a list-shape entry.
    pub async fn lookup(&self, key: MediaKey) -> Result<MediaItem, ProviderError> {
        match key.media_type {
            MediaType::Movie => {
                let dto: MovieDto = self.get(&format!("/movie/{}", key.id), &[]).await?;
                Ok(dto.into_media_item())
            }
            MediaType::Tv => {
                let dto: TvDto = self.get(&format!("/tv/{}", key.id), &[]).await?;
                Ok(dto.into_media_item())
            }
        }
    }

    /// Details plus credits/videos expansions for one item.
    pub async fn details(&self, key: MediaKey) -> Result<MediaDetails, ProviderError> {
        let path = match key.media_type {
            MediaType::Movie => format!("/movie/{}", key.id),
            MediaType::Tv => format!("/tv/{}", key.id),
        };
        let dto: DetailsDto = self
            .get(&path, &[("append_to_response", "credits,videos".to_string())])
            .await?;
        Ok(dto.into_media_details())
    }

    /// Text search scoped to a media type.
    pub async fn search(
        &self,
        media_type: MediaType,
        text: &str,
    ) -> Result<Vec<MediaItem>, ProviderError> {
        let params = [("query", text.to_string())];
        match media_type {
            MediaType::Movie => {
                let page: PagedResults<MovieDto> = self.get("/search/movie", &params).await?;
                Ok(page.results.into_iter().map(MovieDto::into_media_item).collect())
            }
            MediaType::Tv => {
                let page: PagedResults<TvDto> = self.get("/search/tv", &params).await?;
                Ok(page.results.into_iter().map(TvDto::into_media_item).collect())
            }
        }
    }

    /// Streaming platforms carrying an item in the configured region.
    pub async fn watch_platforms(&self, key: MediaKey) -> Result<Vec<Platform>, ProviderError> {
        let path = match key.media_type {
            MediaType::Movie => format!("/movie/{}/watch/providers", key.id),
            MediaType::Tv => format!("/tv/{}/watch/providers", key.id),
        };
        let dto: WatchProvidersDto = self.get(&path, &[]).await?;

        let platforms = dto
            .results
            .get(&self.region)
            .map(|region| {
                Platform::majors()
                    .iter()
                    .copied()
                    .filter(|p| {
                        p.watch_provider_id().is_some_and(|id| {
                            region.flatrate.iter().any(|e| e.provider_id == id)
                        })
                    })
                    .collect()
            })
            .unwrap_or_default();
        Ok(platforms)
    }
}
