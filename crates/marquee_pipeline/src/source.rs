//! The metadata seam the selection strategies run against.
//!
//! Strategies express what they want as a [`DiscoverQuery`]; the vendor
//! client translates that into its own filter params. Tests substitute
//! an in-memory source.

use chrono::NaiveDate;
use marquee_core::{MediaDetails, MediaItem, MediaKey, MediaType, Platform};
use marquee_error::MarqueeResult;
use marquee_providers::tmdb::TmdbClient;
use typed_builder::TypedBuilder;

/// Ranking applied by the vendor to discovery results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiscoverSort {
    /// Most popular first
    #[default]
    Popularity,
    /// Highest rated first
    Rating,
}

/// A vendor-neutral discovery query.
#[derive(Debug, Clone, PartialEq, TypedBuilder)]
pub struct DiscoverQuery {
    /// Movie or TV
    pub media_type: MediaType,
    /// Platforms the results must be available on; empty means no
    /// availability filter
    #[builder(default)]
    pub platforms: Vec<Platform>,
    /// Earliest release date, inclusive
    #[builder(default)]
    pub released_after: Option<NaiveDate>,
    /// Latest release date, inclusive
    #[builder(default)]
    pub released_before: Option<NaiveDate>,
    /// Minimum average rating
    #[builder(default)]
    pub min_vote_average: Option<f64>,
    /// Minimum vote count, to keep ratings meaningful
    #[builder(default)]
    pub min_vote_count: Option<u64>,
    /// Result ordering
    #[builder(default)]
    pub sort: DiscoverSort,
}

/// Read-only source of media candidates and detail expansions.
#[async_trait::async_trait]
pub trait MetadataSource: Send + Sync {
    /// Run a discovery query.
    async fn discover(&self, query: &DiscoverQuery) -> MarqueeResult<Vec<MediaItem>>;

    /// Trending items for the trailing week, all media types.
    async fn trending(&self) -> MarqueeResult<Vec<MediaItem>>;

    /// One item by identity.
    async fn lookup(&self, key: MediaKey) -> MarqueeResult<MediaItem>;

    /// Detail expansions for one item.
    async fn details(&self, key: MediaKey) -> MarqueeResult<MediaDetails>;

    /// Platforms carrying the item in the configured region.
    async fn platforms(&self, key: MediaKey) -> MarqueeResult<Vec<Platform>>;
}

fn vendor_params(query: &DiscoverQuery) -> Vec<(&'static str, String)> {
    let mut params: Vec<(&'static str, String)> = Vec::new();

    params.push((
        "sort_by",
        match query.sort {
            DiscoverSort::Popularity => "popularity.desc".to_string(),
            DiscoverSort::Rating => "vote_average.desc".to_string(),
        },
    ));

    if !query.platforms.is_empty() {
        let filter = Platform::provider_filter(&query.platforms);
        if !filter.is_empty() {
            params.push(("with_watch_providers", filter));
            params.push(("watch_region", "US".to_string()));
            params.push(("with_watch_monetization_types", "flatrate".to_string()));
        }
    }

    let (after_key, before_key) = match query.media_type {
        MediaType::Movie => ("primary_release_date.gte", "primary_release_date.lte"),
        MediaType::Tv => ("first_air_date.gte", "first_air_date.lte"),
    };
    if let Some(after) = query.released_after {
        params.push((after_key, after.format("%Y-%m-%d").to_string()));
    }
    if let Some(before) = query.released_before {
        params.push((before_key, before.format("%Y-%m-%d").to_string()));
    }

    if let Some(min) = query.min_vote_average {
        params.push(("vote_average.gte", min.to_string()));
    }
    if let Some(min) = query.min_vote_count {
        params.push(("vote_count.gte", min.to_string()));
    }

    params
}

#[async_trait::async_trait]
impl MetadataSource for TmdbClient {
    async fn discover(&self, query: &DiscoverQuery) -> MarqueeResult<Vec<MediaItem>> {
        let params = vendor_params(query);
        let items = match query.media_type {
            MediaType::Movie => self.discover_movies(&params).await?,
            MediaType::Tv => self.discover_tv(&params).await?,
        };
        Ok(items)
    }

    async fn trending(&self) -> MarqueeResult<Vec<MediaItem>> {
        Ok(self.trending_week().await?)
    }

    async fn lookup(&self, key: MediaKey) -> MarqueeResult<MediaItem> {
        Ok(TmdbClient::lookup(self, key).await?)
    }

    async fn details(&self, key: MediaKey) -> MarqueeResult<MediaDetails> {
        Ok(TmdbClient::details(self, key).await?)
    }

    async fn platforms(&self, key: MediaKey) -> MarqueeResult<Vec<Platform>> {
        Ok(self.watch_platforms(key).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_translates_to_vendor_params() {
        let query = DiscoverQuery::builder()
            .media_type(MediaType::Movie)
            .platforms(vec![Platform::Netflix, Platform::Hulu])
            .released_after(NaiveDate::from_ymd_opt(2026, 8, 16))
            .min_vote_count(Some(50))
            .build();

        let params = vendor_params(&query);
        assert!(params.contains(&("sort_by", "popularity.desc".to_string())));
        assert!(params.contains(&("with_watch_providers", "8|15".to_string())));
        assert!(params.contains(&("primary_release_date.gte", "2026-08-16".to_string())));
        assert!(params.contains(&("vote_count.gte", "50".to_string())));
    }

    #[test]
    fn tv_query_uses_air_date_keys() {
        let query = DiscoverQuery::builder()
            .media_type(MediaType::Tv)
            .released_before(NaiveDate::from_ymd_opt(2026, 1, 1))
            .sort(DiscoverSort::Rating)
            .build();

        let params = vendor_params(&query);
        assert!(params.contains(&("sort_by", "vote_average.desc".to_string())));
        assert!(params.contains(&("first_air_date.lte", "2026-01-01".to_string())));
        assert!(!params.iter().any(|(k, _)| *k == "with_watch_providers"));
    }
}
