//! Media item types returned by the metadata provider.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Movie or television.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MediaType {
    Movie,
    Tv,
}

/// Identity of a media item, used for deduplication across selection
/// strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MediaKey {
    /// Movie or TV
    pub media_type: MediaType,
    /// Vendor id
    pub id: u64,
}

/// A candidate title from discovery, trending, or search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct MediaItem {
    media_type: MediaType,
    id: u64,
    title: String,
    overview: String,
    release_date: Option<NaiveDate>,
    popularity: f64,
    vote_average: f64,
    vote_count: u64,
    genre_ids: Vec<u64>,
    poster_path: Option<String>,
}

impl MediaItem {
    /// Creates a new media item.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        media_type: MediaType,
        id: u64,
        title: impl Into<String>,
        overview: impl Into<String>,
        release_date: Option<NaiveDate>,
        popularity: f64,
        vote_average: f64,
        vote_count: u64,
        genre_ids: Vec<u64>,
        poster_path: Option<String>,
    ) -> Self {
        Self {
            media_type,
            id,
            title: title.into(),
            overview: overview.into(),
            release_date,
            popularity,
            vote_average,
            vote_count,
            genre_ids,
            poster_path,
        }
    }

    /// Identity key for deduplication.
    pub fn key(&self) -> MediaKey {
        MediaKey {
            media_type: self.media_type,
            id: self.id,
        }
    }

    /// Release year if a release date is known.
    pub fn release_year(&self) -> Option<i32> {
        use chrono::Datelike;
        self.release_date.map(|d| d.year())
    }
}

/// Detail expansions for a single media item: credits, trailers, images.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_getters::Getters)]
pub struct MediaDetails {
    /// Top-billed cast names
    cast: Vec<String>,
    /// Director or creator names
    directors: Vec<String>,
    /// Trailer URL when one is available
    trailer_url: Option<String>,
    /// Backdrop image path for the hero image
    backdrop_path: Option<String>,
    /// Genre names resolved from ids
    genres: Vec<String>,
    /// Runtime in minutes for movies, per-episode for TV
    runtime_minutes: Option<u32>,
}

impl MediaDetails {
    /// Creates detail expansions.
    pub fn new(
        cast: Vec<String>,
        directors: Vec<String>,
        trailer_url: Option<String>,
        backdrop_path: Option<String>,
        genres: Vec<String>,
        runtime_minutes: Option<u32>,
    ) -> Self {
        Self {
            cast,
            directors,
            trailer_url,
            backdrop_path,
            genres,
            runtime_minutes,
        }
    }
}
