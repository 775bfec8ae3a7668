//! Data transfer objects for the metadata provider API.

use chrono::NaiveDate;
use marquee_core::{MediaDetails, MediaItem, MediaType};
use serde::Deserialize;

/// A page of results from discovery, trending, or search endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct PagedResults<T> {
    #[serde(default)]
    pub page: u32,
    pub results: Vec<T>,
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default)]
    pub total_results: u32,
}

/// A movie in list results.
#[derive(Debug, Clone, Deserialize)]
pub struct MovieDto {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A TV show in list results.
#[derive(Debug, Clone, Deserialize)]
pub struct TvDto {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A trending entry: like a movie/TV entry plus a media_type tag.
#[derive(Debug, Clone, Deserialize)]
pub struct TrendingDto {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub popularity: f64,
    #[serde(default)]
    pub vote_average: f64,
    #[serde(default)]
    pub vote_count: u64,
    #[serde(default)]
    pub genre_ids: Vec<u64>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// A genre entry in details responses.
#[derive(Debug, Clone, Deserialize)]
pub struct GenreDto {
    pub id: u64,
    pub name: String,
}

/// Cast member in the credits expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct CastDto {
    pub name: String,
    #[serde(default)]
    pub order: u32,
}

/// Crew member in the credits expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct CrewDto {
    pub name: String,
    #[serde(default)]
    pub job: String,
}

/// Credits expansion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreditsDto {
    #[serde(default)]
    pub cast: Vec<CastDto>,
    #[serde(default)]
    pub crew: Vec<CrewDto>,
}

/// A video entry in the videos expansion.
#[derive(Debug, Clone, Deserialize)]
pub struct VideoDto {
    pub site: String,
    #[serde(rename = "type")]
    pub video_type: String,
    pub key: String,
}

/// Videos expansion.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VideosDto {
    #[serde(default)]
    pub results: Vec<VideoDto>,
}

/// Details response with appended expansions.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailsDto {
    pub id: u64,
    #[serde(default)]
    pub genres: Vec<GenreDto>,
    #[serde(default)]
    pub runtime: Option<u32>,
    #[serde(default)]
    pub episode_run_time: Vec<u32>,
    #[serde(default)]
    pub backdrop_path: Option<String>,
    #[serde(default)]
    pub credits: CreditsDto,
    #[serde(default)]
    pub videos: VideosDto,
}

/// A watch-provider listing for one region.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegionProvidersDto {
    #[serde(default)]
    pub flatrate: Vec<ProviderEntryDto>,
}

/// One provider entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderEntryDto {
    pub provider_id: u32,
    #[serde(default)]
    pub provider_name: String,
}

/// Watch-providers response keyed by region.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchProvidersDto {
    #[serde(default)]
    pub results: std::collections::HashMap<String, RegionProvidersDto>,
}

fn parse_date(raw: Option<&str>) -> Option<NaiveDate> {
    raw.and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
}

impl MovieDto {
    /// Convert to the domain media item.
    pub fn into_media_item(self) -> MediaItem {
        MediaItem::new(
            MediaType::Movie,
            self.id,
            self.title,
            self.overview,
            parse_date(self.release_date.as_deref()),
            self.popularity,
            self.vote_average,
            self.vote_count,
            self.genre_ids,
            self.poster_path,
        )
    }
}

impl TvDto {
    /// Convert to the domain media item.
    pub fn into_media_item(self) -> MediaItem {
        MediaItem::new(
            MediaType::Tv,
            self.id,
            self.name,
            self.overview,
            parse_date(self.first_air_date.as_deref()),
            self.popularity,
            self.vote_average,
            self.vote_count,
            self.genre_ids,
            self.poster_path,
        )
    }
}

impl TrendingDto {
    /// Convert to the domain media item, when the entry is a movie or
    /// TV show (the trending feed also carries people).
    pub fn into_media_item(self) -> Option<MediaItem> {
        let media_type = match self.media_type.as_deref() {
            Some("movie") => MediaType::Movie,
            Some("tv") => MediaType::Tv,
            _ => return None,
        };
        let title = self.title.or(self.name)?;
        let date = match media_type {
            MediaType::Movie => self.release_date,
            MediaType::Tv => self.first_air_date,
        };
        Some(MediaItem::new(
            media_type,
            self.id,
            title,
            self.overview,
            parse_date(date.as_deref()),
            self.popularity,
            self.vote_average,
            self.vote_count,
            self.genre_ids,
            self.poster_path,
        ))
    }
}

impl DetailsDto {
    /// Convert expansions to the domain details type.
    pub fn into_media_details(self) -> MediaDetails {
        let mut cast: Vec<CastDto> = self.credits.cast;
        cast.sort_by_key(|c| c.order);
        let cast_names: Vec<String> = cast.into_iter().take(5).map(|c| c.name).collect();

        let directors: Vec<String> = self
            .credits
            .crew
            .into_iter()
            .filter(|c| c.job == "Director" || c.job == "Creator")
            .map(|c| c.name)
            .collect();

        let trailer_url = self
            .videos
            .results
            .into_iter()
            .find(|v| v.site == "YouTube" && v.video_type == "Trailer")
            .map(|v| format!("https://www.youtube.com/watch?v={}", v.key));

        let runtime = self
            .runtime
            .or_else(|| self.episode_run_time.first().copied());

        MediaDetails::new(
            cast_names,
            directors,
            trailer_url,
            self.backdrop_path,
            self.genres.into_iter().map(|g| g.name).collect(),
            runtime,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trending_person_entries_are_skipped() {
        let dto = TrendingDto {
            id: 1,
            media_type: Some("person".to_string()),
            title: None,
            name: Some("Somebody".to_string()),
            overview: String::new(),
            release_date: None,
            first_air_date: None,
            popularity: 1.0,
            vote_average: 0.0,
            vote_count: 0,
            genre_ids: vec![],
            poster_path: None,
        };
        assert!(dto.into_media_item().is_none());
    }

    #[test]
    fn details_pick_youtube_trailer_and_top_cast() {
        let dto = DetailsDto {
            id: 7,
            genres: vec![GenreDto { id: 18, name: "Drama".to_string() }],
            runtime: Some(121),
            episode_run_time: vec![],
            backdrop_path: Some("/b.jpg".to_string()),
            credits: CreditsDto {
                cast: vec![
                    CastDto { name: "Second".to_string(), order: 1 },
                    CastDto { name: "First".to_string(), order: 0 },
                ],
                crew: vec![CrewDto { name: "Director Name".to_string(), job: "Director".to_string() }],
            },
            videos: VideosDto {
                results: vec![
                    VideoDto {
                        site: "Vimeo".to_string(),
                        video_type: "Trailer".to_string(),
                        key: "x".to_string(),
                    },
                    VideoDto {
                        site: "YouTube".to_string(),
                        video_type: "Trailer".to_string(),
                        key: "abc123".to_string(),
                    },
                ],
            },
        };

        let details = dto.into_media_details();
        assert_eq!(details.cast()[0], "First");
        assert_eq!(details.directors(), &["Director Name".to_string()]);
        assert_eq!(
            details.trailer_url().as_deref(),
            Some("https://www.youtube.com/watch?v=abc123")
        );
        assert_eq!(details.genres(), &["Drama".to_string()]);
    }
}
