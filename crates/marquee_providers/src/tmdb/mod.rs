//! Metadata provider integration (TMDB-style API).

mod client;
mod dto;

pub use client::TmdbClient;
pub use dto::{
    CastDto, CreditsDto, CrewDto, DetailsDto, GenreDto, MovieDto, PagedResults,
    ProviderEntryDto, RegionProvidersDto, TrendingDto, TvDto, VideoDto, VideosDto,
    WatchProvidersDto,
};
