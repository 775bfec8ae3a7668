//! Per-kind candidate selection.
//!
//! Each generator kind has its own idea of a good candidate set. All
//! strategies answer with a [`Selection`], keeping movie and TV
//! sub-lists separate so templates can render them independently.

use crate::params::{GenerationParameters, SpotlightStrategy};
use crate::source::{DiscoverQuery, DiscoverSort, MetadataSource};
use chrono::{Datelike, Duration, NaiveDate};
use marquee_core::{GeneratorKind, MediaItem, MediaKey, MediaType, Platform, WindowStats};
use marquee_error::{MarqueeResult, PipelineError, PipelineErrorKind};
use std::collections::BTreeSet;
use tracing::{debug, instrument, warn};

/// Weekly roundups look back this many days.
const WEEKLY_LOOKBACK_DAYS: i64 = 14;
/// Trending excludes items older than this.
const TRENDING_MAX_AGE_YEARS: i32 = 5;
/// Classics must predate this many years ago.
const CLASSIC_AGE_YEARS: i32 = 25;
/// Popularity ceiling for hidden gems.
const HIDDEN_GEM_POPULARITY_CEILING: f64 = 40.0;
/// How many trending entries to scan before giving up on availability.
const TRENDING_SCAN_LIMIT: usize = 40;

/// Candidate items chosen by a strategy, split by media type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Selected movies, best first
    pub movies: Vec<MediaItem>,
    /// Selected TV shows, best first
    pub tv: Vec<MediaItem>,
}

impl Selection {
    /// All selected items, movies first.
    pub fn items(&self) -> impl Iterator<Item = &MediaItem> {
        self.movies.iter().chain(self.tv.iter())
    }

    /// Identity keys of all selected items.
    pub fn keys(&self) -> Vec<MediaKey> {
        self.items().map(MediaItem::key).collect()
    }

    /// Total item count across both sub-lists.
    pub fn len(&self) -> usize {
        self.movies.len() + self.tv.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.movies.is_empty() && self.tv.is_empty()
    }
}

/// Platforms a roundup should filter by. `All` expands to the majors.
fn availability(platform: Platform) -> Vec<Platform> {
    match platform {
        Platform::All => Platform::majors().to_vec(),
        other => vec![other],
    }
}

/// Dispatch to the strategy for `kind`.
///
/// # Errors
///
/// Returns `NoCandidates` when the strategy finds nothing usable.
#[instrument(skip(source, params), fields(kind = %kind, platform = %platform))]
pub async fn select_candidates(
    source: &dyn MetadataSource,
    kind: GeneratorKind,
    platform: Platform,
    params: &GenerationParameters,
    today: NaiveDate,
) -> MarqueeResult<Selection> {
    let selection = match kind {
        GeneratorKind::Weekly => select_weekly(source, platform, params, today).await?,
        GeneratorKind::Trending => select_trending(source, platform, params, today).await?,
        GeneratorKind::Spotlight => select_spotlight(source, platform, params, today).await?,
        GeneratorKind::Monthly | GeneratorKind::Top10 | GeneratorKind::Seasonal => {
            select_window(source, kind, platform, params, today).await?
        }
    };

    if selection.is_empty() {
        return Err(PipelineError::new(PipelineErrorKind::NoCandidates(format!(
            "{kind} selection for {platform} produced no items"
        )))
        .into());
    }
    debug!(movies = selection.movies.len(), tv = selection.tv.len(), "Candidates selected");
    Ok(selection)
}

/// New arrivals: released in the trailing window, availability-filtered,
/// most popular first.
async fn select_weekly(
    source: &dyn MetadataSource,
    platform: Platform,
    params: &GenerationParameters,
    today: NaiveDate,
) -> MarqueeResult<Selection> {
    let count = params.count_or(8);
    let after = today - Duration::days(WEEKLY_LOOKBACK_DAYS);
    let platforms = availability(platform);

    let movie_query = DiscoverQuery::builder()
        .media_type(MediaType::Movie)
        .platforms(platforms.clone())
        .released_after(Some(after))
        .released_before(Some(today))
        .build();
    let tv_query = DiscoverQuery::builder()
        .media_type(MediaType::Tv)
        .platforms(platforms)
        .released_after(Some(after))
        .released_before(Some(today))
        .build();

    let mut movies = source.discover(&movie_query).await?;
    movies.truncate(count);
    let mut tv = source.discover(&tv_query).await?;
    tv.truncate(count);

    Ok(Selection { movies, tv })
}

/// Trending-this-week on the platform, topped up from discovery when the
/// feed alone cannot fill the minimum count.
async fn select_trending(
    source: &dyn MetadataSource,
    platform: Platform,
    params: &GenerationParameters,
    today: NaiveDate,
) -> MarqueeResult<Selection> {
    let count = params.count_or(10);
    let age_cutoff = cutoff_years_ago(today, TRENDING_MAX_AGE_YEARS);
    let mut seen: BTreeSet<MediaKey> = BTreeSet::new();
    let mut picked: Vec<MediaItem> = Vec::new();

    for item in source.trending().await?.into_iter().take(TRENDING_SCAN_LIMIT) {
        if picked.len() >= count {
            break;
        }
        if let Some(released) = item.release_date() {
            if *released < age_cutoff {
                continue;
            }
        }
        if !seen.insert(item.key()) {
            continue;
        }
        if platform != Platform::All {
            match source.platforms(item.key()).await {
                Ok(carried) if !carried.contains(&platform) => continue,
                Ok(_) => {}
                Err(e) => {
                    // Availability lookups are best-effort.
                    warn!(id = item.key().id, error = %e, "Skipping availability check");
                }
            }
        }
        picked.push(item);
    }

    // Top up: platform-popular first, then platform-top-rated.
    for sort in [DiscoverSort::Popularity, DiscoverSort::Rating] {
        if picked.len() >= count {
            break;
        }
        for media_type in [MediaType::Movie, MediaType::Tv] {
            let query = DiscoverQuery::builder()
                .media_type(media_type)
                .platforms(availability(platform))
                .released_after(Some(age_cutoff))
                .min_vote_count(Some(50))
                .sort(sort)
                .build();
            for item in source.discover(&query).await? {
                if picked.len() >= count {
                    break;
                }
                if seen.insert(item.key()) {
                    picked.push(item);
                }
            }
        }
    }

    let (movies, tv) = picked
        .into_iter()
        .partition(|item| *item.media_type() == MediaType::Movie);
    Ok(Selection { movies, tv })
}

/// A single feature subject: explicit when parameters name one,
/// otherwise chosen by the spotlight strategy.
async fn select_spotlight(
    source: &dyn MetadataSource,
    platform: Platform,
    params: &GenerationParameters,
    today: NaiveDate,
) -> MarqueeResult<Selection> {
    if let Some(subject) = params.subject {
        let item = source
            .lookup(MediaKey { media_type: subject.media_type, id: subject.id })
            .await?;
        return Ok(wrap_single(item));
    }

    let platforms = availability(platform);
    let query = match params.spotlight {
        SpotlightStrategy::Featured => DiscoverQuery::builder()
            .media_type(MediaType::Movie)
            .platforms(platforms.clone())
            .min_vote_average(Some(7.5))
            .min_vote_count(Some(500))
            .build(),
        SpotlightStrategy::HiddenGem => DiscoverQuery::builder()
            .media_type(MediaType::Movie)
            .platforms(platforms.clone())
            .min_vote_average(Some(7.5))
            .min_vote_count(Some(100))
            .sort(DiscoverSort::Rating)
            .build(),
        SpotlightStrategy::Classic => DiscoverQuery::builder()
            .media_type(MediaType::Movie)
            .platforms(platforms.clone())
            .released_before(Some(cutoff_years_ago(today, CLASSIC_AGE_YEARS)))
            .min_vote_average(Some(7.8))
            .min_vote_count(Some(1000))
            .sort(DiscoverSort::Rating)
            .build(),
    };

    let mut candidates = source.discover(&query).await?;
    if candidates.is_empty() {
        // Fall back to TV with the same filters.
        let tv_query = DiscoverQuery { media_type: MediaType::Tv, ..query };
        candidates = source.discover(&tv_query).await?;
    }

    let pick = match params.spotlight {
        SpotlightStrategy::HiddenGem => candidates
            .into_iter()
            .find(|item| *item.popularity() < HIDDEN_GEM_POPULARITY_CEILING),
        _ => candidates.into_iter().next(),
    };

    Ok(pick.map(wrap_single).unwrap_or_default())
}

/// Window-scoped roundups: monthly, top-10, seasonal.
async fn select_window(
    source: &dyn MetadataSource,
    kind: GeneratorKind,
    platform: Platform,
    params: &GenerationParameters,
    today: NaiveDate,
) -> MarqueeResult<Selection> {
    let (window_start, default_count) = match kind {
        GeneratorKind::Monthly => (today - Duration::days(28), 12),
        GeneratorKind::Top10 => (today - Duration::days(7), 10),
        _ => (season_start(today), 10),
    };
    let count = params.count_or(default_count);
    let platforms = availability(platform);

    let movie_query = DiscoverQuery::builder()
        .media_type(MediaType::Movie)
        .platforms(platforms.clone())
        .released_after(Some(window_start))
        .released_before(Some(today))
        .min_vote_count(Some(20))
        .build();
    let tv_query = DiscoverQuery::builder()
        .media_type(MediaType::Tv)
        .platforms(platforms)
        .released_after(Some(window_start))
        .released_before(Some(today))
        .min_vote_count(Some(20))
        .build();

    let mut movies = source.discover(&movie_query).await?;
    movies.truncate(count);
    let mut tv = source.discover(&tv_query).await?;
    tv.truncate(count);

    Ok(Selection { movies, tv })
}

fn wrap_single(item: MediaItem) -> Selection {
    let media_type = *item.media_type();
    match media_type {
        MediaType::Movie => Selection { movies: vec![item], tv: Vec::new() },
        MediaType::Tv => Selection { movies: Vec::new(), tv: vec![item] },
    }
}

/// The same calendar date `years` back.
fn cutoff_years_ago(today: NaiveDate, years: i32) -> NaiveDate {
    today.with_year(today.year() - years).unwrap_or(today)
}

/// First day of the meteorological season containing `today`.
pub fn season_start(today: NaiveDate) -> NaiveDate {
    let (year, month) = match today.month() {
        12 => (today.year(), 12),
        1 | 2 => (today.year() - 1, 12),
        3..=5 => (today.year(), 3),
        6..=8 => (today.year(), 6),
        _ => (today.year(), 9),
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(today)
}

/// Aggregate statistics for a window-scoped roundup payload.
pub fn window_stats(items: &[MediaItem], genre_names: &[String]) -> WindowStats {
    let average = if items.is_empty() {
        0.0
    } else {
        items.iter().map(|i| *i.vote_average()).sum::<f64>() / items.len() as f64
    };

    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in genre_names {
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, c)) => *c += 1,
            None => counts.push((name.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let top_genres = counts.into_iter().take(3).map(|(n, _)| n).collect();

    WindowStats::new((average * 10.0).round() / 10.0, top_genres, items.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_start_spans_the_year_boundary() {
        let jan = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
        assert_eq!(season_start(jan), NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());

        let july = NaiveDate::from_ymd_opt(2026, 7, 4).unwrap();
        assert_eq!(season_start(july), NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());

        let december = NaiveDate::from_ymd_opt(2026, 12, 25).unwrap();
        assert_eq!(season_start(december), NaiveDate::from_ymd_opt(2026, 12, 1).unwrap());
    }

    #[test]
    fn window_stats_averages_and_ranks_genres() {
        let item = |rating: f64| {
            MediaItem::new(
                MediaType::Movie,
                1,
                "t",
                "",
                None,
                1.0,
                rating,
                100,
                vec![],
                None,
            )
        };
        let items = vec![item(7.0), item(8.0)];
        let genres = vec![
            "Drama".to_string(),
            "Comedy".to_string(),
            "Drama".to_string(),
        ];

        let stats = window_stats(&items, &genres);
        assert_eq!(*stats.average_rating(), 7.5);
        assert_eq!(stats.top_genres()[0], "Drama");
        assert_eq!(*stats.item_count(), 2);
    }

    #[test]
    fn empty_window_stats_are_zeroed() {
        let stats = window_stats(&[], &[]);
        assert_eq!(*stats.average_rating(), 0.0);
        assert!(stats.top_genres().is_empty());
    }
}
