//! Turns a candidate selection into a publishable article draft.
//!
//! Enrichment failures degrade to bare list data; the run only fails
//! when the text provider cannot produce a usable body.

use crate::params::GenerationParameters;
use crate::strategies::{Selection, window_stats};
use crate::source::MetadataSource;
use marquee_core::{
    ArticleDraft, ChatMessage, GeneratorKind, MediaDetails, MediaItem, Platform, TextGenerator,
    TextRequest, WindowStats,
};
use marquee_error::{MarqueeResult, PipelineError, PipelineErrorKind};
use tracing::{debug, instrument, warn};

const IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w1280";
const POSTER_BASE: &str = "https://image.tmdb.org/t/p/w780";
/// Detail lookups per run are capped; items past the cap keep list data.
const ENRICH_LIMIT: usize = 12;

/// A selected item together with its detail expansions.
#[derive(Debug, Clone)]
pub struct EnrichedItem {
    /// The list-shape item
    pub item: MediaItem,
    /// Credits, trailer, images; default when enrichment failed
    pub details: MediaDetails,
}

/// Builds article drafts from selections via the text provider.
pub struct ArticleAssembler<'a> {
    source: &'a dyn MetadataSource,
    text: &'a dyn TextGenerator,
}

impl<'a> ArticleAssembler<'a> {
    /// Creates an assembler over the given collaborators.
    pub fn new(source: &'a dyn MetadataSource, text: &'a dyn TextGenerator) -> Self {
        Self { source, text }
    }

    /// Assemble the draft for one generation run.
    ///
    /// # Errors
    ///
    /// Returns `TextGeneration` when the provider fails or answers
    /// without a body.
    #[instrument(skip(self, selection, params), fields(kind = %kind, platform = %platform))]
    pub async fn assemble(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        selection: &Selection,
        params: &GenerationParameters,
    ) -> MarqueeResult<ArticleDraft> {
        let enriched = self.enrich(selection).await;
        let genre_names: Vec<String> = enriched
            .iter()
            .flat_map(|e| e.details.genres().iter().cloned())
            .collect();

        let stats = match kind {
            GeneratorKind::Monthly | GeneratorKind::Top10 | GeneratorKind::Seasonal => {
                let items: Vec<MediaItem> =
                    enriched.iter().map(|e| e.item.clone()).collect();
                Some(window_stats(&items, &genre_names))
            }
            _ => None,
        };

        let request = TextRequest {
            messages: prompt(kind, platform, &enriched, stats.as_ref()),
            max_tokens: Some(1400),
            temperature: Some(0.7),
            model: params.model.clone(),
        };
        let response = self.text.generate(&request).await?;

        let sections = parse_sections(&response.text);
        let body = sections.body.ok_or_else(|| {
            PipelineError::new(PipelineErrorKind::TextGeneration(
                "provider response contained no article body".to_string(),
            ))
        })?;
        let title = sections
            .title
            .unwrap_or_else(|| fallback_title(kind, platform, &enriched));
        let excerpt = sections.excerpt.unwrap_or_else(|| leading_excerpt(&body));

        debug!(title = %title, body_chars = body.len(), "Draft assembled");

        let mut tags: Vec<String> = vec![platform.to_string(), kind.to_string()];
        tags.extend(top_genre_tags(&genre_names));

        let mut builder = ArticleDraft::builder();
        builder
            .title(title)
            .body(body)
            .excerpt(excerpt)
            .categories(vec![
                "Streaming".to_string(),
                platform.display_name().to_string(),
            ])
            .tags(tags);
        if let Some(hero) = hero_reference(&enriched) {
            builder.hero_image(Some(hero));
        }
        builder.build().map_err(|e| {
            PipelineError::new(PipelineErrorKind::TextGeneration(e.to_string())).into()
        })
    }

    /// Fetch detail expansions, tolerating per-item failures.
    async fn enrich(&self, selection: &Selection) -> Vec<EnrichedItem> {
        let mut enriched = Vec::with_capacity(selection.len());
        for item in selection.items() {
            let details = if enriched.len() < ENRICH_LIMIT {
                match self.source.details(item.key()).await {
                    Ok(details) => details,
                    Err(e) => {
                        warn!(id = item.key().id, error = %e, "Detail enrichment failed");
                        MediaDetails::default()
                    }
                }
            } else {
                MediaDetails::default()
            };
            enriched.push(EnrichedItem { item: item.clone(), details });
        }
        enriched
    }
}

/// Parsed `TITLE:` / `EXCERPT:` / `BODY:` sections from a provider
/// response. A response with no markers is treated as all body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sections {
    pub title: Option<String>,
    pub excerpt: Option<String>,
    pub body: Option<String>,
}

/// Tolerant section parser for the provider's structured answer.
pub fn parse_sections(text: &str) -> Sections {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Sections::default();
    }

    let mut sections = Sections::default();
    let mut current: Option<&str> = None;
    let mut buffer = String::new();

    let mut flush = |target: Option<&str>, buffer: &mut String, sections: &mut Sections| {
        let content = buffer.trim().to_string();
        *buffer = String::new();
        if content.is_empty() {
            return;
        }
        match target {
            Some("title") => sections.title = Some(content),
            Some("excerpt") => sections.excerpt = Some(content),
            Some("body") => sections.body = Some(content),
            _ => {}
        }
    };

    for line in trimmed.lines() {
        let upper = line.trim_start().to_uppercase();
        let marker = ["TITLE:", "EXCERPT:", "BODY:"]
            .into_iter()
            .find(|m| upper.starts_with(m));
        match marker {
            Some(m) => {
                flush(current, &mut buffer, &mut sections);
                current = Some(match m {
                    "TITLE:" => "title",
                    "EXCERPT:" => "excerpt",
                    _ => "body",
                });
                let rest = &line.trim_start()[m.len()..];
                buffer.push_str(rest.trim_start());
                buffer.push('\n');
            }
            None => {
                buffer.push_str(line);
                buffer.push('\n');
            }
        }
    }
    flush(current, &mut buffer, &mut sections);

    // No markers at all: the whole answer is the body.
    if sections.title.is_none() && sections.excerpt.is_none() && sections.body.is_none() {
        sections.body = Some(trimmed.to_string());
    }
    sections
}

fn prompt(
    kind: GeneratorKind,
    platform: Platform,
    enriched: &[EnrichedItem],
    stats: Option<&WindowStats>,
) -> Vec<ChatMessage> {
    let mut listing = String::new();
    for e in enriched {
        listing.push_str(&format!(
            "- {} ({}, rating {:.1})",
            e.item.title(),
            e.item
                .release_year()
                .map(|y| y.to_string())
                .unwrap_or_else(|| "year unknown".to_string()),
            e.item.vote_average(),
        ));
        if !e.details.cast().is_empty() {
            listing.push_str(&format!(" — starring {}", e.details.cast().join(", ")));
        }
        if !e.details.genres().is_empty() {
            listing.push_str(&format!(" [{}]", e.details.genres().join(", ")));
        }
        listing.push('\n');
        let overview: String = e.item.overview().chars().take(280).collect();
        if !overview.is_empty() {
            listing.push_str(&format!("  {overview}\n"));
        }
    }

    let angle = match kind {
        GeneratorKind::Weekly => "a roundup of what just arrived this week",
        GeneratorKind::Trending => "a guide to what everyone is watching right now",
        GeneratorKind::Spotlight => "an in-depth feature on a single title",
        GeneratorKind::Monthly => "a monthly best-of roundup",
        GeneratorKind::Top10 => "a ranked top-10 list",
        GeneratorKind::Seasonal => "a seasonal viewing guide",
    };

    let mut instructions = format!(
        "Write {angle} for {} viewers.\n\nTitles:\n{listing}",
        platform.display_name()
    );
    if let Some(stats) = stats {
        instructions.push_str(&format!(
            "\nWindow stats: {} titles, average rating {:.1}, leading genres {}.\n",
            stats.item_count(),
            stats.average_rating(),
            stats.top_genres().join(", ")
        ));
    }
    instructions.push_str(
        "\nAnswer in exactly this format:\nTITLE: <headline>\nEXCERPT: <one-sentence summary>\nBODY: <the full article>",
    );

    vec![
        ChatMessage::system(
            "You are a streaming-entertainment editor. You write engaging, factual articles \
             about movies and television, and you never invent titles that were not provided.",
        ),
        ChatMessage::user(instructions),
    ]
}

fn fallback_title(kind: GeneratorKind, platform: Platform, enriched: &[EnrichedItem]) -> String {
    let name = platform.display_name();
    match kind {
        GeneratorKind::Weekly => format!("New on {name} This Week"),
        GeneratorKind::Trending => format!("Trending on {name} Right Now"),
        GeneratorKind::Spotlight => match enriched.first() {
            Some(e) => format!("Spotlight: {}", e.item.title()),
            None => format!("{name} Spotlight"),
        },
        GeneratorKind::Monthly => format!("The Best of {name} This Month"),
        GeneratorKind::Top10 => format!("Top 10 on {name} This Week"),
        GeneratorKind::Seasonal => format!("Your {name} Seasonal Watchlist"),
    }
}

fn leading_excerpt(body: &str) -> String {
    let first_line = body.lines().find(|l| !l.trim().is_empty()).unwrap_or("");
    first_line.chars().take(180).collect()
}

/// Hero image reference: first backdrop wins, then first poster.
pub fn hero_reference(enriched: &[EnrichedItem]) -> Option<String> {
    for e in enriched {
        if let Some(backdrop) = e.details.backdrop_path() {
            return Some(format!("{IMAGE_BASE}{backdrop}"));
        }
    }
    for e in enriched {
        if let Some(poster) = e.item.poster_path() {
            return Some(format!("{POSTER_BASE}{poster}"));
        }
    }
    None
}

fn top_genre_tags(genre_names: &[String]) -> Vec<String> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for name in genre_names {
        match counts.iter_mut().find(|(n, _)| n == name) {
            Some((_, c)) => *c += 1,
            None => counts.push((name.clone(), 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
        .into_iter()
        .take(3)
        .map(|(n, _)| n.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_core::MediaType;

    #[test]
    fn structured_response_parses_into_sections() {
        let text = "TITLE: New on Netflix This Week\nEXCERPT: Fresh arrivals.\nBODY: The lineup\nhas something for everyone.";
        let sections = parse_sections(text);
        assert_eq!(sections.title.as_deref(), Some("New on Netflix This Week"));
        assert_eq!(sections.excerpt.as_deref(), Some("Fresh arrivals."));
        assert_eq!(
            sections.body.as_deref(),
            Some("The lineup\nhas something for everyone.")
        );
    }

    #[test]
    fn unmarked_response_becomes_the_body() {
        let sections = parse_sections("Just prose with no markers.");
        assert!(sections.title.is_none());
        assert_eq!(sections.body.as_deref(), Some("Just prose with no markers."));
    }

    #[test]
    fn empty_response_has_no_body() {
        let sections = parse_sections("   \n  ");
        assert!(sections.body.is_none());
    }

    #[test]
    fn marker_case_is_tolerated() {
        let sections = parse_sections("Title: Hello\nbody: World");
        assert_eq!(sections.title.as_deref(), Some("Hello"));
        assert_eq!(sections.body.as_deref(), Some("World"));
    }

    fn enriched(backdrop: Option<&str>, poster: Option<&str>) -> EnrichedItem {
        EnrichedItem {
            item: MediaItem::new(
                MediaType::Movie,
                1,
                "Example",
                "",
                None,
                1.0,
                7.0,
                10,
                vec![],
                poster.map(String::from),
            ),
            details: MediaDetails::new(
                vec![],
                vec![],
                None,
                backdrop.map(String::from),
                vec![],
                None,
            ),
        }
    }

    #[test]
    fn hero_prefers_backdrop_over_poster() {
        let items = vec![enriched(None, Some("/p.jpg")), enriched(Some("/b.jpg"), None)];
        assert_eq!(
            hero_reference(&items).unwrap(),
            format!("{IMAGE_BASE}/b.jpg")
        );
    }

    #[test]
    fn hero_falls_back_to_poster() {
        let items = vec![enriched(None, Some("/p.jpg"))];
        assert_eq!(
            hero_reference(&items).unwrap(),
            format!("{POSTER_BASE}/p.jpg")
        );
    }

    #[test]
    fn genre_tags_rank_by_frequency() {
        let genres = vec![
            "Drama".to_string(),
            "Comedy".to_string(),
            "Drama".to_string(),
            "Action".to_string(),
            "Comedy".to_string(),
            "Drama".to_string(),
        ];
        assert_eq!(top_genre_tags(&genres), vec!["drama", "comedy", "action"]);
    }
}
