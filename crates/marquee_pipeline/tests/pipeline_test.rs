//! Selection and assembly exercised against mock collaborators.

use chrono::NaiveDate;
use marquee_core::{
    GeneratorKind, MediaDetails, MediaItem, MediaKey, MediaType, Platform, TextGenerator,
    TextRequest, TextResponse,
};
use marquee_error::{MarqueeResult, PipelineError, PipelineErrorKind};
use marquee_pipeline::{
    ArticleAssembler, DiscoverQuery, DiscoverSort, GenerationParameters, MetadataSource,
    select_candidates,
};
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};

fn movie(id: u64, title: &str, released: &str, popularity: f64) -> MediaItem {
    MediaItem::new(
        MediaType::Movie,
        id,
        title,
        "An example overview.",
        NaiveDate::parse_from_str(released, "%Y-%m-%d").ok(),
        popularity,
        7.2,
        320,
        vec![18],
        Some(format!("/poster-{id}.jpg")),
    )
}

fn tv(id: u64, title: &str, released: &str) -> MediaItem {
    MediaItem::new(
        MediaType::Tv,
        id,
        title,
        "An example overview.",
        NaiveDate::parse_from_str(released, "%Y-%m-%d").ok(),
        40.0,
        7.8,
        210,
        vec![35],
        None,
    )
}

/// Metadata source that answers discovery calls from a queue and records
/// every query it receives.
#[derive(Default)]
struct MockSource {
    discover_answers: Mutex<VecDeque<Vec<MediaItem>>>,
    trending_items: Vec<MediaItem>,
    carried: HashMap<MediaKey, Vec<Platform>>,
    lookup_items: Vec<MediaItem>,
    queries: Mutex<Vec<DiscoverQuery>>,
}

impl MockSource {
    fn push_discover(&self, items: Vec<MediaItem>) {
        self.discover_answers.lock().push_back(items);
    }

    fn recorded_queries(&self) -> Vec<DiscoverQuery> {
        self.queries.lock().clone()
    }
}

#[async_trait::async_trait]
impl MetadataSource for MockSource {
    async fn discover(&self, query: &DiscoverQuery) -> MarqueeResult<Vec<MediaItem>> {
        self.queries.lock().push(query.clone());
        Ok(self.discover_answers.lock().pop_front().unwrap_or_default())
    }

    async fn trending(&self) -> MarqueeResult<Vec<MediaItem>> {
        Ok(self.trending_items.clone())
    }

    async fn lookup(&self, key: MediaKey) -> MarqueeResult<MediaItem> {
        self.lookup_items
            .iter()
            .find(|i| i.key() == key)
            .cloned()
            .ok_or_else(|| {
                PipelineError::new(PipelineErrorKind::NoCandidates(format!(
                    "no item {}",
                    key.id
                )))
                .into()
            })
    }

    async fn details(&self, _key: MediaKey) -> MarqueeResult<MediaDetails> {
        Ok(MediaDetails::new(
            vec!["Lead Actor".to_string()],
            vec!["The Director".to_string()],
            None,
            Some("/backdrop.jpg".to_string()),
            vec!["Drama".to_string()],
            Some(104),
        ))
    }

    async fn platforms(&self, key: MediaKey) -> MarqueeResult<Vec<Platform>> {
        Ok(self.carried.get(&key).cloned().unwrap_or_default())
    }
}

/// Text generator that returns a canned answer and counts calls.
struct MockText {
    answer: String,
    calls: Mutex<usize>,
}

impl MockText {
    fn answering(answer: &str) -> Self {
        Self { answer: answer.to_string(), calls: Mutex::new(0) }
    }
}

#[async_trait::async_trait]
impl TextGenerator for MockText {
    async fn generate(&self, _req: &TextRequest) -> MarqueeResult<TextResponse> {
        *self.calls.lock() += 1;
        Ok(TextResponse { text: self.answer.clone() })
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 8, 30).unwrap()
}

#[tokio::test]
async fn weekly_selection_keeps_sublists_and_caps_counts() {
    let source = MockSource::default();
    source.push_discover(vec![
        movie(1, "Arrival Week One", "2026-08-25", 90.0),
        movie(2, "Arrival Week Two", "2026-08-22", 80.0),
        movie(3, "Arrival Week Three", "2026-08-20", 70.0),
    ]);
    source.push_discover(vec![tv(10, "New Series", "2026-08-27")]);

    let params = GenerationParameters { count: Some(2), ..Default::default() };
    let selection = select_candidates(
        &source,
        GeneratorKind::Weekly,
        Platform::Netflix,
        &params,
        today(),
    )
    .await
    .unwrap();

    assert_eq!(selection.movies.len(), 2);
    assert_eq!(selection.tv.len(), 1);

    let queries = source.recorded_queries();
    assert_eq!(queries.len(), 2);
    assert_eq!(queries[0].platforms, vec![Platform::Netflix]);
    assert_eq!(
        queries[0].released_after,
        Some(NaiveDate::from_ymd_opt(2026, 8, 16).unwrap())
    );
}

#[tokio::test]
async fn trending_excludes_stale_items_and_dedups() {
    let mut source = MockSource::default();
    source.trending_items = vec![
        movie(1, "Fresh Hit", "2026-07-01", 95.0),
        movie(1, "Fresh Hit", "2026-07-01", 95.0),
        movie(2, "Old Classic", "2005-01-01", 88.0),
        tv(3, "Current Series", "2025-11-02"),
    ];

    let params = GenerationParameters { count: Some(10), ..Default::default() };
    let selection = select_candidates(
        &source,
        GeneratorKind::Trending,
        Platform::All,
        &params,
        today(),
    )
    .await
    .unwrap();

    let keys = selection.keys();
    assert_eq!(keys.len(), 2, "duplicate and stale entries are dropped");
    assert!(keys.contains(&MediaKey { media_type: MediaType::Movie, id: 1 }));
    assert!(keys.contains(&MediaKey { media_type: MediaType::Tv, id: 3 }));
}

#[tokio::test]
async fn trending_filters_by_platform_availability() {
    let mut source = MockSource::default();
    let on_netflix = movie(1, "Carried", "2026-05-01", 90.0);
    let elsewhere = movie(2, "Not Carried", "2026-05-01", 85.0);
    source
        .carried
        .insert(on_netflix.key(), vec![Platform::Netflix]);
    source.carried.insert(elsewhere.key(), vec![Platform::Hulu]);
    source.trending_items = vec![on_netflix, elsewhere];

    let params = GenerationParameters { count: Some(1), ..Default::default() };
    let selection = select_candidates(
        &source,
        GeneratorKind::Trending,
        Platform::Netflix,
        &params,
        today(),
    )
    .await
    .unwrap();

    assert_eq!(selection.keys(), vec![MediaKey { media_type: MediaType::Movie, id: 1 }]);
}

#[tokio::test]
async fn trending_tops_up_from_discovery() {
    let mut source = MockSource::default();
    source.trending_items = vec![movie(1, "Only Trend", "2026-06-01", 99.0)];
    // First top-up query (popular movies) supplies the rest.
    source.push_discover(vec![
        movie(1, "Only Trend", "2026-06-01", 99.0),
        movie(2, "Popular Filler", "2026-04-01", 60.0),
        movie(3, "Second Filler", "2026-03-01", 55.0),
    ]);

    let params = GenerationParameters { count: Some(3), ..Default::default() };
    let selection = select_candidates(
        &source,
        GeneratorKind::Trending,
        Platform::All,
        &params,
        today(),
    )
    .await
    .unwrap();

    assert_eq!(selection.len(), 3);
    let queries = source.recorded_queries();
    assert!(!queries.is_empty());
    assert_eq!(queries[0].sort, DiscoverSort::Popularity);
}

#[tokio::test]
async fn spotlight_uses_the_explicit_subject() {
    let mut source = MockSource::default();
    source.lookup_items = vec![movie(550, "The Subject", "1999-10-15", 61.0)];

    let params = GenerationParameters::from_value(&serde_json::json!({
        "subject": { "id": 550, "media_type": "movie" }
    }))
    .unwrap();

    let selection = select_candidates(
        &source,
        GeneratorKind::Spotlight,
        Platform::Max,
        &params,
        today(),
    )
    .await
    .unwrap();

    assert_eq!(selection.movies.len(), 1);
    assert_eq!(selection.movies[0].title(), "The Subject");
    assert!(source.recorded_queries().is_empty(), "no discovery for explicit subjects");
}

#[tokio::test]
async fn hidden_gem_respects_the_popularity_ceiling() {
    let source = MockSource::default();
    source.push_discover(vec![
        movie(1, "Blockbuster", "2020-01-01", 250.0),
        movie(2, "Quiet Gem", "2019-06-01", 12.0),
    ]);

    let params = GenerationParameters::from_value(&serde_json::json!({
        "spotlight": "hidden_gem"
    }))
    .unwrap();

    let selection = select_candidates(
        &source,
        GeneratorKind::Spotlight,
        Platform::Netflix,
        &params,
        today(),
    )
    .await
    .unwrap();

    assert_eq!(selection.movies[0].title(), "Quiet Gem");
}

#[tokio::test]
async fn empty_selection_is_a_no_candidates_error() {
    let source = MockSource::default();

    let result = select_candidates(
        &source,
        GeneratorKind::Weekly,
        Platform::ParamountPlus,
        &GenerationParameters::default(),
        today(),
    )
    .await;

    let err = result.expect_err("empty selection must error");
    assert!(err.to_string().contains("No candidates"));
}

#[tokio::test]
async fn assembler_builds_a_draft_from_a_structured_answer() {
    let source = MockSource::default();
    source.push_discover(vec![movie(1, "Feature", "2026-08-25", 90.0)]);
    source.push_discover(vec![]);

    let selection = select_candidates(
        &source,
        GeneratorKind::Weekly,
        Platform::Netflix,
        &GenerationParameters::default(),
        today(),
    )
    .await
    .unwrap();

    let text = MockText::answering(
        "TITLE: Netflix's Big Week\nEXCERPT: One big arrival.\nBODY: Here is everything new.",
    );
    let assembler = ArticleAssembler::new(&source, &text);
    let draft = assembler
        .assemble(
            GeneratorKind::Weekly,
            Platform::Netflix,
            &selection,
            &GenerationParameters::default(),
        )
        .await
        .unwrap();

    assert_eq!(draft.title(), "Netflix's Big Week");
    assert_eq!(draft.excerpt(), "One big arrival.");
    assert!(draft.categories().contains(&"Netflix".to_string()));
    assert!(draft.tags().contains(&"weekly".to_string()));
    assert_eq!(
        draft.hero_image().as_deref(),
        Some("https://image.tmdb.org/t/p/w1280/backdrop.jpg")
    );
    assert_eq!(*text.calls.lock(), 1);
}

#[tokio::test]
async fn assembler_falls_back_when_the_answer_is_unstructured() {
    let source = MockSource::default();
    source.push_discover(vec![movie(1, "Feature", "2026-08-25", 90.0)]);
    source.push_discover(vec![]);

    let selection = select_candidates(
        &source,
        GeneratorKind::Weekly,
        Platform::Hulu,
        &GenerationParameters::default(),
        today(),
    )
    .await
    .unwrap();

    let text = MockText::answering("Plain prose answer with no section markers at all.");
    let assembler = ArticleAssembler::new(&source, &text);
    let draft = assembler
        .assemble(
            GeneratorKind::Weekly,
            Platform::Hulu,
            &selection,
            &GenerationParameters::default(),
        )
        .await
        .unwrap();

    assert_eq!(draft.title(), "New on Hulu This Week");
    assert!(!draft.excerpt().is_empty());
}

#[tokio::test]
async fn assembler_fails_without_a_body() {
    let source = MockSource::default();
    source.push_discover(vec![movie(1, "Feature", "2026-08-25", 90.0)]);
    source.push_discover(vec![]);

    let selection = select_candidates(
        &source,
        GeneratorKind::Weekly,
        Platform::Netflix,
        &GenerationParameters::default(),
        today(),
    )
    .await
    .unwrap();

    let text = MockText::answering("   ");
    let assembler = ArticleAssembler::new(&source, &text);
    let result = assembler
        .assemble(
            GeneratorKind::Weekly,
            Platform::Netflix,
            &selection,
            &GenerationParameters::default(),
        )
        .await;

    assert!(result.is_err());
}
