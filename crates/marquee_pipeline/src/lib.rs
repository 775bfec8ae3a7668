//! Generation and share orchestration.
//!
//! The two orchestrators own the full shape of a run: duplicate-guard
//! check, ledger claim, vendor calls, and outcome recording. Selection
//! strategies and article assembly are separate modules so they can be
//! exercised against mock collaborators without a database.

mod assembler;
mod generation;
mod params;
mod sharing;
mod source;
mod strategies;

pub use assembler::{ArticleAssembler, EnrichedItem, Sections, hero_reference, parse_sections};
pub use generation::GenerationOrchestrator;
pub use params::{GenerationParameters, SpotlightStrategy, SpotlightSubject};
pub use sharing::{ShareOrchestrator, ShareOutcome};
pub use source::{DiscoverQuery, DiscoverSort, MetadataSource};
pub use strategies::{Selection, season_start, select_candidates, window_stats};
