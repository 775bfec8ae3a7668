//! Core domain types for the Marquee editorial pipeline.
//!
//! This crate provides the vocabulary shared across the workspace:
//! generator kinds, the canonical platform registry, record statuses,
//! media and article types, content fingerprints, and the trait seams
//! for external collaborators.

mod article;
mod fingerprint;
mod generator;
mod media;
mod platform;
mod status;
mod text;
mod traits;

pub use article::{ArticleDraft, ArticleDraftBuilder, WindowStats};
pub use fingerprint::content_fingerprint;
pub use generator::GeneratorKind;
pub use media::{MediaDetails, MediaItem, MediaKey, MediaType};
pub use platform::Platform;
pub use status::{GenerationStatus, ShareStatus};
pub use text::{ChatMessage, Role, TextRequest, TextResponse};
pub use traits::{
    ContentHost, ContentId, SocialPost, SocialPostOutcome, SocialPoster, TextGenerator,
};
