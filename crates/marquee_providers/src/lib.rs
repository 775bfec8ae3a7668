//! Vendor API integrations.
//!
//! Each provider lives behind a cargo feature so binaries pull in only
//! the integrations they use:
//!
//! - `tmdb`: streaming metadata (discovery, details, watch providers)
//! - `openai`: paced text generation
//! - `facebook`: social publishing with retry and deferral
//! - `host`: the content host REST client and an in-memory stand-in
//!
//! All clients speak the trait seams from `marquee_core` and surface
//! failures through the `marquee_error` provider taxonomy.

#[cfg(feature = "facebook")]
pub mod facebook;
#[cfg(feature = "host")]
pub mod host;
#[cfg(feature = "openai")]
pub mod openai;
#[cfg(feature = "tmdb")]
pub mod tmdb;

#[cfg(feature = "facebook")]
pub use facebook::FacebookClient;
#[cfg(feature = "host")]
pub use host::{MemoryHost, RestHost};
#[cfg(feature = "openai")]
pub use openai::OpenAiClient;
#[cfg(feature = "tmdb")]
pub use tmdb::TmdbClient;
