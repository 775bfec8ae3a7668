//! Canonical streaming-platform registry.
//!
//! One enum owns the mapping from short platform keys to display names
//! and vendor watch-provider ids. Every other component resolves
//! platforms through this registry, including legacy synonyms such as
//! "hbo" for Max and "disney" for Disney+.

use serde::{Deserialize, Serialize};

/// A streaming platform, or `All` for cross-platform articles.
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
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Platform {
    Netflix,
    Max,
    DisneyPlus,
    PrimeVideo,
    AppleTvPlus,
    Hulu,
    ParamountPlus,
    /// No platform filter; candidates from any service qualify.
    All,
}

impl Platform {
    /// Resolve a platform key, accepting legacy synonyms.
    pub fn resolve(key: &str) -> Option<Self> {
        let normalized = key.trim().to_ascii_lowercase();
        let canonical = match normalized.as_str() {
            "hbo" | "hbo-max" | "hbomax" => "max",
            "disney" | "disney+" => "disney-plus",
            "prime" | "amazon" | "amazon-prime" => "prime-video",
            "apple" | "appletv" | "apple-tv" => "apple-tv-plus",
            "paramount" => "paramount-plus",
            other => other,
        };
        canonical.parse().ok()
    }

    /// Human-facing display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::Netflix => "Netflix",
            Platform::Max => "Max",
            Platform::DisneyPlus => "Disney+",
            Platform::PrimeVideo => "Prime Video",
            Platform::AppleTvPlus => "Apple TV+",
            Platform::Hulu => "Hulu",
            Platform::ParamountPlus => "Paramount+",
            Platform::All => "All Platforms",
        }
    }

    /// Vendor watch-provider id used in metadata discovery filters.
    ///
    /// `None` for `All`, which carries no provider filter.
    pub fn watch_provider_id(&self) -> Option<u32> {
        match self {
            Platform::Netflix => Some(8),
            Platform::Max => Some(1899),
            Platform::DisneyPlus => Some(337),
            Platform::PrimeVideo => Some(9),
            Platform::AppleTvPlus => Some(350),
            Platform::Hulu => Some(15),
            Platform::ParamountPlus => Some(531),
            Platform::All => None,
        }
    }

    /// The fixed set of major platforms used by availability filters.
    pub fn majors() -> &'static [Platform] {
        &[
            Platform::Netflix,
            Platform::Max,
            Platform::DisneyPlus,
            Platform::PrimeVideo,
            Platform::AppleTvPlus,
            Platform::Hulu,
            Platform::ParamountPlus,
        ]
    }

    /// Pipe-joined provider id list for discovery queries, e.g. "8|337".
    pub fn provider_filter(platforms: &[Platform]) -> String {
        let ids: Vec<String> = platforms
            .iter()
            .filter_map(|p| p.watch_provider_id())
            .map(|id| id.to_string())
            .collect();
        ids.join("|")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synonyms_resolve_to_canonical_platforms() {
        assert_eq!(Platform::resolve("hbo"), Some(Platform::Max));
        assert_eq!(Platform::resolve("HBO-Max"), Some(Platform::Max));
        assert_eq!(Platform::resolve("disney"), Some(Platform::DisneyPlus));
        assert_eq!(Platform::resolve("disney-plus"), Some(Platform::DisneyPlus));
        assert_eq!(Platform::resolve("prime"), Some(Platform::PrimeVideo));
        assert_eq!(Platform::resolve("netflix"), Some(Platform::Netflix));
        assert_eq!(Platform::resolve("betamax"), None);
    }

    #[test]
    fn provider_filter_skips_all() {
        let filter = Platform::provider_filter(&[Platform::Netflix, Platform::All, Platform::Hulu]);
        assert_eq!(filter, "8|15");
    }

    #[test]
    fn key_round_trips() {
        assert_eq!(Platform::DisneyPlus.to_string(), "disney-plus");
        assert_eq!(Platform::resolve("disney-plus"), Some(Platform::DisneyPlus));
    }
}
