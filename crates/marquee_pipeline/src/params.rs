//! Per-run parameters carried in the generation record's jsonb payload.

use marquee_core::MediaType;
use marquee_error::{PipelineError, PipelineErrorKind};
use serde::{Deserialize, Serialize};

/// How a spotlight subject is chosen when no explicit id is given.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SpotlightStrategy {
    /// High rating and high popularity
    #[default]
    Featured,
    /// High rating with a popularity ceiling
    HiddenGem,
    /// Older than the classic cutoff with high rating and many votes
    Classic,
}

/// An explicit spotlight subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpotlightSubject {
    /// Vendor id
    pub id: u64,
    /// Movie or TV
    pub media_type: MediaType,
}

/// Options accepted by every generator kind. Unknown keys are ignored
/// so older records stay loadable.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationParameters {
    /// Target item count for roundup kinds
    pub count: Option<usize>,
    /// Explicit spotlight subject, overriding the strategy
    pub subject: Option<SpotlightSubject>,
    /// Spotlight selection strategy when no subject is given
    pub spotlight: SpotlightStrategy,
    /// Model override passed to the text provider
    pub model: Option<String>,
}

impl GenerationParameters {
    /// Parse from the record's jsonb payload.
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameters` when the payload is not an object of
    /// the expected shape.
    pub fn from_value(value: &serde_json::Value) -> Result<Self, PipelineError> {
        serde_json::from_value(value.clone()).map_err(|e| {
            PipelineError::new(PipelineErrorKind::InvalidParameters(e.to_string()))
        })
    }

    /// Item count with a per-kind fallback.
    pub fn count_or(&self, default: usize) -> usize {
        self.count.unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_parses_to_defaults() {
        let params = GenerationParameters::from_value(&serde_json::json!({})).unwrap();
        assert_eq!(params, GenerationParameters::default());
        assert_eq!(params.count_or(8), 8);
    }

    #[test]
    fn explicit_subject_parses() {
        let params = GenerationParameters::from_value(&serde_json::json!({
            "count": 10,
            "subject": { "id": 550, "media_type": "movie" },
            "spotlight": "hidden_gem",
        }))
        .unwrap();
        assert_eq!(params.count, Some(10));
        assert_eq!(
            params.subject,
            Some(SpotlightSubject { id: 550, media_type: MediaType::Movie })
        );
        assert_eq!(params.spotlight, SpotlightStrategy::HiddenGem);
    }

    #[test]
    fn malformed_payload_is_rejected() {
        let result = GenerationParameters::from_value(&serde_json::json!({ "count": "ten" }));
        assert!(result.is_err());
    }
}
