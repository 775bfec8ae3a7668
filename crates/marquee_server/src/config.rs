//! TOML configuration for the bot server.

use crate::schedule::Cadence;
use derive_getters::Getters;
use marquee_core::{GeneratorKind, Platform};
use marquee_error::{ConfigError, MarqueeResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use typed_builder::TypedBuilder;

/// One generation job: a kind on a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
pub struct JobConfig {
    /// Article kind to generate
    kind: GeneratorKind,
    /// Platform key or synonym ("netflix", "hbo", "all")
    #[builder(setter(into))]
    platform: String,
    /// Item-count override for roundup kinds
    #[serde(default)]
    #[builder(default)]
    count: Option<usize>,
}

impl JobConfig {
    /// Canonical platform for this job, if the key is recognized.
    pub fn resolve_platform(&self) -> Option<Platform> {
        Platform::resolve(&self.platform)
    }

    /// The run parameters payload for this job.
    pub fn parameters(&self) -> serde_json::Value {
        match self.count {
            Some(count) => serde_json::json!({ "count": count }),
            None => serde_json::json!({}),
        }
    }
}

/// Generation bot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct GenerationBotConfig {
    /// Master switch
    enabled: bool,
    /// When the bot walks its job list
    cadence: Cadence,
    /// Jobs to run each tick
    #[builder(default)]
    jobs: Vec<JobConfig>,
}

impl Default for GenerationBotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            // 9 AM UTC daily.
            cadence: Cadence::Cron { expression: "0 0 9 * * * *".to_string() },
            jobs: Vec::new(),
        }
    }
}

/// Share bot settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct ShareBotConfig {
    /// Master switch
    enabled: bool,
    /// When the bot scans for shareable content
    cadence: Cadence,
    /// Public site base URL used to build article links
    #[builder(setter(into))]
    site_base_url: String,
    /// Post message template; `{link}` expands to the article URL
    #[builder(setter(into))]
    message_template: String,
    /// Maximum shares posted per tick
    batch_size: usize,
    /// Random extra spacing between posts in a batch, seconds
    jitter_secs: u64,
}

impl ShareBotConfig {
    /// Article URL for a content id.
    pub fn article_link(&self, content_id: i64) -> String {
        format!("{}/?p={content_id}", self.site_base_url.trim_end_matches('/'))
    }

    /// Post message for a content id.
    pub fn message_for(&self, content_id: i64) -> String {
        self.message_template
            .replace("{link}", &self.article_link(content_id))
    }
}

impl Default for ShareBotConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cadence: Cadence::Interval { seconds: 900 },
            site_base_url: String::new(),
            message_template: "New on the site: {link}".to_string(),
            batch_size: 5,
            jitter_secs: 120,
        }
    }
}

/// Retention sweep settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, TypedBuilder)]
#[serde(default)]
pub struct RetentionConfig {
    /// Master switch
    enabled: bool,
    /// When the sweep runs
    cadence: Cadence,
    /// Failed/cancelled records older than this many days are removed
    days: i64,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cadence: Cadence::Interval { seconds: 86_400 },
            days: 90,
        }
    }
}

/// Top-level server configuration.
#[derive(
    Debug, Clone, Default, PartialEq, Serialize, Deserialize, Getters, TypedBuilder,
)]
#[serde(default)]
pub struct MarqueeConfig {
    /// Generation bot
    #[builder(default)]
    generation: GenerationBotConfig,
    /// Share bot
    #[builder(default)]
    sharing: ShareBotConfig,
    /// Retention sweep
    #[builder(default)]
    retention: RetentionConfig,
}

impl MarqueeConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when the file cannot be read or
    /// parsed, or when validation finds an unusable job.
    #[tracing::instrument(skip(path))]
    pub fn from_file(path: impl AsRef<Path>) -> MarqueeResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(format!("Failed to read config file: {e}"))
        })?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that could never do what they say.
    pub fn validate(&self) -> MarqueeResult<()> {
        for job in &self.generation.jobs {
            if job.resolve_platform().is_none() {
                return Err(ConfigError::new(format!(
                    "Unknown platform '{}' in generation job",
                    job.platform()
                ))
                .into());
            }
        }
        if self.generation.enabled && !self.generation.cadence.is_enabled() {
            tracing::warn!("Generation bot enabled but its cadence never fires");
        }
        if self.sharing.enabled && self.sharing.site_base_url.is_empty() {
            return Err(ConfigError::new(
                "sharing.site_base_url is required when sharing is enabled",
            )
            .into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_config_parses_from_toml() {
        let text = r#"
            [generation]
            enabled = true
            cadence = { type = "cron", expression = "0 0 9 * * * *" }
            jobs = [
                { kind = "weekly", platform = "netflix", count = 8 },
                { kind = "trending", platform = "hbo" },
            ]

            [sharing]
            enabled = true
            cadence = { type = "interval", seconds = 900 }
            site_base_url = "https://example.com"

            [retention]
            days = 30
        "#;
        let config: MarqueeConfig = toml::from_str(text).unwrap();
        config.validate().unwrap();

        assert_eq!(config.generation().jobs().len(), 2);
        assert_eq!(
            config.generation().jobs()[1].resolve_platform(),
            Some(Platform::Max),
            "synonyms resolve"
        );
        assert_eq!(*config.retention().days(), 30);
        assert_eq!(config.sharing().article_link(42), "https://example.com/?p=42");
    }

    #[test]
    fn empty_config_uses_defaults() {
        let config: MarqueeConfig = toml::from_str("").unwrap();
        assert!(*config.generation().enabled());
        assert_eq!(*config.retention().days(), 90);
        assert_eq!(
            *config.sharing().cadence(),
            Cadence::Interval { seconds: 900 }
        );
    }

    #[test]
    fn unknown_platform_fails_validation() {
        let text = r#"
            [generation]
            jobs = [{ kind = "weekly", platform = "blockbuster-video" }]
        "#;
        let config: MarqueeConfig = toml::from_str(text).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn enabled_sharing_requires_a_site_url() {
        let config: MarqueeConfig = toml::from_str("[sharing]\nenabled = true").unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn message_template_expands_the_link() {
        let sharing = ShareBotConfig {
            site_base_url: "https://example.com/".to_string(),
            message_template: "Read it here: {link}".to_string(),
            ..Default::default()
        };
        assert_eq!(
            sharing.message_for(7),
            "Read it here: https://example.com/?p=7"
        );
    }
}
