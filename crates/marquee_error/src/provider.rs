//! Error types for external vendor providers.
//!
//! Covers the metadata, text-generation, and social providers plus the
//! content host. The kinds mirror the error taxonomy used by the retry
//! policies: transport failures are always retryable-or-deferred, rate
//! limits trigger cooldowns, and data-shape problems surface as
//! `Malformed`/`MissingField` so callers can fall back or fail with a
//! descriptive reason.

/// Error kinds for provider operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ProviderErrorKind {
    /// Network-level failure (DNS, timeout, TLS).
    #[display("Transport error: {_0}")]
    Transport(String),
    /// Non-success HTTP status with the vendor's response body.
    #[display("API error (status {status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Vendor error body
        message: String,
    },
    /// Vendor signalled a rate limit.
    #[display("Rate limited (cooldown {cooldown_secs}s)")]
    RateLimited {
        /// Seconds the caller must wait before the next attempt
        cooldown_secs: u64,
    },
    /// Response body could not be parsed.
    #[display("Malformed response: {_0}")]
    Malformed(String),
    /// Response parsed but lacked a required field.
    #[display("Missing field in response: {_0}")]
    MissingField(String),
    /// Vendor reported the requested resource does not exist.
    #[display("Not found: {_0}")]
    NotFound(String),
}

impl ProviderErrorKind {
    /// Whether a later attempt against the same target may succeed.
    ///
    /// Transport and rate-limit errors never permanently block future
    /// attempts at the same (content, platform) pair.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ProviderErrorKind::Transport(_)
                | ProviderErrorKind::RateLimited { .. }
                | ProviderErrorKind::Api { status: 500..=599, .. }
        )
    }
}

/// Provider error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Provider Error ({}): {} at line {} in {}", provider, kind, line, file)]
pub struct ProviderError {
    provider: &'static str,
    kind: ProviderErrorKind,
    line: u32,
    file: &'static str,
}

impl ProviderError {
    /// Create a new provider error with automatic location tracking.
    #[track_caller]
    pub fn new(provider: &'static str, kind: ProviderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            provider,
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the provider name.
    pub fn provider(&self) -> &'static str {
        self.provider
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ProviderErrorKind {
        &self.kind
    }

    /// Whether a later attempt may succeed.
    pub fn is_retryable(&self) -> bool {
        self.kind.is_retryable()
    }
}
