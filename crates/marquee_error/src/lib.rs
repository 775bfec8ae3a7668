//! Error types for the Marquee editorial pipeline.
//!
//! This crate provides the foundation error types used throughout the
//! Marquee workspace. Each domain has its own error struct with a kind
//! enum and source-location capture; `MarqueeError` aggregates them all
//! behind a boxed kind so `MarqueeResult` stays a single machine word on
//! the happy path.

mod config;
mod database;
mod ledger;
mod pipeline;
mod provider;
mod server;

pub use config::ConfigError;
pub use database::{DatabaseError, DatabaseErrorKind};
pub use ledger::{LedgerError, LedgerErrorKind};
pub use pipeline::{PipelineError, PipelineErrorKind};
pub use provider::{ProviderError, ProviderErrorKind};
pub use server::{ServerError, ServerErrorKind};

/// Crate-level error variants.
#[derive(Debug, derive_more::From)]
pub enum MarqueeErrorKind {
    /// Configuration error
    Config(ConfigError),
    /// Database error
    Database(DatabaseError),
    /// Ledger state error
    Ledger(LedgerError),
    /// External provider error
    Provider(ProviderError),
    /// Generation pipeline error
    Pipeline(PipelineError),
    /// Scheduler/bot server error
    Server(ServerError),
}

impl std::fmt::Display for MarqueeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarqueeErrorKind::Config(e) => write!(f, "{}", e),
            MarqueeErrorKind::Database(e) => write!(f, "{}", e),
            MarqueeErrorKind::Ledger(e) => write!(f, "{}", e),
            MarqueeErrorKind::Provider(e) => write!(f, "{}", e),
            MarqueeErrorKind::Pipeline(e) => write!(f, "{}", e),
            MarqueeErrorKind::Server(e) => write!(f, "{}", e),
        }
    }
}

/// Marquee error with kind discrimination.
#[derive(Debug)]
pub struct MarqueeError(Box<MarqueeErrorKind>);

impl MarqueeError {
    /// Create a new error from a kind.
    pub fn new(kind: MarqueeErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &MarqueeErrorKind {
        &self.0
    }

    /// Whether a later attempt at the same operation may succeed.
    ///
    /// Only provider errors carry retryability; every other kind is a
    /// state or programming problem that repetition will not fix.
    pub fn is_retryable(&self) -> bool {
        match self.kind() {
            MarqueeErrorKind::Provider(e) => e.is_retryable(),
            _ => false,
        }
    }
}

impl std::fmt::Display for MarqueeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Marquee Error: {}", self.0)
    }
}

impl std::error::Error for MarqueeError {}

// Generic From implementation for any type that converts to MarqueeErrorKind
impl<T> From<T> for MarqueeError
where
    T: Into<MarqueeErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Marquee operations.
pub type MarqueeResult<T> = std::result::Result<T, MarqueeError>;
