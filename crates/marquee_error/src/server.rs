//! Error types for the scheduler/bot server.

/// Error kinds for server operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum ServerErrorKind {
    /// Configuration file or environment problem.
    #[display("Configuration error: {_0}")]
    Configuration(String),
    /// A bot command channel closed unexpectedly.
    #[display("Channel error: {_0}")]
    Channel(String),
    /// A cadence expression could not be parsed.
    #[display("Schedule error: {_0}")]
    Schedule(String),
}

/// Server error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Server Error: {} at line {} in {}", kind, line, file)]
pub struct ServerError {
    kind: ServerErrorKind,
    line: u32,
    file: &'static str,
}

impl ServerError {
    /// Create a new server error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ServerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ServerErrorKind {
        &self.kind
    }
}
