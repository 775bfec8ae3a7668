//! Error types for the generation pipeline.

/// Error kinds for orchestrated generation runs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum PipelineErrorKind {
    /// No usable candidates survived selection and fallback.
    #[display("No candidates: {_0}")]
    NoCandidates(String),
    /// The assembled article matches a previously published one.
    #[display("Duplicate content fingerprint: {_0}")]
    FingerprintDuplicate(String),
    /// The content host rejected the publish.
    #[display("Publish failed: {_0}")]
    Publish(String),
    /// The text provider produced unusable output.
    #[display("Text generation failed: {_0}")]
    TextGeneration(String),
    /// Run parameters were missing or malformed.
    #[display("Invalid parameters: {_0}")]
    InvalidParameters(String),
}

/// Pipeline error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Pipeline Error: {} at line {} in {}", kind, line, file)]
pub struct PipelineError {
    kind: PipelineErrorKind,
    line: u32,
    file: &'static str,
}

impl PipelineError {
    /// Create a new pipeline error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PipelineErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PipelineErrorKind {
        &self.kind
    }
}
