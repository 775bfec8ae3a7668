//! Error types for the generation/share ledger.

/// Error kinds for ledger operations.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum LedgerErrorKind {
    /// A status transition that violates the monotonic lifecycle.
    #[display("Invalid transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },
    /// Record id not present in the ledger.
    #[display("Record {_0} not found")]
    RecordNotFound(i32),
    /// A terminal success is missing its linked content id.
    #[display("Success record {_0} has no linked content id")]
    MissingLinkedContent(i32),
    /// A terminal failure is missing its reason.
    #[display("Failed record {_0} has no failure reason")]
    MissingFailureReason(i32),
}

/// Ledger error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Ledger Error: {} at line {} in {}", kind, line, file)]
pub struct LedgerError {
    kind: LedgerErrorKind,
    line: u32,
    file: &'static str,
}

impl LedgerError {
    /// Create a new ledger error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: LedgerErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &LedgerErrorKind {
        &self.kind
    }
}
