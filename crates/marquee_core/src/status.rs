//! Lifecycle statuses for generation and share records.

use serde::{Deserialize, Serialize};

/// Status of a generation attempt.
///
/// Transitions are monotonic: `pending -> processing -> {success, failed}`.
/// Pending or processing records may be cancelled manually; a success may
/// be marked deleted when its linked content is removed. Terminal records
/// are otherwise immutable.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GenerationStatus {
    Pending,
    Processing,
    Success,
    Failed,
    Cancelled,
    Deleted,
}

impl GenerationStatus {
    /// Whether this status permits a transition to `to`.
    pub fn can_transition(&self, to: GenerationStatus) -> bool {
        use GenerationStatus::*;
        matches!(
            (self, to),
            (Pending, Processing)
                | (Pending, Cancelled)
                | (Processing, Success)
                | (Processing, Failed)
                | (Processing, Cancelled)
                | (Success, Deleted)
        )
    }

    /// Whether the record has reached a state it can never leave,
    /// short of the administrative deleted transition.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GenerationStatus::Success
                | GenerationStatus::Failed
                | GenerationStatus::Cancelled
                | GenerationStatus::Deleted
        )
    }
}

/// Status of a share attempt.
///
/// A deferred share returns to `pending` with a future `next_attempt_at`
/// rather than taking a distinct status, so the pending/processing guard
/// logic covers it unchanged.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ShareStatus {
    Pending,
    Processing,
    Success,
    Failed,
}

impl ShareStatus {
    /// Whether this status permits a transition to `to`.
    pub fn can_transition(&self, to: ShareStatus) -> bool {
        use ShareStatus::*;
        matches!(
            (self, to),
            (Pending, Processing)
                | (Processing, Success)
                | (Processing, Failed)
                // deferral: back to pending for a later attempt
                | (Processing, Pending)
        )
    }

    /// Whether the record can never be attempted again.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ShareStatus::Success | ShareStatus::Failed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_transitions_are_monotonic() {
        use GenerationStatus::*;
        assert!(Pending.can_transition(Processing));
        assert!(Processing.can_transition(Success));
        assert!(Processing.can_transition(Failed));
        assert!(Success.can_transition(Deleted));

        assert!(!Success.can_transition(Processing));
        assert!(!Failed.can_transition(Success));
        assert!(!Pending.can_transition(Success));
        assert!(!Deleted.can_transition(Pending));
    }

    #[test]
    fn share_deferral_returns_to_pending() {
        use ShareStatus::*;
        assert!(Processing.can_transition(Pending));
        assert!(!Success.can_transition(Pending));
        assert!(!Failed.can_transition(Pending));
    }

    #[test]
    fn status_strings_match_database_values() {
        assert_eq!(GenerationStatus::Processing.to_string(), "processing");
        assert_eq!(
            "failed".parse::<GenerationStatus>().unwrap(),
            GenerationStatus::Failed
        );
        assert_eq!(ShareStatus::Pending.to_string(), "pending");
    }
}
