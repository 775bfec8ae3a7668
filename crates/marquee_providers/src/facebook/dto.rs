//! Wire types for the graph API feed endpoint.

use serde::{Deserialize, Serialize};

/// Form body for a page feed post.
#[derive(Debug, Clone, Serialize)]
pub struct FeedPostRequest {
    /// Post message or caption
    pub message: String,
    /// Link back to the published article
    pub link: String,
    /// Page access token
    pub access_token: String,
}

/// Successful feed post response.
#[derive(Debug, Clone, Deserialize)]
pub struct FeedPostResponse {
    /// Vendor id of the created post. Absent ids on a 200 are treated
    /// as a failed attempt, not a success.
    pub id: Option<String>,
}

/// Error envelope returned by the graph API.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphErrorEnvelope {
    /// The error payload
    pub error: GraphError,
}

/// Graph API error payload.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphError {
    /// Human-readable message
    #[serde(default)]
    pub message: String,
    /// Vendor error code
    pub code: i64,
    /// Finer-grained subcode, when present
    #[serde(default)]
    pub error_subcode: Option<i64>,
}

/// How a vendor error body should be handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphErrorClass {
    /// Throttling codes: the whole post is deferred, not retried now.
    RateLimited,
    /// The vendor refused identical content. The post already exists,
    /// so the attempt counts as shared.
    DuplicateContent,
    /// Anything else: surface as an API error.
    Other,
}

impl GraphError {
    /// Throttling codes across app, user, and page scopes.
    const RATE_LIMIT_CODES: [i64; 4] = [4, 17, 32, 613];
    /// "Duplicate status message" code.
    const DUPLICATE_CODE: i64 = 506;

    /// Classify the error for the publish flow.
    pub fn classify(&self) -> GraphErrorClass {
        if Self::RATE_LIMIT_CODES.contains(&self.code) {
            GraphErrorClass::RateLimited
        } else if self.code == Self::DUPLICATE_CODE {
            GraphErrorClass::DuplicateContent
        } else {
            GraphErrorClass::Other
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn error_with_code(code: i64) -> GraphError {
        GraphError {
            message: String::new(),
            code,
            error_subcode: None,
        }
    }

    #[test]
    fn throttle_codes_classify_as_rate_limited() {
        for code in [4, 17, 32, 613] {
            assert_eq!(
                error_with_code(code).classify(),
                GraphErrorClass::RateLimited,
                "code {code}"
            );
        }
    }

    #[test]
    fn duplicate_code_classifies_as_duplicate() {
        assert_eq!(
            error_with_code(506).classify(),
            GraphErrorClass::DuplicateContent
        );
    }

    #[test]
    fn unknown_codes_classify_as_other() {
        assert_eq!(error_with_code(100).classify(), GraphErrorClass::Other);
        assert_eq!(error_with_code(190).classify(), GraphErrorClass::Other);
    }

    #[test]
    fn error_envelope_parses() {
        let body = r#"{"error":{"message":"(#32) Page request limit reached","code":32,"error_subcode":null}}"#;
        let envelope: GraphErrorEnvelope = serde_json::from_str(body).unwrap();
        assert_eq!(envelope.error.code, 32);
        assert_eq!(envelope.error.classify(), GraphErrorClass::RateLimited);
    }

    #[test]
    fn post_response_parses_with_and_without_id() {
        let with: FeedPostResponse = serde_json::from_str(r#"{"id":"123_456"}"#).unwrap();
        assert_eq!(with.id.as_deref(), Some("123_456"));

        let without: FeedPostResponse = serde_json::from_str(r#"{}"#).unwrap();
        assert!(without.id.is_none());
    }
}
