//! Diesel models for the generation and share ledgers.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::Serialize;

/// Database row for the generation_records table.
///
/// One row per attempt to produce an article: kind, platform, status,
/// the linked content once published, and failure details otherwise.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, derive_getters::Getters)]
#[diesel(table_name = crate::schema::generation_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct GenerationRecordRow {
    id: i32,
    generator_kind: String,
    platform: String,
    status: String,
    linked_content_id: Option<i64>,
    parameters: serde_json::Value,
    failure_reason: Option<String>,
    content_fingerprint: Option<String>,
    processing_started_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Insertable struct for starting a new generation attempt.
///
/// Status is 'pending' at insert; the ledger marks it 'processing'
/// immediately after.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::generation_records)]
pub struct NewGenerationRecordRow {
    pub generator_kind: String,
    pub platform: String,
    pub status: String,
    pub parameters: serde_json::Value,
}

/// Updateable struct for generation status transitions.
///
/// Only the fields relevant to the transition are set; everything else
/// stays `None` and untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::generation_records)]
pub struct UpdateGenerationRecordRow {
    pub status: Option<String>,
    pub linked_content_id: Option<Option<i64>>,
    pub failure_reason: Option<Option<String>>,
    pub content_fingerprint: Option<Option<String>>,
    pub processing_started_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Database row for the share_records table.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Serialize, derive_getters::Getters)]
#[diesel(table_name = crate::schema::share_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ShareRecordRow {
    id: i32,
    content_id: i64,
    platform: String,
    social_post_id: Option<String>,
    status: String,
    failure_reason: Option<String>,
    next_attempt_at: Option<DateTime<Utc>>,
    processing_started_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Insertable struct for a new share attempt.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = crate::schema::share_records)]
pub struct NewShareRecordRow {
    pub content_id: i64,
    pub platform: String,
    pub status: String,
}

/// Updateable struct for share status transitions.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = crate::schema::share_records)]
pub struct UpdateShareRecordRow {
    pub status: Option<String>,
    pub social_post_id: Option<Option<String>>,
    pub failure_reason: Option<Option<String>>,
    pub next_attempt_at: Option<Option<DateTime<Utc>>>,
    pub processing_started_at: Option<Option<DateTime<Utc>>>,
    pub updated_at: Option<DateTime<Utc>>,
}
