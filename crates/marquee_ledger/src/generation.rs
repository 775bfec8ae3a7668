//! Generation-record operations on the ledger.

use crate::Ledger;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use marquee_core::{GenerationStatus, GeneratorKind, Platform};
use marquee_database::schema::generation_records;
use marquee_database::{GenerationRecordRow, NewGenerationRecordRow, UpdateGenerationRecordRow};
use marquee_error::{LedgerError, LedgerErrorKind, MarqueeResult};
use tracing::instrument;

impl Ledger {
    /// Create a generation attempt and immediately claim it for
    /// processing, stamping the processing marker.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert or the claim update fails.
    #[instrument(skip(self, parameters), fields(kind = %kind, platform = %platform))]
    pub fn begin_generation(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        parameters: serde_json::Value,
    ) -> MarqueeResult<GenerationRecordRow> {
        let mut conn = self.conn()?;

        let new_row = NewGenerationRecordRow {
            generator_kind: kind.to_string(),
            platform: platform.to_string(),
            status: GenerationStatus::Pending.to_string(),
            parameters,
        };

        let pending: GenerationRecordRow = diesel::insert_into(generation_records::table)
            .values(&new_row)
            .returning(GenerationRecordRow::as_returning())
            .get_result(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;

        tracing::debug!(record_id = pending.id(), "Created pending generation record");

        let now = Utc::now();
        let changes = UpdateGenerationRecordRow {
            status: Some(GenerationStatus::Processing.to_string()),
            processing_started_at: Some(Some(now)),
            updated_at: Some(now),
            ..Default::default()
        };

        let processing: GenerationRecordRow =
            diesel::update(generation_records::table.find(pending.id()))
                .set(&changes)
                .returning(GenerationRecordRow::as_returning())
                .get_result(&mut conn)
                .map_err(marquee_error::DatabaseError::from)?;

        tracing::info!(record_id = processing.id(), "Generation record claimed for processing");
        Ok(processing)
    }

    /// Transition a processing record to success with its published
    /// content id and fingerprint.
    ///
    /// # Errors
    ///
    /// Returns an error if the record is missing or the transition is
    /// not allowed from the record's current status.
    #[instrument(skip(self))]
    pub fn complete_generation(
        &self,
        record_id: i32,
        linked_content_id: i64,
        fingerprint: Option<String>,
    ) -> MarqueeResult<GenerationRecordRow> {
        self.transition_generation(
            record_id,
            GenerationStatus::Success,
            UpdateGenerationRecordRow {
                status: Some(GenerationStatus::Success.to_string()),
                linked_content_id: Some(Some(linked_content_id)),
                content_fingerprint: Some(fingerprint),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Transition a processing record to failed with a human-readable
    /// reason.
    ///
    /// # Errors
    ///
    /// Returns an error if `reason` is empty, the record is missing, or
    /// the transition is not allowed.
    #[instrument(skip(self))]
    pub fn fail_generation(
        &self,
        record_id: i32,
        reason: &str,
    ) -> MarqueeResult<GenerationRecordRow> {
        if reason.trim().is_empty() {
            return Err(
                LedgerError::new(LedgerErrorKind::MissingFailureReason(record_id)).into(),
            );
        }
        self.transition_generation(
            record_id,
            GenerationStatus::Failed,
            UpdateGenerationRecordRow {
                status: Some(GenerationStatus::Failed.to_string()),
                failure_reason: Some(Some(reason.to_string())),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Manual cancellation. Does not interrupt in-flight work; it only
    /// records the state.
    #[instrument(skip(self))]
    pub fn cancel_generation(&self, record_id: i32) -> MarqueeResult<GenerationRecordRow> {
        self.transition_generation(
            record_id,
            GenerationStatus::Cancelled,
            UpdateGenerationRecordRow {
                status: Some(GenerationStatus::Cancelled.to_string()),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Administrative transition for a success whose linked content was
    /// removed from the host.
    #[instrument(skip(self))]
    pub fn mark_generation_deleted(&self, record_id: i32) -> MarqueeResult<GenerationRecordRow> {
        self.transition_generation(
            record_id,
            GenerationStatus::Deleted,
            UpdateGenerationRecordRow {
                status: Some(GenerationStatus::Deleted.to_string()),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Load a generation record by id.
    ///
    /// # Errors
    ///
    /// Returns `RecordNotFound` if no such record exists.
    pub fn load_generation(&self, record_id: i32) -> MarqueeResult<GenerationRecordRow> {
        let mut conn = self.conn()?;
        generation_records::table
            .find(record_id)
            .select(GenerationRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?
            .ok_or_else(|| LedgerError::new(LedgerErrorKind::RecordNotFound(record_id)).into())
    }

    /// Most recent successful record for a (kind, platform) pair,
    /// regardless of age. The guard applies the window.
    pub fn latest_success(
        &self,
        kind: GeneratorKind,
        platform: Platform,
    ) -> MarqueeResult<Option<GenerationRecordRow>> {
        let mut conn = self.conn()?;
        let row = generation_records::table
            .filter(generation_records::generator_kind.eq(kind.to_string()))
            .filter(generation_records::platform.eq(platform.to_string()))
            .filter(generation_records::status.eq(GenerationStatus::Success.to_string()))
            .order(generation_records::created_at.desc())
            .select(GenerationRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(row)
    }

    /// Most recent processing record for a (kind, platform) pair. The
    /// guard decides whether its marker is stale enough to reclaim.
    pub fn latest_processing(
        &self,
        kind: GeneratorKind,
        platform: Platform,
    ) -> MarqueeResult<Option<GenerationRecordRow>> {
        let mut conn = self.conn()?;
        let row = generation_records::table
            .filter(generation_records::generator_kind.eq(kind.to_string()))
            .filter(generation_records::platform.eq(platform.to_string()))
            .filter(generation_records::status.eq(GenerationStatus::Processing.to_string()))
            .order(generation_records::processing_started_at.desc())
            .select(GenerationRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(row)
    }

    /// Whether a prior success for this (kind, platform) pair carries
    /// the given content fingerprint.
    pub fn fingerprint_seen(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        fingerprint: &str,
    ) -> MarqueeResult<bool> {
        let mut conn = self.conn()?;
        let count: i64 = generation_records::table
            .filter(generation_records::generator_kind.eq(kind.to_string()))
            .filter(generation_records::platform.eq(platform.to_string()))
            .filter(generation_records::status.eq(GenerationStatus::Success.to_string()))
            .filter(generation_records::content_fingerprint.eq(fingerprint))
            .count()
            .get_result(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(count > 0)
    }

    /// Remove failed and cancelled records older than the cutoff.
    ///
    /// Idempotent: sweeping a ledger with no records past the cutoff is
    /// a no-op and reports zero rows.
    #[instrument(skip(self))]
    pub fn sweep_retention(&self, cutoff: DateTime<Utc>) -> MarqueeResult<usize> {
        let mut conn = self.conn()?;
        let swept = diesel::delete(
            generation_records::table
                .filter(generation_records::status.eq_any(vec![
                    GenerationStatus::Failed.to_string(),
                    GenerationStatus::Cancelled.to_string(),
                ]))
                .filter(generation_records::created_at.lt(cutoff)),
        )
        .execute(&mut conn)
        .map_err(marquee_error::DatabaseError::from)?;

        tracing::info!(swept, "Retention sweep complete");
        Ok(swept)
    }

    /// Apply a status transition after validating it against the
    /// record's current status.
    fn transition_generation(
        &self,
        record_id: i32,
        to: GenerationStatus,
        changes: UpdateGenerationRecordRow,
    ) -> MarqueeResult<GenerationRecordRow> {
        let current = self.load_generation(record_id)?;
        let from: GenerationStatus = current.status().parse().map_err(|_| {
            LedgerError::new(LedgerErrorKind::InvalidTransition {
                from: current.status().clone(),
                to: to.to_string(),
            })
        })?;

        if !from.can_transition(to) {
            return Err(LedgerError::new(LedgerErrorKind::InvalidTransition {
                from: from.to_string(),
                to: to.to_string(),
            })
            .into());
        }

        let mut conn = self.conn()?;
        let updated: GenerationRecordRow =
            diesel::update(generation_records::table.find(record_id))
                .set(&changes)
                .returning(GenerationRecordRow::as_returning())
                .get_result(&mut conn)
                .map_err(marquee_error::DatabaseError::from)?;

        tracing::debug!(record_id, from = %from, to = %to, "Generation transition applied");
        Ok(updated)
    }
}
