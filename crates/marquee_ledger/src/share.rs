//! Share-record operations on the ledger.

use crate::Ledger;
use chrono::{DateTime, Utc};
use diesel::dsl::not;
use diesel::prelude::*;
use marquee_core::{GenerationStatus, ShareStatus};
use marquee_database::schema::{generation_records, share_records};
use marquee_database::{
    GenerationRecordRow, NewShareRecordRow, ShareRecordRow, UpdateShareRecordRow,
};
use marquee_error::{LedgerError, LedgerErrorKind, MarqueeResult};
use tracing::instrument;

impl Ledger {
    /// Claim a share attempt for processing.
    ///
    /// Reuses an existing pending record for the (content, platform)
    /// pair when one exists (a deferred share coming due), otherwise
    /// inserts a fresh one. Either way the record leaves here in
    /// `processing` with a fresh marker.
    #[instrument(skip(self))]
    pub fn begin_share(&self, content_id: i64, platform: &str) -> MarqueeResult<ShareRecordRow> {
        let mut conn = self.conn()?;

        let existing: Option<ShareRecordRow> = share_records::table
            .filter(share_records::content_id.eq(content_id))
            .filter(share_records::platform.eq(platform))
            .filter(share_records::status.eq(ShareStatus::Pending.to_string()))
            .order(share_records::created_at.desc())
            .select(ShareRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?;

        let pending = match existing {
            Some(row) => {
                tracing::debug!(record_id = row.id(), "Reusing pending share record");
                row
            }
            None => {
                let new_row = NewShareRecordRow {
                    content_id,
                    platform: platform.to_string(),
                    status: ShareStatus::Pending.to_string(),
                };
                diesel::insert_into(share_records::table)
                    .values(&new_row)
                    .returning(ShareRecordRow::as_returning())
                    .get_result(&mut conn)
                    .map_err(marquee_error::DatabaseError::from)?
            }
        };

        let now = Utc::now();
        let changes = UpdateShareRecordRow {
            status: Some(ShareStatus::Processing.to_string()),
            processing_started_at: Some(Some(now)),
            next_attempt_at: Some(None),
            updated_at: Some(now),
            ..Default::default()
        };

        let processing: ShareRecordRow = diesel::update(share_records::table.find(pending.id()))
            .set(&changes)
            .returning(ShareRecordRow::as_returning())
            .get_result(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;

        tracing::info!(record_id = processing.id(), content_id, platform, "Share claimed");
        Ok(processing)
    }

    /// Transition a processing share to success.
    ///
    /// `social_post_id` is `None` when the vendor reported the post as
    /// duplicate content: the target state is achieved without a new
    /// post, so no id exists to record.
    #[instrument(skip(self))]
    pub fn complete_share(
        &self,
        record_id: i32,
        social_post_id: Option<String>,
    ) -> MarqueeResult<ShareRecordRow> {
        self.transition_share(
            record_id,
            ShareStatus::Success,
            UpdateShareRecordRow {
                status: Some(ShareStatus::Success.to_string()),
                social_post_id: Some(social_post_id),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Transition a processing share to failed with a reason.
    #[instrument(skip(self))]
    pub fn fail_share(&self, record_id: i32, reason: &str) -> MarqueeResult<ShareRecordRow> {
        if reason.trim().is_empty() {
            return Err(
                LedgerError::new(LedgerErrorKind::MissingFailureReason(record_id)).into(),
            );
        }
        self.transition_share(
            record_id,
            ShareStatus::Failed,
            UpdateShareRecordRow {
                status: Some(ShareStatus::Failed.to_string()),
                failure_reason: Some(Some(reason.to_string())),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Return a processing share to pending with a future attempt time.
    ///
    /// Used for vendor rate limits: the share is rescheduled, never
    /// failed.
    #[instrument(skip(self))]
    pub fn defer_share(
        &self,
        record_id: i32,
        retry_at: DateTime<Utc>,
    ) -> MarqueeResult<ShareRecordRow> {
        self.transition_share(
            record_id,
            ShareStatus::Pending,
            UpdateShareRecordRow {
                status: Some(ShareStatus::Pending.to_string()),
                next_attempt_at: Some(Some(retry_at)),
                processing_started_at: Some(None),
                updated_at: Some(Utc::now()),
                ..Default::default()
            },
        )
    }

    /// Load a share record by id.
    pub fn load_share(&self, record_id: i32) -> MarqueeResult<ShareRecordRow> {
        let mut conn = self.conn()?;
        share_records::table
            .find(record_id)
            .select(ShareRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?
            .ok_or_else(|| LedgerError::new(LedgerErrorKind::RecordNotFound(record_id)).into())
    }

    /// The successful share for a (content, platform) pair, if any.
    pub fn successful_share(
        &self,
        content_id: i64,
        platform: &str,
    ) -> MarqueeResult<Option<ShareRecordRow>> {
        let mut conn = self.conn()?;
        let row = share_records::table
            .filter(share_records::content_id.eq(content_id))
            .filter(share_records::platform.eq(platform))
            .filter(share_records::status.eq(ShareStatus::Success.to_string()))
            .select(ShareRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(row)
    }

    /// The most recent processing share for a (content, platform) pair.
    pub fn share_in_flight(
        &self,
        content_id: i64,
        platform: &str,
    ) -> MarqueeResult<Option<ShareRecordRow>> {
        let mut conn = self.conn()?;
        let row = share_records::table
            .filter(share_records::content_id.eq(content_id))
            .filter(share_records::platform.eq(platform))
            .filter(share_records::status.eq(ShareStatus::Processing.to_string()))
            .order(share_records::processing_started_at.desc())
            .select(ShareRecordRow::as_select())
            .first(&mut conn)
            .optional()
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(row)
    }

    /// Successful generations whose linked content has no share record
    /// yet for `platform`, oldest first.
    ///
    /// Drives the share bot's first attempt at each article; deferred
    /// retries come through [`Ledger::due_shares`] instead.
    pub fn unshared_successes(
        &self,
        platform: &str,
        limit: i64,
    ) -> MarqueeResult<Vec<GenerationRecordRow>> {
        let mut conn = self.conn()?;
        let attempted = share_records::table
            .filter(share_records::platform.eq(platform))
            .select(share_records::content_id);

        let rows = generation_records::table
            .filter(generation_records::status.eq(GenerationStatus::Success.to_string()))
            .filter(generation_records::linked_content_id.is_not_null())
            .filter(not(generation_records::linked_content_id
                .assume_not_null()
                .eq_any(attempted)))
            .order(generation_records::created_at.asc())
            .limit(limit)
            .select(GenerationRecordRow::as_select())
            .load(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(rows)
    }

    /// Pending shares whose attempt time has arrived (or was never set).
    pub fn due_shares(&self, now: DateTime<Utc>) -> MarqueeResult<Vec<ShareRecordRow>> {
        let mut conn = self.conn()?;
        let rows = share_records::table
            .filter(share_records::status.eq(ShareStatus::Pending.to_string()))
            .filter(
                share_records::next_attempt_at
                    .is_null()
                    .or(share_records::next_attempt_at.le(now)),
            )
            .order(share_records::created_at.asc())
            .select(ShareRecordRow::as_select())
            .load(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(rows)
    }

    fn transition_share(
        &self,
        record_id: i32,
        to: ShareStatus,
        changes: UpdateShareRecordRow,
    ) -> MarqueeResult<ShareRecordRow> {
        let current = self.load_share(record_id)?;
        let from: ShareStatus = current.status().parse().map_err(|_| {
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
        let updated: ShareRecordRow = diesel::update(share_records::table.find(record_id))
            .set(&changes)
            .returning(ShareRecordRow::as_returning())
            .get_result(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;

        tracing::debug!(record_id, from = %from, to = %to, "Share transition applied");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Queries here run against Postgres; what a unit test can pin down
    // is the seeding contract the share bot relies on: first-time
    // shares come back as generation rows, not share rows.
    #[test]
    fn unshared_successes_yields_generation_rows() {
        fn signature(f: fn(&Ledger, &str, i64) -> MarqueeResult<Vec<GenerationRecordRow>>) {
            let _ = f;
        }
        signature(Ledger::unshared_successes);
    }
}
