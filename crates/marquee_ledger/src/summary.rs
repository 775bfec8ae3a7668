//! Status readout over the ledger: the data behind an admin dashboard.

use crate::Ledger;
use diesel::prelude::*;
use marquee_core::GenerationStatus;
use marquee_database::GenerationRecordRow;
use marquee_database::schema::generation_records;
use marquee_error::MarqueeResult;
use serde::Serialize;
use tracing::instrument;

/// Counts of generation records by status, plus recent failures.
#[derive(Debug, Clone, Default, Serialize, derive_getters::Getters)]
pub struct LedgerSummary {
    pending: i64,
    processing: i64,
    success: i64,
    failed: i64,
    cancelled: i64,
    deleted: i64,
}

impl LedgerSummary {
    /// Total records accounted for.
    pub fn total(&self) -> i64 {
        self.pending + self.processing + self.success + self.failed + self.cancelled + self.deleted
    }
}

impl Ledger {
    /// Count generation records by status.
    #[instrument(skip(self))]
    pub fn summary(&self) -> MarqueeResult<LedgerSummary> {
        let mut conn = self.conn()?;
        let counts: Vec<(String, i64)> = generation_records::table
            .group_by(generation_records::status)
            .select((generation_records::status, diesel::dsl::count_star()))
            .load(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;

        let mut summary = LedgerSummary::default();
        for (status, count) in counts {
            match status.parse::<GenerationStatus>() {
                Ok(GenerationStatus::Pending) => summary.pending = count,
                Ok(GenerationStatus::Processing) => summary.processing = count,
                Ok(GenerationStatus::Success) => summary.success = count,
                Ok(GenerationStatus::Failed) => summary.failed = count,
                Ok(GenerationStatus::Cancelled) => summary.cancelled = count,
                Ok(GenerationStatus::Deleted) => summary.deleted = count,
                Err(_) => tracing::warn!(status, "Unrecognized status in ledger"),
            }
        }
        Ok(summary)
    }

    /// The most recent failed records, newest first.
    #[instrument(skip(self))]
    pub fn recent_failures(&self, limit: i64) -> MarqueeResult<Vec<GenerationRecordRow>> {
        let mut conn = self.conn()?;
        let rows = generation_records::table
            .filter(generation_records::status.eq(GenerationStatus::Failed.to_string()))
            .order(generation_records::updated_at.desc())
            .limit(limit)
            .select(GenerationRecordRow::as_select())
            .load(&mut conn)
            .map_err(marquee_error::DatabaseError::from)?;
        Ok(rows)
    }
}
