//! Durable generation/share ledger and duplicate guard.
//!
//! The ledger owns the `generation_records` and `share_records` tables
//! exclusively. Orchestrators and provider wrappers read and write
//! attempt state only through this interface, never touching storage
//! directly. Concurrency control is persisted markers re-read at the
//! start of each attempt, not locks; see the guard module.

mod generation;
mod guard;
mod share;
mod summary;

pub use guard::{
    DuplicateGuard, GenerationGuardDecision, ShareGuardDecision, marker_blocks, reclaim_timeout,
    within_window,
};
pub use summary::LedgerSummary;

use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::PgConnection;
use marquee_database::PgPool;
use marquee_error::{DatabaseError, DatabaseErrorKind, MarqueeResult};

/// Handle to the attempt ledger.
#[derive(Clone)]
pub struct Ledger {
    pool: PgPool,
}

impl Ledger {
    /// Creates a ledger over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Creates a ledger from `DATABASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the pool cannot be created.
    pub fn from_env() -> MarqueeResult<Self> {
        Ok(Self::new(marquee_database::create_pool()?))
    }

    /// Guard view over this ledger.
    pub fn guard(&self) -> DuplicateGuard<'_> {
        DuplicateGuard::new(self)
    }

    pub(crate) fn conn(
        &self,
    ) -> MarqueeResult<PooledConnection<ConnectionManager<PgConnection>>> {
        self.pool.get().map_err(|e| {
            DatabaseError::new(DatabaseErrorKind::Connection(e.to_string())).into()
        })
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger").finish_non_exhaustive()
    }
}
