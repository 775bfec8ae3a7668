//! PostgreSQL integration for the Marquee ledger.
//!
//! Schema, row models, and connection helpers for the two ledger tables.
//! All reads and writes go through `marquee_ledger`; nothing else in the
//! workspace touches these tables directly.

mod connection;
mod models;
pub mod schema;

pub use connection::{MIGRATIONS, PgPool, create_pool, establish_connection, run_migrations};
pub use models::{
    GenerationRecordRow, NewGenerationRecordRow, NewShareRecordRow, ShareRecordRow,
    UpdateGenerationRecordRow, UpdateShareRecordRow,
};

/// Result type for database operations.
pub type DatabaseResult<T> = std::result::Result<T, marquee_error::DatabaseError>;
