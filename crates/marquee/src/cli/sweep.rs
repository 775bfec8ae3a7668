//! Retention sweep command handler.

use chrono::{Duration, Utc};
use marquee_error::MarqueeResult;

use super::wire;

/// Handle the `sweep` command.
///
/// Deletes failed and cancelled generation records older than the
/// window. Successful records are never swept; they back the duplicate
/// guard.
#[tracing::instrument]
pub fn handle_sweep_command(days: i64) -> MarqueeResult<()> {
    let ledger = wire::open_ledger()?;
    let cutoff = Utc::now() - Duration::days(days);
    let swept = ledger.sweep_retention(cutoff)?;
    println!("swept {swept} records older than {days} days");
    Ok(())
}
