//! Administrative record transitions.

use marquee_error::MarqueeResult;

use super::wire;

/// Handle the `cancel` command.
///
/// `cancel` moves a pending or processing record to cancelled, freeing
/// its slot for a fresh run. With `--deleted`, a successful record is
/// marked deleted instead, which removes it from the duplicate guard's
/// view after its article was taken down.
#[tracing::instrument]
pub fn handle_cancel_command(record_id: i32, deleted: bool) -> MarqueeResult<()> {
    let ledger = wire::open_ledger()?;
    let record = if deleted {
        ledger.mark_generation_deleted(record_id)?
    } else {
        ledger.cancel_generation(record_id)?
    };
    println!("record {} status={}", record.id(), record.status());
    Ok(())
}
