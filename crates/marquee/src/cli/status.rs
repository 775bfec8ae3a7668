//! Status command handler.

use marquee_error::MarqueeResult;
use marquee_server::{StatusReport, doctor, doctor_passes};

use super::wire;

/// Handle the `status` command.
pub fn handle_status_command() -> MarqueeResult<()> {
    let findings = doctor();
    for finding in &findings {
        let mark = if finding.ok { "ok" } else { "MISSING" };
        println!("env {:24} {mark}", finding.name);
    }
    if !doctor_passes(&findings) {
        println!("\nSome required environment variables are missing.");
    }

    let ledger = wire::open_ledger()?;
    let report = StatusReport::gather(&ledger)?;
    println!("\n{}", report.render());

    Ok(())
}
