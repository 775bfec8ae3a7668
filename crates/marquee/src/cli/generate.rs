//! One-off generation command handler.

use marquee_core::{GeneratorKind, Platform};
use marquee_error::{ConfigError, MarqueeResult};

use super::wire;

/// Handle the `generate` command.
///
/// Runs a single generation job and prints the ledger record. The
/// duplicate guard applies exactly as it does under the server, so a
/// second invocation inside the dedup window prints the blocking
/// record instead of publishing again.
#[tracing::instrument(skip_all, fields(kind = %kind, platform = %platform))]
pub async fn handle_generate_command(
    kind: String,
    platform: String,
    count: Option<usize>,
) -> MarqueeResult<()> {
    let kind: GeneratorKind = kind
        .parse()
        .map_err(|_| ConfigError::new(format!("unknown article kind '{kind}'")))?;
    let platform = Platform::resolve(&platform)
        .ok_or_else(|| ConfigError::new(format!("unknown platform '{platform}'")))?;
    let parameters = match count {
        Some(count) => serde_json::json!({ "count": count }),
        None => serde_json::json!({}),
    };

    let ledger = wire::open_ledger()?;
    let orchestrator = wire::generation_orchestrator(ledger)?;
    let record = orchestrator.run(kind, platform, parameters).await?;

    println!(
        "record {} status={} content={}",
        record.id(),
        record.status(),
        match record.linked_content_id() {
            Some(id) => id.to_string(),
            None => "-".to_string(),
        },
    );
    if let Some(reason) = record.failure_reason() {
        println!("failure: {reason}");
    }

    Ok(())
}
