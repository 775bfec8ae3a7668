//! One-off share command handler.

use marquee_core::SocialPost;
use marquee_error::MarqueeResult;
use marquee_pipeline::ShareOutcome;
use marquee_server::MarqueeConfig;
use std::path::PathBuf;

use super::wire;

/// Handle the `share` command.
///
/// Shares one published article using the link and message settings
/// from the server configuration. Re-running for an already-shared
/// article is a no-op, the same as under the share bot.
#[tracing::instrument(skip_all, fields(content_id))]
pub async fn handle_share_command(content_id: i64, config_path: PathBuf) -> MarqueeResult<()> {
    let config = MarqueeConfig::from_file(&config_path)?;
    let sharing = config.sharing();
    let post = SocialPost {
        message: sharing.message_for(content_id),
        link: sharing.article_link(content_id),
    };

    let ledger = wire::open_ledger()?;
    let orchestrator = wire::share_orchestrator(ledger)?;
    let outcome = orchestrator.share(content_id, &post).await?;

    match outcome {
        ShareOutcome::Shared(record) => match record.social_post_id() {
            Some(post_id) => println!("shared content {content_id} as post {post_id}"),
            None => println!("shared content {content_id}"),
        },
        ShareOutcome::AlreadyShared(_) => println!("content {content_id} was already shared"),
        ShareOutcome::HostMarked(marker) => {
            println!("content {content_id} carries a share marker: {marker}");
        }
        ShareOutcome::InFlight(_) => {
            println!("another share of content {content_id} is in flight");
        }
        ShareOutcome::Deferred(record) => match record.next_attempt_at() {
            Some(retry_at) => println!("share of content {content_id} deferred until {retry_at}"),
            None => println!("share of content {content_id} deferred"),
        },
        ShareOutcome::Failed(record) => println!(
            "share of content {content_id} failed: {}",
            record
                .failure_reason()
                .clone()
                .unwrap_or_else(|| "(no reason recorded)".to_string()),
        ),
    }

    Ok(())
}
