//! Shared wiring between command handlers.
//!
//! Every command that touches the database or the vendors builds its
//! collaborators here, so a one-off `generate` runs through exactly the
//! same stack as the long-running server.

use marquee_error::MarqueeResult;
use marquee_ledger::Ledger;
use marquee_pipeline::{GenerationOrchestrator, ShareOrchestrator};
use marquee_providers::{FacebookClient, OpenAiClient, RestHost, TmdbClient};
use std::sync::Arc;

/// Platform key the share path posts to.
pub(crate) const SOCIAL_PLATFORM: &str = "facebook";

/// Opens the ledger, applying pending migrations first.
pub(crate) fn open_ledger() -> MarqueeResult<Ledger> {
    let mut conn = marquee_database::establish_connection()?;
    marquee_database::run_migrations(&mut conn)?;
    Ledger::from_env()
}

/// Builds the generation orchestrator from environment credentials.
pub(crate) fn generation_orchestrator(ledger: Ledger) -> MarqueeResult<GenerationOrchestrator> {
    let source = Arc::new(TmdbClient::from_env()?);
    let text = Arc::new(OpenAiClient::from_env()?);
    let host = Arc::new(RestHost::from_env()?);
    Ok(GenerationOrchestrator::new(ledger, source, text, host))
}

/// Builds the share orchestrator from environment credentials.
pub(crate) fn share_orchestrator(ledger: Ledger) -> MarqueeResult<ShareOrchestrator> {
    let poster = Arc::new(FacebookClient::from_env()?);
    let host = Arc::new(RestHost::from_env()?);
    Ok(ShareOrchestrator::new(ledger, poster, host))
}
