//! The generation run: guard, select, assemble, publish, record.

use crate::assembler::ArticleAssembler;
use crate::params::GenerationParameters;
use crate::source::MetadataSource;
use crate::strategies::select_candidates;
use chrono::Utc;
use marquee_core::{
    ContentHost, GeneratorKind, Platform, TextGenerator, content_fingerprint,
};
use marquee_database::GenerationRecordRow;
use marquee_error::MarqueeResult;
use marquee_ledger::{GenerationGuardDecision, Ledger};
use std::sync::Arc;
use tracing::{error, info, instrument, warn};

/// Runs generation jobs end to end and records every outcome on the
/// ledger. Failures inside a claimed run produce a failed record, not an
/// error; only ledger I/O itself bubbles up.
pub struct GenerationOrchestrator {
    ledger: Ledger,
    source: Arc<dyn MetadataSource>,
    text: Arc<dyn TextGenerator>,
    host: Arc<dyn ContentHost>,
}

impl GenerationOrchestrator {
    /// Creates an orchestrator over the given collaborators.
    pub fn new(
        ledger: Ledger,
        source: Arc<dyn MetadataSource>,
        text: Arc<dyn TextGenerator>,
        host: Arc<dyn ContentHost>,
    ) -> Self {
        Self { ledger, source, text, host }
    }

    /// Run one generation job.
    ///
    /// A guard refusal returns the blocking record without writing
    /// anything. A claimed run always ends as success or failed.
    ///
    /// # Errors
    ///
    /// Returns an error when the ledger itself cannot be read or
    /// written.
    #[instrument(skip(self, parameters), fields(kind = %kind, platform = %platform))]
    pub async fn run(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        parameters: serde_json::Value,
    ) -> MarqueeResult<GenerationRecordRow> {
        match self
            .ledger
            .guard()
            .may_generate(kind, platform, kind.dedup_window())?
        {
            GenerationGuardDecision::Allowed => {}
            GenerationGuardDecision::BlockedBySuccess(existing) => {
                info!(record_id = existing.id(), "Run refused: recent success exists");
                return Ok(existing);
            }
            GenerationGuardDecision::BlockedByProcessing(existing) => {
                info!(record_id = existing.id(), "Run refused: another run in flight");
                return Ok(existing);
            }
        }

        let record = self.ledger.begin_generation(kind, platform, parameters.clone())?;

        match self.produce(kind, platform, &parameters).await {
            Ok((content_id, fingerprint)) => {
                info!(record_id = record.id(), content_id, "Generation run succeeded");
                self.ledger
                    .complete_generation(*record.id(), content_id, Some(fingerprint))
            }
            Err(e) => {
                error!(record_id = record.id(), error = %e, "Generation run failed");
                self.ledger.fail_generation(*record.id(), &e.to_string())
            }
        }
    }

    /// The fallible middle of a run: select, assemble, publish.
    async fn produce(
        &self,
        kind: GeneratorKind,
        platform: Platform,
        parameters: &serde_json::Value,
    ) -> MarqueeResult<(i64, String)> {
        let params = GenerationParameters::from_value(parameters)?;
        let today = Utc::now().date_naive();

        let selection =
            select_candidates(self.source.as_ref(), kind, platform, &params, today).await?;

        let fingerprint = content_fingerprint(&selection.keys());
        if self.ledger.fingerprint_seen(kind, platform, &fingerprint)? {
            return Err(marquee_error::PipelineError::new(
                marquee_error::PipelineErrorKind::FingerprintDuplicate(format!(
                    "selection matches a prior {kind} article for {platform}"
                )),
            )
            .into());
        }

        let assembler = ArticleAssembler::new(self.source.as_ref(), self.text.as_ref());
        let draft = assembler.assemble(kind, platform, &selection, &params).await?;

        let content_id = self.host.create_article(&draft).await?;

        // Post-create enrichment is best-effort: the article exists, so
        // image or taxonomy failures must not fail the run.
        if let Some(hero) = draft.hero_image() {
            if let Err(e) = self.host.attach_hero_image(content_id, hero).await {
                warn!(content_id, error = %e, "Hero image attachment failed");
            }
        }
        if let Err(e) = self
            .host
            .assign_taxonomy(content_id, draft.categories(), draft.tags())
            .await
        {
            warn!(content_id, error = %e, "Taxonomy assignment failed");
        }

        Ok((content_id, fingerprint))
    }
}
