//! Status readout and configuration health check.

use chrono::{DateTime, Utc};
use marquee_core::{GeneratorKind, Platform};
use marquee_error::MarqueeResult;
use marquee_ledger::{Ledger, LedgerSummary};
use serde::Serialize;
use strum::IntoEnumIterator;

/// One recent failure, reduced to what an operator needs.
#[derive(Debug, Clone, Serialize)]
pub struct FailureLine {
    /// Record id
    pub record_id: i32,
    /// Generator kind
    pub kind: String,
    /// Platform key
    pub platform: String,
    /// Human-readable reason
    pub reason: String,
    /// When the record was created
    pub created_at: DateTime<Utc>,
}

/// Last success for one (kind, platform) pair.
#[derive(Debug, Clone, Serialize)]
pub struct LastSuccess {
    /// Generator kind
    pub kind: String,
    /// Platform key
    pub platform: String,
    /// Published content id
    pub content_id: Option<i64>,
    /// When it succeeded
    pub created_at: DateTime<Utc>,
}

/// The data behind an admin dashboard, gathered in one pass.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    /// Generation record counts by status
    pub summary: LedgerSummary,
    /// Most recent failures, newest first
    pub recent_failures: Vec<FailureLine>,
    /// Last success per (kind, platform) pair that has one
    pub last_successes: Vec<LastSuccess>,
    /// Shares currently due for an attempt
    pub due_share_count: usize,
}

impl StatusReport {
    /// Gather the report from the ledger.
    ///
    /// # Errors
    ///
    /// Returns an error when the ledger cannot be read.
    pub fn gather(ledger: &Ledger) -> MarqueeResult<Self> {
        let summary = ledger.summary()?;

        let recent_failures = ledger
            .recent_failures(10)?
            .into_iter()
            .map(|row| FailureLine {
                record_id: *row.id(),
                kind: row.generator_kind().clone(),
                platform: row.platform().clone(),
                reason: row
                    .failure_reason()
                    .clone()
                    .unwrap_or_else(|| "(no reason recorded)".to_string()),
                created_at: *row.created_at(),
            })
            .collect();

        let mut last_successes = Vec::new();
        let mut platforms: Vec<Platform> = Platform::majors().to_vec();
        platforms.push(Platform::All);
        for kind in GeneratorKind::iter() {
            for platform in &platforms {
                if let Some(row) = ledger.latest_success(kind, *platform)? {
                    last_successes.push(LastSuccess {
                        kind: kind.to_string(),
                        platform: platform.to_string(),
                        content_id: *row.linked_content_id(),
                        created_at: *row.created_at(),
                    });
                }
            }
        }

        let due_share_count = ledger.due_shares(Utc::now())?.len();

        Ok(Self { summary, recent_failures, last_successes, due_share_count })
    }

    /// Plain-text rendering for the CLI.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Generation records: {} total ({} success, {} failed, {} processing, {} pending, {} cancelled, {} deleted)\n",
            self.summary.total(),
            self.summary.success(),
            self.summary.failed(),
            self.summary.processing(),
            self.summary.pending(),
            self.summary.cancelled(),
            self.summary.deleted(),
        ));
        out.push_str(&format!("Shares due: {}\n", self.due_share_count));

        if !self.last_successes.is_empty() {
            out.push_str("\nLast successes:\n");
            for s in &self.last_successes {
                out.push_str(&format!(
                    "  {} / {} -> content {} at {}\n",
                    s.kind,
                    s.platform,
                    s.content_id.map(|id| id.to_string()).unwrap_or_default(),
                    s.created_at.format("%Y-%m-%d %H:%M"),
                ));
            }
        }
        if !self.recent_failures.is_empty() {
            out.push_str("\nRecent failures:\n");
            for f in &self.recent_failures {
                out.push_str(&format!(
                    "  #{} {} / {}: {}\n",
                    f.record_id, f.kind, f.platform, f.reason
                ));
            }
        }
        out
    }
}

/// One configuration check result.
#[derive(Debug, Clone, Serialize)]
pub struct DoctorFinding {
    /// Environment variable name
    pub name: &'static str,
    /// Whether it is set and non-empty
    pub ok: bool,
}

/// Environment variables the full pipeline needs.
const REQUIRED_VARS: [&str; 7] = [
    "DATABASE_URL",
    "TMDB_API_KEY",
    "OPENAI_API_KEY",
    "FACEBOOK_PAGE_ID",
    "FACEBOOK_ACCESS_TOKEN",
    "HOST_BASE_URL",
    "HOST_API_TOKEN",
];

/// Check required environment variables; missing keys fail fast here
/// instead of mid-run.
pub fn doctor() -> Vec<DoctorFinding> {
    REQUIRED_VARS
        .into_iter()
        .map(|name| DoctorFinding {
            name,
            ok: std::env::var(name).map(|v| !v.trim().is_empty()).unwrap_or(false),
        })
        .collect()
}

/// Whether every required variable is present.
pub fn doctor_passes(findings: &[DoctorFinding]) -> bool {
    findings.iter().all(|f| f.ok)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doctor_reports_every_required_variable() {
        let findings = doctor();
        assert_eq!(findings.len(), REQUIRED_VARS.len());
        let names: Vec<&str> = findings.iter().map(|f| f.name).collect();
        assert!(names.contains(&"DATABASE_URL"));
        assert!(names.contains(&"TMDB_API_KEY"));
    }

    #[test]
    fn doctor_passes_requires_all_ok() {
        let all_ok = vec![
            DoctorFinding { name: "A", ok: true },
            DoctorFinding { name: "B", ok: true },
        ];
        assert!(doctor_passes(&all_ok));

        let one_missing = vec![
            DoctorFinding { name: "A", ok: true },
            DoctorFinding { name: "B", ok: false },
        ];
        assert!(!doctor_passes(&one_missing));
    }
}
