//! The scheduled trigger for the editorial pipeline.
//!
//! Cadence types decide when jobs are due; bot loops execute them with
//! per-job failure isolation; the server wires both to the orchestrators
//! from `marquee_pipeline`. Best-effort scheduling only: no exact-timing
//! or exactly-once delivery guarantee, the ledger's duplicate guard is
//! what prevents double publishing.

pub mod bots;
mod config;
#[cfg(feature = "metrics")]
mod metrics;
mod schedule;
mod server;
mod status;

pub use config::{
    GenerationBotConfig, JobConfig, MarqueeConfig, RetentionConfig, ShareBotConfig,
};
#[cfg(feature = "metrics")]
pub use metrics::BotMetrics;
pub use schedule::{Cadence, CadenceCheck};
pub use server::MarqueeServer;
pub use status::{DoctorFinding, FailureLine, LastSuccess, StatusReport, doctor, doctor_passes};
