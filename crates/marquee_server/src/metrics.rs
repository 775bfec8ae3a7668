//! OpenTelemetry metrics for the bot server.
//!
//! Available with the `metrics` feature.

#[cfg(feature = "metrics")]
use opentelemetry::{
    KeyValue, global,
    metrics::{Counter, Gauge, Histogram, Meter},
};

/// Bot-level metrics: executions, failures, durations, queue depth.
#[cfg(feature = "metrics")]
#[derive(Clone)]
pub struct BotMetrics {
    /// Meter handle kept alive for metric instruments
    _meter: Meter,
    /// Total bot executions
    pub executions: Counter<u64>,
    /// Total bot failures
    pub failures: Counter<u64>,
    /// Bot execution duration in seconds
    pub duration: Histogram<f64>,
    /// Items awaiting a share attempt
    pub queue_depth: Gauge<u64>,
}

#[cfg(feature = "metrics")]
impl BotMetrics {
    /// Create new bot metrics on the global meter.
    pub fn new() -> Self {
        let meter = global::meter("marquee_bots");

        let executions = meter
            .u64_counter("bot.executions")
            .with_description("Total bot executions")
            .build();
        let failures = meter
            .u64_counter("bot.failures")
            .with_description("Total bot failures")
            .build();
        let duration = meter
            .f64_histogram("bot.duration")
            .with_unit("seconds")
            .with_description("Bot execution duration")
            .build();
        let queue_depth = meter
            .u64_gauge("bot.queue_depth")
            .with_description("Items awaiting a share attempt")
            .build();

        Self {
            _meter: meter.clone(),
            executions,
            failures,
            duration,
            queue_depth,
        }
    }

    /// Record a successful execution.
    pub fn record_execution(&self, bot_type: &str, duration_secs: f64) {
        let labels = &[KeyValue::new("bot_type", bot_type.to_string())];
        self.executions.add(1, labels);
        self.duration.record(duration_secs, labels);
    }

    /// Record a failed execution.
    pub fn record_failure(&self, bot_type: &str) {
        let labels = &[KeyValue::new("bot_type", bot_type.to_string())];
        self.failures.add(1, labels);
    }

    /// Update queue depth.
    pub fn update_queue_depth(&self, bot_type: &str, depth: u64) {
        let labels = &[KeyValue::new("bot_type", bot_type.to_string())];
        self.queue_depth.record(depth, labels);
    }
}

#[cfg(feature = "metrics")]
impl Default for BotMetrics {
    fn default() -> Self {
        Self::new()
    }
}
