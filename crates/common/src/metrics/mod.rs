//! Metrics and observability utilities
//!
//! Metric names share the `paperdesk` prefix. Descriptions are registered
//! once at startup; the recorder itself is installed by the binary.

use metrics::{counter, describe_counter, describe_histogram, histogram, Unit};
use std::time::Instant;

/// Metrics prefix for all PaperDesk metrics
pub const METRICS_PREFIX: &str = "paperdesk";

/// Register all metric descriptions
pub fn register_metrics() {
    describe_counter!(
        format!("{}_paper_searches_total", METRICS_PREFIX),
        Unit::Count,
        "Paper listing requests, labelled by whether a search term was given"
    );

    describe_histogram!(
        format!("{}_paper_search_duration_seconds", METRICS_PREFIX),
        Unit::Seconds,
        "Paper listing latency in seconds"
    );

    describe_counter!(
        format!("{}_library_changes_total", METRICS_PREFIX),
        Unit::Count,
        "Library membership changes by action and outcome"
    );

    describe_counter!(
        format!("{}_recommendations_total", METRICS_PREFIX),
        Unit::Count,
        "Recommendation responses by strategy"
    );

    describe_counter!(
        format!("{}_recommendation_interactions_total", METRICS_PREFIX),
        Unit::Count,
        "User interactions with recommended papers by kind"
    );

    describe_counter!(
        format!("{}_model_provider_changes_total", METRICS_PREFIX),
        Unit::Count,
        "Model provider config mutations by action"
    );

    tracing::info!("Metrics registered");
}

/// Wall-clock timer feeding the latency histograms
pub struct Timer {
    start: Instant,
}

impl Timer {
    pub fn start() -> Self {
        Self { start: Instant::now() }
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.start.elapsed().as_secs_f64()
    }
}

/// Helper to record paper listing metrics
pub fn record_paper_search(duration_secs: f64, has_query: bool) {
    counter!(
        format!("{}_paper_searches_total", METRICS_PREFIX),
        "filtered" => has_query.to_string()
    )
    .increment(1);

    histogram!(format!("{}_paper_search_duration_seconds", METRICS_PREFIX)).record(duration_secs);
}

/// Helper to record library add/remove outcomes
pub fn record_library_change(action: &'static str, outcome: &'static str) {
    counter!(
        format!("{}_library_changes_total", METRICS_PREFIX),
        "action" => action,
        "outcome" => outcome
    )
    .increment(1);
}

/// Helper to record which recommendation branch answered
pub fn record_recommendation(strategy: &'static str) {
    counter!(
        format!("{}_recommendations_total", METRICS_PREFIX),
        "strategy" => strategy
    )
    .increment(1);
}

/// Helper to record recommendation interactions
pub fn record_interaction(kind: &'static str) {
    counter!(
        format!("{}_recommendation_interactions_total", METRICS_PREFIX),
        "kind" => kind
    )
    .increment(1);
}

/// Helper to record provider config mutations
pub fn record_provider_change(action: &'static str) {
    counter!(
        format!("{}_model_provider_changes_total", METRICS_PREFIX),
        "action" => action
    )
    .increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        // No recorder installed: every helper must be a silent no-op
        register_metrics();
        record_paper_search(0.01, true);
        record_library_change("add", "added");
        record_recommendation("latest");
        record_interaction("click");
        record_provider_change("create");
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start();
        std::thread::sleep(std::time::Duration::from_millis(5));
        assert!(timer.elapsed_secs() > 0.0);
    }
}
