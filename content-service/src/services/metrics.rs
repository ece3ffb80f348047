//! Orchestrator metrics, recorded through the `metrics` facade and exposed
//! by the Prometheus recorder installed at startup.

use metrics::{counter, histogram};

/// Count a finished `/generate` call by outcome
/// (`success`, `rejected`, `invalid`, `generation_error`, ...).
pub fn record_generation(outcome: &'static str) {
    counter!("content_generations_total", "outcome" => outcome).increment(1);
}

/// Record one provider step, including any retries inside it.
pub fn record_provider_call(provider: &'static str, status: &'static str, duration_secs: f64) {
    histogram!(
        "content_provider_latency_seconds",
        "provider" => provider,
        "status" => status
    )
    .record(duration_secs);
}

/// Count a provider failure by kind.
pub fn record_provider_error(provider: &'static str, error_type: &'static str) {
    counter!(
        "content_provider_errors_total",
        "provider" => provider,
        "error_type" => error_type
    )
    .increment(1);
}
