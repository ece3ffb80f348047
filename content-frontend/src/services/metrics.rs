use metrics::counter;

/// Count a generate action by outcome (`success`, `invalid`, `busy`, `failed`).
pub fn record_generate(outcome: &'static str) {
    counter!("frontend_generate_total", "outcome" => outcome).increment(1);
}

/// Count a save action by outcome.
pub fn record_save(outcome: &'static str) {
    counter!("frontend_save_total", "outcome" => outcome).increment(1);
}
