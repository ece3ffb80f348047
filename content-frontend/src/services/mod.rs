pub mod content_client;
pub mod inflight;
pub mod ledger;
pub mod ledger_handles;
pub mod metrics;
