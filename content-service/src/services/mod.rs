pub mod metrics;
pub mod orchestrator;
pub mod providers;

pub use orchestrator::Orchestrator;
