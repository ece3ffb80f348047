//! HTTP handlers for the content service.

pub mod generate;
pub mod health;
pub mod metrics;
