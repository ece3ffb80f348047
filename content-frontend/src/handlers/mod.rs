pub mod app;
pub mod auth;
pub mod content;
pub mod metrics;
pub mod save;
