//! service-core: Shared infrastructure for the content services.
pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod observability;

pub use axum;
pub use reqwest;
pub use serde;
pub use serde_json;
pub use tokio;
pub use tower_http;
pub use tracing;
