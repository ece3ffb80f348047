//! Generation and moderation provider abstractions.
//!
//! The orchestrator only sees these traits; concrete backends (OpenAI chat
//! completions, Shield Gemma on Hugging Face, mocks) are chosen at startup.

pub mod mock;
pub mod openai;
pub mod shield_gemma;

use crate::models::ModerationOutcome;
use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    /// The provider answered with a non-success status.
    #[error("Upstream returned {status}: {body}")]
    Upstream { status: u16, body: String },

    /// No usable response: timeout, refused connection, broken body.
    #[error("Network error: {0}")]
    Network(String),

    /// A success status with a body that could not be decoded.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Generation succeeded but produced no text.
    #[error("No content produced")]
    EmptyContent,
}

impl ProviderError {
    /// Raw detail forwarded to the caller: the upstream body when there is one.
    pub fn details(&self) -> String {
        match self {
            ProviderError::Upstream { body, .. } => body.clone(),
            other => other.to_string(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ProviderError::Upstream { .. } => "upstream",
            ProviderError::Network(_) => "network",
            ProviderError::InvalidResponse(_) => "invalid_response",
            ProviderError::EmptyContent => "empty",
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        ProviderError::Network(err.to_string())
    }
}

/// Read a non-success response into [`ProviderError::Upstream`].
pub(crate) async fn upstream_error(response: reqwest::Response) -> ProviderError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ProviderError::Upstream { status, body }
}

/// Chat-completion style text generation.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Qualified model id reported to callers, e.g. `openai:gpt-4o-mini`.
    fn model_id(&self) -> &str;

    /// Generate text for `prompt` under `system_instruction`.
    ///
    /// Returns the trimmed text; blank output is [`ProviderError::EmptyContent`].
    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String, ProviderError>;
}

/// Safety classification of generated text.
#[async_trait]
pub trait ModerationProvider: Send + Sync {
    fn model_id(&self) -> &str;

    async fn moderate(&self, text: &str) -> Result<ModerationOutcome, ProviderError>;
}
