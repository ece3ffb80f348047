use crate::models::ValidationError;
use crate::services::providers::ProviderError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

/// Failure of one `/generate` call, mapped onto the endpoint's JSON errors.
#[derive(Debug, Error)]
pub enum GenerateError {
    #[error("Missing prompt")]
    MissingPrompt,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("OpenAI error: {0}")]
    Generation(ProviderError),

    #[error("No content from OpenAI")]
    EmptyGeneration,

    #[error("Hugging Face error: {0}")]
    Moderation(ProviderError),

    #[error("Content flagged by Shield Gemma")]
    ContentRejected { moderation: Value },

    #[error("Server error: {0}")]
    Internal(String),
}

impl GenerateError {
    /// Label for the outcome metric.
    pub fn outcome(&self) -> &'static str {
        match self {
            GenerateError::MissingPrompt | GenerateError::InvalidRequest(_) => "invalid",
            GenerateError::Generation(_) | GenerateError::EmptyGeneration => "generation_error",
            GenerateError::Moderation(_) => "moderation_error",
            GenerateError::ContentRejected { .. } => "rejected",
            GenerateError::Internal(_) => "internal_error",
        }
    }

    pub fn from_generation(err: ProviderError) -> Self {
        match err {
            ProviderError::EmptyContent => GenerateError::EmptyGeneration,
            ProviderError::InvalidResponse(details) => GenerateError::Internal(details),
            other => GenerateError::Generation(other),
        }
    }

    pub fn from_moderation(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidResponse(details) => GenerateError::Internal(details),
            other => GenerateError::Moderation(other),
        }
    }
}

impl From<ValidationError> for GenerateError {
    fn from(err: ValidationError) -> Self {
        match err {
            ValidationError::MissingPrompt => GenerateError::MissingPrompt,
            ValidationError::UnknownValue(e) => GenerateError::InvalidRequest(e.to_string()),
        }
    }
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            GenerateError::MissingPrompt => {
                (StatusCode::BAD_REQUEST, json!({ "error": "Missing prompt" }))
            }
            GenerateError::InvalidRequest(details) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Invalid request", "details": details }),
            ),
            GenerateError::ContentRejected { moderation } => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "Content flagged by Shield Gemma", "moderation": moderation }),
            ),
            GenerateError::Generation(err) => {
                tracing::warn!(error = %err, "Generation provider failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "OpenAI error", "details": err.details() }),
                )
            }
            GenerateError::EmptyGeneration => (
                StatusCode::BAD_GATEWAY,
                json!({ "error": "No content from OpenAI" }),
            ),
            GenerateError::Moderation(err) => {
                tracing::warn!(error = %err, "Moderation provider failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({ "error": "Hugging Face error", "details": err.details() }),
                )
            }
            GenerateError::Internal(details) => {
                tracing::error!(details = %details, "Unexpected failure while generating");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Server error", "details": details }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
