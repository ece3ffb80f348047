use crate::services::ledger::LedgerError;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Inline notice swapped into the page by htmx.
#[derive(Template)]
#[template(path = "fragments/notice.html")]
pub struct NoticeTemplate {
    pub kind: &'static str,
    pub message: String,
}

/// A failed user action. Rendered as a notice; upstream error bodies are
/// logged where they occur and never shown.
#[derive(Debug, Error)]
pub enum FrontendError {
    #[error("Please enter a prompt before generating.")]
    MissingPrompt,

    #[error("A generation is already in progress.")]
    Busy,

    #[error("Content generation failed. Please try again.")]
    GenerationFailed,

    #[error("Generate content before editing it.")]
    NothingGenerated,

    #[error("Generate content before saving.")]
    NothingToSave,

    #[error("Sign in to save drafts.")]
    SignInRequired,

    #[error("The identity token is invalid or expired.")]
    InvalidIdentity,

    #[error("Saving failed. Please try again.")]
    SaveFailed,

    #[error("Session error: {0}")]
    Session(String),
}

impl FrontendError {
    fn status(&self) -> StatusCode {
        match self {
            FrontendError::MissingPrompt
            | FrontendError::NothingGenerated
            | FrontendError::NothingToSave
            | FrontendError::InvalidIdentity => StatusCode::UNPROCESSABLE_ENTITY,
            FrontendError::Busy => StatusCode::CONFLICT,
            FrontendError::SignInRequired => StatusCode::UNAUTHORIZED,
            FrontendError::GenerationFailed | FrontendError::SaveFailed => StatusCode::BAD_GATEWAY,
            FrontendError::Session(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<tower_sessions::session::Error> for FrontendError {
    fn from(err: tower_sessions::session::Error) -> Self {
        FrontendError::Session(err.to_string())
    }
}

impl From<LedgerError> for FrontendError {
    fn from(err: LedgerError) -> Self {
        match err {
            LedgerError::Unauthenticated => FrontendError::SignInRequired,
            other => {
                tracing::error!(error = %other, "Ledger call failed");
                FrontendError::SaveFailed
            }
        }
    }
}

impl IntoResponse for FrontendError {
    fn into_response(self) -> Response {
        let message = match &self {
            FrontendError::Session(details) => {
                tracing::error!(details = %details, "Session store failure");
                "Something went wrong. Please reload the page.".to_string()
            }
            other => other.to_string(),
        };

        (
            self.status(),
            NoticeTemplate {
                kind: "error",
                message,
            },
        )
            .into_response()
    }
}
