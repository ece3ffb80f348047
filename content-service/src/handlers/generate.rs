use crate::error::GenerateError;
use crate::models::{GenerateBody, GenerationResult};
use crate::startup::AppState;
use axum::{extract::rejection::JsonRejection, extract::State, Json};

/// `POST /generate`. A body that is not valid JSON for [`GenerateBody`] is an
/// `Invalid request`; everything else is decided by the orchestrator.
pub async fn generate(
    State(state): State<AppState>,
    payload: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerationResult>, GenerateError> {
    let Json(body) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected /generate body");
        GenerateError::InvalidRequest(rejection.body_text())
    })?;

    let result = state.orchestrator.handle(body).await?;
    Ok(Json(result))
}
