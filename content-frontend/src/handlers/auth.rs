use crate::error::FrontendError;
use crate::models::SessionContext;
use crate::utils::identity::identity_from_token;
use crate::AppState;
use axum::{
    extract::State,
    http::{HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    Form,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

#[derive(Deserialize)]
pub struct LoginForm {
    pub identity_token: Secret<String>,
}

fn redirect_home() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    headers.insert("HX-Redirect", HeaderValue::from_static("/"));
    (StatusCode::OK, headers, "")
}

/// Accept a signed identity from the identity provider for this session.
pub async fn login(
    State(state): State<AppState>,
    ctx: SessionContext,
    Form(form): Form<LoginForm>,
) -> Result<impl IntoResponse, FrontendError> {
    let now = chrono::Utc::now().timestamp();
    let identity = identity_from_token(form.identity_token.expose_secret(), now).map_err(|e| {
        tracing::warn!("Rejected identity token: {}", e);
        FrontendError::InvalidIdentity
    })?;

    state.ledger.invalidate(&ctx.client_key);
    ctx.session.cycle_id().await?;
    ctx.set_identity(&identity).await?;

    tracing::info!(subject = %identity.subject, "Identity accepted");

    Ok(redirect_home())
}

pub async fn logout(
    State(state): State<AppState>,
    ctx: SessionContext,
) -> impl IntoResponse {
    if state.ledger.invalidate(&ctx.client_key) {
        tracing::info!("Ledger handle dropped on logout");
    }
    ctx.session.clear().await;

    redirect_home()
}
