use crate::handlers::{
    app::{health_check, index},
    auth::{login, logout},
    content::{generate, update_content},
    metrics::metrics,
    save::save,
};
use crate::AppState;
use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::html_security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use time::Duration;
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, MemoryStore, SessionManagerLayer};

/// Sessions, and the ledger handles cached for them, lapse after this long
/// without a request.
pub const SESSION_INACTIVITY: Duration = Duration::hours(24);

pub fn build_router(state: AppState, secure_cookies: bool) -> Router {
    let session_layer = SessionManagerLayer::new(MemoryStore::default())
        .with_secure(secure_cookies)
        .with_expiry(Expiry::OnInactivity(SESSION_INACTIVITY));

    Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .route("/generate", post(generate))
        .route("/content", post(update_content))
        .route("/save", post(save))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .layer(session_layer)
        .layer(from_fn(html_security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state)
}
