use crate::config::ContentConfig;
use crate::handlers::{generate::generate, health::health_check, metrics::metrics_handler};
use crate::services::providers::{
    openai::OpenAiProvider, shield_gemma::ShieldGemmaProvider, GenerationProvider,
    ModerationProvider,
};
use crate::services::Orchestrator;
use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn,
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use service_core::middleware::{
    metrics::metrics_middleware,
    security_headers::security_headers_middleware,
    tracing::{make_request_span, request_id_middleware},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
}

/// Build the HTTP router. Only `allowed_origin` may call the API from a browser.
pub fn build_router(state: AppState, allowed_origin: &str) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(allowed_origin).map_err(|e| {
        AppError::ConfigError(anyhow::anyhow!(
            "Invalid CORS origin '{}': {}",
            allowed_origin,
            e
        ))
    })?;

    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Ok(Router::new()
        .route("/generate", post(generate))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(cors)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http().make_span_with(make_request_span))
        .layer(from_fn(request_id_middleware))
        .with_state(state))
}

/// Application wrapper for managing server lifecycle.
pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    /// Build the application with the configured OpenAI and Shield Gemma providers.
    pub async fn build(config: ContentConfig) -> Result<Self, AppError> {
        let outbound = config.outbound.to_outbound_config();

        let generator: Arc<dyn GenerationProvider> =
            Arc::new(OpenAiProvider::new(&config.openai, &outbound)?);
        let moderator: Arc<dyn ModerationProvider> =
            Arc::new(ShieldGemmaProvider::new(&config.moderation, &outbound)?);

        tracing::info!(
            generation_model = %generator.model_id(),
            moderation_model = %moderator.model_id(),
            timeout_secs = config.outbound.timeout_secs,
            max_retries = config.outbound.max_retries,
            "Initialized providers"
        );

        Self::build_with_providers(config, generator, moderator).await
    }

    /// Build the application around the given providers.
    pub async fn build_with_providers(
        config: ContentConfig,
        generator: Arc<dyn GenerationProvider>,
        moderator: Arc<dyn ModerationProvider>,
    ) -> Result<Self, AppError> {
        let state = AppState {
            orchestrator: Arc::new(Orchestrator::new(generator, moderator, config.defaults)),
        };
        let router = build_router(state, &config.cors.allowed_origin)?;

        // Port 0 = random port for testing
        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind HTTP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Content service listening on port {}", port);

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Run the application until stopped.
    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        axum::serve(self.listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
