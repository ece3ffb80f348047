use content_frontend::config::get_configuration;
use content_frontend::startup::build_router;
use content_frontend::AppState;
use dotenvy::dotenv;
use service_core::observability::{init_metrics, init_tracing};
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let configuration = get_configuration().map_err(|e| {
        eprintln!("Failed to read configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    let log_level = std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let otlp_endpoint = std::env::var("OTLP_ENDPOINT").ok();
    init_tracing("content-frontend", &log_level, otlp_endpoint.as_deref());
    init_metrics();

    let state = AppState::from_settings(&configuration)?;

    let ledger = state.ledger.clone();
    tokio::spawn(async move {
        let mut sweep = tokio::time::interval(std::time::Duration::from_secs(15 * 60));
        loop {
            sweep.tick().await;
            ledger.evict_stale();
        }
    });
    let app = build_router(state, configuration.server.secure_cookies);

    let address = format!(
        "{}:{}",
        configuration.server.host, configuration.server.port
    );
    let listener = tokio::net::TcpListener::bind(&address).await.map_err(|e| {
        tracing::error!("Failed to bind TCP listener to {}: {}", address, e);
        anyhow::anyhow!("Failed to bind to address {}: {}", address, e)
    })?;

    info!(
        content_service = %configuration.content_service.url,
        ledger = %configuration.ledger.url,
        "Starting content-frontend on {}",
        address
    );
    axum::serve(listener, app).await.map_err(|e| {
        tracing::error!("Server error: {}", e);
        anyhow::anyhow!("Server error: {}", e)
    })?;

    Ok(())
}
