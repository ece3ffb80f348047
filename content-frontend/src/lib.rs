pub mod config;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;
pub mod startup;
pub mod utils;

use crate::config::Settings;
use service_core::error::AppError;
use services::{
    content_client::ContentClient,
    inflight::InFlightGate,
    ledger::{HttpLedgerConnector, LedgerConnector},
    ledger_handles::LedgerHandles,
};
use std::sync::Arc;

/// Shared application state: outbound clients and per-session registries.
#[derive(Clone)]
pub struct AppState {
    pub content_client: Arc<ContentClient>,
    pub ledger: Arc<LedgerHandles>,
    pub inflight: InFlightGate,
}

impl AppState {
    pub fn new(content_client: Arc<ContentClient>, connector: Arc<dyn LedgerConnector>) -> Self {
        Self {
            content_client,
            ledger: Arc::new(LedgerHandles::new(
                connector,
                startup::SESSION_INACTIVITY.whole_seconds(),
            )),
            inflight: InFlightGate::new(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Result<Self, AppError> {
        let content_client = Arc::new(ContentClient::new(&settings.content_service)?);
        let connector = Arc::new(HttpLedgerConnector::new(&settings.ledger)?);
        Ok(Self::new(content_client, connector))
    }
}
