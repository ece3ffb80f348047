//! Outbound HTTP: client construction, trace propagation and retry.

pub mod retry;

pub use retry::{RetryConfig, is_retryable_error, is_retryable_status, retry_http_call};

use crate::error::AppError;
use crate::observability::TracedClientExt;
use reqwest::{Client, Response};
use serde::Serialize;
use std::time::Duration;

/// Timeout and retry settings for one upstream.
#[derive(Clone, Debug)]
pub struct OutboundConfig {
    /// Per-attempt timeout, covering connect, send and body.
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
}

impl Default for OutboundConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            retry: RetryConfig::default(),
        }
    }
}

/// HTTP client with bounded timeouts and retry, shared by all requests to
/// one upstream.
#[derive(Clone)]
pub struct OutboundClient {
    client: Client,
    retry: RetryConfig,
}

impl OutboundClient {
    pub fn new(config: &OutboundConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            retry: config.retry.clone(),
        })
    }

    /// POST a JSON body, retrying transient failures.
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        operation_name: &str,
        url: &str,
        bearer_token: Option<&str>,
        body: &T,
    ) -> Result<Response, reqwest::Error> {
        retry_http_call(&self.retry, operation_name, || {
            let mut request = self.client.traced_post(url).json(body);
            if let Some(token) = bearer_token {
                request = request.bearer_auth(token);
            }
            request.send()
        })
        .await
    }

    /// GET a resource, retrying transient failures.
    pub async fn get(
        &self,
        operation_name: &str,
        url: &str,
        bearer_token: Option<&str>,
    ) -> Result<Response, reqwest::Error> {
        retry_http_call(&self.retry, operation_name, || {
            let mut request = self.client.traced_get(url);
            if let Some(token) = bearer_token {
                request = request.bearer_auth(token);
            }
            request.send()
        })
        .await
    }
}
