//! Bounded retry for outbound HTTP calls.
//!
//! Transient failures (timeouts, refused connections, 5xx responses) are
//! retried with exponential backoff; 4xx responses are returned to the
//! caller on the first attempt.

use rand::Rng;
use reqwest::{Response, StatusCode};
use std::future::Future;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// Configuration for retry behavior.
#[derive(Clone, Debug)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (not including the initial attempt).
    pub max_retries: u32,
    /// Initial backoff duration before first retry.
    pub initial_backoff: Duration,
    /// Maximum backoff duration.
    pub max_backoff: Duration,
    /// Backoff multiplier for exponential backoff.
    pub backoff_multiplier: f64,
    /// Whether to add jitter to backoff duration.
    pub add_jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 1,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
            backoff_multiplier: 2.0,
            add_jitter: true,
        }
    }
}

impl RetryConfig {
    pub fn with_max_retries(max_retries: u32) -> Self {
        Self {
            max_retries,
            ..Default::default()
        }
    }

    pub fn no_retry() -> Self {
        Self::with_max_retries(0)
    }

    fn backoff_duration(&self, attempt: u32) -> Duration {
        let backoff =
            self.initial_backoff.as_millis() as f64 * self.backoff_multiplier.powi(attempt as i32);
        let backoff_ms = backoff.min(self.max_backoff.as_millis() as f64) as u64;

        let mut duration = Duration::from_millis(backoff_ms);

        if self.add_jitter {
            // Up to 25% jitter
            let jitter = (backoff_ms as f64 * rand::thread_rng().gen_range(0.0..0.25)) as u64;
            duration += Duration::from_millis(jitter);
        }

        duration
    }
}

/// Whether a response status is worth another attempt.
pub fn is_retryable_status(status: StatusCode) -> bool {
    status.is_server_error()
}

/// Whether a transport error is worth another attempt.
pub fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect()
}

/// Execute an HTTP call with retry.
///
/// `f` is invoked once per attempt and must build a fresh request each time.
/// The last response is returned as-is when retries are exhausted, so callers
/// still see the upstream status and body.
pub async fn retry_http_call<F, Fut>(
    config: &RetryConfig,
    operation_name: &str,
    f: F,
) -> Result<Response, reqwest::Error>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt = 0;

    loop {
        match f().await {
            Ok(response) => {
                let status = response.status();

                if !is_retryable_status(status) {
                    if attempt > 0 {
                        info!(
                            operation = operation_name,
                            attempt = attempt + 1,
                            status = status.as_u16(),
                            "HTTP call completed after retry"
                        );
                    }
                    return Ok(response);
                }

                if attempt >= config.max_retries {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        status = status.as_u16(),
                        "HTTP call failed after max retries"
                    );
                    return Ok(response);
                }

                let backoff = config.backoff_duration(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    status = status.as_u16(),
                    backoff_ms = backoff.as_millis() as u64,
                    "HTTP call returned server error, retrying after backoff"
                );
                sleep(backoff).await;
            }
            Err(err) => {
                if !is_retryable_error(&err) {
                    warn!(
                        operation = operation_name,
                        error = %err,
                        "HTTP call failed with non-retryable error"
                    );
                    return Err(err);
                }

                if attempt >= config.max_retries {
                    warn!(
                        operation = operation_name,
                        attempt = attempt + 1,
                        error = %err,
                        "HTTP call failed after max retries"
                    );
                    return Err(err);
                }

                let backoff = config.backoff_duration(attempt);
                warn!(
                    operation = operation_name,
                    attempt = attempt + 1,
                    error = %err,
                    backoff_ms = backoff.as_millis() as u64,
                    "HTTP call failed, retrying after backoff"
                );
                sleep(backoff).await;
            }
        }

        attempt += 1;
    }
}
