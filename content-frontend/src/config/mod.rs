use serde::Deserialize;
use service_core::http::{OutboundConfig, RetryConfig};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub content_service: ContentServiceSettings,
    pub ledger: LedgerSettings,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Mark the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
}

#[derive(Deserialize, Clone, Debug)]
pub struct ContentServiceSettings {
    /// Base URL of the content service, e.g. `http://content-service:3001`.
    pub url: String,
    /// Must outlast the service's own provider timeouts and retries.
    #[serde(default = "default_content_timeout")]
    pub timeout_secs: u64,
}

#[derive(Deserialize, Clone, Debug)]
pub struct LedgerSettings {
    /// Base URL of the ledger actor gateway.
    pub url: String,
    /// Allow ledger handles without an identity (local development network).
    #[serde(default)]
    pub allow_anonymous: bool,
    #[serde(default = "default_ledger_timeout")]
    pub timeout_secs: u64,
}

fn default_content_timeout() -> u64 {
    150
}

fn default_ledger_timeout() -> u64 {
    10
}

impl ContentServiceSettings {
    /// One user action sends exactly one `/generate`; the service retries
    /// its providers itself.
    pub fn outbound(&self) -> OutboundConfig {
        OutboundConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryConfig::no_retry(),
            ..Default::default()
        }
    }
}

impl LedgerSettings {
    /// Ledger writes are not idempotent, so they are never retried.
    pub fn outbound(&self) -> OutboundConfig {
        OutboundConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryConfig::no_retry(),
            ..Default::default()
        }
    }
}

fn configuration_directory() -> Result<PathBuf, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| config::ConfigError::Message(format!("Failed to determine the current directory: {}", e)))?;

    // Works from the workspace root and from the crate directory
    Ok(if base_path.ends_with("content-frontend") {
        base_path.join("config")
    } else {
        base_path.join("content-frontend").join("config")
    })
}

pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let configuration_directory = configuration_directory()?;

    let settings = config::Config::builder()
        .add_source(config::File::from(configuration_directory.join("base.yaml")).required(true))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize::<Settings>()
}
