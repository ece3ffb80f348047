use crate::models::{ContentType, Platform, RequestDefaults, Tone};
use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_env_parsed, is_production};
use service_core::error::AppError;
use service_core::http::{OutboundConfig, RetryConfig};
use std::env;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_TEMPERATURE: f32 = 0.7;
const DEFAULT_HF_BASE_URL: &str = "https://api-inference.huggingface.co";
const DEFAULT_MODERATION_MODEL: &str = "google/shield-gemma-2b";

#[derive(Debug, Clone)]
pub struct ContentConfig {
    pub common: core_config::Config,
    pub openai: OpenAiConfig,
    pub moderation: ModerationConfig,
    pub outbound: OutboundSettings,
    pub cors: CorsConfig,
    pub defaults: RequestDefaults,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Secret<String>,
    /// Base URL of an OpenAI-compatible API, without trailing slash.
    pub base_url: String,
    pub model: String,
    pub temperature: f32,
}

#[derive(Debug, Clone)]
pub struct ModerationConfig {
    pub api_key: Secret<String>,
    pub base_url: String,
    /// Hugging Face model id, e.g. `google/shield-gemma-2b`.
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct OutboundSettings {
    pub timeout_secs: u64,
    pub max_retries: u32,
}

impl OutboundSettings {
    pub fn to_outbound_config(&self) -> OutboundConfig {
        OutboundConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            retry: RetryConfig::with_max_retries(self.max_retries),
            ..Default::default()
        }
    }
}

impl Default for OutboundSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 1,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CorsConfig {
    pub allowed_origin: String,
}

impl ContentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common = core_config::Config::load()?;
        let is_prod = is_production();

        Ok(ContentConfig {
            common,
            openai: OpenAiConfig {
                api_key: Secret::new(get_env("OPENAI_API_KEY", None, is_prod)?),
                base_url: trim_base(get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), is_prod)?),
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
                temperature: get_env_parsed("OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE, is_prod)?,
            },
            moderation: ModerationConfig {
                api_key: Secret::new(get_env("HF_API_KEY", None, is_prod)?),
                base_url: trim_base(get_env("HF_BASE_URL", Some(DEFAULT_HF_BASE_URL), is_prod)?),
                model: get_env("MODERATION_MODEL", Some(DEFAULT_MODERATION_MODEL), is_prod)?,
            },
            outbound: OutboundSettings {
                timeout_secs: get_env_parsed("PROVIDER_TIMEOUT_SECS", 30, is_prod)?,
                max_retries: get_env_parsed("PROVIDER_MAX_RETRIES", 1, is_prod)?,
            },
            cors: CorsConfig {
                allowed_origin: get_env(
                    "CORS_ALLOWED_ORIGIN",
                    Some("http://localhost:3000"),
                    is_prod,
                )?,
            },
            defaults: RequestDefaults {
                platform: parse_default("DEFAULT_PLATFORM", Platform::Twitter)?,
                content_type: parse_default("DEFAULT_CONTENT_TYPE", ContentType::Post)?,
                tone: parse_default("DEFAULT_TONE", Tone::Professional)?,
            },
        })
    }
}

/// Optional override of a request default; an unknown value is a startup error.
fn parse_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .parse()
            .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{}: {}", key, e))),
        _ => Ok(default),
    }
}

fn trim_base(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
