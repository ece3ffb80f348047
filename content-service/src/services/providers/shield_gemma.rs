//! Shield Gemma moderation via the Hugging Face inference API.

use super::{upstream_error, ModerationProvider, ProviderError};
use crate::config::ModerationConfig;
use crate::models::{ModerationOutcome, ModerationVerdict};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Serialize;
use serde_json::Value;
use service_core::error::AppError;
use service_core::http::{OutboundClient, OutboundConfig};

pub struct ShieldGemmaProvider {
    client: OutboundClient,
    api_key: Secret<String>,
    endpoint: String,
    model: String,
}

impl ShieldGemmaProvider {
    pub fn new(config: &ModerationConfig, outbound: &OutboundConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: OutboundClient::new(outbound)?,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/models/{}", config.base_url, config.model),
            model: config.model.clone(),
        })
    }
}

#[derive(Serialize)]
struct InferenceRequest<'a> {
    inputs: &'a str,
}

/// Map a Shield Gemma report to a verdict.
///
/// The report shape is provider-defined, so the whole serialized report is
/// searched for "unsafe", ignoring case. Any occurrence wins, including one
/// that contradicts a structured field such as a low score.
pub fn verdict_from_report(report: &Value) -> ModerationVerdict {
    if report.to_string().to_lowercase().contains("unsafe") {
        ModerationVerdict::Unsafe
    } else {
        ModerationVerdict::Safe
    }
}

#[async_trait]
impl ModerationProvider for ShieldGemmaProvider {
    fn model_id(&self) -> &str {
        &self.model
    }

    async fn moderate(&self, text: &str) -> Result<ModerationOutcome, ProviderError> {
        tracing::debug!(model = %self.model, text_len = text.len(), "Sending moderation request");

        let response = self
            .client
            .post_json(
                "huggingface.inference",
                &self.endpoint,
                Some(self.api_key.expose_secret().as_str()),
                &InferenceRequest { inputs: text },
            )
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let report: Value = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        Ok(ModerationOutcome {
            verdict: verdict_from_report(&report),
            report,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use service_core::http::RetryConfig;
    use wiremock::matchers::{bearer_token, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn safe_label_is_safe() {
        assert_eq!(verdict_from_report(&json!({"label": "safe"})), ModerationVerdict::Safe);
        assert_eq!(
            verdict_from_report(&json!([{"label": "SAFE", "score": 0.99}])),
            ModerationVerdict::Safe
        );
    }

    #[test]
    fn unsafe_anywhere_is_unsafe() {
        assert_eq!(
            verdict_from_report(&json!({"label": "unsafe", "score": 0.9})),
            ModerationVerdict::Unsafe
        );
        assert_eq!(
            verdict_from_report(&json!([{"generated_text": "Verdict: UNSAFE"}])),
            ModerationVerdict::Unsafe
        );
    }

    #[test]
    fn substring_overrides_structured_fields() {
        let report = json!({"label": "safe", "score": 0.01, "note": "not Unsafe"});
        assert_eq!(verdict_from_report(&report), ModerationVerdict::Unsafe);
    }

    #[tokio::test]
    async fn posts_text_as_inputs() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/models/google/shield-gemma-2b"))
            .and(bearer_token("hf-test"))
            .and(body_json(json!({ "inputs": "hello" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"label": "safe"})))
            .expect(1)
            .mount(&server)
            .await;

        let config = ModerationConfig {
            api_key: Secret::new("hf-test".into()),
            base_url: server.uri(),
            model: "google/shield-gemma-2b".into(),
        };
        let outbound = OutboundConfig {
            retry: RetryConfig::no_retry(),
            ..Default::default()
        };
        let provider = ShieldGemmaProvider::new(&config, &outbound).unwrap();

        let outcome = provider.moderate("hello").await.unwrap();
        assert_eq!(outcome.verdict, ModerationVerdict::Safe);
        assert_eq!(outcome.report, json!({"label": "safe"}));
    }
}
