//! OpenAI-compatible chat completions provider.

use super::{upstream_error, GenerationProvider, ProviderError};
use crate::config::OpenAiConfig;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::http::{OutboundClient, OutboundConfig};

pub struct OpenAiProvider {
    client: OutboundClient,
    api_key: Secret<String>,
    endpoint: String,
    model: String,
    model_id: String,
    temperature: f32,
}

impl OpenAiProvider {
    pub fn new(config: &OpenAiConfig, outbound: &OutboundConfig) -> Result<Self, AppError> {
        Ok(Self {
            client: OutboundClient::new(outbound)?,
            api_key: config.api_key.clone(),
            endpoint: format!("{}/chat/completions", config.base_url),
            model: config.model.clone(),
            model_id: format!("openai:{}", config.model),
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl GenerationProvider for OpenAiProvider {
    fn model_id(&self) -> &str {
        &self.model_id
    }

    async fn generate(&self, system_instruction: &str, prompt: &str) -> Result<String, ProviderError> {
        let request = ChatCompletionRequest {
            model: &self.model,
            messages: [
                ChatMessage {
                    role: "system",
                    content: system_instruction,
                },
                ChatMessage {
                    role: "user",
                    content: prompt,
                },
            ],
            temperature: self.temperature,
        };

        tracing::debug!(
            model = %self.model,
            prompt_len = prompt.len(),
            "Sending chat completion request"
        );

        let response = self
            .client
            .post_json(
                "openai.chat_completions",
                &self.endpoint,
                Some(self.api_key.expose_secret().as_str()),
                &request,
            )
            .await?;

        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }

        let body: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))?;

        extract_content(body).ok_or(ProviderError::EmptyContent)
    }
}

/// First choice's message text, trimmed; `None` when blank or absent.
fn extract_content(body: ChatCompletionResponse) -> Option<String> {
    body.choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message)
        .and_then(|message| message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
}

// Wire types

#[derive(Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 2],
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize, Default)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}
