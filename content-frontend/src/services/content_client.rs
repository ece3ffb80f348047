use crate::config::ContentServiceSettings;
use crate::models::{GenerateForm, GeneratedContent};
use service_core::error::AppError;
use service_core::http::OutboundClient;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentClientError {
    #[error("Content service returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Content service unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid content service response: {0}")]
    Decode(String),
}

/// Client for the content service's `/generate` endpoint.
pub struct ContentClient {
    client: OutboundClient,
    generate_url: String,
}

impl ContentClient {
    pub fn new(settings: &ContentServiceSettings) -> Result<Self, AppError> {
        Ok(Self {
            client: OutboundClient::new(&settings.outbound())?,
            generate_url: format!("{}/generate", settings.url.trim_end_matches('/')),
        })
    }

    /// Request generated content for one form submission.
    ///
    /// Trace context and the inbound request id are forwarded with the call.
    pub async fn generate(&self, form: &GenerateForm) -> Result<GeneratedContent, ContentClientError> {
        let response = self
            .client
            .post_json("content.generate", &self.generate_url, None, form)
            .await
            .map_err(|e| {
                tracing::error!("Failed to reach content service at {}: {}", self.generate_url, e);
                ContentClientError::from(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ContentClientError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<GeneratedContent>()
            .await
            .map_err(|e| ContentClientError::Decode(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn settings(url: String) -> ContentServiceSettings {
        ContentServiceSettings {
            url,
            timeout_secs: 5,
        }
    }

    #[tokio::test]
    async fn sends_form_as_generate_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/generate"))
            .and(body_json(json!({
                "prompt": "Announce a feature",
                "platform": "twitter",
                "contentType": "post",
                "tone": "excited"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "content": "Check out our new feature!",
                "model": "openai:gpt-4o-mini",
                "moderation_model": "google/shield-gemma-2b",
                "moderation": { "label": "safe" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ContentClient::new(&settings(server.uri())).unwrap();
        let form = GenerateForm {
            prompt: "Announce a feature".into(),
            tone: "excited".into(),
            ..Default::default()
        };

        let generated = client.generate(&form).await.unwrap();
        assert_eq!(generated.content, "Check out our new feature!");
        assert_eq!(generated.model, "openai:gpt-4o-mini");
    }

    #[tokio::test]
    async fn error_status_is_rejected_with_body() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(502).set_body_json(json!({ "error": "OpenAI error" })),
            )
            .mount(&server)
            .await;

        let client = ContentClient::new(&settings(server.uri())).unwrap();
        let err = client.generate(&GenerateForm::default()).await.unwrap_err();

        assert!(matches!(err, ContentClientError::Rejected { status: 502, .. }));
    }
}
