#![allow(dead_code)]

use content_service::config::{
    ContentConfig, CorsConfig, ModerationConfig, OpenAiConfig, OutboundSettings,
};
use content_service::models::RequestDefaults;
use content_service::startup::Application;
use secrecy::Secret;
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const MODERATION_MODEL: &str = "google/shield-gemma-2b";
pub const MODERATION_PATH: &str = "/models/google/shield-gemma-2b";

/// A running content service wired to stub generation and moderation servers.
pub struct TestApp {
    pub address: String,
    pub openai: MockServer,
    pub huggingface: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let openai = MockServer::start().await;
        let huggingface = MockServer::start().await;

        let config = ContentConfig {
            common: CoreConfig { port: 0 },
            openai: OpenAiConfig {
                api_key: Secret::new("sk-test".to_string()),
                base_url: openai.uri(),
                model: "gpt-4o-mini".to_string(),
                temperature: 0.7,
            },
            moderation: ModerationConfig {
                api_key: Secret::new("hf-test".to_string()),
                base_url: huggingface.uri(),
                model: MODERATION_MODEL.to_string(),
            },
            outbound: OutboundSettings {
                timeout_secs: 5,
                max_retries: 1,
            },
            cors: CorsConfig {
                allowed_origin: "http://localhost:3000".to_string(),
            },
            defaults: RequestDefaults::default(),
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server by polling the health endpoint
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            openai,
            huggingface,
            client,
        }
    }

    pub async fn post_generate(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(format!("{}/generate", self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Stub the chat completion endpoint with a successful completion.
    pub async fn completion_returns(&self, text: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{ "message": { "role": "assistant", "content": text } }]
            })))
            .expect(expected_calls)
            .mount(&self.openai)
            .await;
    }

    pub async fn completion_fails(&self, status: u16, body: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&self.openai)
            .await;
    }

    pub async fn moderation_returns(&self, report: Value, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(MODERATION_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(report))
            .expect(expected_calls)
            .mount(&self.huggingface)
            .await;
    }

    pub async fn moderation_fails(&self, status: u16, body: &str, expected_calls: u64) {
        Mock::given(method("POST"))
            .and(path(MODERATION_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .expect(expected_calls)
            .mount(&self.huggingface)
            .await;
    }

    pub async fn moderation_never_called(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.huggingface)
            .await;
    }

    pub async fn openai_never_called(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&self.openai)
            .await;
    }
}
