#![allow(dead_code)]

use base64::{engine::general_purpose, Engine as _};
use content_frontend::config::get_configuration;
use content_frontend::services::content_client::ContentClient;
use content_frontend::services::ledger::HttpLedgerConnector;
use content_frontend::services::ledger_handles::LedgerHandles;
use content_frontend::startup::build_router;
use content_frontend::AppState;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const GENERATED: &str = "Check out our new feature!";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub content_server: MockServer,
    pub ledger_server: MockServer,
    pub ledger: Arc<LedgerHandles>,
}

/// Spawn the frontend against stub content-service and ledger servers.
pub async fn spawn_app(allow_anonymous: bool) -> TestApp {
    let content_server = MockServer::start().await;
    let ledger_server = MockServer::start().await;

    // Shipped configuration, pointed at the stubs
    let mut settings = get_configuration().expect("Failed to read configuration");
    settings.content_service.url = content_server.uri();
    settings.ledger.url = ledger_server.uri();
    settings.ledger.allow_anonymous = allow_anonymous;

    let content_client = ContentClient::new(&settings.content_service).expect("content client");
    let connector = HttpLedgerConnector::new(&settings.ledger).expect("ledger connector");

    let state = AppState::new(Arc::new(content_client), Arc::new(connector));
    let ledger = state.ledger.clone();
    let router = build_router(state, false);

    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().unwrap().port();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let client = reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .unwrap();

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        client,
        content_server,
        ledger_server,
        ledger,
    }
}

/// An unsigned identity token with the given subject and expiry.
pub fn identity_token(subject: &str, exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"EdDSA","typ":"JWT"}"#);
    let payload =
        general_purpose::URL_SAFE_NO_PAD.encode(json!({ "sub": subject, "exp": exp }).to_string());
    format!("{}.{}.sig", header, payload)
}

pub fn generated_body() -> serde_json::Value {
    json!({
        "content": GENERATED,
        "model": "openai:gpt-4o-mini",
        "moderation_model": "google/shield-gemma-2b",
        "moderation": { "label": "safe" }
    })
}

impl TestApp {
    pub fn url(&self, route: &str) -> String {
        format!("{}{}", self.address, route)
    }

    pub async fn get_index(&self) -> reqwest::Response {
        self.client.get(self.url("/")).send().await.unwrap()
    }

    pub async fn post_generate(&self, prompt: &str) -> reqwest::Response {
        self.client
            .post(self.url("/generate"))
            .form(&[
                ("prompt", prompt),
                ("platform", "twitter"),
                ("contentType", "post"),
                ("tone", "excited"),
            ])
            .send()
            .await
            .unwrap()
    }

    pub async fn post_content(&self, content: &str) -> reqwest::Response {
        self.client
            .post(self.url("/content"))
            .form(&[("content", content)])
            .send()
            .await
            .unwrap()
    }

    pub async fn post_save(&self) -> reqwest::Response {
        self.client.post(self.url("/save")).send().await.unwrap()
    }

    pub async fn post_login(&self, token: &str) -> reqwest::Response {
        self.client
            .post(self.url("/login"))
            .form(&[("identity_token", token)])
            .send()
            .await
            .unwrap()
    }

    pub async fn post_logout(&self) -> reqwest::Response {
        self.client.post(self.url("/logout")).send().await.unwrap()
    }

    pub async fn content_service_returns(&self, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.content_server)
            .await;
    }

    pub async fn content_service_returns_slowly(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(generated_body())
                    .set_delay(delay),
            )
            .expect(1)
            .mount(&self.content_server)
            .await;
    }

    pub async fn content_service_fails(&self, status: u16, body: serde_json::Value) {
        Mock::given(method("POST"))
            .and(path("/generate"))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.content_server)
            .await;
    }

    pub async fn content_service_never_called(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.content_server)
            .await;
    }

    pub async fn ledger_never_called(&self) {
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.ledger_server)
            .await;
    }
}
