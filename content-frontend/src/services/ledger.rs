//! Ledger-backed record store, reached through an authenticated actor.
//!
//! A [`LedgerConnector`] turns a session identity into a [`LedgerActor`];
//! the actor performs `create_draft` and `save_generated` on behalf of that
//! identity. The HTTP implementation talks to the ledger's JSON gateway.

use crate::config::LedgerSettings;
use crate::models::Identity;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use service_core::error::AppError;
use service_core::http::OutboundClient;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("An identity is required to use the ledger")]
    Unauthenticated,

    #[error("Ledger returned {status}: {body}")]
    Rejected { status: u16, body: String },

    #[error("Ledger unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Invalid ledger response: {0}")]
    Decode(String),
}

/// Arguments of `create_draft`.
#[derive(Debug, Serialize)]
pub struct NewDraft<'a> {
    pub prompt: &'a str,
    pub platform: &'a str,
    pub content_type: &'a str,
    pub tone: &'a str,
}

/// Arguments of `save_generated`, minus the draft id.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct GeneratedRecord {
    pub pointer: String,
    pub hash: String,
    pub model: String,
    /// JSON object with the generation parameters.
    pub params: String,
}

/// Authenticated handle on the ledger.
#[async_trait]
pub trait LedgerActor: Send + Sync {
    /// Principal the actor acts for; `None` for an anonymous handle.
    fn principal(&self) -> Option<&str>;

    async fn create_draft(&self, draft: &NewDraft<'_>) -> Result<String, LedgerError>;

    async fn save_generated(&self, draft_id: &str, record: &GeneratedRecord) -> Result<(), LedgerError>;
}

/// Builds actors from session identities.
pub trait LedgerConnector: Send + Sync {
    fn connect(&self, identity: Option<&Identity>) -> Result<Arc<dyn LedgerActor>, LedgerError>;
}

pub struct HttpLedgerConnector {
    client: OutboundClient,
    base_url: String,
    allow_anonymous: bool,
}

impl HttpLedgerConnector {
    pub fn new(settings: &LedgerSettings) -> Result<Self, AppError> {
        Ok(Self {
            client: OutboundClient::new(&settings.outbound())?,
            base_url: settings.url.trim_end_matches('/').to_string(),
            allow_anonymous: settings.allow_anonymous,
        })
    }
}

impl LedgerConnector for HttpLedgerConnector {
    fn connect(&self, identity: Option<&Identity>) -> Result<Arc<dyn LedgerActor>, LedgerError> {
        let credential = match identity {
            Some(identity) => Some(Credential {
                principal: identity.subject.clone(),
                token: Secret::new(identity.token.clone()),
            }),
            None if self.allow_anonymous => None,
            None => return Err(LedgerError::Unauthenticated),
        };

        tracing::debug!(
            principal = credential.as_ref().map(|c| c.principal.as_str()).unwrap_or("anonymous"),
            "Constructed ledger actor"
        );

        Ok(Arc::new(HttpLedgerActor {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            credential,
        }))
    }
}

struct Credential {
    principal: String,
    token: Secret<String>,
}

pub struct HttpLedgerActor {
    client: OutboundClient,
    base_url: String,
    credential: Option<Credential>,
}

#[derive(Deserialize)]
struct CreateDraftResponse {
    draft_id: DraftId,
}

/// Ledgers number their drafts; some gateways send the id as a string.
#[derive(Deserialize)]
#[serde(untagged)]
enum DraftId {
    Number(u64),
    Text(String),
}

impl From<DraftId> for String {
    fn from(id: DraftId) -> Self {
        match id {
            DraftId::Number(n) => n.to_string(),
            DraftId::Text(s) => s,
        }
    }
}

impl HttpLedgerActor {
    fn bearer(&self) -> Option<&str> {
        self.credential
            .as_ref()
            .map(|c| c.token.expose_secret().as_str())
    }

    async fn post<T: Serialize + Sync>(
        &self,
        operation: &str,
        url: &str,
        body: &T,
    ) -> Result<reqwest::Response, LedgerError> {
        let response = self
            .client
            .post_json(operation, url, self.bearer(), body)
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LedgerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }
}

#[async_trait]
impl LedgerActor for HttpLedgerActor {
    fn principal(&self) -> Option<&str> {
        self.credential.as_ref().map(|c| c.principal.as_str())
    }

    async fn create_draft(&self, draft: &NewDraft<'_>) -> Result<String, LedgerError> {
        let url = format!("{}/drafts", self.base_url);
        let response = self.post("ledger.create_draft", &url, draft).await?;

        let created: CreateDraftResponse = response
            .json()
            .await
            .map_err(|e| LedgerError::Decode(e.to_string()))?;

        Ok(created.draft_id.into())
    }

    async fn save_generated(&self, draft_id: &str, record: &GeneratedRecord) -> Result<(), LedgerError> {
        let url = format!("{}/drafts/{}/generated", self.base_url, draft_id);
        self.post("ledger.save_generated", &url, record).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{bearer_token, body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn connector(url: String, allow_anonymous: bool) -> HttpLedgerConnector {
        HttpLedgerConnector::new(&LedgerSettings {
            url,
            allow_anonymous,
            timeout_secs: 5,
        })
        .unwrap()
    }

    fn identity() -> Identity {
        Identity {
            subject: "principal-1".into(),
            token: "id-token".into(),
            expires_at: i64::MAX,
        }
    }

    #[test]
    fn anonymous_handle_requires_opt_in() {
        let strict = connector("http://ledger".into(), false);
        assert!(matches!(strict.connect(None), Err(LedgerError::Unauthenticated)));

        let local = connector("http://ledger".into(), true);
        assert!(local.connect(None).unwrap().principal().is_none());
    }

    #[tokio::test]
    async fn create_then_save_uses_identity_as_bearer() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drafts"))
            .and(bearer_token("id-token"))
            .and(body_json(json!({
                "prompt": "p",
                "platform": "twitter",
                "content_type": "post",
                "tone": "casual"
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "draft_id": "d-7" })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/drafts/d-7/generated"))
            .and(bearer_token("id-token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let actor = connector(server.uri(), false).connect(Some(&identity())).unwrap();
        assert_eq!(actor.principal(), Some("principal-1"));

        let draft_id = actor
            .create_draft(&NewDraft {
                prompt: "p",
                platform: "twitter",
                content_type: "post",
                tone: "casual",
            })
            .await
            .unwrap();
        assert_eq!(draft_id, "d-7");

        actor
            .save_generated(
                &draft_id,
                &GeneratedRecord {
                    pointer: "urn:sha256:00".into(),
                    hash: "sha256:00".into(),
                    model: "openai:gpt-4o-mini".into(),
                    params: "{}".into(),
                },
            )
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn rejected_write_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("not a member"))
            .expect(1)
            .mount(&server)
            .await;

        let actor = connector(server.uri(), false).connect(Some(&identity())).unwrap();
        let err = actor
            .save_generated("d-1", &GeneratedRecord {
                pointer: String::new(),
                hash: String::new(),
                model: String::new(),
                params: String::new(),
            })
            .await
            .unwrap_err();

        assert!(matches!(err, LedgerError::Rejected { status: 403, .. }));
    }

    #[tokio::test]
    async fn numeric_draft_id_is_accepted() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/drafts"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "draft_id": 7 })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/drafts/7/generated"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let actor = connector(server.uri(), false).connect(Some(&identity())).unwrap();
        let draft_id = actor
            .create_draft(&NewDraft {
                prompt: "p",
                platform: "twitter",
                content_type: "post",
                tone: "casual",
            })
            .await
            .unwrap();
        assert_eq!(draft_id, "7");

        actor
            .save_generated(
                &draft_id,
                &GeneratedRecord {
                    pointer: "urn:sha256:00".into(),
                    hash: "sha256:00".into(),
                    model: "openai:gpt-4o-mini".into(),
                    params: "{}".into(),
                },
            )
            .await
            .unwrap();
    }
}
