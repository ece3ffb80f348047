use super::{Draft, Identity};
use crate::error::FrontendError;
use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use serde::{de::DeserializeOwned, Serialize};
use tower_sessions::Session;
use uuid::Uuid;

const CLIENT_KEY: &str = "client_key";
const IDENTITY_KEY: &str = "identity";
const DRAFT_KEY: &str = "draft";

/// Browser session plus the client key that identifies it to in-process
/// registries (in-flight gate, ledger handles).
pub struct SessionContext {
    pub session: Session,
    pub client_key: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionContext
where
    S: Send + Sync,
{
    type Rejection = FrontendError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state)
            .await
            .map_err(|(_, msg)| FrontendError::Session(msg.to_string()))?;

        let client_key = match session.get::<String>(CLIENT_KEY).await? {
            Some(key) => key,
            None => {
                let key = Uuid::new_v4().to_string();
                session.insert(CLIENT_KEY, &key).await?;
                key
            }
        };

        Ok(SessionContext {
            session,
            client_key,
        })
    }
}

impl SessionContext {
    async fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, FrontendError> {
        Ok(self.session.get::<T>(key).await?)
    }

    async fn store<T: Serialize>(&self, key: &str, value: &T) -> Result<(), FrontendError> {
        Ok(self.session.insert(key, value).await?)
    }

    pub async fn identity(&self) -> Result<Option<Identity>, FrontendError> {
        self.load(IDENTITY_KEY).await
    }

    pub async fn set_identity(&self, identity: &Identity) -> Result<(), FrontendError> {
        self.store(IDENTITY_KEY, identity).await
    }

    pub async fn draft(&self) -> Result<Option<Draft>, FrontendError> {
        self.load(DRAFT_KEY).await
    }

    pub async fn set_draft(&self, draft: &Draft) -> Result<(), FrontendError> {
        self.store(DRAFT_KEY, draft).await
    }
}
