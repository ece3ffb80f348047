use serde::{Deserialize, Serialize};

/// Identity issued by the external identity provider, as kept in the session.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Identity {
    /// Principal the token was issued for.
    pub subject: String,
    /// Signed token, presented to the ledger as a bearer credential.
    pub token: String,
    /// Expiry as a Unix timestamp (seconds).
    pub expires_at: i64,
}

impl Identity {
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.expires_at
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(chrono::Utc::now().timestamp())
    }
}
