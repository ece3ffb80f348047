use crate::models::Identity;
use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    pub exp: i64,
}

/// Decode the claims of a signed identity token without verifying it.
///
/// The signature is checked by the ledger, which receives the token as its
/// bearer credential; the frontend only needs the subject and expiry.
pub fn decode_identity_claims(token: &str) -> Result<IdentityClaims> {
    let parts: Vec<&str> = token.split('.').collect();

    if parts.len() != 3 {
        return Err(anyhow::anyhow!("Invalid identity token format"));
    }

    let payload = general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| anyhow::anyhow!("Failed to decode identity payload: {}", e))?;

    let claims: IdentityClaims = serde_json::from_slice(&payload)
        .map_err(|e| anyhow::anyhow!("Failed to parse identity claims: {}", e))?;

    Ok(claims)
}

/// Build a session identity from a token, refusing tokens that expired at `now`.
pub fn identity_from_token(token: &str, now: i64) -> Result<Identity> {
    let token = token.trim();
    let claims = decode_identity_claims(token)?;

    let identity = Identity {
        subject: claims.sub,
        token: token.to_string(),
        expires_at: claims.exp,
    };

    if identity.is_expired_at(now) {
        return Err(anyhow::anyhow!("Identity token has expired"));
    }

    Ok(identity)
}

#[cfg(test)]
pub(crate) fn encode_test_token(sub: &str, exp: i64) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(r#"{"alg":"EdDSA","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD
        .encode(serde_json::json!({ "sub": sub, "exp": exp }).to_string());
    format!("{}.{}.signature", header, payload)
}
