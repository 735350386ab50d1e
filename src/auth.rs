//! Bearer token acquisition and JWT claim lookup.
//!
//! Tokens are treated as opaque for authorization. The provider id and guid
//! are read from the payload segment without verifying the signature; the
//! harness only needs them to build request bodies.
//!
//! Security notes:
//! - Never log the password or the token value

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use serde::Serialize;
use serde_json::Value;

use crate::settings::HarnessSettings;
use crate::transport::{ApiRequest, Transport, TransportError};

#[derive(Debug, Clone, thiserror::Error)]
pub enum AuthError {
    #[error("No credentials configured. Set HARNESS_USERNAME and HARNESS_PASSWORD.")]
    MissingCredentials,
    #[error("Authentication request failed: {0}")]
    Transport(#[from] TransportError),
    #[error("Authentication response has no token")]
    MissingToken,
    #[error("Malformed JWT: {0}")]
    MalformedToken(String),
    #[error("Claim '{0}' not found in token")]
    MissingClaim(String),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Log in and return the bearer token.
pub async fn fetch_auth_token(
    transport: &dyn Transport,
    settings: &HarnessSettings,
    username: &str,
    password: &str,
) -> Result<String, AuthError> {
    let request = ApiRequest::post(&settings.auth_base_url, &settings.auth_path)
        .json(&LoginRequest { username, password });

    let response = transport.send(request).await?;
    let body = response.success_json()?;

    match body.get("token").and_then(Value::as_str) {
        Some(token) if !token.is_empty() => {
            log::info!("Authenticated as {}", username);
            Ok(token.to_string())
        }
        _ => Err(AuthError::MissingToken),
    }
}

/// Log in with the credentials from settings.
pub async fn fetch_configured_token(
    transport: &dyn Transport,
    settings: &HarnessSettings,
) -> Result<String, AuthError> {
    match (&settings.username, &settings.password) {
        (Some(username), Some(password)) if settings.has_credentials() => {
            fetch_auth_token(transport, settings, username, password).await
        }
        _ => Err(AuthError::MissingCredentials),
    }
}

/// Decode the (unverified) payload segment of a JWT.
pub fn decode_claims(token: &str) -> Result<Value, AuthError> {
    let token = token.strip_prefix("Bearer ").unwrap_or(token);
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| AuthError::MalformedToken("expected three segments".to_string()))?;

    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| AuthError::MalformedToken(e.to_string()))?;

    serde_json::from_slice(&bytes).map_err(|e| AuthError::MalformedToken(e.to_string()))
}

fn claim_as_string(token: &str, claim: &str) -> Result<String, AuthError> {
    let claims = decode_claims(token)?;
    match claims.get(claim) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s.clone()),
        Some(Value::Number(n)) => Ok(n.to_string()),
        _ => Err(AuthError::MissingClaim(claim.to_string())),
    }
}

/// Provider id (`uid` claim); used as the recording process's `doctorId`.
pub fn provider_id(token: &str) -> Result<String, AuthError> {
    claim_as_string(token, "uid")
}

/// Provider guid (`guid` claim).
pub fn provider_guid(token: &str) -> Result<String, AuthError> {
    claim_as_string(token, "guid")
}
