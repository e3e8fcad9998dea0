//! HTTP Basic authentication for the admin surface.

use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use gateways::AuthProvider;

use crate::error::ApiError;

/// Checks the `Authorization: Basic` header against the configured
/// credential provider. Returns `Unauthorized` when the header is
/// missing, malformed, or the credentials don't match.
pub fn require_admin(headers: &HeaderMap, provider: &dyn AuthProvider) -> Result<(), ApiError> {
    let (username, password) = parse_basic(headers).ok_or(ApiError::Unauthorized)?;
    if provider.verify(&username, &password) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized)
    }
}

fn parse_basic(headers: &HeaderMap) -> Option<(String, String)> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let encoded = header.strip_prefix("Basic ")?;
    let decoded = BASE64.decode(encoded).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
