//! Access-token expiry checks
//!
//! Portal tokens are JWTs; only the `exp` claim matters here, read from the
//! payload segment without signature verification. Anything that fails to
//! decode counts as expired rather than surfacing an error.

use base64::Engine;
use serde::Deserialize;
use std::time::{SystemTime, UNIX_EPOCH};

#[derive(Debug, Deserialize)]
struct Claims {
    exp: i64,
}

fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// The `exp` claim (seconds since epoch), if the token decodes as a JWT.
pub fn expiry(token: &str) -> Option<i64> {
    let mut segments = token.split('.');
    let payload = match (segments.next(), segments.next(), segments.next(), segments.next()) {
        (Some(_), Some(payload), Some(_), None) => payload,
        _ => return None,
    };

    let bytes = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    Some(claims.exp)
}

/// Whether a token can no longer be presented to the API.
///
/// `exp` equal to the current second already counts as expired.
pub fn is_expired(token: &str) -> bool {
    match expiry(token) {
        Some(exp) => exp <= now_secs(),
        None => true,
    }
}

/// Whether the stored pair can still reach the API: a live access token, or
/// a refresh token whose validity a refresh round-trip has to confirm.
pub fn is_authenticated(access: Option<&str>, refresh: Option<&str>) -> bool {
    match access {
        Some(token) if !is_expired(token) => true,
        _ => refresh.is_some(),
    }
}
