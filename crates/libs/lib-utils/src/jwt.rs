//! # JWT Claim Inspection
//!
//! Reads the `exp` claim of a bearer token without verifying its signature.
//! The client only uses this to avoid presenting a token it already knows is
//! stale; the backend remains the authority on validity.

use chrono::{DateTime, TimeZone, Utc};

use crate::b64::b64u_decode_to_string;

/// Expiry instant of a JWT, if the token is a JWT carrying a numeric `exp`.
///
/// Opaque (non-JWT) tokens and tokens without `exp` return `None`.
pub fn jwt_expires_at(token: &str) -> Option<DateTime<Utc>> {
    let mut segments = token.split('.');
    let (_header, payload, _signature) = (segments.next()?, segments.next()?, segments.next()?);
    if segments.next().is_some() {
        return None;
    }

    let claims: serde_json::Value = serde_json::from_str(&b64u_decode_to_string(payload).ok()?).ok()?;
    let exp = claims.get("exp")?.as_i64()?;
    Utc.timestamp_opt(exp, 0).single()
}

/// Whether the token is a JWT whose `exp` lies at or before `now`.
pub fn jwt_is_expired(token: &str, now: DateTime<Utc>) -> bool {
    jwt_expires_at(token).is_some_and(|exp| exp <= now)
}
