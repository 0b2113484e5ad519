//
//  fryends-client
//  auth/jwt.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Unverified inspection of JWT claims.
//!
//! The signature is never checked; this is only used to decide locally
//! whether a token is worth sending or should be refreshed first.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Deserialize)]
struct Claims {
    #[serde(default)]
    exp: Option<i64>,
}

/// Returns the `exp` claim of a JWT, if the token is a JWT and has one.
///
/// ```rust
/// use fryends_client::auth::jwt;
///
/// // {"alg":"none"}.{"exp":1700000000}.
/// let token = "eyJhbGciOiJub25lIn0.eyJleHAiOjE3MDAwMDAwMDB9.";
/// assert_eq!(jwt::expires_at(token).map(|t| t.timestamp()), Some(1_700_000_000));
/// assert!(jwt::expires_at("opaque-token").is_none());
/// ```
pub fn expires_at(token: &str) -> Option<DateTime<Utc>> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .ok()?;
    let claims: Claims = serde_json::from_slice(&bytes).ok()?;
    DateTime::from_timestamp(claims.exp?, 0)
}

/// Returns `true` if the token carries an `exp` claim in the past.
///
/// Tokens without an expiry are never considered expired.
pub fn is_expired(token: &str) -> bool {
    expires_at(token).is_some_and(|exp| exp <= Utc::now())
}
