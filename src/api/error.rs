//
//  fryends-client
//  api/error.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Error Types
//!
//! Every failure an endpoint call can produce is an [`ApiError`]. All
//! classification of HTTP failures happens in one place,
//! [`classify_failure`], so callers only ever see a single typed outcome.
//!
//! ## Taxonomy
//!
//! | Variant | Cause | Retried |
//! |---------|-------|---------|
//! | `Network(InvalidUrl)` | endpoint path does not form a URL | never |
//! | `Network(ServerError)` | HTTP 500 | never (caller policy) |
//! | `Network(Unknown)` | error body could not be decoded | never |
//! | `Network(Offline)` | reachability probe reported no network | never |
//! | `Request(..)` | structured backend error body | 401 only, via refresh |
//! | `Decoding(..)` | success body did not match the expected type | never |
//! | `Transport(..)` | connection, TLS, timeout | never |
//!
//! ## Example
//!
//! ```rust
//! use fryends_client::api::{classify_failure, ApiError, NetworkError};
//! use reqwest::StatusCode;
//!
//! let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, b"{\"message\":\"boom\"}");
//! assert!(matches!(err, ApiError::Network(NetworkError::ServerError)));
//! ```

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// `errorcode` value the backend sends for an unknown skillr id.
const NO_SUCH_SKILLR: &str = "No such skillr";

/// `name` value the backend sends when throttling a caller.
const RATE_LIMIT_ERROR: &str = "RateLimitError";

/// Generic transport-level failures.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NetworkError {
    /// The endpoint path could not be turned into a valid URL.
    #[error("Invalid URL")]
    InvalidUrl,

    /// The response carried an unexpected status code.
    #[error("Unexpected status code")]
    ResponseError,

    /// The backend answered with HTTP 500.
    #[error("Unknown error")]
    ServerError,

    /// Anything that could not be classified, including undecodable error bodies.
    #[error("Something went wrong")]
    Unknown,

    /// The reachability probe reported that the device is offline.
    #[error("No network connection")]
    Offline,
}

/// Decoded shape of a backend error body.
///
/// ```json
/// {"name": "RateLimitError", "message": "Too many requests", "errorcode": null, "errors": []}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RequestErrorModel {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errorcode: Option<String>,
    #[serde(default)]
    pub errors: Option<Vec<String>>,
}

/// Which branch of the backend error classification was taken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestErrorKind {
    /// The requested skillr does not exist.
    NoSuchSkillr,
    /// The caller has been rate limited.
    RateLimited,
    /// Any other structured backend error.
    Backend,
}

/// A structured error reported by the backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", .message.as_deref().unwrap_or("Request failed"))]
pub struct RequestError {
    /// Classification of the error body.
    pub kind: RequestErrorKind,
    /// HTTP status code of the failed response.
    pub code: Option<u16>,
    /// Message key or backend-provided message.
    pub message: Option<String>,
}

impl RequestError {
    /// Message key for [`RequestErrorKind::NoSuchSkillr`].
    pub const NO_SUCH_SKILLR_KEY: &'static str = "NetworkErrorCodes.Skillr.NoSuchSkillr";

    /// Message key for [`RequestErrorKind::RateLimited`].
    pub const RATE_LIMIT_KEY: &'static str = "NetworkErrorCodes.User.rateLimit";

    /// Builds the error for a decoded body and status.
    pub fn from_model(model: RequestErrorModel, status: StatusCode) -> Self {
        let code = Some(status.as_u16());
        if model.errorcode.as_deref() == Some(NO_SUCH_SKILLR) {
            return Self {
                kind: RequestErrorKind::NoSuchSkillr,
                code,
                message: Some(Self::NO_SUCH_SKILLR_KEY.to_string()),
            };
        }
        if model.errorcode.is_none() && model.name.as_deref() == Some(RATE_LIMIT_ERROR) {
            return Self {
                kind: RequestErrorKind::RateLimited,
                code,
                message: Some(Self::RATE_LIMIT_KEY.to_string()),
            };
        }
        Self {
            kind: RequestErrorKind::Backend,
            code,
            message: model.message,
        }
    }
}

/// Unified error type for endpoint calls.
#[derive(Error, Debug)]
pub enum ApiError {
    /// A generic network failure.
    #[error(transparent)]
    Network(#[from] NetworkError),

    /// A structured error body returned by the backend.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The success body did not decode into the expected type.
    #[error("Failed to decode response: {0}")]
    Decoding(#[from] serde_json::Error),

    /// The request never completed (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The auth state could not be read or written.
    #[error("Authentication state error: {0}")]
    Auth(String),

    /// The call was cancelled before it completed.
    #[error("Request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Returns `true` if the backend rejected the bearer token.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Request(e) if e.code == Some(StatusCode::UNAUTHORIZED.as_u16()))
    }

    /// Returns the backend error classification, if any.
    pub fn request_kind(&self) -> Option<RequestErrorKind> {
        match self {
            Self::Request(e) => Some(e.kind),
            _ => None,
        }
    }
}

/// Classifies a non-2xx response into an [`ApiError`].
///
/// - HTTP 500 is always [`NetworkError::ServerError`], whatever the body says.
/// - Otherwise the body is decoded as a [`RequestErrorModel`] and mapped by
///   [`RequestError::from_model`].
/// - A body that does not decode yields [`NetworkError::Unknown`].
pub fn classify_failure(status: StatusCode, body: &[u8]) -> ApiError {
    if status == StatusCode::INTERNAL_SERVER_ERROR {
        return NetworkError::ServerError.into();
    }

    match serde_json::from_slice::<RequestErrorModel>(body) {
        Ok(model) => RequestError::from_model(model, status).into(),
        Err(e) => {
            tracing::debug!("Error body for status {} did not decode: {}", status, e);
            NetworkError::Unknown.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_ignores_body() {
        let err = classify_failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            br#"{"errorcode":"No such skillr"}"#,
        );
        assert!(matches!(err, ApiError::Network(NetworkError::ServerError)));

        let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, b"<html>");
        assert!(matches!(err, ApiError::Network(NetworkError::ServerError)));
    }

    #[test]
    fn test_no_such_skillr() {
        let err = classify_failure(StatusCode::NOT_FOUND, br#"{"errorcode":"No such skillr"}"#);
        match err {
            ApiError::Request(e) => {
                assert_eq!(e.kind, RequestErrorKind::NoSuchSkillr);
                assert_eq!(e.code, Some(404));
                assert_eq!(e.message.as_deref(), Some(RequestError::NO_SUCH_SKILLR_KEY));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_rate_limit_requires_missing_errorcode() {
        let err = classify_failure(StatusCode::TOO_MANY_REQUESTS, br#"{"name":"RateLimitError"}"#);
        assert_eq!(err.request_kind(), Some(RequestErrorKind::RateLimited));

        let err = classify_failure(
            StatusCode::TOO_MANY_REQUESTS,
            br#"{"name":"RateLimitError","errorcode":"E42","message":"slow down"}"#,
        );
        assert_eq!(err.request_kind(), Some(RequestErrorKind::Backend));
        assert_eq!(err.to_string(), "slow down");
    }

    #[test]
    fn test_generic_backend_error_carries_message() {
        let err = classify_failure(
            StatusCode::BAD_REQUEST,
            br#"{"name":"ValidationError","message":"email is required","errors":["email"]}"#,
        );
        match err {
            ApiError::Request(e) => {
                assert_eq!(e.kind, RequestErrorKind::Backend);
                assert_eq!(e.message.as_deref(), Some("email is required"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_object_is_backend_error_without_message() {
        let err = classify_failure(StatusCode::FORBIDDEN, b"{}");
        assert_eq!(err.request_kind(), Some(RequestErrorKind::Backend));
        assert_eq!(err.to_string(), "Request failed");
    }

    #[test]
    fn test_undecodable_body_is_unknown() {
        let err = classify_failure(StatusCode::BAD_GATEWAY, b"upstream timed out");
        assert!(matches!(err, ApiError::Network(NetworkError::Unknown)));

        let err = classify_failure(StatusCode::BAD_REQUEST, b"");
        assert!(matches!(err, ApiError::Network(NetworkError::Unknown)));
    }

    #[test]
    fn test_is_unauthorized() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, br#"{"message":"jwt expired"}"#);
        assert!(err.is_unauthorized());

        let err = classify_failure(StatusCode::FORBIDDEN, br#"{"message":"nope"}"#);
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_network_error_descriptions() {
        assert_eq!(NetworkError::InvalidUrl.to_string(), "Invalid URL");
        assert_eq!(NetworkError::ResponseError.to_string(), "Unexpected status code");
        assert_eq!(NetworkError::Unknown.to_string(), "Something went wrong");
    }
}
