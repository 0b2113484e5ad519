//
//  fryends-client
//  api/endpoint.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Endpoint Catalog
//!
//! Every backend operation the client can perform is a variant of [`Endpoint`].
//! Each variant knows its path, its HTTP method, and whether the request must
//! carry a bearer token.
//!
//! ## Example
//!
//! ```rust
//! use fryends_client::api::{Endpoint, RequestMethod};
//!
//! let endpoint = Endpoint::RetrieveSkillrList {
//!     query: Some("?isFavourite=true".to_string()),
//! };
//!
//! assert_eq!(endpoint.path(), "/app/skillrs?isFavourite=true");
//! assert_eq!(endpoint.method(), RequestMethod::Get);
//! assert!(endpoint.requires_bearer());
//! ```

use std::fmt;

/// Query fragment that marks a skillr listing as user-specific.
const FAVOURITES_MARKER: &str = "isFavourite=true";

/// HTTP request methods understood by the client.
///
/// Mirrors the full method set of the backend contract even though the
/// current catalog only uses `GET` and `POST`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    Options,
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
    Trace,
    Connect,
}

impl RequestMethod {
    /// Returns the method name as sent on the wire.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Options => "OPTIONS",
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
            Self::Trace => "TRACE",
            Self::Connect => "CONNECT",
        }
    }

    /// Returns `true` for methods whose parameters travel in the request body.
    ///
    /// Only `POST` and `PUT` carry a body; every other method sends its
    /// parameters as URL query items.
    pub fn carries_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<RequestMethod> for reqwest::Method {
    fn from(method: RequestMethod) -> Self {
        match method {
            RequestMethod::Options => reqwest::Method::OPTIONS,
            RequestMethod::Get => reqwest::Method::GET,
            RequestMethod::Head => reqwest::Method::HEAD,
            RequestMethod::Post => reqwest::Method::POST,
            RequestMethod::Put => reqwest::Method::PUT,
            RequestMethod::Patch => reqwest::Method::PATCH,
            RequestMethod::Delete => reqwest::Method::DELETE,
            RequestMethod::Trace => reqwest::Method::TRACE,
            RequestMethod::Connect => reqwest::Method::CONNECT,
        }
    }
}

/// A fixed backend operation.
///
/// Endpoints are cheap values built per call and thrown away afterwards.
///
/// # Variants
///
/// * `RefreshToken` - exchange an expired or invalid token for a fresh one
/// * `Login` - authenticate with user credentials
/// * `RetrieveSkillrList` - list skillrs, with an optional pre-encoded query
///   fragment (for example `?page=1&limit=100`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// `POST /refreshToken`
    RefreshToken,

    /// `POST /login`
    Login,

    /// `GET /app/skillrs<query>`
    RetrieveSkillrList {
        /// Query fragment appended verbatim to the path.
        ///
        /// The caller is responsible for producing a valid, already encoded
        /// fragment including the leading `?`.
        query: Option<String>,
    },
}

impl Endpoint {
    /// Returns the path relative to the API base URL.
    ///
    /// The skillr list query is appended without validation or encoding.
    pub fn path(&self) -> String {
        match self {
            Self::RefreshToken => "/refreshToken".to_string(),
            Self::Login => "/login".to_string(),
            Self::RetrieveSkillrList { query } => {
                format!("/app/skillrs{}", query.as_deref().unwrap_or_default())
            }
        }
    }

    /// Returns the HTTP method used for this endpoint.
    ///
    /// The match is exhaustive: a new endpoint without a method
    /// mapping does not compile.
    pub fn method(&self) -> RequestMethod {
        match self {
            Self::RetrieveSkillrList { .. } => RequestMethod::Get,
            Self::Login | Self::RefreshToken => RequestMethod::Post,
        }
    }

    /// Returns `true` if the request must carry `Authorization: Bearer <token>`.
    ///
    /// Login and token refresh never do. The skillr list only does when its
    /// query asks for the caller's favourites.
    ///
    /// # Example
    ///
    /// ```rust
    /// use fryends_client::api::Endpoint;
    ///
    /// assert!(!Endpoint::Login.requires_bearer());
    /// assert!(!Endpoint::RetrieveSkillrList { query: None }.requires_bearer());
    /// assert!(Endpoint::RetrieveSkillrList {
    ///     query: Some("?page=2&isFavourite=true".into()),
    /// }
    /// .requires_bearer());
    /// ```
    pub fn requires_bearer(&self) -> bool {
        match self {
            Self::RefreshToken | Self::Login => false,
            Self::RetrieveSkillrList { query } => query
                .as_deref()
                .is_some_and(|q| q.contains(FAVOURITES_MARKER)),
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RefreshToken => f.write_str("Refresh a token"),
            Self::Login => f.write_str("Login to the app"),
            Self::RetrieveSkillrList { .. } => {
                f.write_str("Retrieve list of Skillrs (/app/skillrs)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn skillrs(query: &str) -> Endpoint {
        Endpoint::RetrieveSkillrList {
            query: Some(query.to_string()),
        }
    }

    #[test]
    fn test_paths() {
        assert_eq!(Endpoint::RefreshToken.path(), "/refreshToken");
        assert_eq!(Endpoint::Login.path(), "/login");
        assert_eq!(
            Endpoint::RetrieveSkillrList { query: None }.path(),
            "/app/skillrs"
        );
        assert_eq!(skillrs("?page=1&limit=100").path(), "/app/skillrs?page=1&limit=100");
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::Login.method(), RequestMethod::Post);
        assert_eq!(Endpoint::RefreshToken.method(), RequestMethod::Post);
        assert_eq!(skillrs("").method(), RequestMethod::Get);
    }

    #[test]
    fn test_auth_endpoints_never_send_bearer() {
        assert!(!Endpoint::Login.requires_bearer());
        assert!(!Endpoint::RefreshToken.requires_bearer());
    }

    #[test]
    fn test_skillr_bearer_follows_favourites_marker() {
        assert!(skillrs("?isFavourite=true").requires_bearer());
        assert!(skillrs("?page=3&isFavourite=true&limit=5").requires_bearer());
        assert!(!skillrs("?isFavourite=false").requires_bearer());
        assert!(!skillrs("?isfavourite=true").requires_bearer());
        assert!(!skillrs("?page=1").requires_bearer());
        assert!(!Endpoint::RetrieveSkillrList { query: None }.requires_bearer());
    }

    #[test]
    fn test_carries_body() {
        assert!(RequestMethod::Post.carries_body());
        assert!(RequestMethod::Put.carries_body());
        assert!(!RequestMethod::Get.carries_body());
        assert!(!RequestMethod::Patch.carries_body());
        assert!(!RequestMethod::Delete.carries_body());
    }

    #[test]
    fn test_method_conversion() {
        assert_eq!(reqwest::Method::from(RequestMethod::Put), reqwest::Method::PUT);
        assert_eq!(RequestMethod::Connect.to_string(), "CONNECT");
    }
}
