//
//  fryends-client
//  api/request.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Request Builder
//!
//! Turns an [`Endpoint`], optional parameters and optional [`Media`] into a
//! ready-to-send [`reqwest::Request`].
//!
//! ## Rules
//!
//! 1. Endpoints that require a bearer token get `Authorization: Bearer <token>`.
//!    An empty token is sent as-is; freshness is not checked here.
//! 2. With media the request is `multipart/form-data`; otherwise both
//!    `Content-Type` and `Accept` are `application/json`.
//! 3. With media the body is the multipart layout produced by
//!    [`multipart_body`]. `POST`/`PUT` without media send parameters as JSON.
//! 4. Any other method sends parameters as form-encoded URL query items,
//!    appended after any query already in the path. Every `+` is emitted as
//!    `%2B` so backends never read it as a space.
//!
//! ## Multipart layout
//!
//! ```text
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<key>"\r\n\r\n
//! <value>\r\n
//! ...one block per parameter...
//! --<boundary>\r\n                                    (only when media.is_cover)
//! Content-Disposition: form-data; name="cover"\r\n\r\n
//! true\r\n
//! --<boundary>\r\n
//! Content-Disposition: form-data; name="<media.key>"; filename="<media.filename>"\r\n
//! Content-Type: <media.mime_type>\r\n\r\n
//! <raw bytes>\r\n
//! --<boundary>--\r\n
//! ```

use std::collections::BTreeMap;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request};
use serde_json::Value;
use url::Url;

use super::endpoint::Endpoint;
use super::error::{ApiError, NetworkError};
use super::media::Media;

/// Request parameters keyed by name.
///
/// A `BTreeMap` keeps query strings and multipart bodies in a stable order.
pub type Parameters = BTreeMap<String, Value>;

const APPLICATION_JSON: &str = "application/json";
const LINE_BREAK: &str = "\r\n";

/// Generates a fresh multipart boundary.
///
/// Boundaries have the form `Boundary-<UUID>` and are never reused between
/// requests.
pub fn generate_boundary() -> String {
    format!(
        "Boundary-{}",
        uuid::Uuid::new_v4().as_hyphenated().to_string().to_uppercase()
    )
}

/// Renders a parameter value as it appears in a query string or form part.
///
/// Strings are used verbatim, `null` becomes the empty string, and every
/// other value uses its compact JSON form.
pub fn param_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Encodes parameters as `application/x-www-form-urlencoded` pairs.
///
/// Every `+` in a value is emitted as `%2B`, so backends never read it as a
/// space.
///
/// ```rust
/// use fryends_client::api::{encode_query, Parameters};
///
/// let mut params = Parameters::new();
/// params.insert("q".into(), "a+b c".into());
/// assert_eq!(encode_query(&params), "q=a%2Bb+c");
/// ```
pub fn encode_query(parameters: &Parameters) -> String {
    url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(
            parameters
                .iter()
                .map(|(key, value)| (key.as_str(), param_to_string(value))),
        )
        .finish()
}

/// Builds a multipart body from parameters and an optional media part.
///
/// See the module documentation for the exact layout.
pub fn multipart_body(parameters: Option<&Parameters>, media: Option<&Media>, boundary: &str) -> Vec<u8> {
    let mut body = Vec::new();

    if let Some(parameters) = parameters {
        for (key, value) in parameters {
            body.extend_from_slice(format!("--{boundary}{LINE_BREAK}").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{key}\"{LINE_BREAK}{LINE_BREAK}")
                    .as_bytes(),
            );
            body.extend_from_slice(format!("{}{LINE_BREAK}", param_to_string(value)).as_bytes());
        }
    }

    if let Some(media) = media {
        if media.is_cover {
            body.extend_from_slice(format!("--{boundary}{LINE_BREAK}").as_bytes());
            body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"cover\"{LINE_BREAK}{LINE_BREAK}")
                    .as_bytes(),
            );
            body.extend_from_slice(format!("{}{LINE_BREAK}", media.is_cover).as_bytes());
        }

        body.extend_from_slice(format!("--{boundary}{LINE_BREAK}").as_bytes());
        body.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"{LINE_BREAK}",
                media.key, media.filename
            )
            .as_bytes(),
        );
        body.extend_from_slice(
            format!("Content-Type: {}{LINE_BREAK}{LINE_BREAK}", media.mime_type).as_bytes(),
        );
        body.extend_from_slice(&media.data);
        body.extend_from_slice(LINE_BREAK.as_bytes());
    }

    body.extend_from_slice(format!("--{boundary}--{LINE_BREAK}").as_bytes());
    body
}

/// Resolves the full URL for an endpoint.
///
/// # Errors
///
/// Returns [`NetworkError::InvalidUrl`] if `base_url + path` does not parse.
pub fn endpoint_url(base_url: &str, endpoint: &Endpoint) -> Result<Url, ApiError> {
    let raw = format!("{}{}", base_url.trim_end_matches('/'), endpoint.path());
    Url::parse(&raw).map_err(|e| {
        tracing::error!("Could not build URL from {}: {}", raw, e);
        ApiError::Network(NetworkError::InvalidUrl)
    })
}

/// Builds the HTTP request for an endpoint call.
///
/// # Parameters
///
/// * `http` - client used to construct the request
/// * `base_url` - API root, e.g. `https://api-staging.fryends.com/api`
/// * `endpoint` - the operation to call
/// * `parameters` - optional body/query parameters
/// * `media` - optional binary part; switches the request to multipart
/// * `token` - current auth token, empty when logged out
///
/// # Errors
///
/// - [`NetworkError::InvalidUrl`] when the URL cannot be formed
/// - [`ApiError::Transport`] when a header value is invalid
///
/// # Example
///
/// ```rust
/// use fryends_client::api::{build_request, Endpoint, Parameters};
///
/// let mut params = Parameters::new();
/// params.insert("q".into(), "a+b".into());
///
/// let request = build_request(
///     &reqwest::Client::new(),
///     "https://api.example.com/api",
///     &Endpoint::RetrieveSkillrList { query: None },
///     Some(&params),
///     None,
///     "",
/// )?;
///
/// assert_eq!(request.url().as_str(), "https://api.example.com/api/app/skillrs?q=a%2Bb");
/// # Ok::<(), fryends_client::api::ApiError>(())
/// ```
pub fn build_request(
    http: &Client,
    base_url: &str,
    endpoint: &Endpoint,
    parameters: Option<&Parameters>,
    media: Option<&Media>,
    token: &str,
) -> Result<Request, ApiError> {
    let mut url = endpoint_url(base_url, endpoint)?;
    let method = endpoint.method();

    let mut body: Option<Vec<u8>> = None;
    let boundary = generate_boundary();

    if media.is_some() {
        body = Some(multipart_body(parameters, media, &boundary));
    } else if let Some(parameters) = parameters {
        if method.carries_body() {
            body = Some(serde_json::to_vec(parameters)?);
        } else if !parameters.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in parameters {
                pairs.append_pair(key, &param_to_string(value));
            }
        }
    }

    let mut builder = http.request(method.into(), url);

    if endpoint.requires_bearer() {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }

    if media.is_some() {
        builder = builder.header(CONTENT_TYPE, format!("multipart/form-data; boundary={boundary}"));
    } else {
        builder = builder
            .header(CONTENT_TYPE, APPLICATION_JSON)
            .header(ACCEPT, APPLICATION_JSON);
    }

    if let Some(body) = body {
        builder = builder.body(body);
    }

    Ok(builder.build()?)
}
