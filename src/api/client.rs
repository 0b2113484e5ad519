//
//  fryends-client
//  api/client.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # HTTP Executor for the Fryends API
//!
//! [`FryendsClient`] sends [`Endpoint`] calls and turns every response into a
//! single typed outcome.
//!
//! ## Features
//!
//! - Reachability check before a request is built
//! - Bearer token injection from the shared [`AuthManager`]
//! - Status classification through [`classify_failure`]
//! - Optional cancellation and bounded token refresh on `401`
//! - Raw media upload to pre-signed URLs
//!
//! ## Call Flow
//!
//! ```text
//! reachability ─▶ build_request ─▶ send ─▶ 2xx? ──yes──▶ decode T
//!      │                             │       │
//!   Offline                      Transport   no
//!                                            ▼
//!                                   classify_failure
//! ```

use std::sync::Arc;

use anyhow::Result;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use url::Url;

use super::endpoint::Endpoint;
use super::error::{classify_failure, ApiError, NetworkError};
use super::media::{Media, MediaKind};
use super::reachability::{AlwaysConnected, NetworkStatus, Reachability};
use super::request::{build_request, Parameters};
use crate::auth::{jwt, AuthManager};
use crate::config::Config;

/// Body returned by `/login` and `/refreshToken`.
///
/// The backend has used several field names for the token over time; all of
/// them are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenResponse {
    #[serde(alias = "jwt", alias = "accessToken")]
    pub token: String,
}

/// Result of [`FryendsClient::recall`].
///
/// Exactly one of `value` and `error` is set, matching `succeeded`.
#[derive(Debug)]
pub struct RecallOutcome<T> {
    pub succeeded: bool,
    pub value: Option<T>,
    pub error: Option<ApiError>,
}

impl<T> RecallOutcome<T> {
    fn ok(value: T) -> Self {
        Self {
            succeeded: true,
            value: Some(value),
            error: None,
        }
    }

    fn failed(error: ApiError) -> Self {
        Self {
            succeeded: false,
            value: None,
            error: Some(error),
        }
    }

    /// Converts the outcome into a `Result`.
    pub fn into_result(self) -> Result<T, ApiError> {
        match (self.value, self.error) {
            (Some(value), _) => Ok(value),
            (None, Some(error)) => Err(error),
            (None, None) => Err(NetworkError::Unknown.into()),
        }
    }
}

/// HTTP client for the Fryends backend.
///
/// Cheap to share behind an `Arc`; every method takes `&self` and each call
/// resolves exactly once.
///
/// # Example
///
/// ```rust,no_run
/// use std::sync::Arc;
/// use fryends_client::api::{Endpoint, FryendsClient};
/// use fryends_client::auth::{AuthManager, MemoryStore};
/// use fryends_client::config::Config;
///
/// # async fn example() -> anyhow::Result<()> {
/// let auth = Arc::new(AuthManager::new(Arc::new(MemoryStore::new()))?);
/// let client = FryendsClient::new(&Config::default(), auth)?;
///
/// let skillrs: serde_json::Value = client
///     .call(&Endpoint::RetrieveSkillrList { query: None }, None, None)
///     .await?;
/// println!("{skillrs}");
/// # Ok(())
/// # }
/// ```
pub struct FryendsClient {
    /// Client for API calls, with timeouts
    http: Client,
    /// Client for media uploads, without an overall timeout
    upload: Client,
    /// API root, without a trailing slash
    base_url: String,
    auth: Arc<AuthManager>,
    reachability: Arc<dyn Reachability>,
    /// Upper bound on refreshes per call in [`call_with_refresh`](Self::call_with_refresh)
    refresh_attempts: u32,
}

impl std::fmt::Debug for FryendsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FryendsClient")
            .field("base_url", &self.base_url)
            .field("refresh_attempts", &self.refresh_attempts)
            .finish_non_exhaustive()
    }
}

impl FryendsClient {
    /// Creates a client for the environment described by `config`.
    ///
    /// API calls are bounded by both `connect_timeout_secs` and
    /// `request_timeout_secs`. Uploads only get the connect timeout, so a
    /// large file on a slow link is never cut off mid-transfer.
    ///
    /// # Errors
    ///
    /// Returns an error if the TLS backend cannot be initialised.
    pub fn new(config: &Config, auth: Arc<AuthManager>) -> Result<Self> {
        let user_agent = format!("{}/{}", crate::APP_NAME, crate::VERSION);

        Ok(Self {
            http: Client::builder()
                .user_agent(user_agent.clone())
                .connect_timeout(config.connect_timeout())
                .timeout(config.request_timeout())
                .build()?,
            upload: Client::builder()
                .user_agent(user_agent)
                .connect_timeout(config.connect_timeout())
                .build()?,
            base_url: config.base_url(),
            auth,
            reachability: Arc::new(AlwaysConnected),
            refresh_attempts: config.refresh_attempts,
        })
    }

    /// Replaces the reachability probe.
    pub fn with_reachability(mut self, reachability: Arc<dyn Reachability>) -> Self {
        self.reachability = reachability;
        self
    }

    /// Returns the API root requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the shared auth state.
    pub fn auth(&self) -> &Arc<AuthManager> {
        &self.auth
    }

    /// Performs one endpoint call and decodes the body as `T`.
    ///
    /// No retries happen here; see [`call_with_refresh`](Self::call_with_refresh).
    /// An empty success body decodes like JSON `null`, so `()` and
    /// `Option<_>` work for endpoints without content.
    ///
    /// # Errors
    ///
    /// - [`NetworkError::Offline`] if the reachability probe reports no network
    /// - [`NetworkError::InvalidUrl`] if the endpoint does not form a URL
    /// - [`ApiError::Transport`] if the request does not complete
    /// - the classification of [`classify_failure`] for non-2xx responses
    /// - [`ApiError::Decoding`] if a success body does not match `T`
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        parameters: Option<&Parameters>,
        media: Option<&Media>,
    ) -> Result<T, ApiError> {
        if self.reachability.status().await == NetworkStatus::Disconnected {
            tracing::error!("{} failed: no network connection", endpoint);
            return Err(NetworkError::Offline.into());
        }

        let token = self.auth.token();
        let request = build_request(&self.http, &self.base_url, endpoint, parameters, media, &token)?;
        tracing::debug!(method = %request.method(), url = %request.url(), "Sending {}", endpoint);

        let response = self.http.execute(request).await.map_err(|e| {
            tracing::error!(endpoint = %endpoint, "Request failed: {}", e);
            ApiError::Transport(e)
        })?;
        let status = response.status();
        let body = response.bytes().await?;

        if !status.is_success() {
            let error = classify_failure(status, &body);
            tracing::error!(endpoint = %endpoint, status = status.as_u16(), "Request failed: {}", error);
            return Err(error);
        }

        let payload: &[u8] = if body.is_empty() { b"null" } else { &body };
        let value = serde_json::from_slice(payload).map_err(|e| {
            tracing::error!("{} returned an unexpected body: {}", endpoint, e);
            ApiError::Decoding(e)
        })?;

        tracing::info!(endpoint = %endpoint, status = status.as_u16(), "Request succeeded");
        Ok(value)
    }

    /// Like [`call`](Self::call), but gives up as soon as `cancel` fires.
    ///
    /// The in-flight request is dropped and [`ApiError::Cancelled`] returned.
    ///
    /// ```rust,no_run
    /// # use fryends_client::api::{ApiError, Endpoint, FryendsClient};
    /// # async fn example(client: FryendsClient) {
    /// use tokio_util::sync::CancellationToken;
    ///
    /// let cancel = CancellationToken::new();
    /// cancel.cancel();
    ///
    /// let result: Result<serde_json::Value, _> = client
    ///     .call_with_cancel(&cancel, &Endpoint::Login, None, None)
    ///     .await;
    /// assert!(matches!(result, Err(ApiError::Cancelled)));
    /// # }
    /// ```
    pub async fn call_with_cancel<T: DeserializeOwned>(
        &self,
        cancel: &CancellationToken,
        endpoint: &Endpoint,
        parameters: Option<&Parameters>,
        media: Option<&Media>,
    ) -> Result<T, ApiError> {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                tracing::debug!("{} cancelled", endpoint);
                Err(ApiError::Cancelled)
            }
            result = self.call(endpoint, parameters, media) => result,
        }
    }

    /// Performs a call, refreshing the token when the backend rejects it.
    ///
    /// An expired JWT is refreshed before the first attempt. After that, each
    /// `401` triggers one refresh and one re-issue, up to the configured
    /// number of refresh attempts. Logged-out callers and endpoints that send no
    /// bearer are never refreshed.
    pub async fn call_with_refresh<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        parameters: Option<&Parameters>,
        media: Option<&Media>,
    ) -> Result<T, ApiError> {
        let mut refreshes = 0;

        let token = self.auth.token();
        if endpoint.requires_bearer() && !token.is_empty() && jwt::is_expired(&token) {
            tracing::debug!("Token expired before {}, refreshing", endpoint);
            self.refresh_from(&token).await?;
            refreshes += 1;
        }

        loop {
            let sent = self.auth.token();
            match self.call(endpoint, parameters, media).await {
                Err(e)
                    if e.is_unauthorized()
                        && endpoint.requires_bearer()
                        && !sent.is_empty()
                        && refreshes < self.refresh_attempts =>
                {
                    refreshes += 1;
                    tracing::warn!(
                        "{} was unauthorized, refreshing token ({}/{})",
                        endpoint,
                        refreshes,
                        self.refresh_attempts
                    );
                    self.refresh_from(&sent).await?;
                }
                other => return other,
            }
        }
    }

    /// Refreshes the token, then re-issues the call once.
    ///
    /// Never returns an error directly; the outcome reports whether the call
    /// went through.
    pub async fn recall<T: DeserializeOwned>(
        &self,
        endpoint: &Endpoint,
        parameters: Option<&Parameters>,
        media: Option<&Media>,
    ) -> RecallOutcome<T> {
        if let Err(e) = self.refresh_token().await {
            tracing::error!("Recall of {} aborted: {}", endpoint, e);
            return RecallOutcome::failed(e);
        }

        match self.call(endpoint, parameters, media).await {
            Ok(value) => RecallOutcome::ok(value),
            Err(e) => RecallOutcome::failed(e),
        }
    }

    /// Exchanges the current token for a fresh one.
    ///
    /// Concurrent refreshes are collapsed: callers queue on
    /// [`AuthManager::refresh_lock`], and a caller that finds the token
    /// already rotated returns without another request.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Auth`] when logged out or when the new token
    /// cannot be stored, or any error of the refresh call itself.
    pub async fn refresh_token(&self) -> Result<(), ApiError> {
        let current = self.auth.token();
        if current.is_empty() {
            return Err(ApiError::Auth("Not logged in".to_string()));
        }
        self.refresh_from(&current).await
    }

    async fn refresh_from(&self, stale: &str) -> Result<(), ApiError> {
        let _guard = self.auth.refresh_lock().lock().await;

        if self.auth.token() != stale {
            tracing::debug!("Token already refreshed by another caller");
            return Ok(());
        }

        let mut parameters = Parameters::new();
        parameters.insert("token".to_string(), stale.into());

        let response: TokenResponse = self
            .call(&Endpoint::RefreshToken, Some(&parameters), None)
            .await?;
        self.store_token(&response.token).await
    }

    /// Logs in with the given credentials and stores the returned token.
    ///
    /// # Example
    ///
    /// ```rust,no_run
    /// # use fryends_client::api::{FryendsClient, Parameters};
    /// # async fn example(client: FryendsClient) -> Result<(), fryends_client::api::ApiError> {
    /// let mut credentials = Parameters::new();
    /// credentials.insert("email".into(), "ada@example.com".into());
    /// credentials.insert("password".into(), "hunter2".into());
    ///
    /// client.login(&credentials).await?;
    /// assert!(client.auth().is_logged_in());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(&self, parameters: &Parameters) -> Result<TokenResponse, ApiError> {
        let response: TokenResponse = self.call(&Endpoint::Login, Some(parameters), None).await?;
        self.store_token(&response.token).await?;
        Ok(response)
    }

    /// Persists `token` on the blocking pool; keyring and file writes block.
    async fn store_token(&self, token: &str) -> Result<(), ApiError> {
        if token.is_empty() {
            return Err(ApiError::Auth("Backend returned an empty token".to_string()));
        }
        let auth = Arc::clone(&self.auth);
        let token = token.to_string();
        tokio::task::spawn_blocking(move || auth.set_logged_in(&token))
            .await
            .map_err(|e| ApiError::Auth(format!("Token store task failed: {e}")))?
            .map_err(|e| ApiError::Auth(format!("{e:#}")))
    }

    /// Uploads raw bytes to a pre-signed URL with `PUT`.
    ///
    /// Only `Content-Type` is set and no overall timeout applies. Returns
    /// `true` if the request completed at the transport level; the response
    /// status is not inspected.
    pub async fn upload_media(&self, upload_url: &str, data: Vec<u8>, kind: MediaKind) -> bool {
        let url = match Url::parse(upload_url) {
            Ok(url) => url,
            Err(e) => {
                tracing::error!("Invalid upload URL {}: {}", upload_url, e);
                return false;
            }
        };

        tracing::debug!("PUT {} ({} bytes, {})", url, data.len(), kind.mime_type());
        match self
            .upload
            .put(url)
            .header(CONTENT_TYPE, kind.mime_type())
            .body(data)
            .send()
            .await
        {
            Ok(response) => {
                tracing::info!("Upload finished with status {}", response.status());
                true
            }
            Err(e) => {
                tracing::error!("Upload failed: {}", e);
                false
            }
        }
    }
}
