//
//  fryends-client
//  lib.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Fryends Client Library
//!
//! Networking and authentication core for the Fryends backend, plus the
//! `fryends` command-line tool built on top of it.
//!
//! ## Features
//!
//! - **Endpoint catalog**: every backend operation as a typed value
//! - **Request building**: JSON, query and multipart bodies with bearer injection
//! - **Typed errors**: one classification point for every failed response
//! - **Token management**: a thread-safe token holder persisted to the keyring
//!   or a file, with single-flight refresh
//!
//! ## Module Structure
//!
//! - [`api`]: endpoint catalog, request builder and HTTP executor
//! - [`auth`]: token holder and preference stores
//! - [`config`]: configuration file management
//! - [`cli`]: command-line interface definitions using clap
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fryends_client::{AuthManager, Config, FryendsClient};
//! use fryends_client::auth::open_store;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let auth = Arc::new(AuthManager::new(open_store(config.store, &Config::data_dir()?))?);
//! let client = FryendsClient::new(&config, auth)?;
//! println!("Talking to {}", client.base_url());
//! # Ok(())
//! # }
//! ```

/// Command-line interface definitions.
pub mod cli;

/// HTTP access to the Fryends backend.
///
/// Endpoints, request construction, error classification and the executor.
pub mod api;

/// Auth token state and persistence.
pub mod auth;

/// Configuration file management.
///
/// Stored in platform-specific locations:
/// - Linux: `~/.config/fryends/config.toml`
/// - macOS: `~/Library/Application Support/com.fryends.fryends/config.toml`
/// - Windows: `%APPDATA%\fryends\fryends\config\config.toml`
pub mod config;

pub use api::{ApiError, FryendsClient};
pub use auth::AuthManager;
pub use cli::Cli;
pub use config::Config;

/// Application name, used for the binary, the user agent and config paths.
pub const APP_NAME: &str = "fryends";

/// Application version, taken from Cargo.toml at compile time.
///
/// ```rust
/// use fryends_client::VERSION;
///
/// println!("fryends version {}", VERSION);
/// ```
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Exit codes for the CLI.
///
/// # Exit Code Ranges
///
/// - `0`: Success
/// - `1-3`: General errors and usage issues
/// - `4-7`: Authentication-related issues
/// - `8-15`: Resource-related issues
/// - `16-31`: Operation-related issues
/// - `32+`: Backend issues
///
/// # Example
///
/// ```rust
/// use fryends_client::api::NetworkError;
/// use fryends_client::exit_codes;
///
/// let err = anyhow::Error::from(fryends_client::ApiError::from(NetworkError::ServerError));
/// assert_eq!(exit_codes::for_error(&err), exit_codes::SERVER_ERROR);
/// ```
pub mod exit_codes {
    use crate::api::{ApiError, NetworkError, RequestErrorKind};

    /// The command completed without errors.
    pub const SUCCESS: i32 = 0;

    /// An unspecified error occurred. Check stderr for details.
    pub const ERROR: i32 = 1;

    /// The command was invoked with invalid arguments or options.
    pub const USAGE: i32 = 2;

    /// The user is not logged in or the token was rejected.
    ///
    /// Run `fryends auth login` to authenticate.
    pub const AUTH_ERROR: i32 = 4;

    /// The requested resource does not exist.
    pub const NOT_FOUND: i32 = 8;

    /// The operation was cancelled.
    pub const CANCELLED: i32 = 16;

    /// The backend rate limited the caller.
    pub const RATE_LIMIT: i32 = 32;

    /// The backend reported an internal error.
    pub const SERVER_ERROR: i32 = 33;

    /// Maps an error chain to an exit code.
    ///
    /// The first [`ApiError`] in the chain decides; anything else is [`ERROR`].
    pub fn for_error(err: &anyhow::Error) -> i32 {
        let Some(api) = err.chain().find_map(|e| e.downcast_ref::<ApiError>()) else {
            return ERROR;
        };

        if api.is_unauthorized() {
            return AUTH_ERROR;
        }

        match api {
            ApiError::Auth(_) => AUTH_ERROR,
            ApiError::Cancelled => CANCELLED,
            ApiError::Network(NetworkError::ServerError) => SERVER_ERROR,
            ApiError::Request(e) => match e.kind {
                RequestErrorKind::NoSuchSkillr => NOT_FOUND,
                RequestErrorKind::RateLimited => RATE_LIMIT,
                RequestErrorKind::Backend => ERROR,
            },
            _ => ERROR,
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use crate::api::classify_failure;
        use anyhow::Context;
        use reqwest::StatusCode;

        fn code_for(status: StatusCode, body: &[u8]) -> i32 {
            let result: anyhow::Result<()> =
                Err(classify_failure(status, body)).context("Failed to list skillrs");
            for_error(&result.unwrap_err())
        }

        #[test]
        fn test_classified_errors() {
            assert_eq!(code_for(StatusCode::INTERNAL_SERVER_ERROR, b""), SERVER_ERROR);
            assert_eq!(
                code_for(StatusCode::NOT_FOUND, br#"{"errorcode":"No such skillr"}"#),
                NOT_FOUND
            );
            assert_eq!(
                code_for(StatusCode::TOO_MANY_REQUESTS, br#"{"name":"RateLimitError"}"#),
                RATE_LIMIT
            );
            assert_eq!(code_for(StatusCode::UNAUTHORIZED, br#"{"message":"expired"}"#), AUTH_ERROR);
            assert_eq!(code_for(StatusCode::BAD_GATEWAY, b"oops"), ERROR);
        }

        #[test]
        fn test_other_errors() {
            assert_eq!(for_error(&anyhow::anyhow!("plain")), ERROR);
            assert_eq!(for_error(&ApiError::Cancelled.into()), CANCELLED);
            assert_eq!(for_error(&ApiError::Auth("Not logged in".into()).into()), AUTH_ERROR);
        }
    }
}
