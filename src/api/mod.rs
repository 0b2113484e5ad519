//
//  fryends-client
//  api/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # API Client Layer
//!
//! HTTP access to the Fryends backend.
//!
//! ## Architecture
//!
//! - [`endpoint`]: the catalog of operations (path, method, auth requirement)
//! - [`request`]: turns an endpoint plus parameters and media into a request
//! - [`media`]: binary attachments for multipart bodies
//! - [`error`]: the error taxonomy and status classification
//! - [`client`]: the executor that sends requests and decodes responses
//! - [`reachability`]: the connectivity probe consulted before each call
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use fryends_client::api::{Endpoint, FryendsClient};
//! use fryends_client::auth::{open_store, AuthManager};
//! use fryends_client::config::Config;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = Config::load()?;
//! let store = open_store(config.store, &Config::data_dir()?);
//! let client = FryendsClient::new(&config, Arc::new(AuthManager::new(store)?))?;
//!
//! let favourites: serde_json::Value = client
//!     .call_with_refresh(
//!         &Endpoint::RetrieveSkillrList { query: Some("?isFavourite=true".into()) },
//!         None,
//!         None,
//!     )
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Every call returns [`ApiError`]:
//!
//! - `Network(ServerError)`: HTTP 500
//! - `Request(..)`: a structured backend error (no such skillr, rate limit, other)
//! - `Network(Unknown)`: an error body that could not be decoded
//! - `Decoding`: a success body that did not match the expected type

pub mod client;
pub mod endpoint;
pub mod error;
pub mod media;
pub mod reachability;
pub mod request;

pub use client::{FryendsClient, RecallOutcome, TokenResponse};
pub use endpoint::{Endpoint, RequestMethod};
pub use error::{
    classify_failure, ApiError, NetworkError, RequestError, RequestErrorKind, RequestErrorModel,
};
pub use media::{Media, MediaKind};
pub use reachability::{AlwaysConnected, NetworkStatus, Reachability};
pub use request::{
    build_request, encode_query, endpoint_url, generate_boundary, multipart_body, param_to_string,
    Parameters,
};
