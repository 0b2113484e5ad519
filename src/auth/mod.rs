//
//  fryends-client
//  auth/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Authentication Module
//!
//! Owns the current auth token and keeps it in step with the
//! [`PreferencesStore`].
//!
//! ## State
//!
//! The token is a plain `String`. The empty string is the one and only
//! "logged out" value: logging out stores `""` rather than deleting the
//! key, and a missing key on startup is stored back as `""`.
//!
//! ```text
//!             set_logged_in(token)
//!  LoggedOut ─────────────────────▶ LoggedIn
//!      ▲                               │
//!      └────────── logout() ───────────┘
//! ```
//!
//! ## Concurrency
//!
//! Every read and write of the token goes through one mutex, and writes
//! update the store while holding it, so readers never see the in-memory
//! value and the persisted value disagree. A separate async lock,
//! [`AuthManager::refresh_lock`], lets the HTTP executor run at most one
//! token refresh at a time.
//!
//! ## Example
//!
//! ```rust
//! use std::sync::Arc;
//! use fryends_client::auth::{AuthManager, AuthState, MemoryStore};
//!
//! let auth = AuthManager::new(Arc::new(MemoryStore::new()))?;
//! assert_eq!(auth.state(), AuthState::LoggedOut);
//!
//! auth.set_logged_in("abc")?;
//! assert_eq!(auth.token(), "abc");
//!
//! auth.logout()?;
//! assert_eq!(auth.token(), "");
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod jwt;
mod store;

pub use store::*;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};

/// Whether a user session is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    LoggedOut,
    LoggedIn,
}

/// Holder of the process-wide auth token.
///
/// Construct one at startup and share it via `Arc` with every
/// [`FryendsClient`](crate::api::FryendsClient) that needs it.
pub struct AuthManager {
    store: Arc<dyn PreferencesStore>,
    token: Mutex<String>,
    refresh: tokio::sync::Mutex<()>,
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl AuthManager {
    /// Loads the persisted token from `store`.
    ///
    /// A missing token is written back as `""`, so a fresh install
    /// starts in the same stored state as a logout. Failing to write it back
    /// is only logged.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn new(store: Arc<dyn PreferencesStore>) -> Result<Self> {
        tracing::debug!("Constructing AuthManager...");
        let stored = store
            .get(TOKEN_KEY)
            .context("Failed to read stored auth token")?;

        if stored.is_none() {
            if let Err(e) = store.set(TOKEN_KEY, "") {
                tracing::warn!("Failed to initialise stored auth token: {e:#}");
            }
        }
        let token = stored.unwrap_or_default();

        let manager = Self {
            store,
            token: Mutex::new(token),
            refresh: tokio::sync::Mutex::new(()),
        };

        if manager.is_logged_in() {
            manager.refresh_user_details();
        }

        Ok(manager)
    }

    fn lock(&self) -> MutexGuard<'_, String> {
        self.token.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the current token, or `""` when logged out.
    pub fn token(&self) -> String {
        self.lock().clone()
    }

    /// Returns the current token only if one is held.
    pub fn bearer(&self) -> Option<String> {
        let token = self.lock();
        (!token.is_empty()).then(|| token.clone())
    }

    /// Returns the current session state.
    pub fn state(&self) -> AuthState {
        if self.lock().is_empty() {
            AuthState::LoggedOut
        } else {
            AuthState::LoggedIn
        }
    }

    /// Returns `true` if a token is held.
    pub fn is_logged_in(&self) -> bool {
        self.state() == AuthState::LoggedIn
    }

    /// Returns the expiry of the held token, if it is a JWT with an `exp` claim.
    pub fn token_expiry(&self) -> Option<DateTime<Utc>> {
        jwt::expires_at(&self.lock())
    }

    /// Stores a new token and refreshes the user's details.
    ///
    /// Passing `""` logs the session out.
    ///
    /// # Errors
    ///
    /// Returns an error if the token cannot be persisted; the in-memory
    /// value is left unchanged in that case.
    pub fn set_logged_in(&self, token: &str) -> Result<()> {
        {
            let mut current = self.lock();
            self.store
                .set(TOKEN_KEY, token)
                .context("Failed to persist auth token")?;
            *current = token.to_string();
        }

        tracing::info!(
            "Auth state is now {:?}",
            if token.is_empty() {
                AuthState::LoggedOut
            } else {
                AuthState::LoggedIn
            }
        );

        self.refresh_user_details();
        Ok(())
    }

    /// Hook for reloading the signed-in user's profile.
    ///
    /// The profile endpoint is not part of the catalog yet, so this only logs.
    pub fn refresh_user_details(&self) {
        tracing::debug!("User details refresh requested");
    }

    /// Ends the session.
    ///
    /// The stored token is overwritten with `""`, not removed.
    pub fn logout(&self) -> Result<()> {
        self.remove_token()?;
        self.set_logged_in("")
    }

    /// Clears the stored token to `""`.
    pub fn remove_token(&self) -> Result<()> {
        let mut current = self.lock();
        self.store
            .set(TOKEN_KEY, "")
            .context("Failed to clear auth token")?;
        current.clear();
        Ok(())
    }

    /// Lock that serializes token refreshes.
    ///
    /// Hold it for the whole refresh round trip; callers that queue behind it
    /// should re-check [`token`](Self::token) before refreshing again.
    pub fn refresh_lock(&self) -> &tokio::sync::Mutex<()> {
        &self.refresh
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    fn manager() -> (Arc<MemoryStore>, AuthManager) {
        let store = Arc::new(MemoryStore::new());
        let auth = AuthManager::new(store.clone()).unwrap();
        (store, auth)
    }

    /// Store whose writes always fail.
    struct ReadOnlyStore;

    impl PreferencesStore for ReadOnlyStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(Some("persisted".to_string()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            anyhow::bail!("read-only")
        }
        fn remove(&self, _key: &str) -> Result<()> {
            anyhow::bail!("read-only")
        }
    }

    #[test]
    fn test_starts_logged_out_without_token() {
        let (_, auth) = manager();
        assert_eq!(auth.state(), AuthState::LoggedOut);
        assert_eq!(auth.token(), "");
        assert_eq!(auth.bearer(), None);
    }

    #[test]
    fn test_missing_token_is_stored_as_empty() {
        let (store, auth) = manager();
        assert_eq!(auth.token(), "");
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_unwritable_store_still_starts_logged_out() {
        struct EmptyReadOnlyStore;

        impl PreferencesStore for EmptyReadOnlyStore {
            fn get(&self, _key: &str) -> Result<Option<String>> {
                Ok(None)
            }
            fn set(&self, _key: &str, _value: &str) -> Result<()> {
                anyhow::bail!("read-only")
            }
            fn remove(&self, _key: &str) -> Result<()> {
                anyhow::bail!("read-only")
            }
        }

        let auth = AuthManager::new(Arc::new(EmptyReadOnlyStore)).unwrap();
        assert_eq!(auth.state(), AuthState::LoggedOut);
    }

    #[test]
    fn test_loads_persisted_token() {
        let store = Arc::new(MemoryStore::with_value(TOKEN_KEY, "saved"));
        let auth = AuthManager::new(store).unwrap();
        assert!(auth.is_logged_in());
        assert_eq!(auth.token(), "saved");
    }

    #[test]
    fn test_login_roundtrip_persists() {
        let (store, auth) = manager();
        auth.set_logged_in("abc").unwrap();
        assert_eq!(auth.token(), "abc");
        assert_eq!(auth.bearer().as_deref(), Some("abc"));
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
    }

    #[test]
    fn test_logout_stores_empty_string() {
        let (store, auth) = manager();
        auth.set_logged_in("abc").unwrap();
        auth.logout().unwrap();
        assert_eq!(auth.token(), "");
        assert_eq!(auth.state(), AuthState::LoggedOut);
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_remove_token() {
        let (store, auth) = manager();
        auth.set_logged_in("abc").unwrap();
        auth.remove_token().unwrap();
        assert_eq!(auth.token(), "");
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some(""));
    }

    #[test]
    fn test_failed_persist_keeps_memory_value() {
        let auth = AuthManager::new(Arc::new(ReadOnlyStore)).unwrap();
        assert!(auth.set_logged_in("new").is_err());
        assert_eq!(auth.token(), "persisted");
        assert!(auth.logout().is_err());
        assert_eq!(auth.token(), "persisted");
    }

    #[test]
    fn test_concurrent_readers_never_see_torn_tokens() {
        let (store, auth) = manager();
        let auth = Arc::new(auth);
        let a = "a".repeat(512);
        let b = "b".repeat(512);

        let writers: Vec<_> = [a.clone(), b.clone()]
            .into_iter()
            .map(|token| {
                let auth = auth.clone();
                thread::spawn(move || {
                    for _ in 0..200 {
                        auth.set_logged_in(&token).unwrap();
                    }
                })
            })
            .collect();

        let readers: Vec<_> = (0..4)
            .map(|_| {
                let auth = auth.clone();
                let (a, b) = (a.clone(), b.clone());
                thread::spawn(move || {
                    for _ in 0..500 {
                        let seen = auth.token();
                        assert!(seen.is_empty() || seen == a || seen == b);
                    }
                })
            })
            .collect();

        for handle in writers.into_iter().chain(readers) {
            handle.join().unwrap();
        }

        let final_token = auth.token();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), Some(final_token));
    }
}
