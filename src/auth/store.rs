//
//  fryends-client
//  auth/store.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Preferences Store
//!
//! The auth token is persisted in a small key-value store. This module
//! defines the [`PreferencesStore`] contract and three backends:
//!
//! - [`KeyringStore`]: the platform keyring (Keychain, Secret Service,
//!   Credential Manager)
//! - [`FileStore`]: a TOML file in the application data directory, for
//!   headless machines and containers without a keyring daemon
//! - [`MemoryStore`]: process-local storage for tests and ephemeral sessions
//!
//! ## Example
//!
//! ```rust
//! use fryends_client::auth::{MemoryStore, PreferencesStore, TOKEN_KEY};
//!
//! let store = MemoryStore::new();
//! store.set(TOKEN_KEY, "eyJhbGciOi...")?;
//! assert_eq!(store.get(TOKEN_KEY)?.as_deref(), Some("eyJhbGciOi..."));
//! # Ok::<(), anyhow::Error>(())
//! ```

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use anyhow::{Context, Result};
use keyring::Entry;
use serde::{Deserialize, Serialize};

use crate::config::{read_config_file, write_config_file};

/// Key under which the auth token is stored.
///
/// The name does not describe its content; it is kept as-is so existing
/// installations keep their session.
pub const TOKEN_KEY: &str = "fcm-token";

/// The service name used to identify this application in the system keyring.
const SERVICE_NAME: &str = "fryends";

/// File name of the [`FileStore`] inside the data directory.
const PREFERENCES_FILE: &str = "preferences.toml";

/// A persistent string key-value store.
///
/// Implementations must be safe to share between threads. Callers that need
/// read-modify-write consistency across keys serialize access themselves.
pub trait PreferencesStore: Send + Sync {
    /// Returns the value for `key`, or `None` if it was never set or removed.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Creates or replaces the value for `key`.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key succeeds.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Removes every value this crate persists.
///
/// Unlike logging out, which stores an empty token, this deletes the key.
pub fn clear_preferences(store: &dyn PreferencesStore) -> Result<()> {
    store.remove(TOKEN_KEY)
}

/// Which [`PreferencesStore`] backend to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
    /// System keyring.
    #[default]
    Keyring,
    /// TOML file in the data directory.
    File,
    /// In-memory only; nothing survives the process.
    Memory,
}

impl std::str::FromStr for StoreKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "keyring" => Ok(Self::Keyring),
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            other => anyhow::bail!("Unknown store '{}' (expected keyring, file or memory)", other),
        }
    }
}

impl std::fmt::Display for StoreKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Keyring => "keyring",
            Self::File => "file",
            Self::Memory => "memory",
        })
    }
}

/// Opens the backend selected by `kind`.
///
/// `data_dir` is only used by [`StoreKind::File`].
pub fn open_store(kind: StoreKind, data_dir: &Path) -> Arc<dyn PreferencesStore> {
    match kind {
        StoreKind::Keyring => Arc::new(KeyringStore::new()),
        StoreKind::File => Arc::new(FileStore::new(data_dir.join(PREFERENCES_FILE))),
        StoreKind::Memory => Arc::new(MemoryStore::new()),
    }
}

/// Secure storage using the system's native keyring service.
///
/// Each key becomes one keyring entry under the `fryends` service.
///
/// # Notes
///
/// - The keyring may require user interaction on first access.
/// - On Linux, a secret service daemon (GNOME Keyring, KWallet) must be running.
pub struct KeyringStore {
    service: String,
}

impl Default for KeyringStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyringStore {
    /// Creates a store bound to the default service name.
    ///
    /// No keyring access happens until a method is called.
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }
}

impl PreferencesStore for KeyringStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entry = Entry::new(&self.service, key)?;
        match entry.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        entry.set_password(value)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let entry = Entry::new(&self.service, key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()), // Already deleted
            Err(e) => Err(e.into()),
        }
    }
}

/// File-backed storage for environments without keyring support.
///
/// Values are kept as a flat TOML table:
///
/// ```toml
/// fcm-token = "eyJhbGciOi..."
/// ```
///
/// The whole file is rewritten on every change. A process-local lock keeps
/// concurrent writers inside one process from interleaving. On Unix the file
/// is readable and writable by its owner only.
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Creates a store backed by `path`. The file is created on first write.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Mutex::new(()),
        }
    }

    /// Returns the backing file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = read_config_file(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", self.path.display()))
    }

    fn write_all(&self, values: &BTreeMap<String, String>) -> Result<()> {
        let content = toml::to_string(values)?;
        self.restrict_permissions()
            .with_context(|| format!("Failed to secure {}", self.path.display()))?;
        write_config_file(&self.path, &content)
            .with_context(|| format!("Failed to write {}", self.path.display()))
    }

    /// Creates the file as `0o600`, or narrows an existing one to it.
    #[cfg(unix)]
    fn restrict_permissions(&self) -> std::io::Result<()> {
        use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .mode(0o600)
            .open(&self.path)?;
        std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))
    }

    #[cfg(not(unix))]
    fn restrict_permissions(&self) -> std::io::Result<()> {
        Ok(())
    }
}

impl PreferencesStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        values.insert(key.to_string(), value.to_string());
        self.write_all(&values)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let _guard = self.lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut values = self.read_all()?;
        if values.remove(key).is_some() {
            self.write_all(&values)?;
        }
        Ok(())
    }
}

/// Process-local storage.
#[derive(Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `key = value`.
    pub fn with_value(key: &str, value: &str) -> Self {
        let store = Self::new();
        store
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        store
    }
}

impl PreferencesStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self
            .values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.values
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_roundtrip() {
        let store = MemoryStore::new();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.set(TOKEN_KEY, "abc").unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap().as_deref(), Some("abc"));
        store.remove(TOKEN_KEY).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.remove(TOKEN_KEY).unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn test_file_store_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "").unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).unwrap();

        let store = FileStore::new(path.clone());
        store.set(TOKEN_KEY, "secret").unwrap();

        let mode = std::fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        let fresh = dir.path().join("new").join("prefs.toml");
        FileStore::new(fresh.clone()).set(TOKEN_KEY, "secret").unwrap();
        let mode = std::fs::metadata(&fresh).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_file_store_persists_between_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");

        let store = FileStore::new(path.clone());
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        store.set(TOKEN_KEY, "tok-1").unwrap();
        store.set("other", "x").unwrap();

        let reopened = FileStore::new(path);
        assert_eq!(reopened.get(TOKEN_KEY).unwrap().as_deref(), Some("tok-1"));
        assert_eq!(reopened.get("other").unwrap().as_deref(), Some("x"));

        clear_preferences(&reopened).unwrap();
        assert_eq!(store.get(TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get("other").unwrap().as_deref(), Some("x"));
    }

    #[test]
    fn test_file_store_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        assert!(FileStore::new(path).get(TOKEN_KEY).is_err());
    }

    #[test]
    fn test_store_kind_parse() {
        assert_eq!("File".parse::<StoreKind>().unwrap(), StoreKind::File);
        assert_eq!("memory".parse::<StoreKind>().unwrap(), StoreKind::Memory);
        assert!("disk".parse::<StoreKind>().is_err());
        assert_eq!(StoreKind::default().to_string(), "keyring");
    }

    #[test]
    fn test_open_store_memory() {
        let store = open_store(StoreKind::Memory, Path::new("/nonexistent"));
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
    }
}
