//
//  fryends-client
//  config/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! # Configuration Module
//!
//! Loads and saves the client configuration as TOML in a platform-specific
//! directory.
//!
//! ## Configuration File Location
//!
//! - **Linux**: `~/.config/fryends/config.toml`
//! - **macOS**: `~/Library/Application Support/com.fryends.fryends/config.toml`
//! - **Windows**: `C:\Users\<User>\AppData\Roaming\fryends\fryends\config\config.toml`
//!
//! ## Example Configuration File
//!
//! ```toml
//! environment = "staging"
//! store = "keyring"
//! connect_timeout_secs = 10
//! request_timeout_secs = 60
//! refresh_attempts = 2
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use fryends_client::config::Config;
//!
//! let mut config = Config::load()?;
//! println!("Talking to {}", config.base_url());
//!
//! config.set("environment", "production")?;
//! config.save()?;
//! # Ok::<(), anyhow::Error>(())
//! ```

mod file;

pub use file::*;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::auth::StoreKind;

/// Backend deployment the client talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Production,
    Staging,
    #[default]
    Development,
}

impl Environment {
    /// Returns the API root for this environment.
    pub fn base_url(&self) -> &'static str {
        match self {
            Self::Production => "https://api-production.fryends.com/api",
            Self::Staging => "https://api-staging.fryends.com/api",
            Self::Development => "http://api.fryends.com/api",
        }
    }

    /// Returns the application identifier for this environment.
    pub fn app_domain(&self) -> &'static str {
        match self {
            Self::Production => "com.fryends.app",
            Self::Staging => "com.fryends.staging.app",
            Self::Development => "com.fryends.development.app",
        }
    }
}

impl FromStr for Environment {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "staging" => Ok(Self::Staging),
            "development" | "dev" => Ok(Self::Development),
            other => anyhow::bail!(
                "Unknown environment '{}' (expected production, staging or development)",
                other
            ),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Production => "production",
            Self::Staging => "staging",
            Self::Development => "development",
        })
    }
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    60
}

fn default_refresh_attempts() -> u32 {
    2
}

/// Client configuration.
///
/// Every field has a serde default, so a partial or empty file is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Deployment to talk to.
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's API root when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Where the auth token is persisted.
    #[serde(default)]
    pub store: StoreKind,

    /// TCP connect timeout for API calls, in seconds.
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    /// Whole-request timeout for API calls, in seconds. Media uploads ignore it.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum token refreshes per call before a 401 is surfaced.
    #[serde(default = "default_refresh_attempts")]
    pub refresh_attempts: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            base_url: None,
            store: StoreKind::default(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            refresh_attempts: default_refresh_attempts(),
        }
    }
}

impl Config {
    /// Keys understood by [`get`](Self::get) and [`set`](Self::set).
    pub const KEYS: [&'static str; 6] = [
        "environment",
        "base_url",
        "store",
        "connect_timeout_secs",
        "request_timeout_secs",
        "refresh_attempts",
    ];

    /// Returns the keys understood by [`get`](Self::get) and [`set`](Self::set).
    pub fn keys() -> &'static [&'static str] {
        &Self::KEYS
    }

    /// Loads configuration from the default location.
    ///
    /// A missing file yields the defaults.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Loads configuration from `path`, or the defaults if it does not exist.
    ///
    /// # Errors
    ///
    /// Fails if the file exists but cannot be read or is not valid TOML.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !config_exists(path) {
            return Ok(Self::default());
        }
        let content = read_config_file(path)?;
        toml::from_str(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Saves configuration to the default location.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    /// Saves configuration to `path`, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        write_config_file(path, &content)
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from("com", "fryends", "fryends")
            .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))
    }

    /// Returns the path to `config.toml`. The file may not exist.
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("config.toml"))
    }

    /// Returns the data directory used by the file preferences store.
    pub fn data_dir() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().to_path_buf())
    }

    /// Returns the effective API root: the override if set, else the
    /// environment's URL. Trailing slashes are removed.
    ///
    /// ```rust
    /// use fryends_client::config::{Config, Environment};
    ///
    /// let mut config = Config::default();
    /// config.environment = Environment::Staging;
    /// assert_eq!(config.base_url(), "https://api-staging.fryends.com/api");
    ///
    /// config.base_url = Some("http://localhost:3000/api/".into());
    /// assert_eq!(config.base_url(), "http://localhost:3000/api");
    /// ```
    pub fn base_url(&self) -> String {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.base_url())
            .trim_end_matches('/')
            .to_string()
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Gets a value by key as a display string.
    ///
    /// Returns `None` for unknown keys and for an unset `base_url`.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "environment" => Some(self.environment.to_string()),
            "base_url" => self.base_url.clone(),
            "store" => Some(self.store.to_string()),
            "connect_timeout_secs" => Some(self.connect_timeout_secs.to_string()),
            "request_timeout_secs" => Some(self.request_timeout_secs.to_string()),
            "refresh_attempts" => Some(self.refresh_attempts.to_string()),
            _ => None,
        }
    }

    /// Sets a value by key, parsing it into the field's type.
    ///
    /// Returns `Ok(false)` for an unknown key. Changes are only persisted
    /// by [`save`](Self::save).
    ///
    /// # Errors
    ///
    /// Fails if the value does not parse for the key's type.
    pub fn set(&mut self, key: &str, value: &str) -> Result<bool> {
        match key {
            "environment" => self.environment = value.parse()?,
            "base_url" => {
                self.base_url = if value.is_empty() {
                    None
                } else {
                    url::Url::parse(value)
                        .with_context(|| format!("Invalid base URL '{}'", value))?;
                    Some(value.to_string())
                }
            }
            "store" => self.store = value.parse()?,
            "connect_timeout_secs" => {
                self.connect_timeout_secs = value.parse().context("Expected whole seconds")?
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value.parse().context("Expected whole seconds")?
            }
            "refresh_attempts" => {
                self.refresh_attempts = value.parse().context("Expected a count")?
            }
            _ => return Ok(false),
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.base_url(), "http://api.fryends.com/api");
        assert_eq!(config.store, StoreKind::Keyring);
        assert_eq!(config.refresh_attempts, 2);
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str("environment = \"production\"\n").unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.request_timeout_secs, 60);
        assert_eq!(config.base_url(), "https://api-production.fryends.com/api");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.set("environment", "staging").unwrap();
        config.set("store", "file").unwrap();
        config.set("refresh_attempts", "5").unwrap();
        config.save_to(&path).unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("none.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_get_set() {
        let mut config = Config::default();
        assert_eq!(config.get("base_url"), None);
        assert!(config.set("base_url", "http://localhost:8080/api").unwrap());
        assert_eq!(config.get("base_url").as_deref(), Some("http://localhost:8080/api"));
        assert!(config.set("base_url", "").unwrap());
        assert_eq!(config.get("base_url"), None);

        assert!(!config.set("colour", "blue").unwrap());
        assert!(config.set("environment", "moon").is_err());
        assert!(config.set("base_url", "not a url").is_err());
        assert!(config.set("refresh_attempts", "-1").is_err());

        for key in Config::keys().iter().filter(|k| **k != "base_url") {
            assert!(config.get(key).is_some(), "missing {key}");
        }
    }

    #[test]
    fn test_environment_parse() {
        assert_eq!("prod".parse::<Environment>().unwrap(), Environment::Production);
        assert_eq!("Staging".parse::<Environment>().unwrap(), Environment::Staging);
        assert_eq!(Environment::Staging.app_domain(), "com.fryends.staging.app");
    }
}
