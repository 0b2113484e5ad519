//
//  fryends-client
//  cli/mod.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI command definitions using clap derive macros

mod auth;
mod completion;
mod config;
mod skillr;
mod upload;

pub use auth::AuthCommand;
pub use completion::CompletionCommand;
pub use config::ConfigCommand;
pub use skillr::SkillrCommand;
pub use upload::UploadCommand;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::api::FryendsClient;
use crate::auth::{open_store, AuthManager, StoreKind};
use crate::config::{Config, Environment};

/// Work with the Fryends backend from the command line
#[derive(Parser, Debug)]
#[command(
    name = "fryends",
    version,
    about = "Work with the Fryends backend from the command line",
    long_about = "fryends talks to the Fryends API.\n\n\
                  It handles login, token refresh, skillr listings and media uploads.",
    propagate_version = true,
    after_help = "Use 'fryends <command> --help' for more information about a command."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOptions,
}

/// Options accepted by every command
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOptions {
    /// Backend environment (production, staging, development)
    #[arg(long = "env", global = true, env = "FRYENDS_ENV")]
    pub environment: Option<Environment>,

    /// Override the API base URL
    #[arg(long, global = true, env = "FRYENDS_BASE_URL")]
    pub base_url: Option<String>,

    /// Use a different configuration file
    #[arg(long, global = true, env = "FRYENDS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,
}

impl GlobalOptions {
    /// Returns the configuration file in use.
    pub fn config_path(&self) -> Result<PathBuf> {
        match &self.config {
            Some(path) => Ok(path.clone()),
            None => Config::config_path(),
        }
    }

    /// Loads the configuration file without command-line overrides.
    pub fn load_config(&self) -> Result<Config> {
        Config::load_from(&self.config_path()?)
    }

    /// Loads the configuration with `--env` and `--base-url` applied.
    pub fn effective_config(&self) -> Result<Config> {
        let mut config = self.load_config()?;
        if let Some(environment) = self.environment {
            config.environment = environment;
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = Some(base_url.clone());
        }
        if self.ephemeral {
            config.store = StoreKind::Memory;
        }
        Ok(config)
    }

    /// Directory for the file preferences store.
    ///
    /// With `--config` the store lives next to that file.
    fn data_dir(&self) -> Result<PathBuf> {
        match self.config.as_ref().and_then(|p| p.parent()) {
            Some(parent) => Ok(parent.to_path_buf()),
            None => Config::data_dir(),
        }
    }

    /// Opens the token holder for the configured store.
    pub fn auth(&self, config: &Config) -> Result<Arc<AuthManager>> {
        let store = open_store(config.store, &self.data_dir()?);
        let auth = AuthManager::new(store)
            .with_context(|| format!("Failed to open the {} store", config.store))?;
        Ok(Arc::new(auth))
    }

    /// Builds a client for the effective configuration.
    pub fn client(&self) -> Result<FryendsClient> {
        let config = self.effective_config()?;
        let auth = self.auth(&config)?;
        tracing::debug!("Using {} at {}", config.environment, config.base_url());
        FryendsClient::new(&config, auth)
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in, log out and inspect the session
    Auth(AuthCommand),

    /// Browse skillrs
    #[command(visible_alias = "skillrs")]
    Skillr(SkillrCommand),

    /// Upload media to a pre-signed URL
    Upload(UploadCommand),

    /// Manage configuration
    Config(ConfigCommand),

    /// Generate shell completion scripts
    Completion(CompletionCommand),

    /// Show version information
    Version,
}
