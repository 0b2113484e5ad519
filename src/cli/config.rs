//
//  fryends-client
//  cli/config.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! CLI configuration commands
//!
//! Reads and writes the configuration file. Command-line overrides such as
//! `--env` are not applied here; these commands show what is on disk.

use anyhow::{bail, Result};
use clap::{Args, Subcommand};
use console::style;

use crate::config::Config;

use super::GlobalOptions;

/// Manage configuration
#[derive(Args, Debug)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum ConfigSubcommand {
    /// Get a configuration value
    Get(GetArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// List all configuration values
    #[command(visible_alias = "ls")]
    List,

    /// Show configuration file path
    Path,
}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Configuration key
    pub key: String,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    /// Configuration key
    pub key: String,

    /// Configuration value; empty to unset `base_url`
    pub value: String,
}

impl ConfigCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            ConfigSubcommand::Get(args) => self.get(args, global),
            ConfigSubcommand::Set(args) => self.set(args, global),
            ConfigSubcommand::List => self.list(global),
            ConfigSubcommand::Path => self.path(global),
        }
    }

    fn get(&self, args: &GetArgs, global: &GlobalOptions) -> Result<()> {
        if !Config::keys().contains(&args.key.as_str()) {
            bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                args.key,
                Config::keys().join(", ")
            );
        }

        let config = global.load_config()?;
        let value = config.get(&args.key);

        if global.json {
            let result = serde_json::json!({ "key": args.key, "value": value });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else if let Some(value) = value {
            println!("{}", value);
        }
        Ok(())
    }

    fn set(&self, args: &SetArgs, global: &GlobalOptions) -> Result<()> {
        let path = global.config_path()?;
        let mut config = Config::load_from(&path)?;

        if !config.set(&args.key, &args.value)? {
            bail!(
                "Unknown configuration key '{}'. Valid keys: {}",
                args.key,
                Config::keys().join(", ")
            );
        }
        config.save_to(&path)?;

        if !global.json {
            println!(
                "{} Set {} to {}",
                style("✓").green(),
                style(&args.key).cyan(),
                args.value
            );
        }
        Ok(())
    }

    fn list(&self, global: &GlobalOptions) -> Result<()> {
        let config = global.load_config()?;

        if global.json {
            println!("{}", serde_json::to_string_pretty(&config)?);
            return Ok(());
        }

        for key in Config::keys() {
            let value = config.get(key).unwrap_or_else(|| "-".to_string());
            println!("{}={}", style(key).cyan(), value);
        }
        Ok(())
    }

    fn path(&self, global: &GlobalOptions) -> Result<()> {
        let path = global.config_path()?;
        if global.json {
            let result = serde_json::json!({ "path": path.display().to_string() });
            println!("{}", serde_json::to_string_pretty(&result)?);
        } else {
            println!("{}", path.display());
        }
        Ok(())
    }
}
