//
//  fryends-client
//  cli/auth.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Authentication commands.
//!
//! Login exchanges credentials for a token; every other command works on the
//! token already held in the configured store.

use std::io::BufRead;

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use console::style;
use dialoguer::{Input, Password};

use crate::api::Parameters;

use super::GlobalOptions;

/// Log in, log out and inspect the session.
#[derive(Args, Debug)]
pub struct AuthCommand {
    #[command(subcommand)]
    pub command: AuthSubcommand,
}

#[derive(Subcommand, Debug)]
pub enum AuthSubcommand {
    /// Log in with email and password
    Login(LoginArgs),

    /// Log out and clear the stored token
    Logout,

    /// View authentication status
    Status(StatusArgs),

    /// Exchange the current token for a fresh one
    Refresh,

    /// Print the authentication token
    Token,
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email; prompted for when missing
    #[arg(long, short = 'e')]
    pub email: Option<String>,

    /// Read the password from standard input
    #[arg(long)]
    pub password_stdin: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Show the authentication token (masked)
    #[arg(long, short = 't')]
    pub show_token: bool,
}

impl AuthCommand {
    pub async fn run(&self, global: &GlobalOptions) -> Result<()> {
        match &self.command {
            AuthSubcommand::Login(args) => login(args, global).await,
            AuthSubcommand::Logout => logout(global),
            AuthSubcommand::Status(args) => status(args, global),
            AuthSubcommand::Refresh => refresh(global).await,
            AuthSubcommand::Token => token(global),
        }
    }
}

/// Reads one line from stdin, trimmed.
fn read_line_from_stdin() -> Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

async fn login(args: &LoginArgs, global: &GlobalOptions) -> Result<()> {
    let client = global.client()?;

    let email = match &args.email {
        Some(email) => email.clone(),
        None => Input::new().with_prompt("Email").interact_text()?,
    };

    let password = if args.password_stdin {
        read_line_from_stdin()?
    } else {
        Password::new().with_prompt("Password").interact()?
    };

    if email.is_empty() || password.is_empty() {
        anyhow::bail!("Email and password are required");
    }

    let mut credentials = Parameters::new();
    credentials.insert("email".to_string(), email.clone().into());
    credentials.insert("password".to_string(), password.into());

    client.login(&credentials).await.context("Login failed")?;

    if global.json {
        let result = serde_json::json!({ "logged_in": true, "email": email });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{} Logged in as {}", style("✓").green(), style(&email).bold());
    }

    Ok(())
}

fn logout(global: &GlobalOptions) -> Result<()> {
    let config = global.effective_config()?;
    let auth = global.auth(&config)?;

    if !auth.is_logged_in() {
        println!("Not logged in");
        return Ok(());
    }

    auth.logout()?;
    println!("{} Logged out", style("✓").green());
    Ok(())
}

fn status(args: &StatusArgs, global: &GlobalOptions) -> Result<()> {
    let config = global.effective_config()?;
    let auth = global.auth(&config)?;
    let token = auth.token();
    let expiry = auth.token_expiry();

    if global.json {
        let mut result = serde_json::json!({
            "logged_in": auth.is_logged_in(),
            "environment": config.environment.to_string(),
            "base_url": config.base_url(),
            "store": config.store.to_string(),
            "expires_at": expiry.map(|e| e.to_rfc3339()),
        });
        if args.show_token {
            result["token"] = mask_token(&token).into();
        }
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!("{}", style(config.base_url()).bold());
    if !auth.is_logged_in() {
        println!("  {} Not logged in", style("✗").red());
        println!();
        println!("Run {} to authenticate.", style("fryends auth login").cyan());
        return Ok(());
    }

    println!("  {} Logged in ({} store)", style("✓").green(), config.store);
    match expiry {
        Some(exp) if exp <= chrono::Utc::now() => {
            println!("  {} Token expired at {}", style("!").yellow(), exp.to_rfc3339())
        }
        Some(exp) => println!("  Token expires at {}", exp.to_rfc3339()),
        None => println!("  Token expiry unknown"),
    }
    if args.show_token {
        println!("  Token: {}", mask_token(&token));
    }

    Ok(())
}

async fn refresh(global: &GlobalOptions) -> Result<()> {
    let client = global.client()?;
    client
        .refresh_token()
        .await
        .context("Failed to refresh token")?;

    if global.json {
        println!("{}", serde_json::json!({ "refreshed": true }));
    } else {
        println!("{} Token refreshed", style("✓").green());
    }
    Ok(())
}

fn token(global: &GlobalOptions) -> Result<()> {
    let config = global.effective_config()?;
    let auth = global.auth(&config)?;
    let token = auth
        .bearer()
        .ok_or_else(|| crate::api::ApiError::Auth("Not logged in".to_string()))?;
    println!("{}", token);
    Ok(())
}

/// Masks all but the first and last four characters.
fn mask_token(token: &str) -> String {
    let chars: Vec<char> = token.chars().collect();
    if chars.len() <= 8 {
        return "*".repeat(chars.len());
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}
