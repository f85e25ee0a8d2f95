//! Login, logout, and session status commands

use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

use super::{claims, TokenStore};
use crate::api::client::PortalClient;
use crate::config::Config;

/// Log in with portal credentials.
///
/// Skips the network when a live access token is cached (unless `force`),
/// and tries a silent refresh before falling back to a password prompt.
pub async fn login(username: Option<String>, force: bool) -> Result<()> {
    if !force {
        let config = Config::load()?;
        let pair = config.tokens();

        if let Some(access) = pair.access.as_deref() {
            if !claims::is_expired(access) {
                println!("Already logged in. Use --force to re-authenticate.");
                return Ok(());
            }
        }

        if pair.refresh.is_some() {
            tracing::info!("Access token expired, attempting refresh...");
            let client = PortalClient::from_config(config);
            match client.try_refresh().await {
                Ok(()) => {
                    println!("Token refreshed.");
                    return Ok(());
                }
                Err(e) => {
                    tracing::warn!("Refresh failed, falling back to password login: {}", e);
                }
            }
        }
    }

    let username = match username {
        Some(name) => name,
        None => prompt("Username: ")?,
    };
    let password = prompt("Password: ")?;

    let client = PortalClient::from_saved()?;
    client.login(&username, &password).await?;

    println!("Login successful.");
    Ok(())
}

/// Clear stored credentials
pub async fn logout() -> Result<()> {
    let mut config = Config::load()?;
    if config.tokens().is_empty() {
        println!("Not logged in.");
        return Ok(());
    }
    config.clear_tokens();
    println!("Logged out.");
    Ok(())
}

/// Display current auth status
pub async fn status() -> Result<()> {
    let config = Config::load()?;
    let pair = config.tokens();

    match pair.access.as_deref() {
        Some(token) if !claims::is_expired(token) => {
            println!("Access token:  valid");
            if let Some(exp) = claims::expiry(token) {
                println!("  expires_at:  {}", format_timestamp(exp));
            }
        }
        Some(_) => {
            println!("Access token:  expired");
        }
        None => {
            println!("Access token:  none");
        }
    }

    match pair.refresh.as_deref() {
        Some(token) if !claims::is_expired(token) => println!("Refresh token: present"),
        Some(_) => println!("Refresh token: expired"),
        None => println!("Refresh token: none"),
    }

    println!("Portal:        {}", config.resolved_api_base());

    if !claims::is_authenticated(pair.access.as_deref(), pair.refresh.as_deref()) {
        println!("\nRun 'kalolsavam-cli login' to authenticate.");
    }

    Ok(())
}

fn prompt(label: &str) -> Result<String> {
    print!("{label}");
    io::stdout().flush().context("Failed to flush stdout")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read input")?;
    Ok(line.trim().to_string())
}

fn format_timestamp(exp: i64) -> String {
    chrono::DateTime::from_timestamp(exp, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_else(|| exp.to_string())
}
