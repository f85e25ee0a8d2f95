//! Kalolsavam CLI - Lightweight E-Kalolsavam portal client
//!
//! A terminal client for the festival portal's REST API.

mod api;
mod auth;
mod config;
mod models;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "kalolsavam-cli")]
#[command(about = "Lightweight CLI client for the E-Kalolsavam portal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with the portal
    Login {
        /// Portal username (prompted if omitted)
        #[arg(short, long)]
        username: Option<String>,

        /// Force interactive login even if cached tokens exist
        #[arg(short, long)]
        force: bool,
    },

    /// Log out and clear cached credentials
    Logout,

    /// Show current authentication status
    Status,

    /// Show current user info (verify auth works)
    Whoami,

    /// List festival events
    Events {
        /// Maximum number of events to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Submit an emergency alert to the control room
    Alert {
        /// Alert message
        message: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Login { username, force } => {
            tracing::info!("Starting authentication flow...");
            auth::login(username, force).await?;
        }
        Commands::Logout => {
            auth::logout().await?;
        }
        Commands::Status => {
            auth::status().await?;
        }
        Commands::Whoami => {
            api::whoami().await?;
        }
        Commands::Events { limit } => {
            tracing::info!("Fetching events...");
            api::list_events(limit).await?;
        }
        Commands::Alert { message } => {
            tracing::info!("Submitting alert...");
            api::send_alert(&message).await?;
        }
    }

    Ok(())
}
