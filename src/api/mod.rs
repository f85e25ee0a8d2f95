//! API client module for the E-Kalolsavam portal

mod alerts;
pub mod client;
mod events;
mod me;

use anyhow::Result;

/// List festival events
pub async fn list_events(limit: usize) -> Result<()> {
    events::list_events(limit).await
}

/// Submit an emergency alert
pub async fn send_alert(message: &str) -> Result<()> {
    alerts::send_alert(message).await
}

/// Show current user info
pub async fn whoami() -> Result<()> {
    me::whoami().await
}
