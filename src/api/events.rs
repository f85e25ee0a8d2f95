//! Festival event listing

use anyhow::{Context, Result};

use super::client::PortalClient;
use crate::models::Event;

/// List festival events.
pub async fn list_events(limit: usize) -> Result<()> {
    let client = PortalClient::from_saved()?;
    let resp = client.get("/api/events/").await?;
    let events: Vec<Event> = resp.json().await.context("Failed to parse events response")?;

    if events.is_empty() {
        println!("No events.");
        return Ok(());
    }

    for event in events.iter().take(limit) {
        println!(
            "{:>4}  {:<32} {:<14} {:<18} {}",
            event.id,
            event.name,
            event.category.as_deref().unwrap_or("-"),
            event.venue.as_deref().unwrap_or("-"),
            event.date.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}
