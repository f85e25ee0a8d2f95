//! Emergency alert submission

use anyhow::Result;

use super::client::PortalClient;

/// Submit an emergency alert to the portal control room.
pub async fn send_alert(message: &str) -> Result<()> {
    let client = PortalClient::from_saved()?;
    let body = serde_json::json!({ "message": message });
    client.post("/api/alerts/", &body).await?;

    println!("Alert submitted.");
    Ok(())
}
