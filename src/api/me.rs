//! Current-user profile endpoint

use anyhow::{Context, Result};

use super::client::PortalClient;
use crate::models::Profile;

/// Fetch and display the logged-in user's profile.
pub async fn whoami() -> Result<()> {
    let client = PortalClient::from_saved()?;
    let resp = client.get("/api/users/me/").await?;
    let profile: Profile = resp.json().await.context("Failed to parse profile response")?;

    println!();
    println!("Name:     {}", profile.name.as_deref().unwrap_or("(none)"));
    println!("Username: {}", profile.username);
    println!("Role:     {}", profile.role.as_deref().unwrap_or("(none)"));
    println!("School:   {}", profile.school.as_deref().unwrap_or("(none)"));
    println!("Email:    {}", profile.email.as_deref().unwrap_or("(none)"));
    println!("ID:       {}", profile.id);

    Ok(())
}
