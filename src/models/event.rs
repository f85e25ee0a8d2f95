//! Event-related models

use serde::{Deserialize, Serialize};

/// Festival event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub name: String,
    pub category: Option<String>,
    pub venue: Option<String>,
    /// ISO date of the scheduled slot
    pub date: Option<String>,
}
