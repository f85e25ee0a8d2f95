//! User-related models

use serde::{Deserialize, Serialize};

/// Portal user profile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Profile {
    pub id: i64,
    pub username: String,
    pub name: Option<String>,
    /// One of: admin, judge, volunteer, student
    pub role: Option<String>,
    pub school: Option<String>,
    pub email: Option<String>,
}
