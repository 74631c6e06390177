use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Team branding: singleton row, served to clients before login
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TeamSettings {
    pub name: String,
    pub motto: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
    pub updated_at: DateTime<Utc>,
}

impl TeamSettings {
    /// Branding served before the row has ever been written
    pub fn defaults() -> Self {
        TeamSettings {
            name: "TeamTrack".to_string(),
            motto: None,
            logo_url: None,
            primary_color: "#1c3d5a".to_string(),
            secondary_color: "#f2a71b".to_string(),
            updated_at: DateTime::<Utc>::MIN_UTC,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTeamSettings {
    pub name: String,
    pub motto: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
}
