use serde::{Deserialize, Serialize};

/// Video library entry as mirrored from the server
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: String,
    pub title: String,
    pub url: String,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}
