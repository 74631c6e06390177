use serde::{Deserialize, Serialize};

/// Cached team branding, painted before the first successful sync
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamBranding {
    pub name: String,
    pub motto: Option<String>,
    pub logo_url: Option<String>,
    pub primary_color: String,
    pub secondary_color: String,
}
