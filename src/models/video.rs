use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Video library entry. Hosting is external; only metadata lives here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Video {
    pub id: Uuid,
    pub title: String,
    pub url: String,
    pub category: String,
    pub tags: Vec<String>,
    pub added_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Video {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let tags_raw: serde_json::Value = row.try_get("tags")?;
        let tags = serde_json::from_value(tags_raw)
            .map_err(|e| super::column_decode("tags", e.to_string()))?;

        Ok(Video {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            url: row.try_get("url")?,
            category: row.try_get("category")?,
            tags,
            added_by: row.try_get("added_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateVideo {
    pub title: String,
    pub url: String,
    pub category: String,
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateVideo {
    pub title: Option<String>,
    pub url: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}
