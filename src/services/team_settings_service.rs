use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;

use crate::models::{TeamSettings, UpdateTeamSettings};

pub struct TeamSettingsService {
    db: PgPool,
}

impl TeamSettingsService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Fetch the branding row; defaults when it has never been written
    pub async fn get(&self) -> Result<TeamSettings> {
        let settings = sqlx::query_as::<_, TeamSettings>(
            "SELECT name, motto, logo_url, primary_color, secondary_color, updated_at
             FROM team_settings WHERE id = 1",
        )
        .fetch_optional(&self.db)
        .await?;

        Ok(settings.unwrap_or_else(TeamSettings::defaults))
    }

    /// Upsert the singleton branding row
    pub async fn update(&self, data: UpdateTeamSettings) -> Result<TeamSettings> {
        let settings = sqlx::query_as::<_, TeamSettings>(
            r#"
            INSERT INTO team_settings (id, name, motto, logo_url, primary_color, secondary_color, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO UPDATE
            SET name = $1, motto = $2, logo_url = $3,
                primary_color = $4, secondary_color = $5, updated_at = $6
            RETURNING name, motto, logo_url, primary_color, secondary_color, updated_at
            "#,
        )
        .bind(data.name.trim())
        .bind(data.motto)
        .bind(data.logo_url)
        .bind(data.primary_color)
        .bind(data.secondary_color)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(settings)
    }
}
