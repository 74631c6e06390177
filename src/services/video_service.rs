use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateVideo, UpdateVideo, Video};

pub struct VideoService {
    db: PgPool,
}

impl VideoService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_video(&self, added_by: Uuid, data: CreateVideo) -> Result<Video> {
        let tags = serde_json::to_value(data.tags.unwrap_or_default())?;

        let video = sqlx::query_as::<_, Video>(
            "INSERT INTO videos (id, title, url, category, tags, added_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id, title, url, category, tags, added_by, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.title.trim())
        .bind(data.url)
        .bind(data.category.trim().to_lowercase())
        .bind(tags)
        .bind(added_by)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(video)
    }

    pub async fn get_video_by_id(&self, video_id: Uuid) -> Result<Option<Video>> {
        let video = sqlx::query_as::<_, Video>(
            "SELECT id, title, url, category, tags, added_by, created_at, updated_at
             FROM videos WHERE id = $1",
        )
        .bind(video_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(video)
    }

    pub async fn list_videos(&self, category: Option<String>) -> Result<Vec<Video>> {
        let videos = sqlx::query_as::<_, Video>(
            "SELECT id, title, url, category, tags, added_by, created_at, updated_at
             FROM videos
             WHERE $1::text IS NULL OR category = LOWER($1)
             ORDER BY created_at DESC",
        )
        .bind(category)
        .fetch_all(&self.db)
        .await?;

        Ok(videos)
    }

    pub async fn update_video(&self, video_id: Uuid, data: UpdateVideo) -> Result<Option<Video>> {
        let tags = data.tags.map(serde_json::to_value).transpose()?;

        let video = sqlx::query_as::<_, Video>(
            r#"
            UPDATE videos
            SET title = COALESCE($2, title),
                url = COALESCE($3, url),
                category = COALESCE(LOWER($4), category),
                tags = COALESCE($5, tags),
                updated_at = $6
            WHERE id = $1
            RETURNING id, title, url, category, tags, added_by, created_at, updated_at
            "#,
        )
        .bind(video_id)
        .bind(data.title)
        .bind(data.url)
        .bind(data.category)
        .bind(tags)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(video)
    }

    pub async fn delete_video(&self, video_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM videos WHERE id = $1")
            .bind(video_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
