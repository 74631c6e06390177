use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateTemplate, TrainingTemplate, UpdateTemplate};

pub struct TemplateService {
    db: PgPool,
}

impl TemplateService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_template(
        &self,
        created_by: Uuid,
        data: CreateTemplate,
    ) -> Result<TrainingTemplate> {
        let items = serde_json::to_value(&data.items)?;

        let template = sqlx::query_as::<_, TrainingTemplate>(
            "INSERT INTO training_templates (id, name, description, items, created_by, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, name, description, items, created_by, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.name.trim())
        .bind(data.description)
        .bind(items)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(template)
    }

    pub async fn get_template_by_id(&self, template_id: Uuid) -> Result<Option<TrainingTemplate>> {
        let template = sqlx::query_as::<_, TrainingTemplate>(
            "SELECT id, name, description, items, created_by, created_at, updated_at
             FROM training_templates WHERE id = $1",
        )
        .bind(template_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(template)
    }

    pub async fn list_templates(&self) -> Result<Vec<TrainingTemplate>> {
        let templates = sqlx::query_as::<_, TrainingTemplate>(
            "SELECT id, name, description, items, created_by, created_at, updated_at
             FROM training_templates ORDER BY name ASC",
        )
        .fetch_all(&self.db)
        .await?;

        Ok(templates)
    }

    pub async fn update_template(
        &self,
        template_id: Uuid,
        data: UpdateTemplate,
    ) -> Result<Option<TrainingTemplate>> {
        let items = data.items.map(serde_json::to_value).transpose()?;

        let template = sqlx::query_as::<_, TrainingTemplate>(
            r#"
            UPDATE training_templates
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                items = COALESCE($4, items),
                updated_at = $5
            WHERE id = $1
            RETURNING id, name, description, items, created_by, created_at, updated_at
            "#,
        )
        .bind(template_id)
        .bind(data.name)
        .bind(data.description)
        .bind(items)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(template)
    }

    pub async fn delete_template(&self, template_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_templates WHERE id = $1")
            .bind(template_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
