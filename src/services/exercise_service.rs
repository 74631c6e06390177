use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateExercise, Exercise, UpdateExercise};

pub struct ExerciseService {
    db: PgPool,
}

impl ExerciseService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_exercise(&self, data: CreateExercise) -> Result<Exercise> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "INSERT INTO exercises (id, name, category, description, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING id, name, category, description, archived, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.name.trim())
        .bind(data.category.as_str())
        .bind(data.description)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(exercise)
    }

    pub async fn find_by_name(&self, name: &str) -> Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, category, description, archived, created_at, updated_at
             FROM exercises WHERE LOWER(name) = LOWER($1)",
        )
        .bind(name.trim())
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    pub async fn get_exercise_by_id(&self, exercise_id: Uuid) -> Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, category, description, archived, created_at, updated_at
             FROM exercises WHERE id = $1",
        )
        .bind(exercise_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    pub async fn list_exercises(&self, include_archived: bool) -> Result<Vec<Exercise>> {
        let exercises = sqlx::query_as::<_, Exercise>(
            "SELECT id, name, category, description, archived, created_at, updated_at
             FROM exercises WHERE archived = FALSE OR $1 ORDER BY name ASC",
        )
        .bind(include_archived)
        .fetch_all(&self.db)
        .await?;

        Ok(exercises)
    }

    pub async fn update_exercise(
        &self,
        exercise_id: Uuid,
        data: UpdateExercise,
    ) -> Result<Option<Exercise>> {
        let exercise = sqlx::query_as::<_, Exercise>(
            r#"
            UPDATE exercises
            SET name = COALESCE($2, name),
                category = COALESCE($3, category),
                description = COALESCE($4, description),
                archived = COALESCE($5, archived),
                updated_at = $6
            WHERE id = $1
            RETURNING id, name, category, description, archived, created_at, updated_at
            "#,
        )
        .bind(exercise_id)
        .bind(data.name)
        .bind(data.category.map(|c| c.as_str()))
        .bind(data.description)
        .bind(data.archived)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(exercise)
    }

    /// Soft delete: exercises stay referenced by logged workouts
    pub async fn archive_exercise(&self, exercise_id: Uuid) -> Result<bool> {
        let result =
            sqlx::query("UPDATE exercises SET archived = TRUE, updated_at = $2 WHERE id = $1")
                .bind(exercise_id)
                .bind(Utc::now())
                .execute(&self.db)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}
