use anyhow::Result;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{CreateWorkout, UpdateWorkout, Workout, WorkoutSummary};

pub struct WorkoutService {
    db: PgPool,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct WorkoutFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl WorkoutService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_workout(&self, user_id: Uuid, data: CreateWorkout) -> Result<Workout> {
        let entries = serde_json::to_value(&data.entries)?;

        let workout = sqlx::query_as::<_, Workout>(
            "INSERT INTO workouts (id, user_id, date, template_id, notes, entries, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $7)
             RETURNING id, user_id, date, template_id, notes, entries, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(data.date)
        .bind(data.template_id)
        .bind(data.notes)
        .bind(entries)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(workout)
    }

    pub async fn get_workout_by_id(&self, workout_id: Uuid) -> Result<Option<Workout>> {
        let workout = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date, template_id, notes, entries, created_at, updated_at
             FROM workouts WHERE id = $1",
        )
        .bind(workout_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(workout)
    }

    pub async fn list_workouts(&self, user_id: Uuid, filter: WorkoutFilter) -> Result<Vec<Workout>> {
        let limit = filter.limit.unwrap_or(50);
        let offset = filter.offset.unwrap_or(0);

        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date, template_id, notes, entries, created_at, updated_at
             FROM workouts
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)
             ORDER BY date DESC, created_at DESC
             LIMIT $4 OFFSET $5",
        )
        .bind(user_id)
        .bind(filter.from)
        .bind(filter.to)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(workouts)
    }

    /// Mutating a workout drops its stored report; the next report fetch
    /// recomputes from the new entries.
    pub async fn update_workout(
        &self,
        workout_id: Uuid,
        data: UpdateWorkout,
    ) -> Result<Option<Workout>> {
        let entries = data.entries.map(serde_json::to_value).transpose()?;

        let workout = sqlx::query_as::<_, Workout>(
            r#"
            UPDATE workouts
            SET date = COALESCE($2, date),
                notes = COALESCE($3, notes),
                entries = COALESCE($4, entries),
                updated_at = $5
            WHERE id = $1
            RETURNING id, user_id, date, template_id, notes, entries, created_at, updated_at
            "#,
        )
        .bind(workout_id)
        .bind(data.date)
        .bind(data.notes)
        .bind(entries)
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        if workout.is_some() {
            self.invalidate_report(workout_id).await?;
        }

        Ok(workout)
    }

    pub async fn delete_workout(&self, workout_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(workout_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn get_summary(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<WorkoutSummary> {
        let workouts = sqlx::query_as::<_, Workout>(
            "SELECT id, user_id, date, template_id, notes, entries, created_at, updated_at
             FROM workouts
             WHERE user_id = $1
               AND ($2::date IS NULL OR date >= $2)
               AND ($3::date IS NULL OR date <= $3)",
        )
        .bind(user_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.db)
        .await?;

        Ok(WorkoutSummary::from_workouts(&workouts))
    }

    async fn invalidate_report(&self, workout_id: Uuid) -> Result<()> {
        sqlx::query("DELETE FROM workout_reports WHERE workout_id = $1")
            .bind(workout_id)
            .execute(&self.db)
            .await?;

        Ok(())
    }
}
