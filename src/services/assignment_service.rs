use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{AssignmentDetail, CreateAssignment, TrainingAssignment, UpdateAssignment};

pub struct AssignmentService {
    db: PgPool,
}

impl AssignmentService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn create_assignment(
        &self,
        assigned_by: Uuid,
        data: CreateAssignment,
    ) -> Result<TrainingAssignment> {
        let assignment = sqlx::query_as::<_, TrainingAssignment>(
            "INSERT INTO training_assignments (id, template_id, player_id, assigned_by, due_date, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $6)
             RETURNING id, template_id, player_id, assigned_by, due_date, status, created_at, updated_at",
        )
        .bind(Uuid::new_v4())
        .bind(data.template_id)
        .bind(data.player_id)
        .bind(assigned_by)
        .bind(data.due_date)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        Ok(assignment)
    }

    pub async fn get_assignment_by_id(
        &self,
        assignment_id: Uuid,
    ) -> Result<Option<TrainingAssignment>> {
        let assignment = sqlx::query_as::<_, TrainingAssignment>(
            "SELECT id, template_id, player_id, assigned_by, due_date, status, created_at, updated_at
             FROM training_assignments WHERE id = $1",
        )
        .bind(assignment_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(assignment)
    }

    /// Assignments joined with their template name and items
    pub async fn list_detailed(&self, player_id: Option<Uuid>) -> Result<Vec<AssignmentDetail>> {
        let assignments = sqlx::query_as::<_, AssignmentDetail>(
            "SELECT a.id, a.template_id, t.name AS template_name, t.items,
                    a.player_id, a.assigned_by, a.due_date, a.status, a.created_at, a.updated_at
             FROM training_assignments a
             JOIN training_templates t ON t.id = a.template_id
             WHERE $1::uuid IS NULL OR a.player_id = $1
             ORDER BY a.due_date ASC NULLS LAST, a.created_at DESC",
        )
        .bind(player_id)
        .fetch_all(&self.db)
        .await?;

        Ok(assignments)
    }

    pub async fn update_assignment(
        &self,
        assignment_id: Uuid,
        data: UpdateAssignment,
    ) -> Result<Option<TrainingAssignment>> {
        let assignment = sqlx::query_as::<_, TrainingAssignment>(
            r#"
            UPDATE training_assignments
            SET due_date = COALESCE($2, due_date),
                status = COALESCE($3, status),
                updated_at = $4
            WHERE id = $1
            RETURNING id, template_id, player_id, assigned_by, due_date, status, created_at, updated_at
            "#,
        )
        .bind(assignment_id)
        .bind(data.due_date)
        .bind(data.status.map(|s| s.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(assignment)
    }

    pub async fn delete_assignment(&self, assignment_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM training_assignments WHERE id = $1")
            .bind(assignment_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
