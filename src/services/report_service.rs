use anyhow::Result;
use chrono::Utc;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::models::{PlayerPosition, Workout, WorkoutReport};
use crate::services::scoring::{score_workout, WorkoutScores};

pub struct ReportService {
    db: PgPool,
}

impl ReportService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Serve the stored report, computing and persisting it on first access
    pub async fn get_or_compute(&self, workout: &Workout) -> Result<WorkoutReport> {
        if let Some(report) = self.get_by_workout_id(workout.id).await? {
            return Ok(report);
        }

        let position = self.get_player_position(workout.user_id).await?;
        let scores = score_workout(&workout.entries, position);
        let summary = render_summary(&scores, workout.entries.len());

        let report = sqlx::query_as::<_, WorkoutReport>(
            r#"
            INSERT INTO workout_reports
                (id, workout_id, intensity, work_capacity, athletic_quality, position_relevance, overall, summary, computed_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            ON CONFLICT (workout_id) DO UPDATE
            SET intensity = $3, work_capacity = $4, athletic_quality = $5,
                position_relevance = $6, overall = $7, summary = $8, computed_at = $9
            RETURNING id, workout_id, intensity, work_capacity, athletic_quality, position_relevance, overall, summary, computed_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workout.id)
        .bind(scores.intensity)
        .bind(scores.work_capacity)
        .bind(scores.athletic_quality)
        .bind(scores.position_relevance)
        .bind(scores.overall())
        .bind(summary)
        .bind(Utc::now())
        .fetch_one(&self.db)
        .await?;

        tracing::debug!("Computed report for workout {}", workout.id);

        Ok(report)
    }

    pub async fn get_by_workout_id(&self, workout_id: Uuid) -> Result<Option<WorkoutReport>> {
        let report = sqlx::query_as::<_, WorkoutReport>(
            "SELECT id, workout_id, intensity, work_capacity, athletic_quality, position_relevance, overall, summary, computed_at
             FROM workout_reports WHERE workout_id = $1",
        )
        .bind(workout_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(report)
    }

    async fn get_player_position(&self, user_id: Uuid) -> Result<Option<PlayerPosition>> {
        let row = sqlx::query("SELECT position FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?;

        Ok(row
            .and_then(|r| r.get::<Option<String>, _>("position"))
            .and_then(|raw| PlayerPosition::parse(&raw)))
    }
}

/// Deterministic one-line summary shown alongside the scores
pub fn render_summary(scores: &WorkoutScores, entry_count: usize) -> String {
    let overall = scores.overall();
    let grade = if overall >= 70.0 {
        "Big session"
    } else if overall >= 40.0 {
        "Solid session"
    } else {
        "Light session"
    };

    format!(
        "{grade}: {entry_count} exercises, intensity {:.0}, work capacity {:.0}, athletic quality {:.0}, position relevance {:.0}",
        scores.intensity, scores.work_capacity, scores.athletic_quality, scores.position_relevance
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_is_deterministic() {
        let scores = WorkoutScores {
            intensity: 80.0,
            work_capacity: 37.5,
            athletic_quality: 80.0,
            position_relevance: 75.0,
        };

        let first = render_summary(&scores, 3);
        let second = render_summary(&scores, 3);
        assert_eq!(first, second);
        assert!(first.starts_with("Big session"));
        assert!(first.contains("intensity 80"));
    }

    #[test]
    fn test_summary_grades() {
        let light = WorkoutScores {
            intensity: 20.0,
            work_capacity: 10.0,
            athletic_quality: 30.0,
            position_relevance: 40.0,
        };
        assert!(render_summary(&light, 1).starts_with("Light session"));

        let solid = WorkoutScores {
            intensity: 50.0,
            work_capacity: 40.0,
            athletic_quality: 55.0,
            position_relevance: 60.0,
        };
        assert!(render_summary(&solid, 4).starts_with("Solid session"));
    }
}
