use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use std::collections::HashMap;
use uuid::Uuid;

use super::ExerciseCategory;

/// One logged exercise within a workout. The category is snapshotted at log
/// time so scoring stays stable when the catalog changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub exercise_id: Option<Uuid>,
    pub exercise_name: String,
    pub category: ExerciseCategory,
    pub sets: u32,
    pub reps: u32,
    pub weight_kg: Option<f64>,
    pub rpe: Option<f64>,
    pub duration_seconds: Option<u32>,
}

impl WorkoutEntry {
    /// Total repetitions across all sets
    pub fn rep_volume(&self) -> f64 {
        f64::from(self.sets) * f64::from(self.reps)
    }

    /// Tonnage in kg; zero for unweighted work
    pub fn tonnage_kg(&self) -> f64 {
        self.rep_volume() * self.weight_kg.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub template_id: Option<Uuid>,
    pub notes: Option<String>,
    pub entries: Vec<WorkoutEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Workout {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let entries_raw: serde_json::Value = row.try_get("entries")?;
        let entries = serde_json::from_value(entries_raw)
            .map_err(|e| super::column_decode("entries", e.to_string()))?;

        Ok(Workout {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            date: row.try_get("date")?,
            template_id: row.try_get("template_id")?,
            notes: row.try_get("notes")?,
            entries,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateWorkout {
    pub date: NaiveDate,
    pub template_id: Option<Uuid>,
    pub notes: Option<String>,
    pub entries: Vec<WorkoutEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateWorkout {
    pub date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub entries: Option<Vec<WorkoutEntry>>,
}

/// KPI roll-up over a set of workouts
#[derive(Debug, Serialize, Deserialize)]
pub struct WorkoutSummary {
    pub total_workouts: i64,
    pub total_tonnage_kg: f64,
    pub total_duration_seconds: i64,
    pub entries_per_category: HashMap<String, i64>,
}

impl WorkoutSummary {
    pub fn from_workouts(workouts: &[Workout]) -> Self {
        let mut total_tonnage_kg = 0.0;
        let mut total_duration_seconds = 0i64;
        let mut entries_per_category: HashMap<String, i64> = HashMap::new();

        for workout in workouts {
            for entry in &workout.entries {
                total_tonnage_kg += entry.tonnage_kg();
                total_duration_seconds += i64::from(entry.duration_seconds.unwrap_or(0));
                *entries_per_category
                    .entry(entry.category.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        WorkoutSummary {
            total_workouts: workouts.len() as i64,
            total_tonnage_kg,
            total_duration_seconds,
            entries_per_category,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(category: ExerciseCategory, sets: u32, reps: u32, weight: Option<f64>) -> WorkoutEntry {
        WorkoutEntry {
            exercise_id: None,
            exercise_name: "test".to_string(),
            category,
            sets,
            reps,
            weight_kg: weight,
            rpe: None,
            duration_seconds: None,
        }
    }

    #[test]
    fn test_tonnage() {
        let e = entry(ExerciseCategory::Strength, 3, 5, Some(100.0));
        assert_eq!(e.tonnage_kg(), 1500.0);

        let bodyweight = entry(ExerciseCategory::Core, 3, 20, None);
        assert_eq!(bodyweight.tonnage_kg(), 0.0);
    }

    #[test]
    fn test_summary_rollup() {
        let workout = Workout {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            template_id: None,
            notes: None,
            entries: vec![
                entry(ExerciseCategory::Strength, 3, 5, Some(80.0)),
                entry(ExerciseCategory::Strength, 3, 8, Some(40.0)),
                entry(ExerciseCategory::Speed, 6, 1, None),
            ],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let summary = WorkoutSummary::from_workouts(&[workout]);
        assert_eq!(summary.total_workouts, 1);
        assert_eq!(summary.total_tonnage_kg, 2160.0);
        assert_eq!(summary.entries_per_category.get("strength"), Some(&2));
        assert_eq!(summary.entries_per_category.get("speed"), Some(&1));
    }
}
