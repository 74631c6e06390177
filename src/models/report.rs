use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Persisted scoring result for one workout (one row per workout)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkoutReport {
    pub id: Uuid,
    pub workout_id: Uuid,
    pub intensity: f64,
    pub work_capacity: f64,
    pub athletic_quality: f64,
    pub position_relevance: f64,
    pub overall: f64,
    pub summary: String,
    pub computed_at: DateTime<Utc>,
}
