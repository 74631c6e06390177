use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One logged exercise inside a local workout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkoutEntry {
    pub exercise_name: String,
    pub category: String,
    pub sets: u32,
    pub reps: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rpe: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_seconds: Option<u32>,
}

/// Workout stored locally; `synced` flips once the server accepted it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workout {
    pub id: String,
    pub date: NaiveDate,
    pub notes: Option<String>,
    pub entries: Vec<WorkoutEntry>,
    pub synced: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Workout {
    pub fn new(date: NaiveDate, notes: Option<String>, entries: Vec<WorkoutEntry>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            date,
            notes,
            entries,
            synced: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn mark_synced(&mut self) {
        self.synced = true;
        self.updated_at = Utc::now();
    }
}

/// Filter criteria for listing workouts
#[derive(Debug, Default)]
pub struct WorkoutFilter {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub synced: Option<bool>,
}

impl WorkoutFilter {
    pub fn matches(&self, workout: &Workout) -> bool {
        if let Some(from) = self.from_date {
            if workout.date < from {
                return false;
            }
        }

        if let Some(to) = self.to_date {
            if workout.date > to {
                return false;
            }
        }

        if let Some(synced) = self.synced {
            if workout.synced != synced {
                return false;
            }
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workout_on(date: NaiveDate) -> Workout {
        Workout::new(date, None, Vec::new())
    }

    #[test]
    fn test_new_workout_is_unsynced() {
        let workout = workout_on(NaiveDate::from_ymd_opt(2025, 4, 1).unwrap());
        assert!(!workout.synced);

        let mut synced = workout.clone();
        synced.mark_synced();
        assert!(synced.synced);
    }

    #[test]
    fn test_filter_by_date_range() {
        let workout = workout_on(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());

        let inside = WorkoutFilter {
            from_date: NaiveDate::from_ymd_opt(2025, 4, 1),
            to_date: NaiveDate::from_ymd_opt(2025, 4, 30),
            ..Default::default()
        };
        assert!(inside.matches(&workout));

        let outside = WorkoutFilter {
            from_date: NaiveDate::from_ymd_opt(2025, 5, 1),
            ..Default::default()
        };
        assert!(!outside.matches(&workout));
    }

    #[test]
    fn test_filter_by_sync_state() {
        let mut workout = workout_on(NaiveDate::from_ymd_opt(2025, 4, 10).unwrap());

        let unsynced_only = WorkoutFilter {
            synced: Some(false),
            ..Default::default()
        };
        assert!(unsynced_only.matches(&workout));

        workout.mark_synced();
        assert!(!unsynced_only.matches(&workout));
    }
}
