use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// Exercise category; keys the scoring lookup tables
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExerciseCategory {
    Strength,
    Power,
    Speed,
    Conditioning,
    Core,
    Mobility,
    Skill,
}

impl ExerciseCategory {
    pub const ALL: [ExerciseCategory; 7] = [
        ExerciseCategory::Strength,
        ExerciseCategory::Power,
        ExerciseCategory::Speed,
        ExerciseCategory::Conditioning,
        ExerciseCategory::Core,
        ExerciseCategory::Mobility,
        ExerciseCategory::Skill,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseCategory::Strength => "strength",
            ExerciseCategory::Power => "power",
            ExerciseCategory::Speed => "speed",
            ExerciseCategory::Conditioning => "conditioning",
            ExerciseCategory::Core => "core",
            ExerciseCategory::Mobility => "mobility",
            ExerciseCategory::Skill => "skill",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "strength" => Some(ExerciseCategory::Strength),
            "power" => Some(ExerciseCategory::Power),
            "speed" => Some(ExerciseCategory::Speed),
            "conditioning" => Some(ExerciseCategory::Conditioning),
            "core" => Some(ExerciseCategory::Core),
            "mobility" => Some(ExerciseCategory::Mobility),
            "skill" => Some(ExerciseCategory::Skill),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Exercise {
    pub id: Uuid,
    pub name: String,
    pub category: ExerciseCategory,
    pub description: Option<String>,
    pub archived: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for Exercise {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let category_raw: String = row.try_get("category")?;
        let category = ExerciseCategory::parse(&category_raw).ok_or_else(|| {
            super::column_decode("category", format!("unknown category '{category_raw}'"))
        })?;

        Ok(Exercise {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            category,
            description: row.try_get("description")?,
            archived: row.try_get("archived")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateExercise {
    pub name: String,
    pub category: ExerciseCategory,
    pub description: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateExercise {
    pub name: Option<String>,
    pub category: Option<ExerciseCategory>,
    pub description: Option<String>,
    pub archived: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_roundtrip() {
        for category in ExerciseCategory::ALL {
            assert_eq!(ExerciseCategory::parse(category.as_str()), Some(category));
        }
        assert_eq!(ExerciseCategory::parse("yoga"), None);
    }
}
