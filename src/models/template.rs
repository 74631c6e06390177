use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

/// One prescribed exercise inside a template
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateItem {
    pub exercise_id: Uuid,
    pub sets: u32,
    pub reps: u32,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingTemplate {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<TemplateItem>,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for TrainingTemplate {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let items_raw: serde_json::Value = row.try_get("items")?;
        let items = serde_json::from_value(items_raw)
            .map_err(|e| super::column_decode("items", e.to_string()))?;

        Ok(TrainingTemplate {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            description: row.try_get("description")?,
            items,
            created_by: row.try_get("created_by")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTemplate {
    pub name: String,
    pub description: Option<String>,
    pub items: Vec<TemplateItem>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateTemplate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub items: Option<Vec<TemplateItem>>,
}

/// Assignment lifecycle as driven by the assignee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignmentStatus {
    Assigned,
    InProgress,
    Completed,
    Skipped,
}

impl AssignmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssignmentStatus::Assigned => "assigned",
            AssignmentStatus::InProgress => "in_progress",
            AssignmentStatus::Completed => "completed",
            AssignmentStatus::Skipped => "skipped",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "assigned" => Some(AssignmentStatus::Assigned),
            "in_progress" => Some(AssignmentStatus::InProgress),
            "completed" => Some(AssignmentStatus::Completed),
            "skipped" => Some(AssignmentStatus::Skipped),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainingAssignment {
    pub id: Uuid,
    pub template_id: Uuid,
    pub player_id: Uuid,
    pub assigned_by: Uuid,
    pub due_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for TrainingAssignment {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status_raw: String = row.try_get("status")?;
        let status = AssignmentStatus::parse(&status_raw).ok_or_else(|| {
            super::column_decode("status", format!("unknown status '{status_raw}'"))
        })?;

        Ok(TrainingAssignment {
            id: row.try_get("id")?,
            template_id: row.try_get("template_id")?,
            player_id: row.try_get("player_id")?,
            assigned_by: row.try_get("assigned_by")?,
            due_date: row.try_get("due_date")?,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Assignment joined with its template, the shape players consume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDetail {
    pub id: Uuid,
    pub template_id: Uuid,
    pub template_name: String,
    pub items: Vec<TemplateItem>,
    pub player_id: Uuid,
    pub assigned_by: Uuid,
    pub due_date: Option<NaiveDate>,
    pub status: AssignmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for AssignmentDetail {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let status_raw: String = row.try_get("status")?;
        let status = AssignmentStatus::parse(&status_raw).ok_or_else(|| {
            super::column_decode("status", format!("unknown status '{status_raw}'"))
        })?;

        let items_raw: serde_json::Value = row.try_get("items")?;
        let items = serde_json::from_value(items_raw)
            .map_err(|e| super::column_decode("items", e.to_string()))?;

        Ok(AssignmentDetail {
            id: row.try_get("id")?,
            template_id: row.try_get("template_id")?,
            template_name: row.try_get("template_name")?,
            items,
            player_id: row.try_get("player_id")?,
            assigned_by: row.try_get("assigned_by")?,
            due_date: row.try_get("due_date")?,
            status,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateAssignment {
    pub template_id: Uuid,
    pub player_id: Uuid,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateAssignment {
    pub due_date: Option<NaiveDate>,
    pub status: Option<AssignmentStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in [
            AssignmentStatus::Assigned,
            AssignmentStatus::InProgress,
            AssignmentStatus::Completed,
            AssignmentStatus::Skipped,
        ] {
            assert_eq!(AssignmentStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AssignmentStatus::parse("abandoned"), None);
    }
}
