use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, Row};
use uuid::Uuid;

use crate::auth::UserRole;

/// Field position used by the scoring relevance table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlayerPosition {
    Goalkeeper,
    Defender,
    Midfielder,
    Forward,
}

impl PlayerPosition {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlayerPosition::Goalkeeper => "goalkeeper",
            PlayerPosition::Defender => "defender",
            PlayerPosition::Midfielder => "midfielder",
            PlayerPosition::Forward => "forward",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "goalkeeper" => Some(PlayerPosition::Goalkeeper),
            "defender" => Some(PlayerPosition::Defender),
            "midfielder" => Some(PlayerPosition::Midfielder),
            "forward" => Some(PlayerPosition::Forward),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub display_name: String,
    pub role: UserRole,
    pub position: Option<PlayerPosition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl FromRow<'_, PgRow> for User {
    fn from_row(row: &PgRow) -> Result<Self, sqlx::Error> {
        let role_raw: String = row.try_get("role")?;
        let role = UserRole::parse(&role_raw)
            .ok_or_else(|| super::column_decode("role", format!("unknown role '{role_raw}'")))?;

        let position = row
            .try_get::<Option<String>, _>("position")?
            .map(|raw| {
                PlayerPosition::parse(&raw).ok_or_else(|| {
                    super::column_decode("position", format!("unknown position '{raw}'"))
                })
            })
            .transpose()?;

        Ok(User {
            id: row.try_get("id")?,
            email: row.try_get("email")?,
            password_hash: row.try_get("password_hash")?,
            display_name: row.try_get("display_name")?,
            role,
            position,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

impl User {
    pub fn into_response(self) -> UserResponse {
        UserResponse {
            id: self.id,
            email: self.email,
            display_name: self.display_name,
            role: self.role,
            position: self.position,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Option<UserRole>,
    pub position: Option<PlayerPosition>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateUser {
    pub display_name: Option<String>,
    pub position: Option<PlayerPosition>,
    pub role: Option<UserRole>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: UserRole,
    pub position: Option<PlayerPosition>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_roundtrip() {
        for position in [
            PlayerPosition::Goalkeeper,
            PlayerPosition::Defender,
            PlayerPosition::Midfielder,
            PlayerPosition::Forward,
        ] {
            assert_eq!(PlayerPosition::parse(position.as_str()), Some(position));
        }
        assert_eq!(PlayerPosition::parse("libero"), None);
    }
}
