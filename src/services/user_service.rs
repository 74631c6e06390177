use anyhow::Result;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::{UpdateUser, User, UserResponse};

pub struct UserService {
    db: PgPool,
}

impl UserService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    pub async fn get_user_by_id(&self, user_id: Uuid) -> Result<Option<UserResponse>> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, role, position, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(User::into_response))
    }

    pub async fn list_users(
        &self,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<UserResponse>> {
        let limit = limit.unwrap_or(50);
        let offset = offset.unwrap_or(0);

        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, display_name, role, position, created_at, updated_at
             FROM users ORDER BY display_name ASC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(users.into_iter().map(User::into_response).collect())
    }

    pub async fn update_user(
        &self,
        user_id: Uuid,
        user_data: UpdateUser,
    ) -> Result<Option<UserResponse>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET display_name = COALESCE($2, display_name),
                position = COALESCE($3, position),
                role = COALESCE($4, role),
                updated_at = $5
            WHERE id = $1
            RETURNING id, email, password_hash, display_name, role, position, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(user_data.display_name)
        .bind(user_data.position.map(|p| p.as_str()))
        .bind(user_data.role.map(|r| r.as_str()))
        .bind(Utc::now())
        .fetch_optional(&self.db)
        .await?;

        Ok(user.map(User::into_response))
    }

    pub async fn delete_user(&self, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
