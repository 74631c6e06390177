use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{PlayerPosition, UserResponse};

/// User roles for role-based access control
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Player,
    Coach,
    Admin,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Player => "player",
            UserRole::Coach => "coach",
            UserRole::Admin => "admin",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "player" => Some(UserRole::Player),
            "coach" => Some(UserRole::Coach),
            "admin" => Some(UserRole::Admin),
            _ => None,
        }
    }

    /// Check if this role may act on resources gated at `target_role`
    pub fn can_access(&self, target_role: &UserRole) -> bool {
        match self {
            UserRole::Admin => true,
            UserRole::Coach => matches!(target_role, UserRole::Player | UserRole::Coach),
            UserRole::Player => matches!(target_role, UserRole::Player),
        }
    }

    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Coach | UserRole::Admin)
    }
}

/// JWT token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    pub exp: usize,
    pub iat: usize,
    pub jti: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    pub role: Option<UserRole>,
    pub position: Option<PlayerPosition>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: usize,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: usize,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Authenticated caller, inserted into request extensions by the middleware
#[derive(Debug, Clone)]
pub struct UserSession {
    pub user_id: Uuid,
    pub email: String,
    pub role: UserRole,
    pub jti: String,
}

impl UserSession {
    pub fn from_claims(claims: &Claims) -> Result<Self, uuid::Error> {
        Ok(Self {
            user_id: Uuid::parse_str(&claims.sub)?,
            email: claims.email.clone(),
            role: claims.role,
            jti: claims.jti.clone(),
        })
    }

    /// Owner-or-staff check used by per-resource handlers
    pub fn may_act_for(&self, owner: Uuid) -> bool {
        self.user_id == owner || self.role.is_staff()
    }
}

/// Refresh token record, tracked by the token's jti
#[derive(Debug, Clone)]
pub struct RefreshToken {
    pub id: Uuid,
    pub user_id: Uuid,
    pub jti: String,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_hierarchy() {
        assert!(UserRole::Admin.can_access(&UserRole::Coach));
        assert!(UserRole::Admin.can_access(&UserRole::Player));
        assert!(UserRole::Coach.can_access(&UserRole::Player));
        assert!(!UserRole::Coach.can_access(&UserRole::Admin));
        assert!(!UserRole::Player.can_access(&UserRole::Coach));
        assert!(UserRole::Player.can_access(&UserRole::Player));
    }

    #[test]
    fn test_role_roundtrip() {
        for role in [UserRole::Player, UserRole::Coach, UserRole::Admin] {
            assert_eq!(UserRole::parse(role.as_str()), Some(role));
        }
        assert_eq!(UserRole::parse("referee"), None);
    }

    #[test]
    fn test_may_act_for() {
        let owner = Uuid::new_v4();
        let session = UserSession {
            user_id: owner,
            email: "p@club.example".to_string(),
            role: UserRole::Player,
            jti: "jti".to_string(),
        };
        assert!(session.may_act_for(owner));
        assert!(!session.may_act_for(Uuid::new_v4()));

        let coach = UserSession {
            user_id: Uuid::new_v4(),
            email: "c@club.example".to_string(),
            role: UserRole::Coach,
            jti: "jti2".to_string(),
        };
        assert!(coach.may_act_for(owner));
    }
}
