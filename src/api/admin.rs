use axum::{
    extract::{Path, State},
    response::Json,
    routing::patch,
    Router,
};
use uuid::Uuid;

use crate::api::{errors::ApiError, AppState};
use crate::models::{UpdateUser, UserResponse};
use crate::services::UserService;

/// Admin-only user management: role changes and removal
pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/users/:user_id", patch(change_role).delete(delete_user))
        .layer(axum::middleware::from_fn(
            crate::auth::admin_only_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn change_role(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(payload): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::new(state.db.clone())
        .update_user(user_id, payload)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = UserService::new(state.db.clone())
        .delete_user(user_id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("User"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
