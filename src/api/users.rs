use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{errors::ApiError, AppState};
use crate::auth::UserSession;
use crate::models::validation::{validate_display_name, validate_pagination};
use crate::models::{UpdateUser, UserResponse};
use crate::services::UserService;

#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

pub fn user_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_users))
        .route("/:user_id", get(get_user).patch(update_user))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Roster view for coaches
async fn list_users(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(pagination): Query<PaginationQuery>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    validate_pagination(pagination.limit, pagination.offset).map_err(ApiError::validation)?;

    let users = UserService::new(state.db.clone())
        .list_users(pagination.limit, pagination.offset)
        .await?;

    Ok(Json(users))
}

async fn get_user(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    if !session.may_act_for(user_id) {
        return Err(ApiError::Forbidden);
    }

    let user = UserService::new(state.db.clone())
        .get_user_by_id(user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}

/// Players may edit their own name and position; role changes are admin-only
/// and live under /api/admin.
async fn update_user(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(user_id): Path<Uuid>,
    Json(mut payload): Json<UpdateUser>,
) -> Result<Json<UserResponse>, ApiError> {
    if !session.may_act_for(user_id) {
        return Err(ApiError::Forbidden);
    }
    payload.role = None;

    if let Some(name) = &payload.display_name {
        validate_display_name(name).map_err(ApiError::validation)?;
    }

    let user = UserService::new(state.db.clone())
        .update_user(user_id, payload)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}
