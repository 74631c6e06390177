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
use crate::models::{AssignmentDetail, CreateAssignment, TrainingAssignment, UpdateAssignment};
use crate::services::{AssignmentService, TemplateService, UserService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub player_id: Option<Uuid>,
}

pub fn assignment_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_assignments).post(create_assignment))
        .route(
            "/:assignment_id",
            get(get_assignment)
                .patch(update_assignment)
                .delete(delete_assignment),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

/// Players see their own assignments; staff may filter by player
async fn list_assignments(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<AssignmentDetail>>, ApiError> {
    let player_filter = if session.role.is_staff() {
        query.player_id
    } else {
        Some(session.user_id)
    };

    let assignments = AssignmentService::new(state.db.clone())
        .list_detailed(player_filter)
        .await?;

    Ok(Json(assignments))
}

async fn get_assignment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<TrainingAssignment>, ApiError> {
    let assignment = AssignmentService::new(state.db.clone())
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or(ApiError::NotFound("Assignment"))?;

    if !session.may_act_for(assignment.player_id) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(assignment))
}

async fn create_assignment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreateAssignment>,
) -> Result<Json<TrainingAssignment>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    TemplateService::new(state.db.clone())
        .get_template_by_id(payload.template_id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;
    UserService::new(state.db.clone())
        .get_user_by_id(payload.player_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    let assignment = AssignmentService::new(state.db.clone())
        .create_assignment(session.user_id, payload)
        .await?;

    Ok(Json(assignment))
}

/// Assignees drive their own status; staff may also move the due date
async fn update_assignment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(assignment_id): Path<Uuid>,
    Json(mut payload): Json<UpdateAssignment>,
) -> Result<Json<TrainingAssignment>, ApiError> {
    let service = AssignmentService::new(state.db.clone());

    let assignment = service
        .get_assignment_by_id(assignment_id)
        .await?
        .ok_or(ApiError::NotFound("Assignment"))?;

    if !session.may_act_for(assignment.player_id) {
        return Err(ApiError::Forbidden);
    }
    if !session.role.is_staff() {
        payload.due_date = None;
    }

    let updated = service
        .update_assignment(assignment_id, payload)
        .await?
        .ok_or(ApiError::NotFound("Assignment"))?;

    Ok(Json(updated))
}

async fn delete_assignment(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(assignment_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    let deleted = AssignmentService::new(state.db.clone())
        .delete_assignment(assignment_id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Assignment"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
