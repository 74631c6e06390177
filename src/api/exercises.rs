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
use crate::models::{CreateExercise, Exercise, UpdateExercise};
use crate::services::ExerciseService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub include_archived: bool,
}

pub fn exercise_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_exercises).post(create_exercise))
        .route(
            "/:exercise_id",
            get(get_exercise)
                .patch(update_exercise)
                .delete(archive_exercise),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn list_exercises(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Exercise>>, ApiError> {
    let exercises = ExerciseService::new(state.db.clone())
        .list_exercises(query.include_archived)
        .await?;

    Ok(Json(exercises))
}

async fn get_exercise(
    State(state): State<AppState>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<Exercise>, ApiError> {
    let exercise = ExerciseService::new(state.db.clone())
        .get_exercise_by_id(exercise_id)
        .await?
        .ok_or(ApiError::NotFound("Exercise"))?;

    Ok(Json(exercise))
}

async fn create_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreateExercise>,
) -> Result<Json<Exercise>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Exercise name cannot be empty".into()));
    }

    let service = ExerciseService::new(state.db.clone());
    if service.find_by_name(&payload.name).await?.is_some() {
        return Err(ApiError::Conflict(format!(
            "Exercise '{}' already exists",
            payload.name.trim()
        )));
    }

    let exercise = service.create_exercise(payload).await?;
    Ok(Json(exercise))
}

async fn update_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(exercise_id): Path<Uuid>,
    Json(payload): Json<UpdateExercise>,
) -> Result<Json<Exercise>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    let exercise = ExerciseService::new(state.db.clone())
        .update_exercise(exercise_id, payload)
        .await?
        .ok_or(ApiError::NotFound("Exercise"))?;

    Ok(Json(exercise))
}

/// Soft delete; logged workouts keep their category snapshots
async fn archive_exercise(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(exercise_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    let archived = ExerciseService::new(state.db.clone())
        .archive_exercise(exercise_id)
        .await?;

    if !archived {
        return Err(ApiError::NotFound("Exercise"));
    }

    Ok(Json(serde_json::json!({ "archived": true })))
}
