use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{errors::ApiError, AppState};
use crate::auth::UserSession;
use crate::models::validation::{validate_pagination, validate_rpe};
use crate::models::{CreateWorkout, UpdateWorkout, Workout, WorkoutEntry, WorkoutReport, WorkoutSummary};
use crate::services::{ReportService, WorkoutFilter, WorkoutService};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    /// Staff only: inspect another player's log
    pub player_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub player_id: Option<Uuid>,
}

pub fn workout_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_workouts).post(create_workout))
        .route("/summary", get(get_summary))
        .route(
            "/:workout_id",
            get(get_workout).patch(update_workout).delete(delete_workout),
        )
        .route("/:workout_id/report", get(get_report))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

fn validate_entries(entries: &[WorkoutEntry]) -> Result<(), ApiError> {
    for entry in entries {
        if entry.exercise_name.trim().is_empty() {
            return Err(ApiError::Validation("Entry exercise name cannot be empty".into()));
        }
        if entry.sets == 0 {
            return Err(ApiError::Validation("Entry sets must be at least 1".into()));
        }
        if let Some(rpe) = entry.rpe {
            validate_rpe(rpe).map_err(ApiError::validation)?;
        }
        if let Some(weight) = entry.weight_kg {
            if !(0.0..=1000.0).contains(&weight) {
                return Err(ApiError::Validation(
                    "Entry weight must be between 0 and 1000 kg".into(),
                ));
            }
        }
    }
    Ok(())
}

/// Resolve which player the caller is asking about; players only see themselves
fn resolve_target(session: &UserSession, requested: Option<Uuid>) -> Result<Uuid, ApiError> {
    match requested {
        Some(player_id) if player_id != session.user_id => {
            if session.role.is_staff() {
                Ok(player_id)
            } else {
                Err(ApiError::Forbidden)
            }
        }
        _ => Ok(session.user_id),
    }
}

async fn create_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreateWorkout>,
) -> Result<Json<Workout>, ApiError> {
    validate_entries(&payload.entries)?;

    let workout = WorkoutService::new(state.db.clone())
        .create_workout(session.user_id, payload)
        .await?;

    tracing::debug!("Workout {} logged by {}", workout.id, session.email);

    Ok(Json(workout))
}

async fn list_workouts(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Workout>>, ApiError> {
    validate_pagination(query.limit, query.offset).map_err(ApiError::validation)?;
    let target = resolve_target(&session, query.player_id)?;

    let filter = WorkoutFilter {
        from: query.from,
        to: query.to,
        limit: query.limit,
        offset: query.offset,
    };

    let workouts = WorkoutService::new(state.db.clone())
        .list_workouts(target, filter)
        .await?;

    Ok(Json(workouts))
}

async fn get_summary(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Query(query): Query<SummaryQuery>,
) -> Result<Json<WorkoutSummary>, ApiError> {
    let target = resolve_target(&session, query.player_id)?;

    let summary = WorkoutService::new(state.db.clone())
        .get_summary(target, query.from, query.to)
        .await?;

    Ok(Json(summary))
}

async fn get_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<Workout>, ApiError> {
    let workout = WorkoutService::new(state.db.clone())
        .get_workout_by_id(workout_id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    if !session.may_act_for(workout.user_id) {
        return Err(ApiError::Forbidden);
    }

    Ok(Json(workout))
}

async fn update_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(workout_id): Path<Uuid>,
    Json(payload): Json<UpdateWorkout>,
) -> Result<Json<Workout>, ApiError> {
    if let Some(entries) = &payload.entries {
        validate_entries(entries)?;
    }

    let service = WorkoutService::new(state.db.clone());

    let workout = service
        .get_workout_by_id(workout_id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    if !session.may_act_for(workout.user_id) {
        return Err(ApiError::Forbidden);
    }

    let updated = service
        .update_workout(workout_id, payload)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    Ok(Json(updated))
}

async fn delete_workout(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let service = WorkoutService::new(state.db.clone());

    let workout = service
        .get_workout_by_id(workout_id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    if !session.may_act_for(workout.user_id) {
        return Err(ApiError::Forbidden);
    }

    service.delete_workout(workout_id).await?;

    Ok(Json(serde_json::json!({ "deleted": true })))
}

/// Stored scoring report, computed on first access
async fn get_report(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(workout_id): Path<Uuid>,
) -> Result<Json<WorkoutReport>, ApiError> {
    let workout = WorkoutService::new(state.db.clone())
        .get_workout_by_id(workout_id)
        .await?
        .ok_or(ApiError::NotFound("Workout"))?;

    if !session.may_act_for(workout.user_id) {
        return Err(ApiError::Forbidden);
    }

    let report = ReportService::new(state.db.clone())
        .get_or_compute(&workout)
        .await?;

    Ok(Json(report))
}
