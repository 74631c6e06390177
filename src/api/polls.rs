use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Extension, Router,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::{errors::ApiError, AppState};
use crate::auth::UserSession;
use crate::models::validation::validate_poll_options;
use crate::models::{CastVote, CreatePoll, Poll, PollResults, PollStatus, PollVote};
use crate::services::PollService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<PollStatus>,
}

pub fn poll_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_polls).post(create_poll))
        .route("/:poll_id", get(get_poll))
        .route("/:poll_id/vote", post(cast_vote))
        .route("/:poll_id/close", post(close_poll))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn create_poll(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreatePoll>,
) -> Result<Json<Poll>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    if payload.question.trim().is_empty() {
        return Err(ApiError::Validation("Poll question cannot be empty".into()));
    }
    if let Some(options) = &payload.options {
        validate_poll_options(options).map_err(ApiError::validation)?;
    }
    if let Some(closes_at) = payload.closes_at {
        if closes_at <= Utc::now() {
            return Err(ApiError::Validation(
                "Poll deadline must be in the future".into(),
            ));
        }
    }

    let poll = PollService::new(state.db.clone())
        .create_poll(session.user_id, payload)
        .await?;

    Ok(Json(poll))
}

async fn list_polls(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Poll>>, ApiError> {
    let polls = PollService::new(state.db.clone())
        .list_polls(query.status)
        .await?;

    Ok(Json(polls))
}

/// Poll with tally and the caller's own vote
async fn get_poll(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(poll_id): Path<Uuid>,
) -> Result<Json<PollResults>, ApiError> {
    let service = PollService::new(state.db.clone());

    let poll = service
        .get_poll_by_id(poll_id)
        .await?
        .ok_or(ApiError::NotFound("Poll"))?;

    let results = service.get_results(poll, session.user_id).await?;
    Ok(Json(results))
}

/// Idempotent per user: re-voting overwrites the previous choice
async fn cast_vote(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(poll_id): Path<Uuid>,
    Json(payload): Json<CastVote>,
) -> Result<Json<PollVote>, ApiError> {
    let service = PollService::new(state.db.clone());

    let poll = service
        .get_poll_by_id(poll_id)
        .await?
        .ok_or(ApiError::NotFound("Poll"))?;

    if poll.status == PollStatus::Closed {
        return Err(ApiError::Conflict("Poll is closed".into()));
    }
    if !poll.options.contains(&payload.choice) {
        return Err(ApiError::Validation(format!(
            "'{}' is not an option on this poll",
            payload.choice
        )));
    }

    let vote = service
        .cast_vote(poll_id, session.user_id, &payload.choice)
        .await?;

    Ok(Json(vote))
}

/// Closing is idempotent
async fn close_poll(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(poll_id): Path<Uuid>,
) -> Result<Json<Poll>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    let poll = PollService::new(state.db.clone())
        .close_poll(poll_id)
        .await?
        .ok_or(ApiError::NotFound("Poll"))?;

    Ok(Json(poll))
}
