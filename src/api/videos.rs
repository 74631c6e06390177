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
use crate::models::validation::validate_url;
use crate::models::{CreateVideo, UpdateVideo, Video};
use crate::services::VideoService;

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

pub fn video_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_videos).post(create_video))
        .route(
            "/:video_id",
            get(get_video).patch(update_video).delete(delete_video),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn list_videos(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Video>>, ApiError> {
    let videos = VideoService::new(state.db.clone())
        .list_videos(query.category)
        .await?;

    Ok(Json(videos))
}

async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<Uuid>,
) -> Result<Json<Video>, ApiError> {
    let video = VideoService::new(state.db.clone())
        .get_video_by_id(video_id)
        .await?
        .ok_or(ApiError::NotFound("Video"))?;

    Ok(Json(video))
}

async fn create_video(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreateVideo>,
) -> Result<Json<Video>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    if payload.title.trim().is_empty() {
        return Err(ApiError::Validation("Video title cannot be empty".into()));
    }
    if payload.category.trim().is_empty() {
        return Err(ApiError::Validation("Video category cannot be empty".into()));
    }
    validate_url(&payload.url).map_err(ApiError::validation)?;

    let video = VideoService::new(state.db.clone())
        .create_video(session.user_id, payload)
        .await?;

    Ok(Json(video))
}

async fn update_video(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(video_id): Path<Uuid>,
    Json(payload): Json<UpdateVideo>,
) -> Result<Json<Video>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    if let Some(url) = &payload.url {
        validate_url(url).map_err(ApiError::validation)?;
    }

    let video = VideoService::new(state.db.clone())
        .update_video(video_id, payload)
        .await?
        .ok_or(ApiError::NotFound("Video"))?;

    Ok(Json(video))
}

async fn delete_video(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Path(video_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    let deleted = VideoService::new(state.db.clone())
        .delete_video(video_id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Video"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
