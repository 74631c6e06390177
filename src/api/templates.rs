use axum::{
    extract::{Path, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use uuid::Uuid;

use crate::api::{errors::ApiError, AppState};
use crate::auth::UserSession;
use crate::models::{CreateTemplate, TrainingTemplate, UpdateTemplate};
use crate::services::TemplateService;

/// Template management is coach-facing; players receive template content
/// through their assignments.
pub fn template_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(list_templates).post(create_template))
        .route(
            "/:template_id",
            get(get_template).patch(update_template).delete(delete_template),
        )
        .layer(axum::middleware::from_fn(
            crate::auth::coach_or_admin_middleware,
        ))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ))
        .with_state(state)
}

async fn list_templates(
    State(state): State<AppState>,
) -> Result<Json<Vec<TrainingTemplate>>, ApiError> {
    let templates = TemplateService::new(state.db.clone()).list_templates().await?;
    Ok(Json(templates))
}

async fn get_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<TrainingTemplate>, ApiError> {
    let template = TemplateService::new(state.db.clone())
        .get_template_by_id(template_id)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;

    Ok(Json(template))
}

async fn create_template(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
    Json(payload): Json<CreateTemplate>,
) -> Result<Json<TrainingTemplate>, ApiError> {
    if payload.name.trim().is_empty() {
        return Err(ApiError::Validation("Template name cannot be empty".into()));
    }
    if payload.items.is_empty() {
        return Err(ApiError::Validation(
            "A template needs at least one item".into(),
        ));
    }
    for item in &payload.items {
        if item.sets == 0 {
            return Err(ApiError::Validation("Item sets must be at least 1".into()));
        }
    }

    let template = TemplateService::new(state.db.clone())
        .create_template(session.user_id, payload)
        .await?;

    Ok(Json(template))
}

async fn update_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
    Json(payload): Json<UpdateTemplate>,
) -> Result<Json<TrainingTemplate>, ApiError> {
    if let Some(items) = &payload.items {
        if items.is_empty() {
            return Err(ApiError::Validation(
                "A template needs at least one item".into(),
            ));
        }
    }

    let template = TemplateService::new(state.db.clone())
        .update_template(template_id, payload)
        .await?
        .ok_or(ApiError::NotFound("Template"))?;

    Ok(Json(template))
}

async fn delete_template(
    State(state): State<AppState>,
    Path(template_id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let deleted = TemplateService::new(state.db.clone())
        .delete_template(template_id)
        .await?;

    if !deleted {
        return Err(ApiError::NotFound("Template"));
    }

    Ok(Json(serde_json::json!({ "deleted": true })))
}
