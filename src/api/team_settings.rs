use axum::{
    extract::State,
    http::header::AUTHORIZATION,
    http::HeaderMap,
    response::Json,
    routing::get,
    Router,
};

use crate::api::{errors::ApiError, AppState};
use crate::auth::{extract_bearer_token, AuthError, UserSession};
use crate::models::validation::{validate_display_name, validate_hex_color, validate_url};
use crate::models::{TeamSettings, UpdateTeamSettings};
use crate::services::TeamSettingsService;

/// GET is public so clients can paint branding before login, which keeps the
/// whole router outside the auth middleware; the PUT handler authenticates
/// from the header itself.
pub fn team_settings_routes(state: AppState) -> Router {
    Router::new()
        .route("/", get(get_team_settings).put(update_team_settings))
        .with_state(state)
}

async fn get_team_settings(
    State(state): State<AppState>,
) -> Result<Json<TeamSettings>, ApiError> {
    let settings = TeamSettingsService::new(state.db.clone()).get().await?;
    Ok(Json(settings))
}

async fn update_team_settings(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<UpdateTeamSettings>,
) -> Result<Json<TeamSettings>, ApiError> {
    let session = session_from_headers(&state, &headers).await?;
    if !session.role.is_staff() {
        return Err(ApiError::Forbidden);
    }

    validate_display_name(&payload.name).map_err(ApiError::validation)?;
    validate_hex_color(&payload.primary_color).map_err(ApiError::validation)?;
    validate_hex_color(&payload.secondary_color).map_err(ApiError::validation)?;
    if let Some(logo_url) = &payload.logo_url {
        validate_url(logo_url).map_err(ApiError::validation)?;
    }

    let settings = TeamSettingsService::new(state.db.clone())
        .update(payload)
        .await?;

    tracing::info!("Team branding updated by {}", session.email);

    Ok(Json(settings))
}

async fn session_from_headers(
    state: &AppState,
    headers: &HeaderMap,
) -> Result<UserSession, ApiError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;
    let token = extract_bearer_token(auth_header)?;

    Ok(state.auth_service.validate_session(token).await?)
}
