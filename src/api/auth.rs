use axum::{
    extract::State,
    http::header::AUTHORIZATION,
    http::HeaderMap,
    response::Json,
    routing::{get, post},
    Extension, Router,
};

use crate::auth::{
    extract_bearer_token, AuthError, AuthResponse, LoginRequest, MessageResponse,
    RefreshTokenRequest, RegisterRequest, TokenResponse, UserSession,
};
use crate::api::{errors::ApiError, AppState};
use crate::services::UserService;
use crate::models::UserResponse;

pub fn auth_routes(state: AppState) -> Router {
    let protected = Router::new()
        .route("/me", get(me))
        .layer(axum::middleware::from_fn_with_state(
            state.auth_service.clone(),
            crate::auth::jwt_auth_middleware,
        ));

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
        .route("/logout", post(logout))
        .merge(protected)
        .with_state(state)
}

async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.register(payload).await?;
    Ok(Json(response))
}

async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth_service.login(payload).await?;
    Ok(Json(response))
}

async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshTokenRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let response = state.auth_service.refresh_token(payload).await?;
    Ok(Json(response))
}

async fn logout(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>, AuthError> {
    let auth_header = headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .ok_or(AuthError::MissingAuthHeader)?;
    let token = extract_bearer_token(auth_header)?;

    let response = state.auth_service.logout(token).await?;
    Ok(Json(response))
}

async fn me(
    State(state): State<AppState>,
    Extension(session): Extension<UserSession>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserService::new(state.db.clone())
        .get_user_by_id(session.user_id)
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(user))
}
