use axum::{routing::get, Router};
use sqlx::PgPool;
use tower_http::trace::TraceLayer;

use super::{
    admin::admin_routes, assignments::assignment_routes, auth::auth_routes,
    exercises::exercise_routes, health::health_check, polls::poll_routes,
    team_settings::team_settings_routes, templates::template_routes, users::user_routes,
    videos::video_routes, workouts::workout_routes, AppState,
};
use crate::auth::{cors_layer, security_headers_layer, AuthService};

pub fn create_routes(db: PgPool, jwt_secret: &str) -> Router {
    let auth_service = AuthService::new(db.clone(), jwt_secret);
    let state = AppState { db, auth_service };

    Router::new()
        .route("/health", get(health_check))
        .nest("/api/auth", auth_routes(state.clone()))
        .nest("/api/admin", admin_routes(state.clone()))
        .nest("/api/users", user_routes(state.clone()))
        .nest("/api/team-settings", team_settings_routes(state.clone()))
        .nest("/api/exercises", exercise_routes(state.clone()))
        .nest("/api/templates", template_routes(state.clone()))
        .nest("/api/assignments", assignment_routes(state.clone()))
        .nest("/api/workouts", workout_routes(state.clone()))
        .nest("/api/videos", video_routes(state.clone()))
        .nest("/api/polls", poll_routes(state))
        .layer(TraceLayer::new_for_http())
        .layer(security_headers_layer())
        .layer(cors_layer())
}
