// API routes and handlers

pub mod admin;
pub mod assignments;
pub mod auth;
pub mod errors;
pub mod exercises;
pub mod health;
pub mod polls;
pub mod routes;
pub mod team_settings;
pub mod templates;
pub mod users;
pub mod videos;
pub mod workouts;

use sqlx::PgPool;

use crate::auth::AuthService;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub auth_service: AuthService,
}
