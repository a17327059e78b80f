//! HTTP route handlers for the user service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness
//! GET  /health/ready           - Database ping
//!
//! # Auth (public)
//! POST /v1/auth/register       - Create an active principal
//! POST /v1/auth/login          - Email + password -> token pair
//! POST /v1/auth/access-token   - Refresh token -> new access token
//!
//! # Users (bearer required)
//! GET    /v1/user/             - List principals
//! POST   /v1/user/             - Create principal
//! GET    /v1/user/{id}         - Get principal
//! PUT    /v1/user/{id}         - Partial update
//! DELETE /v1/user/{id}         - Delete principal
//! ```

pub mod auth;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the public auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/auth/register", post(auth::register))
        .route("/v1/auth/login", post(auth::login))
        .route("/v1/auth/access-token", post(auth::access_token))
}

/// Create the protected user management routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/user", get(users::list).post(users::create))
        .route("/v1/user/", get(users::list).post(users::create))
        .route(
            "/v1/user/{id}",
            get(users::show).put(users::update).delete(users::delete),
        )
}
