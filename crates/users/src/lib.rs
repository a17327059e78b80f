//! Bazaar Users - principals, registration, login and token refresh.
//!
//! The binary in `main.rs` wires a `PostgreSQL` store into [`app`]; tests wire
//! in [`db::MemoryUserStore`] instead.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

use axum::Router;
use bazaar_web::{middleware, server};

pub use state::AppState;

/// Build the complete service router, observability layers included.
pub fn app(state: AppState) -> Router {
    let router = Router::new()
        .merge(server::health_routes())
        .merge(routes::auth_routes())
        .merge(routes::user_routes())
        .with_state(state);

    middleware::observe(router)
}
