//! Bazaar Orders - order placement, pricing and status changes.
//!
//! Totals are computed by [`bazaar_core::pricing`] from the submitted line
//! items; stock in the catalog is not reserved.

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
        .merge(routes::order_routes())
        .with_state(state);

    middleware::observe(router)
}
