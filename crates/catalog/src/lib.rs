//! Bazaar Catalog - categories and products.
//!
//! Reads are public so storefronts can browse without a session; every write
//! requires an access token issued by the user service.

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
        .merge(routes::category_routes())
        .merge(routes::product_routes())
        .with_state(state);

    middleware::observe(router)
}
