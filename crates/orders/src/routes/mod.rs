//! HTTP route handlers for the order service.
//!
//! Every route requires a bearer token and acts on the caller's own orders.
//!
//! ```text
//! GET  /health                  - Liveness
//! GET  /health/ready            - Database ping
//!
//! GET  /v1/order/               - Caller's orders
//! POST /v1/order/               - Place an order
//! GET  /v1/order/{id}           - Get one order
//! PUT  /v1/order/{id}/status    - Change status
//! ```

pub mod orders;

use axum::{
    Router,
    routing::{get, put},
};

use crate::state::AppState;

/// Create the order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/order", get(orders::list).post(orders::create))
        .route("/v1/order/", get(orders::list).post(orders::create))
        .route("/v1/order/{id}", get(orders::show))
        .route("/v1/order/{id}/status", put(orders::update_status))
}
