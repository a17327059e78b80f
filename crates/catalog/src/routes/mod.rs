//! HTTP route handlers for the catalog service.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                          - Liveness
//! GET  /health/ready                    - Database ping
//!
//! # Categories (reads public, writes bearer)
//! GET    /v1/category/                  - List categories
//! POST   /v1/category/                  - Create category
//! GET    /v1/category/{id}              - Get category
//! PUT    /v1/category/{id}              - Partial update
//! DELETE /v1/category/{id}              - Delete category
//!
//! # Products (reads public, writes bearer)
//! GET    /v1/product/                   - List active products
//! POST   /v1/product/                   - Create product
//! GET    /v1/product/{id}               - Get product (active or not)
//! PUT    /v1/product/{id}               - Partial update
//! DELETE /v1/product/{id}               - Delete product
//! GET    /v1/product/category/{id}      - Active products of a category
//! ```

pub mod categories;
pub mod products;

use axum::{Router, routing::get};

use crate::state::AppState;

/// Create the category routes router.
pub fn category_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/category", get(categories::list).post(categories::create))
        .route("/v1/category/", get(categories::list).post(categories::create))
        .route(
            "/v1/category/{id}",
            get(categories::show)
                .put(categories::update)
                .delete(categories::delete),
        )
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/v1/product", get(products::list).post(products::create))
        .route("/v1/product/", get(products::list).post(products::create))
        .route(
            "/v1/product/{id}",
            get(products::show)
                .put(products::update)
                .delete(products::delete),
        )
        .route(
            "/v1/product/category/{category_id}",
            get(products::by_category),
        )
}
