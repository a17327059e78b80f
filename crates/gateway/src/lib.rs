//! Bazaar Gateway - a path-prefix reverse proxy.
//!
//! The gateway owns no data and checks no tokens. It picks an upstream from
//! the first path segments (see [`routing::ROUTES`]) and relays the request
//! and response.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod handlers;
pub mod proxy;
pub mod routing;

use std::time::Duration;

use axum::{
    Router,
    http::{HeaderName, Method, header},
    routing::get,
};
use bazaar_web::{middleware, server};
use tower_http::cors::{Any, CorsLayer};

pub use proxy::{ProxyClient, ProxyError};

/// Browsers may call the gateway from any origin.
fn cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
        ])
        .expose_headers([
            header::CONTENT_LENGTH,
            HeaderName::from_static(middleware::REQUEST_ID_HEADER),
        ])
        .max_age(Duration::from_secs(12 * 60 * 60))
}

/// Build the gateway router, observability and CORS layers included.
pub fn app(client: ProxyClient) -> Router {
    let router = Router::new()
        .route("/", get(handlers::directory))
        .route("/health", get(server::health))
        .route("/v1/health", get(handlers::versioned_health))
        .fallback(handlers::proxy)
        .with_state(client);

    middleware::observe(router).layer(cors())
}
