//! Bazaar Catalog - category and product service.
//!
//! This binary serves `/v1/category/*` and `/v1/product/*` on port 8082.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use bazaar_catalog::db::PgCatalogStore;
use bazaar_catalog::{AppState, app, config};
use bazaar_core::token::TokenService;
use bazaar_web::{db, server, telemetry};

#[tokio::main]
async fn main() {
    let config = config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing("bazaar_catalog=info,bazaar_web=info,tower_http=debug");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let tokens = Arc::new(TokenService::new(&config.tokens));
    let state = AppState::new(PgCatalogStore::new(pool), tokens);

    server::serve(app(state), config.server.socket_addr(), "catalog")
        .await
        .expect("Server error");
}
