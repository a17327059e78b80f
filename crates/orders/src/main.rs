//! Bazaar Orders - order service.
//!
//! This binary serves `/v1/order/*` on port 8083.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use bazaar_core::token::TokenService;
use bazaar_orders::db::PgOrderStore;
use bazaar_orders::{AppState, app, config};
use bazaar_web::{db, server, telemetry};

#[tokio::main]
async fn main() {
    let config = config::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing("bazaar_orders=info,bazaar_web=info,tower_http=debug");

    let pool = db::create_pool(&config.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    let tokens = Arc::new(TokenService::new(&config.tokens));
    let state = AppState::new(PgOrderStore::new(pool), tokens);

    server::serve(app(state), config.server.socket_addr(), "orders")
        .await
        .expect("Server error");
}
