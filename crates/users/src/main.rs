//! Bazaar Users - user and authentication service.
//!
//! This binary serves `/v1/auth/*` and `/v1/user/*` on port 8081.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::sync::Arc;

use bazaar_core::token::TokenService;
use bazaar_users::config::UsersConfig;
use bazaar_users::db::PgUserStore;
use bazaar_users::services::UserService;
use bazaar_users::{AppState, app};
use bazaar_web::{db, server, telemetry};
use secrecy::ExposeSecret;

#[tokio::main]
async fn main() {
    // Load configuration from environment (needed for Sentry init)
    let config = UsersConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config.service.sentry);
    telemetry::init_tracing("bazaar_users=info,bazaar_web=info,tower_http=debug");

    let pool = db::create_pool(&config.service.database_url)
        .await
        .expect("Failed to create database pool");
    tracing::info!("Database pool created");

    // NOTE: Migrations are NOT run automatically on startup.
    // Run them explicitly via: cargo run -p bazaar-cli -- migrate users
    let store = PgUserStore::new(pool);

    if let Some(seed) = &config.seed {
        match UserService::new(&store)
            .ensure_seed_user(&seed.email, seed.password.expose_secret())
            .await
        {
            Ok(true) => tracing::info!(email = %seed.email, "Seeded initial user"),
            Ok(false) => {}
            Err(e) => tracing::warn!(error = %e, "Initial user seed failed"),
        }
    } else {
        tracing::info!("Initial user seed skipped: START_USER_EMAIL or START_USER_PW not set");
    }

    let tokens = Arc::new(TokenService::new(&config.service.tokens));
    let state = AppState::new(store, tokens);

    server::serve(app(state), config.service.server.socket_addr(), "users")
        .await
        .expect("Server error");
}
