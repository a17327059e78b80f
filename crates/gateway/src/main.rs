//! Bazaar Gateway - reverse proxy in front of the users, catalog and order
//! services, on port 9090.

#![cfg_attr(not(test), forbid(unsafe_code))]

use bazaar_gateway::config::GatewayConfig;
use bazaar_gateway::{ProxyClient, app};
use bazaar_web::{server, telemetry};

#[tokio::main]
async fn main() {
    let config = GatewayConfig::from_env().expect("Failed to load configuration");

    // Initialize Sentry (must be done before tracing subscriber)
    let _sentry_guard = telemetry::init_sentry(&config.sentry);
    telemetry::init_tracing("bazaar_gateway=info,bazaar_web=info,tower_http=debug");

    tracing::info!(
        users = %config.upstreams.users,
        catalog = %config.upstreams.catalog,
        orders = %config.upstreams.orders,
        "Upstream services"
    );

    let client = ProxyClient::new(config.upstreams).expect("Failed to build HTTP client");

    server::serve(app(client), config.server.socket_addr(), "gateway")
        .await
        .expect("Server error");
}
