//! Gateway's own endpoints and the proxy fallback.

use axum::{
    Json,
    extract::{Request, State},
    response::Response,
};
use serde::Serialize;

use crate::proxy::{ProxyClient, ProxyError};
use crate::routing::{ROUTES, Upstream};

/// One entry of the service directory.
#[derive(Debug, Serialize)]
pub struct RouteEntry {
    pub prefix: &'static str,
    pub service: Upstream,
}

#[derive(Debug, Serialize)]
pub struct Directory {
    pub message: &'static str,
    pub status: &'static str,
    pub routes: Vec<RouteEntry>,
}

/// GET /
pub async fn directory() -> Json<Directory> {
    Json(Directory {
        message: "Bazaar API gateway",
        status: "running",
        routes: ROUTES
            .iter()
            .map(|&(prefix, service)| RouteEntry { prefix, service })
            .collect(),
    })
}

#[derive(Debug, Serialize)]
pub struct GatewayHealth {
    pub status: &'static str,
    pub service: &'static str,
}

/// GET /v1/health
pub async fn versioned_health() -> Json<GatewayHealth> {
    Json(GatewayHealth {
        status: "ok",
        service: "gateway",
    })
}

/// Everything else is forwarded by path prefix.
pub async fn proxy(
    State(client): State<ProxyClient>,
    request: Request,
) -> Result<Response, ProxyError> {
    client.forward(request).await
}
