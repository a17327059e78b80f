//! Upstream forwarding.
//!
//! Requests are forwarded with their method, path, query and body unchanged.
//! Hop-by-hop headers (and any header named in `Connection`) are dropped in
//! both directions. The gateway adds no credentials of its own; the caller's
//! `Authorization` header passes through as-is.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json,
    body::Body,
    extract::Request,
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use bazaar_core::ErrorKind;
use bazaar_web::error::ErrorBody;
use thiserror::Error;
use url::Url;

use crate::config::Upstreams;
use crate::routing::{Upstream, resolve};

/// Upstream request deadline.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(30);

/// Largest request body the gateway will buffer.
pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

const HOP_BY_HOP: [&str; 8] = [
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Errors that can occur while forwarding a request.
#[derive(Debug, Error)]
pub enum ProxyError {
    /// No upstream owns the request path.
    #[error("no upstream for path {0}")]
    UnknownRoute(String),

    /// The upstream could not be reached or did not answer in time.
    #[error("upstream {upstream} unavailable: {source}")]
    Unavailable {
        upstream: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// The inbound body could not be read (too large or aborted).
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::UnknownRoute(_) => {
                tracing::debug!(error = %self, "No route");
                (StatusCode::NOT_FOUND, ErrorKind::NotFound.message())
            }
            Self::Body(_) => {
                tracing::debug!(error = %self, "Rejected request body");
                (StatusCode::BAD_REQUEST, ErrorKind::ValidationError.message())
            }
            Self::Unavailable { .. } | Self::Client(_) => {
                tracing::error!(error = %self, "Proxy error");
                (StatusCode::BAD_GATEWAY, "service unavailable")
            }
        };

        (status, Json(ErrorBody { error: message })).into_response()
    }
}

/// Forwards requests to the upstream that owns their path.
///
/// Cheaply cloneable; the connection pool is shared.
#[derive(Clone)]
pub struct ProxyClient {
    inner: Arc<ProxyClientInner>,
}

struct ProxyClientInner {
    client: reqwest::Client,
    upstreams: Upstreams,
}

impl ProxyClient {
    /// Create a client with the standard upstream timeout.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(upstreams: Upstreams) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(UPSTREAM_TIMEOUT)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            inner: Arc::new(ProxyClientInner { client, upstreams }),
        })
    }

    /// The configured upstream base URLs.
    #[must_use]
    pub fn upstreams(&self) -> &Upstreams {
        &self.inner.upstreams
    }

    fn base_url(&self, upstream: Upstream) -> &Url {
        match upstream {
            Upstream::Users => &self.inner.upstreams.users,
            Upstream::Catalog => &self.inner.upstreams.catalog,
            Upstream::Orders => &self.inner.upstreams.orders,
        }
    }

    /// Forward `request` and relay the upstream response.
    ///
    /// Upstream error statuses (401, 404, 409, ...) are relayed unchanged;
    /// only transport failures become a gateway error.
    ///
    /// # Errors
    ///
    /// `UnknownRoute` if no upstream owns the path, `Body` if the request
    /// body cannot be read, `Unavailable` if the upstream cannot be reached.
    pub async fn forward(&self, request: Request) -> Result<Response, ProxyError> {
        let path = request.uri().path();
        let upstream = resolve(path).ok_or_else(|| ProxyError::UnknownRoute(path.to_string()))?;
        let url = target_url(self.base_url(upstream), request.uri());

        let (parts, body) = request.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES).await?;

        tracing::debug!(upstream = upstream.name(), method = %parts.method, %url, "Forwarding");

        let unavailable = |source: reqwest::Error| ProxyError::Unavailable {
            upstream: upstream.name(),
            source,
        };

        let upstream_response = self
            .inner
            .client
            .request(parts.method, &url)
            .headers(forwardable(&parts.headers))
            .body(body)
            .send()
            .await
            .map_err(unavailable)?;

        let status = upstream_response.status();
        let headers = forwardable(upstream_response.headers());
        let bytes = upstream_response.bytes().await.map_err(unavailable)?;

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = status;
        *response.headers_mut() = headers;

        Ok(response)
    }
}

/// Upstream base joined with the inbound path and query.
fn target_url(base: &Url, uri: &Uri) -> String {
    let path_and_query = uri
        .path_and_query()
        .map_or_else(|| uri.path(), |pq| pq.as_str());
    format!("{}{path_and_query}", base.as_str().trim_end_matches('/'))
}

/// Copy of `headers` without hop-by-hop headers, `Host` or `Content-Length`.
fn forwardable(headers: &HeaderMap) -> HeaderMap {
    let connection_listed: Vec<String> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .map(|name| name.trim().to_ascii_lowercase())
        .collect();

    headers
        .iter()
        .filter(|(name, _)| {
            let name = name.as_str();
            !HOP_BY_HOP.contains(&name)
                && name != header::HOST.as_str()
                && name != header::CONTENT_LENGTH.as_str()
                && !connection_listed.iter().any(|listed| listed == name)
        })
        .map(|(name, value)| (name.clone(), value.clone()))
        .collect()
}
