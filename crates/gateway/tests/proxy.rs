//! Gateway tests against a real upstream bound on an ephemeral port.

#![allow(clippy::unwrap_used)]

use std::net::SocketAddr;

use axum::body::{Body, Bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, Uri, header};
use axum::routing::post;
use axum::{Json, Router};
use bazaar_gateway::config::Upstreams;
use bazaar_gateway::{ProxyClient, app};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tower::ServiceExt;
use url::Url;

/// Echoes back what it received.
async fn echo(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(String::from)
    };
    Json(json!({
        "method": method.as_str(),
        "uri": uri.to_string(),
        "authorization": header("authorization"),
        "secret": header("x-secret"),
        "requestId": header("x-request-id"),
        "body": String::from_utf8_lossy(&body),
    }))
}

async fn spawn_upstream() -> SocketAddr {
    let upstream = Router::new()
        .route(
            "/v1/category/",
            post(|| async {
                (
                    StatusCode::CONFLICT,
                    Json(json!({"error": "resource already exists"})),
                )
            }),
        )
        .fallback(echo);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });
    addr
}

/// An address nothing listens on.
async fn dead_address() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap()
}

fn url(addr: SocketAddr) -> Url {
    Url::parse(&format!("http://{addr}")).unwrap()
}

async fn gateway() -> Router {
    let live = spawn_upstream().await;
    let dead = dead_address().await;
    let client = ProxyClient::new(Upstreams {
        users: url(live),
        catalog: url(live),
        orders: url(dead),
    })
    .unwrap();
    app(client)
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, headers, body)
}

#[tokio::test]
async fn forwards_method_path_query_body_and_auth() {
    let app = gateway().await;

    let request = Request::builder()
        .method("PUT")
        .uri("/v1/user/7?verbose=true")
        .header(header::AUTHORIZATION, "Bearer abc")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"firstName":"Ada"}"#))
        .unwrap();
    let (status, _, echoed) = call(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed["method"], "PUT");
    assert_eq!(echoed["uri"], "/v1/user/7?verbose=true");
    assert_eq!(echoed["authorization"], "Bearer abc");
    assert_eq!(echoed["body"], r#"{"firstName":"Ada"}"#);
}

#[tokio::test]
async fn strips_hop_by_hop_headers() {
    let app = gateway().await;

    let request = Request::builder()
        .uri("/v1/product/")
        .header(header::CONNECTION, "x-secret")
        .header("x-secret", "1")
        .body(Body::empty())
        .unwrap();
    let (status, _, echoed) = call(&app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed["secret"], Value::Null);
}

#[tokio::test]
async fn propagates_request_id() {
    let app = gateway().await;

    let request = Request::builder()
        .uri("/v1/auth/login")
        .body(Body::empty())
        .unwrap();
    let (_, headers, echoed) = call(&app, request).await;

    let id = headers.get("x-request-id").unwrap().to_str().unwrap();
    assert_eq!(echoed["requestId"], id);
}

#[tokio::test]
async fn relays_upstream_error_statuses() {
    let app = gateway().await;

    let request = Request::builder()
        .method("POST")
        .uri("/v1/category/")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = call(&app, request).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body, json!({"error": "resource already exists"}));
}

#[tokio::test]
async fn unreachable_upstream_is_bad_gateway() {
    let app = gateway().await;

    let request = Request::builder()
        .uri("/v1/order/")
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = call(&app, request).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body, json!({"error": "service unavailable"}));
}

#[tokio::test]
async fn unknown_prefix_is_not_found() {
    let app = gateway().await;

    for path in ["/v1/users", "/v2/order/1", "/admin"] {
        let request = Request::builder().uri(path).body(Body::empty()).unwrap();
        let (status, _, _) = call(&app, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path}");
    }
}

#[tokio::test]
async fn own_endpoints() {
    let app = gateway().await;

    let (status, _, directory) = call(&app, Request::get("/").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(directory["status"], "running");
    assert_eq!(directory["routes"][0], json!({"prefix": "/v1/auth", "service": "users"}));

    let (status, _, health) = call(
        &app,
        Request::get("/v1/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health, json!({"status": "ok", "service": "gateway"}));

    let response = app
        .clone()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
