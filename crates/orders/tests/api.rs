//! Router tests for the order service over the in-memory store.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;
use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use bazaar_core::UserId;
use bazaar_core::token::{TokenConfig, TokenService, TokenType};
use bazaar_orders::db::MemoryOrderStore;
use bazaar_orders::{AppState, app};
use rust_decimal::Decimal;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

struct Harness {
    app: Router,
    tokens: Arc<TokenService>,
}

fn harness() -> Harness {
    let tokens = Arc::new(TokenService::new(&TokenConfig::new(
        SecretString::from("a9#Km2!vQ7@xR4$tZ8^wB1&nF6*pH3%j".to_string()),
        SecretString::from("R5!tW8@yU2#iO6$pA9%sD3^fG7&hJ1*k".to_string()),
    )));
    Harness {
        app: app(AppState::new(MemoryOrderStore::new(), tokens.clone())),
        tokens,
    }
}

impl Harness {
    fn token(&self, user: i32, token_type: TokenType) -> String {
        self.tokens
            .issue(UserId::new(user), token_type)
            .unwrap()
            .token
    }

    async fn send(
        &self,
        method: &str,
        uri: &str,
        user: Option<i32>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            request = request.header(
                header::AUTHORIZATION,
                format!("Bearer {}", self.token(user, TokenType::Access)),
            );
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn decimal(value: &Value) -> Decimal {
    Decimal::from_str(value.as_str().unwrap()).unwrap()
}

fn sample_order() -> Value {
    json!({
        "shippingAddress": "1 Main St",
        "status": "delivered",
        "totalAmount": "0.01",
        "items": [
            {"productId": 10, "quantity": 2, "price": "10.00"},
            {"productId": 11, "quantity": 3, "price": "0.10"}
        ]
    })
}

#[tokio::test]
async fn create_computes_total_and_ignores_client_status() {
    let h = harness();

    let (status, order) = h.send("POST", "/v1/order/", Some(1), Some(sample_order())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["status"], "pending");
    assert_eq!(order["userId"], 1);
    assert_eq!(order["shippingAddress"], "1 Main St");

    let items = order["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    let mut sum = Decimal::ZERO;
    for item in items {
        let quantity = Decimal::from(item["quantity"].as_i64().unwrap());
        let subtotal = decimal(&item["subtotal"]);
        assert_eq!(subtotal, quantity * decimal(&item["price"]));
        sum += subtotal;
    }
    assert_eq!(decimal(&order["totalAmount"]), sum);
    assert_eq!(sum, Decimal::from_str("20.30").unwrap());
}

#[tokio::test]
async fn invalid_orders_are_validation_errors() {
    let h = harness();

    for body in [
        json!({"items": []}),
        json!({"items": [{"productId": 1, "quantity": 0, "price": "1.00"}]}),
        json!({"items": [{"productId": 1, "quantity": 1, "price": "0"}]}),
        json!({"shippingAddress": "nowhere"}),
    ] {
        let (status, error) = h.send("POST", "/v1/order/", Some(1), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(error, json!({"error": "validation error"}));
    }
}

#[tokio::test]
async fn amounts_that_storage_would_round_or_overflow_are_rejected() {
    let h = harness();

    for items in [
        json!([{"productId": 1, "quantity": 1, "price": "0.005"}, {"productId": 2, "quantity": 1, "price": "0.005"}]),
        json!([{"productId": 1, "quantity": 1, "price": "0.001"}]),
        json!([{"productId": 1, "quantity": 1, "price": "99999999999"}]),
        json!([{"productId": 1, "quantity": 2, "price": "9999999999.99"}]),
    ] {
        let (status, error) = h
            .send("POST", "/v1/order/", Some(1), Some(json!({"items": items})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{items}");
        assert_eq!(error, json!({"error": "validation error"}));
    }

    let (_, orders) = h.send("GET", "/v1/order/", Some(1), None).await;
    assert!(orders.as_array().unwrap().is_empty());

    // trailing zeros beyond the cent are fine
    let (status, order) = h
        .send(
            "POST",
            "/v1/order/",
            Some(1),
            Some(json!({"items": [{"productId": 1, "quantity": 2, "price": "0.500"}]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(decimal(&order["totalAmount"]), Decimal::ONE);
}

#[tokio::test]
async fn numeric_prices_are_accepted_and_amounts_returned_as_exact_strings() {
    let h = harness();

    let (status, order) = h
        .send(
            "POST",
            "/v1/order/",
            Some(1),
            Some(json!({"items": [
                {"productId": 1, "quantity": 3, "price": 0.1},
                {"productId": 2, "quantity": 1, "price": 19}
            ]})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["totalAmount"], "19.3");
    assert_eq!(order["items"][0]["price"], "0.1");
    assert_eq!(order["items"][0]["subtotal"], "0.3");
}

#[tokio::test]
async fn orders_require_an_access_token() {
    let h = harness();

    let (status, error) = h.send("GET", "/v1/order/", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error, json!({"error": "not authenticated"}));

    let refresh = h.token(1, TokenType::Refresh);
    let request = Request::builder()
        .uri("/v1/order/")
        .header(header::AUTHORIZATION, format!("Bearer {refresh}"))
        .body(Body::empty())
        .unwrap();
    let response = h.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn other_users_orders_are_forbidden() {
    let h = harness();
    let (_, order) = h.send("POST", "/v1/order/", Some(1), Some(sample_order())).await;
    let id = order["id"].as_i64().unwrap();

    let (status, error) = h.send("GET", &format!("/v1/order/{id}"), Some(2), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error, json!({"error": "not authorized"}));

    let (status, _) = h
        .send(
            "PUT",
            &format!("/v1/order/{id}/status"),
            Some(2),
            Some(json!({"status": "cancelled"})),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, mine) = h.send("GET", "/v1/order/", Some(2), None).await;
    assert!(mine.as_array().unwrap().is_empty());
    let (_, theirs) = h.send("GET", "/v1/order/", Some(1), None).await;
    assert_eq!(theirs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn status_updates() {
    let h = harness();
    let (_, order) = h.send("POST", "/v1/order/", Some(1), Some(sample_order())).await;
    let id = order["id"].as_i64().unwrap();

    let (status, updated) = h
        .send(
            "PUT",
            &format!("/v1/order/{id}/status"),
            Some(1),
            Some(json!({"status": "shipped"})),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "shipped");
    assert_eq!(updated["totalAmount"], order["totalAmount"]);

    let (status, error) = h
        .send(
            "PUT",
            &format!("/v1/order/{id}/status"),
            Some(1),
            Some(json!({"status": "lost"})),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error, json!({"error": "validation error"}));

    let (status, error) = h
        .send(
            "PUT",
            "/v1/order/999/status",
            Some(1),
            Some(json!({"status": "paid"})),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error, json!({"error": "record not found"}));

    let (_, fetched) = h.send("GET", &format!("/v1/order/{id}"), Some(1), None).await;
    assert_eq!(fetched["status"], "shipped");
}
