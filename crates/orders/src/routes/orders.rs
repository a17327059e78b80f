use axum::{Json, extract::State};

use bazaar_core::OrderId;
use bazaar_web::{JsonBody, PathParam, RequireAuth, Result};

use crate::models::{CreateOrderRequest, Order, UpdateStatusRequest};
use crate::services::OrderService;
use crate::state::AppState;

/// GET /v1/order/
pub async fn list(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<Vec<Order>>> {
    Ok(Json(
        OrderService::new(state.orders())
            .list_for_user(user_id)
            .await?,
    ))
}

/// POST /v1/order/
pub async fn create(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateOrderRequest>,
) -> Result<Json<Order>> {
    Ok(Json(
        OrderService::new(state.orders())
            .create(user_id, request)
            .await?,
    ))
}

/// GET /v1/order/{id}
pub async fn show(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<OrderId>,
) -> Result<Json<Order>> {
    Ok(Json(OrderService::new(state.orders()).get(user_id, id).await?))
}

/// PUT /v1/order/{id}/status
pub async fn update_status(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<OrderId>,
    JsonBody(request): JsonBody<UpdateStatusRequest>,
) -> Result<Json<Order>> {
    Ok(Json(
        OrderService::new(state.orders())
            .update_status(user_id, id, &request.status)
            .await?,
    ))
}
