//! Product routes. Reads are public; writes require a bearer token.

use axum::{Json, extract::State};

use bazaar_core::{CategoryId, ProductId};
use bazaar_web::{Deleted, JsonBody, PathParam, RequireAuth, Result};

use crate::models::{CreateProductRequest, Product, ProductPatch};
use crate::services::ProductService;
use crate::state::AppState;

fn service(state: &AppState) -> ProductService<'_> {
    ProductService::new(state.products(), state.categories())
}

/// GET /v1/product/
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Product>>> {
    Ok(Json(service(&state).list().await?))
}

/// GET /v1/product/category/{category_id}
pub async fn by_category(
    State(state): State<AppState>,
    PathParam(category_id): PathParam<CategoryId>,
) -> Result<Json<Vec<Product>>> {
    Ok(Json(service(&state).list_by_category(category_id).await?))
}

/// GET /v1/product/{id}
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<ProductId>,
) -> Result<Json<Product>> {
    Ok(Json(service(&state).get(id).await?))
}

/// POST /v1/product/
pub async fn create(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateProductRequest>,
) -> Result<Json<Product>> {
    tracing::debug!(%user_id, sku = %request.sku, "Creating product");
    Ok(Json(service(&state).create(request).await?))
}

/// PUT /v1/product/{id}
pub async fn update(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<ProductId>,
    JsonBody(patch): JsonBody<ProductPatch>,
) -> Result<Json<Product>> {
    Ok(Json(service(&state).update(id, patch).await?))
}

/// DELETE /v1/product/{id}
pub async fn delete(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<ProductId>,
) -> Result<Deleted> {
    service(&state).delete(id).await?;
    Ok(Deleted)
}
