//! Category routes. Reads are public; writes require a bearer token.

use axum::{Json, extract::State};

use bazaar_core::CategoryId;
use bazaar_web::{Deleted, JsonBody, PathParam, RequireAuth, Result};

use crate::models::{Category, CategoryPatch, CreateCategoryRequest};
use crate::services::CategoryService;
use crate::state::AppState;

/// GET /v1/category/
pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(CategoryService::new(state.categories()).list().await?))
}

/// GET /v1/category/{id}
pub async fn show(
    State(state): State<AppState>,
    PathParam(id): PathParam<CategoryId>,
) -> Result<Json<Category>> {
    Ok(Json(CategoryService::new(state.categories()).get(id).await?))
}

/// POST /v1/category/
pub async fn create(
    RequireAuth(user_id): RequireAuth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateCategoryRequest>,
) -> Result<Json<Category>> {
    tracing::debug!(%user_id, "Creating category");
    Ok(Json(
        CategoryService::new(state.categories())
            .create(request)
            .await?,
    ))
}

/// PUT /v1/category/{id}
pub async fn update(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<CategoryId>,
    JsonBody(patch): JsonBody<CategoryPatch>,
) -> Result<Json<Category>> {
    Ok(Json(
        CategoryService::new(state.categories())
            .update(id, patch)
            .await?,
    ))
}

/// DELETE /v1/category/{id}
pub async fn delete(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<CategoryId>,
) -> Result<Deleted> {
    CategoryService::new(state.categories()).delete(id).await?;
    Ok(Deleted)
}
