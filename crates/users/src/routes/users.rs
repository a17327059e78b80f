//! Principal management routes. Every handler requires a bearer token.

use axum::{Json, extract::State};

use bazaar_core::UserId;
use bazaar_web::{Deleted, JsonBody, PathParam, RequireAuth, Result};

use crate::models::{CreateUserRequest, User, UserPatch};
use crate::services::UserService;
use crate::state::AppState;

/// GET /v1/user/
pub async fn list(_auth: RequireAuth, State(state): State<AppState>) -> Result<Json<Vec<User>>> {
    Ok(Json(UserService::new(state.users()).list().await?))
}

/// POST /v1/user/
pub async fn create(
    _auth: RequireAuth,
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<User>> {
    Ok(Json(
        UserService::new(state.users()).create(request, None).await?,
    ))
}

/// GET /v1/user/{id}
pub async fn show(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<UserId>,
) -> Result<Json<User>> {
    Ok(Json(UserService::new(state.users()).get(id).await?))
}

/// PUT /v1/user/{id}
pub async fn update(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<UserId>,
    JsonBody(patch): JsonBody<UserPatch>,
) -> Result<Json<User>> {
    Ok(Json(UserService::new(state.users()).update(id, patch).await?))
}

/// DELETE /v1/user/{id}
pub async fn delete(
    _auth: RequireAuth,
    State(state): State<AppState>,
    PathParam(id): PathParam<UserId>,
) -> Result<Deleted> {
    UserService::new(state.users()).delete(id).await?;
    Ok(Deleted)
}
