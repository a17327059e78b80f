//! Bearer-token authentication extractor.
//!
//! Protected handlers take a [`RequireAuth`] argument. The extractor reads
//! `Authorization: Bearer <token>`, verifies it as an access token and hands
//! the handler the authenticated principal's id. A missing, malformed or
//! invalid header short-circuits with `NotAuthenticated`.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header, request::Parts},
};
use bazaar_core::UserId;
use bazaar_core::token::{TokenService, TokenType};

use crate::error::AppError;

/// Extractor that requires a valid access token.
///
/// The router state must expose an `Arc<TokenService>` through `FromRef`.
///
/// # Example
///
/// ```rust,ignore
/// async fn my_orders(
///     RequireAuth(user_id): RequireAuth,
///     State(state): State<AppState>,
/// ) -> Result<Json<Vec<Order>>> {
///     // ...
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequireAuth(pub UserId);

impl<S> FromRequestParts<S> for RequireAuth
where
    Arc<TokenService>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)?;
        let tokens = Arc::<TokenService>::from_ref(state);
        let claims = tokens.verify(token, TokenType::Access)?;

        sentry::configure_scope(|scope| {
            scope.set_user(Some(sentry::User {
                id: Some(claims.id.to_string()),
                ..Default::default()
            }));
        });

        Ok(Self(claims.id))
    }
}

fn bearer_token(parts: &Parts) -> Result<&str, AppError> {
    let value = parts
        .headers
        .get(header::AUTHORIZATION)
        .ok_or_else(|| AppError::NotAuthenticated("missing authorization header".to_string()))?
        .to_str()
        .map_err(|_| AppError::NotAuthenticated("authorization header is not ASCII".to_string()))?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| AppError::NotAuthenticated("expected a bearer token".to_string()))
}
