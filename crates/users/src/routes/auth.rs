//! Registration, login and token refresh.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_core::{Email, UserId};
use bazaar_web::{JsonBody, Result};

use crate::models::{CreateUserRequest, User};
use crate::services::{AuthService, AuthTokens, UserService};
use crate::state::AppState;

/// Login request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Refresh request body.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AccessTokenRequest {
    pub refresh_token: String,
}

/// Principal summary inside a login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserData {
    pub id: UserId,
    pub user_name: String,
    pub email: Email,
    pub first_name: String,
    pub last_name: String,
    pub status: bool,
}

impl From<User> for UserData {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            user_name: user.user_name,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            status: user.status,
        }
    }
}

/// Token pair inside a login response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SecurityData {
    pub jwt_access_token: String,
    pub jwt_refresh_token: String,
    pub expiration_access_date_time: DateTime<Utc>,
    pub expiration_refresh_date_time: DateTime<Utc>,
}

impl From<AuthTokens> for SecurityData {
    fn from(tokens: AuthTokens) -> Self {
        Self {
            jwt_access_token: tokens.access.token,
            jwt_refresh_token: tokens.refresh.token,
            expiration_access_date_time: tokens.access.expires_at,
            expiration_refresh_date_time: tokens.refresh.expires_at,
        }
    }
}

/// Body of login and refresh responses.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub data: UserData,
    pub security: SecurityData,
}

impl LoginResponse {
    fn new((user, tokens): (User, AuthTokens)) -> Self {
        Self {
            data: user.into(),
            security: tokens.into(),
        }
    }
}

/// Register a new, active principal.
///
/// POST /v1/auth/register
///
/// # Errors
///
/// `ValidationError` for bad input, `ResourceAlreadyExists` if the email is
/// taken.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateUserRequest>,
) -> Result<Json<User>> {
    let user = UserService::new(state.users())
        .create(request, Some(true))
        .await?;
    Ok(Json(user))
}

/// Exchange credentials for an access/refresh token pair.
///
/// POST /v1/auth/login
///
/// # Errors
///
/// `NotAuthenticated` for any credential failure.
pub async fn login(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let result = AuthService::new(state.users(), state.tokens())
        .login(&request.email, &request.password)
        .await?;
    Ok(Json(LoginResponse::new(result)))
}

/// Exchange a refresh token for a fresh access token.
///
/// POST /v1/auth/access-token
///
/// # Errors
///
/// `NotAuthenticated` if the refresh token is invalid.
pub async fn access_token(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<AccessTokenRequest>,
) -> Result<Json<LoginResponse>> {
    let result = AuthService::new(state.users(), state.tokens())
        .refresh(&request.refresh_token)
        .await?;
    Ok(Json(LoginResponse::new(result)))
}
