//! Unified error handling with Sentry integration.
//!
//! Every handler returns `Result<T, AppError>`. `AppError` reduces each
//! failure to one [`ErrorKind`], and its `IntoResponse` impl is the only place
//! a kind becomes `(status, {"error": message})`. The detailed error is logged
//! and, for server-side kinds, captured to Sentry. Clients only ever see the
//! kind's fixed message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use bazaar_core::password::PasswordError;
use bazaar_core::pricing::PricingError;
use bazaar_core::token::TokenError;
use bazaar_core::{EmailError, ErrorKind};
use serde::Serialize;
use thiserror::Error;

use crate::db::RepositoryError;

/// Application-level error type shared by every service.
#[derive(Debug, Error)]
pub enum AppError {
    /// Store operation failed.
    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),

    /// Token issuance or verification failed.
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// Password hashing failed.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),

    /// Order items failed validation.
    #[error("pricing error: {0}")]
    Pricing(#[from] PricingError),

    /// Request input failed validation.
    #[error("validation error: {0}")]
    Validation(String),

    /// Caller could not be authenticated.
    #[error("not authenticated: {0}")]
    NotAuthenticated(String),

    /// Caller is authenticated but may not touch the resource.
    #[error("not authorized: {0}")]
    NotAuthorized(String),

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Anything else.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// The taxonomy entry this error is reported as.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Repository(err) => err.kind(),
            Self::Token(err) => err.kind(),
            Self::Pricing(err) => err.kind(),
            Self::Validation(_) => ErrorKind::ValidationError,
            Self::NotAuthenticated(_) => ErrorKind::NotAuthenticated,
            Self::NotAuthorized(_) => ErrorKind::NotAuthorized,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Password(_) | Self::Internal(_) => ErrorKind::UnknownError,
        }
    }
}

impl From<EmailError> for AppError {
    fn from(err: EmailError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Wire body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();

        // Capture server errors to Sentry
        if kind.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                kind = ?kind,
                sentry_event_id = %event_id,
                "Request error"
            );
        } else {
            tracing::debug!(error = %self, kind = ?kind, "Request rejected");
        }

        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        // Don't expose internal error details to clients
        (
            status,
            Json(ErrorBody {
                error: kind.message(),
            }),
        )
            .into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    async fn get_body(err: AppError) -> String {
        let body = err.into_response().into_body();
        let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("order 9".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Validation("bad".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::NotAuthenticated("no header".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::NotAuthorized("other owner".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::Conflict(
                "products_sku_key".to_string()
            ))),
            StatusCode::CONFLICT
        );
        assert_eq!(
            get_status(AppError::Repository(RepositoryError::DataCorruption(
                "bad".to_string()
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            get_status(AppError::Internal("boom".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[tokio::test]
    async fn test_body_is_kind_message_only() {
        let body = get_body(AppError::Internal("secret detail".to_string())).await;
        assert_eq!(body, r#"{"error":"something went wrong"}"#);

        let body = get_body(AppError::NotAuthenticated("wrong password".to_string())).await;
        assert_eq!(body, r#"{"error":"not authenticated"}"#);
    }

    #[test]
    fn test_email_error_is_validation() {
        let err = AppError::from(EmailError::Empty);
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[test]
    fn test_token_errors_are_not_authenticated() {
        let err = AppError::from(TokenError::Expired);
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }
}
