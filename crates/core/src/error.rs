//! The closed error taxonomy shared by every Bazaar service.
//!
//! Each failure is normalized to exactly one [`ErrorKind`] before it crosses a
//! service boundary. The kind alone decides the HTTP status and the message
//! a client sees; internal detail stays in the logs.

use serde::Serialize;

/// Wire-level failure category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "PascalCase")]
pub enum ErrorKind {
    NotFound,
    ValidationError,
    ResourceAlreadyExists,
    RepositoryError,
    NotAuthenticated,
    TokenGeneratorError,
    NotAuthorized,
    UnknownError,
}

impl ErrorKind {
    /// HTTP status code for this kind.
    #[must_use]
    pub const fn status_code(self) -> u16 {
        match self {
            Self::NotFound => 404,
            Self::ValidationError => 400,
            Self::ResourceAlreadyExists => 409,
            Self::NotAuthenticated => 401,
            Self::NotAuthorized => 403,
            Self::RepositoryError | Self::TokenGeneratorError | Self::UnknownError => 500,
        }
    }

    /// Message sent to clients in the `error` field.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NotFound => "record not found",
            Self::ValidationError => "validation error",
            Self::ResourceAlreadyExists => "resource already exists",
            Self::RepositoryError => "error in repository operation",
            Self::NotAuthenticated => "not authenticated",
            Self::TokenGeneratorError => "error in token generation",
            Self::NotAuthorized => "not authorized",
            Self::UnknownError => "something went wrong",
        }
    }

    /// Whether this kind represents a server-side fault.
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.status_code() >= 500
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
