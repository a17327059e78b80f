//! `PostgreSQL` pool creation and repository error classification.
//!
//! Each service owns its own schema and its own `migrations/` directory.
//! Migrations are run explicitly via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate all
//! ```

use std::time::Duration;

use bazaar_core::ErrorKind;
use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

/// Errors that can occur during repository operations.
///
/// Store failures are classified here, once, so that services can pass them
/// along with `?` without inspecting driver errors themselves.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Unique constraint violation (e.g., duplicate email or SKU).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Wire-level kind for this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) => ErrorKind::UnknownError,
            Self::DataCorruption(_) => ErrorKind::RepositoryError,
            Self::NotFound => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::ResourceAlreadyExists,
        }
    }
}

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => Self::NotFound,
            sqlx::Error::Database(ref db_err) if db_err.is_unique_violation() => {
                Self::Conflict(db_err.constraint().unwrap_or("unique").to_string())
            }
            sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
                Self::DataCorruption(err.to_string())
            }
            other => Self::Database(other),
        }
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Something that can answer "is the backing store reachable?".
#[async_trait::async_trait]
pub trait HealthCheck: Send + Sync {
    async fn ping(&self) -> Result<(), RepositoryError>;
}

#[async_trait::async_trait]
impl HealthCheck for PgPool {
    async fn ping(&self) -> Result<(), RepositoryError> {
        sqlx::query("SELECT 1").execute(self).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_not_found_is_not_found() {
        let err = RepositoryError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, RepositoryError::NotFound));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_other_errors_are_unknown() {
        let err = RepositoryError::from(sqlx::Error::PoolTimedOut);
        assert!(matches!(err, RepositoryError::Database(_)));
        assert_eq!(err.kind(), ErrorKind::UnknownError);
    }

    #[test]
    fn test_kind_mapping() {
        assert_eq!(
            RepositoryError::Conflict("users_email_key".into()).kind(),
            ErrorKind::ResourceAlreadyExists
        );
        assert_eq!(
            RepositoryError::DataCorruption("bad row".into()).kind(),
            ErrorKind::RepositoryError
        );
    }
}
