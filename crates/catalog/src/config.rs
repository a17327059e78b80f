//! Catalog service configuration.
//!
//! Everything [`ServiceConfig`] reads with the `CATALOG` prefix
//! (`CATALOG_DATABASE_URL`, `CATALOG_HOST`, `CATALOG_PORT`).

use bazaar_web::config::{ConfigError, ServiceConfig};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8082;

/// Load configuration from environment variables.
///
/// # Errors
///
/// Returns `ConfigError` if a required variable is missing or invalid.
pub fn from_env() -> Result<ServiceConfig, ConfigError> {
    ServiceConfig::from_env("CATALOG", DEFAULT_PORT)
}
