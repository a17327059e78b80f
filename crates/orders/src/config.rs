//! Order service configuration.
//!
//! Everything [`ServiceConfig`] reads with the `ORDERS` prefix
//! (`ORDERS_DATABASE_URL`, `ORDERS_HOST`, `ORDERS_PORT`).

use bazaar_web::config::{ConfigError, ServiceConfig};

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8083;

/// Load configuration from environment variables.
///
/// # Errors
///
/// Returns `ConfigError` if a required variable is missing or invalid.
pub fn from_env() -> Result<ServiceConfig, ConfigError> {
    ServiceConfig::from_env("ORDERS", DEFAULT_PORT)
}
