//! User service configuration.
//!
//! # Environment Variables
//!
//! Everything [`ServiceConfig`] reads with the `USERS` prefix
//! (`USERS_DATABASE_URL`, `USERS_HOST`, `USERS_PORT`, default port 8081),
//! plus:
//!
//! - `START_USER_EMAIL` / `START_USER_PW` - Optional bootstrap principal,
//!   created on startup if no principal with that email exists

use bazaar_web::config::{ConfigError, ServiceConfig, get_optional_env};
use secrecy::SecretString;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 8081;

/// Bootstrap principal credentials.
#[derive(Debug, Clone)]
pub struct SeedUser {
    pub email: String,
    pub password: SecretString,
}

/// User service configuration.
#[derive(Debug, Clone)]
pub struct UsersConfig {
    pub service: ServiceConfig,
    pub seed: Option<SeedUser>,
}

impl UsersConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a required variable is missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        let service = ServiceConfig::from_env("USERS", DEFAULT_PORT)?;

        let seed = match (
            get_optional_env("START_USER_EMAIL"),
            get_optional_env("START_USER_PW"),
        ) {
            (Some(email), Some(password)) => Some(SeedUser {
                email,
                password: SecretString::from(password),
            }),
            _ => None,
        };

        Ok(Self { service, seed })
    }
}
