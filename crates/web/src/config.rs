//! Configuration loaded from environment variables.
//!
//! Every service loads its configuration once, in `main`, by composing the
//! pieces below. Nothing reads the environment after startup.
//!
//! # Environment Variables
//!
//! ## Required (services)
//! - `<SERVICE>_DATABASE_URL` or `DATABASE_URL` - `PostgreSQL` connection string
//! - `JWT_ACCESS_SECRET_KEY` - Access token signing secret (min 32 chars, high entropy)
//! - `JWT_REFRESH_SECRET_KEY` - Refresh token signing secret (min 32 chars, high entropy)
//!
//! ## Optional
//! - `<SERVICE>_HOST` - Bind address (default: 127.0.0.1)
//! - `<SERVICE>_PORT` - Listen port (service-specific default)
//! - `JWT_ACCESS_TIME_MINUTE` - Access token lifetime in minutes (default: 60)
//! - `JWT_REFRESH_TIME_HOUR` - Refresh token lifetime in hours (default: 24)
//! - `SENTRY_DSN` - Sentry error tracking DSN
//! - `SENTRY_ENVIRONMENT` - Sentry environment name

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

use bazaar_core::token::{DEFAULT_ACCESS_MINUTES, DEFAULT_REFRESH_HOURS, TokenConfig};
use chrono::TimeDelta;
use secrecy::SecretString;
use thiserror::Error;

const MIN_SECRET_LENGTH: usize = 32;

/// Longest accepted token lifetime (ten years).
const MAX_TOKEN_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;
const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "secret",
    "password",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "enter-",
    "put-your",
    "add-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Load `.env` if present. Safe to call more than once.
pub fn load_dotenv() {
    // Missing .env is the normal case in production
    let _ = dotenvy::dotenv();
}

/// Where a process listens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: IpAddr,
    pub port: u16,
}

impl ServerConfig {
    /// Read `<PREFIX>_HOST` and `<PREFIX>_PORT`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if either value does not parse.
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        let host_key = format!("{prefix}_HOST");
        let port_key = format!("{prefix}_PORT");

        let host = get_env_or_default(&host_key, "127.0.0.1")
            .parse::<IpAddr>()
            .map_err(|e| ConfigError::InvalidEnvVar(host_key, e.to_string()))?;
        let port = match get_optional_env(&port_key) {
            Some(value) => value
                .parse::<u16>()
                .map_err(|e| ConfigError::InvalidEnvVar(port_key, e.to_string()))?,
            None => default_port,
        };

        Ok(Self { host, port })
    }

    /// Returns the socket address for binding the server.
    #[must_use]
    pub const fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

/// Sentry settings. Sentry stays disabled without a DSN.
#[derive(Debug, Clone, Default)]
pub struct SentryConfig {
    pub dsn: Option<String>,
    pub environment: Option<String>,
}

impl SentryConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            dsn: get_optional_env("SENTRY_DSN"),
            environment: get_optional_env("SENTRY_ENVIRONMENT"),
        }
    }
}

/// Settings shared by the three database-backed services.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// `PostgreSQL` database connection URL (contains password)
    pub database_url: SecretString,
    pub server: ServerConfig,
    pub tokens: TokenConfig,
    pub sentry: SentryConfig,
}

impl ServiceConfig {
    /// Load configuration for the service whose variables start with `prefix`.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing, invalid, or
    /// if secrets fail validation (placeholder detection, entropy check).
    pub fn from_env(prefix: &str, default_port: u16) -> Result<Self, ConfigError> {
        load_dotenv();

        Ok(Self {
            database_url: get_database_url(&format!("{prefix}_DATABASE_URL"))?,
            server: ServerConfig::from_env(prefix, default_port)?,
            tokens: token_config_from_env()?,
            sentry: SentryConfig::from_env(),
        })
    }
}

/// Read both token secrets and lifetimes.
///
/// # Errors
///
/// Returns `ConfigError` if a secret is missing or weak, or a lifetime is
/// not a positive integer.
pub fn token_config_from_env() -> Result<TokenConfig, ConfigError> {
    let access_secret = get_validated_secret("JWT_ACCESS_SECRET_KEY")?;
    let refresh_secret = get_validated_secret("JWT_REFRESH_SECRET_KEY")?;

    let access_ttl = parse_lifetime(
        "JWT_ACCESS_TIME_MINUTE",
        get_optional_env("JWT_ACCESS_TIME_MINUTE").as_deref(),
        DEFAULT_ACCESS_MINUTES,
        TimeDelta::try_minutes,
    )?;
    let refresh_ttl = parse_lifetime(
        "JWT_REFRESH_TIME_HOUR",
        get_optional_env("JWT_REFRESH_TIME_HOUR").as_deref(),
        DEFAULT_REFRESH_HOURS,
        TimeDelta::try_hours,
    )?;

    Ok(TokenConfig {
        access_secret,
        refresh_secret,
        access_ttl,
        refresh_ttl,
    })
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` if the variable is unset.
pub fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
#[must_use]
pub fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.is_empty())
}

/// Get an environment variable with a default value.
#[must_use]
pub fn get_env_or_default(key: &str, default: &str) -> String {
    get_optional_env(key).unwrap_or_else(|| default.to_string())
}

/// Get database URL with fallback to generic `DATABASE_URL`.
///
/// # Errors
///
/// Returns `ConfigError::MissingEnvVar` naming `primary_key` if neither is set.
pub fn get_database_url(primary_key: &str) -> Result<SecretString, ConfigError> {
    get_optional_env(primary_key)
        .or_else(|| get_optional_env("DATABASE_URL"))
        .map(SecretString::from)
        .ok_or_else(|| ConfigError::MissingEnvVar(primary_key.to_string()))
}

/// Parse a lifetime counted in the unit `to_delta` converts from.
fn parse_lifetime(
    key: &str,
    value: Option<&str>,
    default: i64,
    to_delta: fn(i64) -> Option<TimeDelta>,
) -> Result<TimeDelta, ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidEnvVar(key.to_string(), reason);

    let n = match value {
        None => default,
        Some(value) => value
            .trim()
            .parse::<i64>()
            .map_err(|e| invalid(e.to_string()))?,
    };
    if n <= 0 {
        return Err(invalid(format!("must be positive (got {n})")));
    }

    to_delta(n)
        .filter(|ttl| ttl.num_seconds() <= MAX_TOKEN_LIFETIME_SECS)
        .ok_or_else(|| invalid(format!("{n} exceeds the ten year maximum")))
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a secret is long enough, not a placeholder, and has
/// sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    if secret.chars().count() < MIN_SECRET_LENGTH {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "must be at least {MIN_SECRET_LENGTH} characters (got {})",
                secret.chars().count()
            ),
        ));
    }

    let lower = secret.to_lowercase();

    // Check blocklist
    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1}). Use a randomly generated secret."
            ),
        ));
    }

    Ok(())
}

/// Load and validate a secret from environment.
fn get_validated_secret(key: &str) -> Result<SecretString, ConfigError> {
    let value = get_required_env(key)?;
    validate_secret_strength(&value, key)?;
    Ok(SecretString::from(value))
}
