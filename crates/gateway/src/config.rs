//! Gateway configuration.
//!
//! # Environment Variables
//!
//! - `GATEWAY_HOST` / `GATEWAY_PORT` - Listen address (default 127.0.0.1:9090)
//! - `USER_SERVICE_URL` - Users service (default `http://localhost:8081`)
//! - `CATALOG_SERVICE_URL` - Catalog service (default `http://localhost:8082`)
//! - `ORDER_SERVICE_URL` - Order service (default `http://localhost:8083`)
//! - `SENTRY_DSN` / `SENTRY_ENVIRONMENT` - Optional error tracking

use bazaar_web::config::{
    ConfigError, SentryConfig, ServerConfig, get_env_or_default, load_dotenv,
};
use url::Url;

/// Default listen port.
pub const DEFAULT_PORT: u16 = 9090;

/// Base URLs of the three upstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstreams {
    pub users: Url,
    pub catalog: Url,
    pub orders: Url,
}

impl Upstreams {
    /// Read upstream URLs, falling back to the local default ports.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidEnvVar` if a URL does not parse or is not
    /// `http`/`https`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            users: upstream_url("USER_SERVICE_URL", "http://localhost:8081")?,
            catalog: upstream_url("CATALOG_SERVICE_URL", "http://localhost:8082")?,
            orders: upstream_url("ORDER_SERVICE_URL", "http://localhost:8083")?,
        })
    }
}

/// Gateway configuration.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub server: ServerConfig,
    pub upstreams: Upstreams,
    pub sentry: SentryConfig,
}

impl GatewayConfig {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        load_dotenv();

        Ok(Self {
            server: ServerConfig::from_env("GATEWAY", DEFAULT_PORT)?,
            upstreams: Upstreams::from_env()?,
            sentry: SentryConfig::from_env(),
        })
    }
}

fn upstream_url(key: &str, default: &str) -> Result<Url, ConfigError> {
    parse_upstream(key, &get_env_or_default(key, default))
}

fn parse_upstream(key: &str, raw: &str) -> Result<Url, ConfigError> {
    let url =
        Url::parse(raw).map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("unsupported scheme {}", url.scheme()),
        ));
    }

    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_upstream_accepts_http_and_https() {
        let url = parse_upstream("USER_SERVICE_URL", "http://users:8081").unwrap();
        assert_eq!(url.as_str(), "http://users:8081/");
        assert!(parse_upstream("USER_SERVICE_URL", "https://users.internal").is_ok());
    }

    #[test]
    fn test_parse_upstream_rejects_other_schemes() {
        let err = parse_upstream("ORDER_SERVICE_URL", "ftp://files.local").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ORDER_SERVICE_URL"));

        let err = parse_upstream("ORDER_SERVICE_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(..)));
    }
}
