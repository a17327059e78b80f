//! Access and refresh token issuance and verification.
//!
//! Tokens are HS256-signed JWTs carrying `{id, type, exp, iat}`. Access and
//! refresh tokens use independent secrets and independent lifetimes, so a
//! token of one type never verifies as the other even before the `type`
//! claim is compared.
//!
//! Expiry is checked here rather than by `jsonwebtoken`: the library accepts
//! a token whose `exp` equals the current second, while Bazaar rejects it.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::{ErrorKind, UserId};

/// Default access token lifetime in minutes.
pub const DEFAULT_ACCESS_MINUTES: i64 = 60;

/// Default refresh token lifetime in hours.
pub const DEFAULT_REFRESH_HOURS: i64 = 24;

/// The two token flavours.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    Access,
    Refresh,
}

impl TokenType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Access => "access",
            Self::Refresh => "refresh",
        }
    }
}

impl std::fmt::Display for TokenType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Secrets and lifetimes for both token types.
#[derive(Clone)]
pub struct TokenConfig {
    pub access_secret: SecretString,
    pub refresh_secret: SecretString,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
}

impl TokenConfig {
    /// Build a config with the default lifetimes.
    #[must_use]
    pub fn new(access_secret: SecretString, refresh_secret: SecretString) -> Self {
        Self {
            access_secret,
            refresh_secret,
            access_ttl: Duration::minutes(DEFAULT_ACCESS_MINUTES),
            refresh_ttl: Duration::hours(DEFAULT_REFRESH_HOURS),
        }
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("access_secret", &"[REDACTED]")
            .field("refresh_secret", &"[REDACTED]")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish()
    }
}

/// Verified token payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Claims {
    pub id: UserId,
    pub token_type: TokenType,
    pub exp: i64,
}

impl Claims {
    /// Expiry as a timestamp.
    #[must_use]
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }
}

/// A freshly signed token and the instant it stops being valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Why a token could not be issued or verified.
#[derive(thiserror::Error, Debug)]
pub enum TokenError {
    #[error("failed to sign token: {0}")]
    Signing(#[source] jsonwebtoken::errors::Error),

    #[error("token lifetime overflows the clock")]
    ExpiryOutOfRange,

    #[error("malformed token: {0}")]
    Malformed(#[source] jsonwebtoken::errors::Error),

    #[error("unexpected signing algorithm {0:?}")]
    UnexpectedAlgorithm(Algorithm),

    #[error("invalid token signature")]
    InvalidSignature,

    #[error("expected {expected} token")]
    WrongType { expected: TokenType },

    #[error("token expiry is missing or not a whole number")]
    MissingExpiry,

    #[error("token expired")]
    Expired,

    #[error("token subject is missing, not a whole number or out of range")]
    InvalidSubject,
}

impl TokenError {
    /// Wire-level kind for this failure.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::Signing(_) | Self::ExpiryOutOfRange => ErrorKind::TokenGeneratorError,
            _ => ErrorKind::NotAuthenticated,
        }
    }
}

#[derive(Serialize)]
struct EncodedClaims {
    id: i32,
    #[serde(rename = "type")]
    token_type: TokenType,
    exp: i64,
    iat: i64,
}

// Every field optional so that a missing claim surfaces as our own error
// instead of a generic deserialization failure.
#[derive(Deserialize)]
struct RawClaims {
    id: Option<serde_json::Value>,
    #[serde(rename = "type")]
    token_type: Option<String>,
    exp: Option<serde_json::Value>,
}

struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    fn new(secret: &SecretString, ttl: Duration) -> Self {
        let bytes = secret.expose_secret().as_bytes();
        Self {
            encoding: EncodingKey::from_secret(bytes),
            decoding: DecodingKey::from_secret(bytes),
            ttl,
        }
    }
}

/// Signs and verifies access and refresh tokens.
pub struct TokenService {
    access: TokenKeys,
    refresh: TokenKeys,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_ttl", &self.access.ttl)
            .field("refresh_ttl", &self.refresh.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    #[must_use]
    pub fn new(config: &TokenConfig) -> Self {
        Self {
            access: TokenKeys::new(&config.access_secret, config.access_ttl),
            refresh: TokenKeys::new(&config.refresh_secret, config.refresh_ttl),
        }
    }

    const fn keys(&self, token_type: TokenType) -> &TokenKeys {
        match token_type {
            TokenType::Access => &self.access,
            TokenType::Refresh => &self.refresh,
        }
    }

    /// Issue a token for `id` valid from now.
    ///
    /// # Errors
    ///
    /// See [`TokenService::issue_at`].
    pub fn issue(&self, id: UserId, token_type: TokenType) -> Result<IssuedToken, TokenError> {
        self.issue_at(id, token_type, Utc::now())
    }

    /// Issue a token as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// Returns [`TokenError::Signing`] if the token cannot be signed, or
    /// [`TokenError::ExpiryOutOfRange`] if `now` plus the lifetime is not a
    /// representable instant.
    pub fn issue_at(
        &self,
        id: UserId,
        token_type: TokenType,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let keys = self.keys(token_type);
        let expires_at = now
            .checked_add_signed(keys.ttl)
            .ok_or(TokenError::ExpiryOutOfRange)?;
        let claims = EncodedClaims {
            id: id.as_i32(),
            token_type,
            exp: expires_at.timestamp(),
            iat: now.timestamp(),
        };

        let token = jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
            .map_err(TokenError::Signing)?;

        Ok(IssuedToken { token, expires_at })
    }

    /// Verify `token` as a token of type `expected`.
    ///
    /// # Errors
    ///
    /// Returns a [`TokenError`] for any malformed, forged, mistyped or
    /// expired token.
    pub fn verify(&self, token: &str, expected: TokenType) -> Result<Claims, TokenError> {
        self.verify_at(token, expected, Utc::now())
    }

    /// Verify `token` as if the current time were `now`.
    ///
    /// # Errors
    ///
    /// See [`TokenService::verify`].
    pub fn verify_at(
        &self,
        token: &str,
        expected: TokenType,
        now: DateTime<Utc>,
    ) -> Result<Claims, TokenError> {
        let header = jsonwebtoken::decode_header(token).map_err(TokenError::Malformed)?;
        if header.alg != Algorithm::HS256 {
            return Err(TokenError::UnexpectedAlgorithm(header.alg));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let data = jsonwebtoken::decode::<RawClaims>(
            token,
            &self.keys(expected).decoding,
            &validation,
        )
        .map_err(|e| match e.kind() {
            jsonwebtoken::errors::ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            _ => TokenError::Malformed(e),
        })?;
        let raw = data.claims;

        if raw.token_type.as_deref() != Some(expected.as_str()) {
            return Err(TokenError::WrongType { expected });
        }

        let exp = whole_number(raw.exp.as_ref()).ok_or(TokenError::MissingExpiry)?;
        if exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }

        let id = whole_number(raw.id.as_ref())
            .and_then(|id| i32::try_from(id).ok())
            .ok_or(TokenError::InvalidSubject)?;

        Ok(Claims {
            id: UserId::new(id),
            token_type: expected,
            exp,
        })
    }
}

/// Largest float that still converts to an integer exactly (2^53).
const MAX_EXACT_FLOAT: f64 = 9_007_199_254_740_992.0;

/// A numeric claim as an integer. Other issuers write NumericDate values as
/// floats, so `1.7e9` counts; fractions and non-numbers do not.
#[allow(clippy::float_cmp, clippy::cast_possible_truncation)] // integral and within 2^53, so exact
fn whole_number(value: Option<&serde_json::Value>) -> Option<i64> {
    let value = value?;
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.fract() == 0.0 && n.abs() <= MAX_EXACT_FLOAT)
            .map(|n| n as i64)
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new(&TokenConfig::new(
            SecretString::from("access-secret-for-unit-tests-0123456789".to_string()),
            SecretString::from("refresh-secret-for-unit-tests-9876543210".to_string()),
        ))
    }

    fn fixed_now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_700_000_000, 0).unwrap()
    }

    fn sign_raw(claims: &serde_json::Value, secret: &str) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    #[test]
    fn test_round_trip_both_types() {
        let svc = service();
        for token_type in [TokenType::Access, TokenType::Refresh] {
            let issued = svc.issue(UserId::new(42), token_type).unwrap();
            let claims = svc.verify(&issued.token, token_type).unwrap();
            assert_eq!(claims.id, UserId::new(42));
            assert_eq!(claims.token_type, token_type);
            assert_eq!(claims.exp, issued.expires_at.timestamp());
        }
    }

    #[test]
    fn test_type_isolation() {
        let svc = service();
        let access = svc.issue(UserId::new(1), TokenType::Access).unwrap();
        let refresh = svc.issue(UserId::new(1), TokenType::Refresh).unwrap();

        assert!(svc.verify(&access.token, TokenType::Refresh).is_err());
        assert!(svc.verify(&refresh.token, TokenType::Access).is_err());
    }

    #[test]
    fn test_type_claim_checked_even_with_shared_secret() {
        let shared = SecretString::from("one-secret-used-for-both-token-types".to_string());
        let svc = TokenService::new(&TokenConfig::new(shared.clone(), shared));
        let refresh = svc.issue(UserId::new(1), TokenType::Refresh).unwrap();

        assert!(matches!(
            svc.verify(&refresh.token, TokenType::Access),
            Err(TokenError::WrongType {
                expected: TokenType::Access
            })
        ));
    }

    #[test]
    fn test_expiry_boundary() {
        let svc = service();
        let now = fixed_now();
        let issued = svc.issue_at(UserId::new(7), TokenType::Access, now).unwrap();
        let exp = issued.expires_at;

        assert!(matches!(
            svc.verify_at(&issued.token, TokenType::Access, exp),
            Err(TokenError::Expired)
        ));
        assert!(
            svc.verify_at(&issued.token, TokenType::Access, exp - Duration::seconds(1))
                .is_ok()
        );
    }

    #[test]
    fn test_default_lifetimes() {
        let svc = service();
        let now = fixed_now();
        let access = svc.issue_at(UserId::new(1), TokenType::Access, now).unwrap();
        let refresh = svc.issue_at(UserId::new(1), TokenType::Refresh, now).unwrap();

        assert_eq!(access.expires_at - now, Duration::minutes(60));
        assert_eq!(refresh.expires_at - now, Duration::hours(24));
    }

    #[test]
    fn test_rejects_wrong_algorithm() {
        let svc = service();
        let token = jsonwebtoken::encode(
            &Header::new(Algorithm::HS512),
            &serde_json::json!({"id": 1, "type": "access", "exp": 4_000_000_000_i64}),
            &EncodingKey::from_secret(b"access-secret-for-unit-tests-0123456789"),
        )
        .unwrap();

        assert!(matches!(
            svc.verify(&token, TokenType::Access),
            Err(TokenError::UnexpectedAlgorithm(Algorithm::HS512))
        ));
    }

    #[test]
    fn test_rejects_forged_signature() {
        let svc = service();
        let token = sign_raw(
            &serde_json::json!({"id": 1, "type": "access", "exp": 4_000_000_000_i64}),
            "not-the-right-secret",
        );

        assert!(matches!(
            svc.verify(&token, TokenType::Access),
            Err(TokenError::InvalidSignature)
        ));
    }

    #[test]
    fn test_rejects_missing_or_bad_claims() {
        let svc = service();
        let secret = "access-secret-for-unit-tests-0123456789";

        let no_exp = sign_raw(&serde_json::json!({"id": 1, "type": "access"}), secret);
        assert!(matches!(
            svc.verify(&no_exp, TokenType::Access),
            Err(TokenError::MissingExpiry)
        ));

        let no_id = sign_raw(
            &serde_json::json!({"type": "access", "exp": 4_000_000_000_i64}),
            secret,
        );
        assert!(matches!(
            svc.verify(&no_id, TokenType::Access),
            Err(TokenError::InvalidSubject)
        ));

        let huge_id = sign_raw(
            &serde_json::json!({"id": 9_999_999_999_i64, "type": "access", "exp": 4_000_000_000_i64}),
            secret,
        );
        assert!(matches!(
            svc.verify(&huge_id, TokenType::Access),
            Err(TokenError::InvalidSubject)
        ));
    }

    #[test]
    fn test_accepts_whole_float_claims() {
        let svc = service();
        let secret = "access-secret-for-unit-tests-0123456789";

        let token = sign_raw(
            &serde_json::json!({"id": 7.0, "type": "access", "exp": 4.0e9}),
            secret,
        );
        let claims = svc.verify(&token, TokenType::Access).unwrap();
        assert_eq!(claims.id, UserId::new(7));
        assert_eq!(claims.exp, 4_000_000_000);

        let fractional_id = sign_raw(
            &serde_json::json!({"id": 7.5, "type": "access", "exp": 4.0e9}),
            secret,
        );
        assert!(matches!(
            svc.verify(&fractional_id, TokenType::Access),
            Err(TokenError::InvalidSubject)
        ));

        let text_exp = sign_raw(
            &serde_json::json!({"id": 7, "type": "access", "exp": "4000000000"}),
            secret,
        );
        assert!(matches!(
            svc.verify(&text_exp, TokenType::Access),
            Err(TokenError::MissingExpiry)
        ));
    }

    #[test]
    fn test_lifetime_past_the_calendar_is_an_issuance_error() {
        let mut config = TokenConfig::new(
            SecretString::from("access-secret-for-unit-tests-0123456789".to_string()),
            SecretString::from("refresh-secret-for-unit-tests-9876543210".to_string()),
        );
        config.refresh_ttl = Duration::hours(3_000_000_000);
        let svc = TokenService::new(&config);

        let err = svc
            .issue_at(UserId::new(1), TokenType::Refresh, fixed_now())
            .unwrap_err();
        assert!(matches!(err, TokenError::ExpiryOutOfRange));
        assert_eq!(err.kind(), ErrorKind::TokenGeneratorError);

        // the other type is unaffected
        assert!(svc.issue_at(UserId::new(1), TokenType::Access, fixed_now()).is_ok());
    }

    #[test]
    fn test_rejects_garbage() {
        let svc = service();
        let err = svc.verify("not.a.token", TokenType::Access).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthenticated);
    }
}
