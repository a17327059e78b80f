//! Login and token refresh.
//!
//! Every credential failure (unknown email, wrong password, inactive
//! principal) produces the same `NotAuthenticated` error, so a caller cannot
//! tell which check failed.

use bazaar_core::password::{verify_dummy, verify_password};
use bazaar_core::token::{IssuedToken, TokenService, TokenType};
use bazaar_core::Email;
use bazaar_web::db::RepositoryError;
use bazaar_web::{AppError, Result};

use crate::db::UserStore;
use crate::models::User;

/// Tokens handed out by login and refresh.
#[derive(Debug, Clone)]
pub struct AuthTokens {
    pub access: IssuedToken,
    pub refresh: IssuedToken,
}

/// Authentication use cases.
pub struct AuthService<'a> {
    store: &'a dyn UserStore,
    tokens: &'a TokenService,
}

impl<'a> AuthService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn UserStore, tokens: &'a TokenService) -> Self {
        Self { store, tokens }
    }

    /// Check credentials and issue an access/refresh pair.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` for any credential failure, `TokenGeneratorError`
    /// if signing fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, AuthTokens)> {
        let Ok(email) = Email::parse(email) else {
            return Err(invalid_credentials("malformed email"));
        };
        tracing::info!(email = %email, "User login attempt");

        let Some(user) = self.store.get_by_email(&email).await? else {
            let _ = verify_dummy(password);
            return Err(invalid_credentials("unknown email"));
        };

        if !verify_password(&user.password_hash, password) {
            return Err(invalid_credentials("password mismatch"));
        }
        if !user.status {
            return Err(invalid_credentials("inactive account"));
        }

        let tokens = AuthTokens {
            access: self.tokens.issue(user.id, TokenType::Access)?,
            refresh: self.tokens.issue(user.id, TokenType::Refresh)?,
        };

        Ok((user, tokens))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The refresh token itself is returned unchanged with its original
    /// expiry; it is not rotated.
    ///
    /// # Errors
    ///
    /// `NotAuthenticated` if the token is invalid or its principal is gone
    /// or inactive.
    pub async fn refresh(&self, refresh_token: &str) -> Result<(User, AuthTokens)> {
        let claims = self.tokens.verify(refresh_token, TokenType::Refresh)?;

        let user = match self.store.get(claims.id).await {
            Ok(user) => user,
            Err(RepositoryError::NotFound) => {
                return Err(invalid_credentials("refresh token for deleted user"));
            }
            Err(e) => return Err(e.into()),
        };
        if !user.status {
            return Err(invalid_credentials("inactive account"));
        }

        let refresh_expires_at = claims
            .expires_at()
            .ok_or_else(|| invalid_credentials("refresh expiry out of range"))?;

        let tokens = AuthTokens {
            access: self.tokens.issue(user.id, TokenType::Access)?,
            refresh: IssuedToken {
                token: refresh_token.to_string(),
                expires_at: refresh_expires_at,
            },
        };

        Ok((user, tokens))
    }
}

fn invalid_credentials(reason: &str) -> AppError {
    AppError::NotAuthenticated(reason.to_string())
}
