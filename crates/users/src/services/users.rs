//! Principal management.

use bazaar_core::password::hash_password;
use bazaar_core::{Email, UserId};
use bazaar_web::{AppError, Result};

use crate::db::UserStore;
use crate::models::{CreateUserRequest, NewUser, User, UserChanges, UserPatch};

/// CRUD over principals.
pub struct UserService<'a> {
    store: &'a dyn UserStore,
}

impl<'a> UserService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn UserStore) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> Result<Vec<User>> {
        tracing::debug!("Listing users");
        Ok(self.store.list().await?)
    }

    /// # Errors
    ///
    /// `NotFound` if no principal has this id.
    pub async fn get(&self, id: UserId) -> Result<User> {
        Ok(self.store.get(id).await?)
    }

    /// Validate, hash the password and store a new principal.
    ///
    /// `status` overrides the request's own status flag when given.
    ///
    /// # Errors
    ///
    /// `ValidationError` for an empty user name or password or a malformed
    /// email, `ResourceAlreadyExists` if the email is taken.
    pub async fn create(&self, request: CreateUserRequest, status: Option<bool>) -> Result<User> {
        let email = Email::parse(&request.email)?;
        let user_name = match request.user_name {
            Some(name) => non_empty("userName", name)?,
            None => email.local_part().to_string(),
        };
        if request.password.is_empty() {
            return Err(AppError::Validation("password cannot be empty".to_string()));
        }

        let new_user = NewUser {
            user_name,
            email,
            first_name: request.first_name.unwrap_or_default(),
            last_name: request.last_name.unwrap_or_default(),
            status: status.or(request.status).unwrap_or(true),
            password_hash: hash_password(&request.password)?,
        };

        let user = self.store.create(new_user).await?;
        tracing::info!(user_id = %user.id, "Created user");
        Ok(user)
    }

    /// Apply an allow-listed partial update.
    ///
    /// # Errors
    ///
    /// `ValidationError` for invalid field values, `NotFound` if the
    /// principal does not exist, `ResourceAlreadyExists` on an email clash.
    pub async fn update(&self, id: UserId, patch: UserPatch) -> Result<User> {
        let changes = UserChanges {
            user_name: patch
                .user_name
                .map(|name| non_empty("userName", name))
                .transpose()?,
            email: patch.email.as_deref().map(Email::parse).transpose()?,
            first_name: patch.first_name,
            last_name: patch.last_name,
            status: patch.status,
            password_hash: match patch.password {
                Some(password) if password.is_empty() => {
                    return Err(AppError::Validation("password cannot be empty".to_string()));
                }
                Some(password) => Some(hash_password(&password)?),
                None => None,
            },
        };

        let user = self.store.update(id, changes).await?;
        tracing::info!(user_id = %user.id, "Updated user");
        Ok(user)
    }

    /// # Errors
    ///
    /// `NotFound` if no principal has this id.
    pub async fn delete(&self, id: UserId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(user_id = %id, "Deleted user");
        Ok(())
    }

    /// Create the bootstrap principal unless one with this email exists.
    ///
    /// Returns `true` if a principal was created.
    ///
    /// # Errors
    ///
    /// Propagates validation and store failures.
    pub async fn ensure_seed_user(&self, email: &str, password: &str) -> Result<bool> {
        let parsed = Email::parse(email)?;
        if self.store.get_by_email(&parsed).await?.is_some() {
            tracing::info!(email = %parsed, "Initial user already exists, skipping seed");
            return Ok(false);
        }

        self.create(
            CreateUserRequest {
                user_name: None,
                email: parsed.to_string(),
                password: password.to_string(),
                first_name: None,
                last_name: None,
                status: None,
            },
            Some(true),
        )
        .await?;
        Ok(true)
    }
}

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}
