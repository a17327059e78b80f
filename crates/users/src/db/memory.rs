//! In-memory user store.
//!
//! Behaves like [`super::PgUserStore`] for everything the service relies on
//! (serial ids, unique emails, `NotFound` on missing rows) so that routers
//! can be exercised without a database.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bazaar_core::{Email, UserId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use super::UserStore;
use crate::models::{NewUser, User, UserChanges};

#[derive(Debug, Default)]
struct Table {
    last_id: i32,
    rows: BTreeMap<UserId, User>,
}

impl Table {
    fn email_taken(&self, email: &Email, except: Option<UserId>) -> bool {
        self.rows
            .values()
            .any(|user| &user.email == email && Some(user.id) != except)
    }
}

#[derive(Debug, Default)]
pub struct MemoryUserStore {
    table: RwLock<Table>,
}

impl MemoryUserStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.table.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .find(|user| &user.email == email)
            .cloned())
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let mut table = self.table.write().await;
        if table.email_taken(&user.email, None) {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }

        table.last_id += 1;
        let now = Utc::now();
        let created = User {
            id: UserId::new(table.last_id),
            user_name: user.user_name,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            status: user.status,
            password_hash: user.password_hash,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, RepositoryError> {
        let mut table = self.table.write().await;
        if let Some(email) = &changes.email
            && table.email_taken(email, Some(id))
        {
            return Err(RepositoryError::Conflict("users_email_key".to_string()));
        }

        let user = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if changes.is_empty() {
            return Ok(user.clone());
        }

        if let Some(user_name) = changes.user_name {
            user.user_name = user_name;
        }
        if let Some(email) = changes.email {
            user.email = email;
        }
        if let Some(first_name) = changes.first_name {
            user.first_name = first_name;
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = last_name;
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        if let Some(password_hash) = changes.password_hash {
            user.password_hash = password_hash;
        }
        user.updated_at = Utc::now();

        Ok(user.clone())
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        self.table
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl HealthCheck for MemoryUserStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
