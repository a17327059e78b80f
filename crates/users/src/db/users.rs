//! `PostgreSQL` user store.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};

use bazaar_core::{Email, UserId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use super::UserStore;
use crate::models::{NewUser, User, UserChanges};

const USER_COLUMNS: &str = "id, user_name, email, first_name, last_name, status, password_hash, \
                            created_at, updated_at";

/// User store backed by `identity.users`.
#[derive(Debug, Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM identity.users ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn get(&self, id: UserId) -> Result<User, RepositoryError> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM identity.users WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM identity.users WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let created = sqlx::query_as::<_, User>(&format!(
            r"
            INSERT INTO identity.users
                (user_name, email, first_name, last_name, status, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {USER_COLUMNS}
            "
        ))
        .bind(&user.user_name)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.status)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, RepositoryError> {
        if changes.is_empty() {
            return self.get(id).await;
        }

        let mut query = QueryBuilder::<Postgres>::new("UPDATE identity.users SET updated_at = now()");
        if let Some(user_name) = changes.user_name {
            query.push(", user_name = ").push_bind(user_name);
        }
        if let Some(email) = changes.email {
            query.push(", email = ").push_bind(email);
        }
        if let Some(first_name) = changes.first_name {
            query.push(", first_name = ").push_bind(first_name);
        }
        if let Some(last_name) = changes.last_name {
            query.push(", last_name = ").push_bind(last_name);
        }
        if let Some(status) = changes.status {
            query.push(", status = ").push_bind(status);
        }
        if let Some(password_hash) = changes.password_hash {
            query.push(", password_hash = ").push_bind(password_hash);
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(USER_COLUMNS);

        query
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM identity.users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

#[async_trait]
impl HealthCheck for PgUserStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        HealthCheck::ping(&self.pool).await
    }
}
