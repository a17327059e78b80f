//! Persistence for principals.
//!
//! # Schema: `identity`
//!
//! - `users` - principals, unique on `email`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/users/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate users
//! ```

pub mod memory;
pub mod users;

use async_trait::async_trait;

use bazaar_core::{Email, UserId};
use bazaar_web::db::RepositoryError;

use crate::models::{NewUser, User, UserChanges};

pub use memory::MemoryUserStore;
pub use users::PgUserStore;

/// Storage port for principals.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// All principals, ordered by id.
    async fn list(&self) -> Result<Vec<User>, RepositoryError>;

    /// Fails with `NotFound` if no principal has this id.
    async fn get(&self, id: UserId) -> Result<User, RepositoryError>;

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError>;

    /// Fails with `Conflict` if the email is taken.
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError>;

    /// Apply `changes` and return the updated row.
    async fn update(&self, id: UserId, changes: UserChanges) -> Result<User, RepositoryError>;

    async fn delete(&self, id: UserId) -> Result<(), RepositoryError>;
}
