//! Persistence for the catalog.
//!
//! # Schema: `catalog`
//!
//! - `categories` - unique on `slug`
//! - `products` - unique on `sku`, `category_id` references `categories`
//!
//! # Migrations
//!
//! Migrations are stored in `crates/catalog/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate catalog
//! ```

pub mod categories;
pub mod memory;
pub mod products;

use async_trait::async_trait;
use sqlx::PgPool;

use bazaar_core::{CategoryId, ProductId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use crate::models::{
    Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges,
};

pub use memory::MemoryCatalogStore;

/// Storage port for categories.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError>;

    /// Fails with `NotFound` if no category has this id.
    async fn get(&self, id: CategoryId) -> Result<Category, RepositoryError>;

    /// Fails with `Conflict` if the slug is taken.
    async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError>;

    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Category, RepositoryError>;

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError>;
}

/// Storage port for products.
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Active products, ordered by id.
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError>;

    /// Active products of one category, ordered by id.
    async fn list_active_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError>;

    /// Fails with `NotFound` if no product has this id. Inactive products
    /// are still returned.
    async fn get(&self, id: ProductId) -> Result<Product, RepositoryError>;

    /// Fails with `Conflict` if the SKU is taken.
    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError>;

    async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError>;

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError>;
}

/// Catalog store backed by the `catalog` schema.
#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: PgPool,
}

impl PgCatalogStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl HealthCheck for PgCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        HealthCheck::ping(&self.pool).await
    }
}
