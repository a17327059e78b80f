//! In-memory catalog store for router tests.
//!
//! Enforces the unique slug and SKU constraints under the same constraint
//! names as the migration, so conflicts surface exactly as they do against
//! `PostgreSQL`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use bazaar_core::{CategoryId, ProductId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use super::{CategoryStore, ProductStore};
use crate::models::{
    Category, CategoryChanges, NewCategory, NewProduct, Product, ProductChanges,
};

#[derive(Debug)]
struct Table<K, V> {
    last_id: i32,
    rows: BTreeMap<K, V>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            last_id: 0,
            rows: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    categories: RwLock<Table<CategoryId, Category>>,
    products: RwLock<Table<ProductId, Product>>,
}

impl MemoryCatalogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_conflict() -> RepositoryError {
    RepositoryError::Conflict("categories_slug_key".to_string())
}

fn sku_conflict() -> RepositoryError {
    RepositoryError::Conflict("products_sku_key".to_string())
}

#[async_trait]
impl CategoryStore for MemoryCatalogStore {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        Ok(self.categories.read().await.rows.values().cloned().collect())
    }

    async fn get(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        self.categories
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let mut table = self.categories.write().await;
        if table.rows.values().any(|c| c.slug == category.slug) {
            return Err(slug_conflict());
        }

        table.last_id += 1;
        let now = Utc::now();
        let created = Category {
            id: CategoryId::new(table.last_id),
            name: category.name,
            slug: category.slug,
            description: category.description,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Category, RepositoryError> {
        let mut table = self.categories.write().await;
        if let Some(slug) = &changes.slug
            && table.rows.values().any(|c| &c.slug == slug && c.id != id)
        {
            return Err(slug_conflict());
        }

        let category = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if changes.is_empty() {
            return Ok(category.clone());
        }

        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(slug) = changes.slug {
            category.slug = slug;
        }
        if let Some(description) = changes.description {
            category.description = description;
        }
        category.updated_at = Utc::now();

        Ok(category.clone())
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        self.categories
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl ProductStore for MemoryCatalogStore {
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .products
            .read()
            .await
            .rows
            .values()
            .filter(|p| p.is_active)
            .cloned()
            .collect())
    }

    async fn list_active_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        Ok(self
            .products
            .read()
            .await
            .rows
            .values()
            .filter(|p| p.is_active && p.category_id == category_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        self.products
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let mut table = self.products.write().await;
        if table.rows.values().any(|p| p.sku == product.sku) {
            return Err(sku_conflict());
        }

        table.last_id += 1;
        let now = Utc::now();
        let created = Product {
            id: ProductId::new(table.last_id),
            name: product.name,
            description: product.description,
            sku: product.sku,
            price: product.price,
            stock: product.stock,
            category_id: product.category_id,
            image_url: product.image_url,
            is_active: product.is_active,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(created.id, created.clone());

        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut table = self.products.write().await;
        if let Some(sku) = &changes.sku
            && table.rows.values().any(|p| &p.sku == sku && p.id != id)
        {
            return Err(sku_conflict());
        }

        let product = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        if changes.is_empty() {
            return Ok(product.clone());
        }

        if let Some(name) = changes.name {
            product.name = name;
        }
        if let Some(description) = changes.description {
            product.description = description;
        }
        if let Some(sku) = changes.sku {
            product.sku = sku;
        }
        if let Some(price) = changes.price {
            product.price = price;
        }
        if let Some(stock) = changes.stock {
            product.stock = stock;
        }
        if let Some(category_id) = changes.category_id {
            product.category_id = category_id;
        }
        if let Some(image_url) = changes.image_url {
            product.image_url = image_url;
        }
        if let Some(is_active) = changes.is_active {
            product.is_active = is_active;
        }
        product.updated_at = Utc::now();

        Ok(product.clone())
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        self.products
            .write()
            .await
            .rows
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }
}

#[async_trait]
impl HealthCheck for MemoryCatalogStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}
