//! Product queries.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use bazaar_core::{CategoryId, ProductId};
use bazaar_web::db::RepositoryError;

use super::{PgCatalogStore, ProductStore};
use crate::models::{NewProduct, Product, ProductChanges};

const PRODUCT_COLUMNS: &str = "id, name, description, sku, price, stock, category_id, image_url, \
                               is_active, created_at, updated_at";

#[async_trait]
impl ProductStore for PgCatalogStore {
    async fn list_active(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.products WHERE is_active ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn list_active_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            r"
            SELECT {PRODUCT_COLUMNS}
            FROM catalog.products
            WHERE category_id = $1 AND is_active
            ORDER BY id
            "
        ))
        .bind(category_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }

    async fn get(&self, id: ProductId) -> Result<Product, RepositoryError> {
        sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM catalog.products WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, product: NewProduct) -> Result<Product, RepositoryError> {
        let created = sqlx::query_as::<_, Product>(&format!(
            r"
            INSERT INTO catalog.products
                (name, description, sku, price, stock, category_id, image_url, is_active)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {PRODUCT_COLUMNS}
            "
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(&product.sku)
        .bind(product.price)
        .bind(product.stock)
        .bind(product.category_id)
        .bind(&product.image_url)
        .bind(product.is_active)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: ProductId,
        changes: ProductChanges,
    ) -> Result<Product, RepositoryError> {
        if changes.is_empty() {
            return ProductStore::get(self, id).await;
        }

        let mut query =
            QueryBuilder::<Postgres>::new("UPDATE catalog.products SET updated_at = now()");
        if let Some(name) = changes.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(description) = changes.description {
            query.push(", description = ").push_bind(description);
        }
        if let Some(sku) = changes.sku {
            query.push(", sku = ").push_bind(sku);
        }
        if let Some(price) = changes.price {
            query.push(", price = ").push_bind(price);
        }
        if let Some(stock) = changes.stock {
            query.push(", stock = ").push_bind(stock);
        }
        if let Some(category_id) = changes.category_id {
            query.push(", category_id = ").push_bind(category_id);
        }
        if let Some(image_url) = changes.image_url {
            query.push(", image_url = ").push_bind(image_url);
        }
        if let Some(is_active) = changes.is_active {
            query.push(", is_active = ").push_bind(is_active);
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(PRODUCT_COLUMNS);

        query
            .build_query_as::<Product>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: ProductId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
