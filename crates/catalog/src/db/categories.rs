//! Category queries.

use async_trait::async_trait;
use sqlx::{Postgres, QueryBuilder};

use bazaar_core::CategoryId;
use bazaar_web::db::RepositoryError;

use super::{CategoryStore, PgCatalogStore};
use crate::models::{Category, CategoryChanges, NewCategory};

const CATEGORY_COLUMNS: &str = "id, name, slug, description, created_at, updated_at";

#[async_trait]
impl CategoryStore for PgCatalogStore {
    async fn list(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM catalog.categories ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(categories)
    }

    async fn get(&self, id: CategoryId) -> Result<Category, RepositoryError> {
        sqlx::query_as::<_, Category>(&format!(
            "SELECT {CATEGORY_COLUMNS} FROM catalog.categories WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, category: NewCategory) -> Result<Category, RepositoryError> {
        let created = sqlx::query_as::<_, Category>(&format!(
            r"
            INSERT INTO catalog.categories (name, slug, description)
            VALUES ($1, $2, $3)
            RETURNING {CATEGORY_COLUMNS}
            "
        ))
        .bind(&category.name)
        .bind(&category.slug)
        .bind(&category.description)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn update(
        &self,
        id: CategoryId,
        changes: CategoryChanges,
    ) -> Result<Category, RepositoryError> {
        if changes.is_empty() {
            return CategoryStore::get(self, id).await;
        }

        let mut query =
            QueryBuilder::<Postgres>::new("UPDATE catalog.categories SET updated_at = now()");
        if let Some(name) = changes.name {
            query.push(", name = ").push_bind(name);
        }
        if let Some(slug) = changes.slug {
            query.push(", slug = ").push_bind(slug);
        }
        if let Some(description) = changes.description {
            query.push(", description = ").push_bind(description);
        }
        query
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" RETURNING ")
            .push(CATEGORY_COLUMNS);

        query
            .build_query_as::<Category>()
            .fetch_optional(&self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.categories WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
