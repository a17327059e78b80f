//! Category management.

use bazaar_core::CategoryId;
use bazaar_web::Result;

use super::non_empty;
use crate::db::CategoryStore;
use crate::models::{Category, CategoryChanges, CategoryPatch, CreateCategoryRequest, NewCategory};

/// CRUD over categories.
pub struct CategoryService<'a> {
    store: &'a dyn CategoryStore,
}

impl<'a> CategoryService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn CategoryStore) -> Self {
        Self { store }
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> Result<Vec<Category>> {
        Ok(self.store.list().await?)
    }

    /// # Errors
    ///
    /// `NotFound` if no category has this id.
    pub async fn get(&self, id: CategoryId) -> Result<Category> {
        Ok(self.store.get(id).await?)
    }

    /// # Errors
    ///
    /// `ValidationError` for an empty name or slug, `ResourceAlreadyExists`
    /// if the slug is taken.
    pub async fn create(&self, request: CreateCategoryRequest) -> Result<Category> {
        let category = NewCategory {
            name: non_empty("name", request.name)?,
            slug: non_empty("slug", request.slug)?,
            description: request.description,
        };

        let category = self.store.create(category).await?;
        tracing::info!(category_id = %category.id, slug = %category.slug, "Created category");
        Ok(category)
    }

    /// # Errors
    ///
    /// `ValidationError` for an empty name or slug, `NotFound` if the
    /// category does not exist, `ResourceAlreadyExists` on a slug clash.
    pub async fn update(&self, id: CategoryId, patch: CategoryPatch) -> Result<Category> {
        let changes = CategoryChanges {
            name: patch.name.map(|name| non_empty("name", name)).transpose()?,
            slug: patch.slug.map(|slug| non_empty("slug", slug)).transpose()?,
            description: patch.description,
        };

        let category = self.store.update(id, changes).await?;
        tracing::info!(category_id = %category.id, "Updated category");
        Ok(category)
    }

    /// # Errors
    ///
    /// `NotFound` if no category has this id.
    pub async fn delete(&self, id: CategoryId) -> Result<()> {
        self.store.delete(id).await?;
        tracing::info!(category_id = %id, "Deleted category");
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::ErrorKind;

    use super::*;
    use crate::db::MemoryCatalogStore;

    fn request(slug: &str) -> CreateCategoryRequest {
        CreateCategoryRequest {
            name: "Shoes".to_string(),
            slug: slug.to_string(),
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn test_blank_fields_are_rejected() {
        let store = MemoryCatalogStore::new();
        let service = CategoryService::new(&store);

        let err = service.create(request(" ")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let mut nameless = request("shoes");
        nameless.name = String::new();
        let err = service.create(nameless).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_duplicate_slug_conflicts() {
        let store = MemoryCatalogStore::new();
        let service = CategoryService::new(&store);

        service.create(request("shoes")).await.unwrap();
        let err = service.create(request("shoes")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ResourceAlreadyExists);
    }

    #[tokio::test]
    async fn test_update_keeps_unpatched_fields() {
        let store = MemoryCatalogStore::new();
        let service = CategoryService::new(&store);
        let category = service.create(request("shoes")).await.unwrap();

        let updated = service
            .update(
                category.id,
                CategoryPatch {
                    description: Some("Footwear".to_string()),
                    ..CategoryPatch::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.description, "Footwear");
        assert_eq!(updated.slug, "shoes");
        assert_eq!(updated.name, "Shoes");

        let err = service
            .update(
                category.id,
                CategoryPatch {
                    slug: Some(String::new()),
                    ..CategoryPatch::default()
                },
            )
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let store = MemoryCatalogStore::new();
        let service = CategoryService::new(&store);

        let err = service.delete(CategoryId::new(7)).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
