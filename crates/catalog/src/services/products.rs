//! Product management.

use rust_decimal::Decimal;

use bazaar_core::pricing::is_storable_amount;
use bazaar_core::{CategoryId, ProductId};
use bazaar_web::db::RepositoryError;
use bazaar_web::{AppError, Result};

use super::non_empty;
use crate::db::{CategoryStore, ProductStore};
use crate::models::{CreateProductRequest, NewProduct, Product, ProductChanges, ProductPatch};

/// CRUD over products.
///
/// Category references are checked against the category store before a
/// write so that a dangling `categoryId` is a validation failure rather
/// than a foreign-key error from the database.
pub struct ProductService<'a> {
    products: &'a dyn ProductStore,
    categories: &'a dyn CategoryStore,
}

impl<'a> ProductService<'a> {
    #[must_use]
    pub const fn new(products: &'a dyn ProductStore, categories: &'a dyn CategoryStore) -> Self {
        Self {
            products,
            categories,
        }
    }

    /// Active products only.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list(&self) -> Result<Vec<Product>> {
        Ok(self.products.list_active().await?)
    }

    /// Active products of one category.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Product>> {
        Ok(self.products.list_active_by_category(category_id).await?)
    }

    /// # Errors
    ///
    /// `NotFound` if no product has this id.
    pub async fn get(&self, id: ProductId) -> Result<Product> {
        Ok(self.products.get(id).await?)
    }

    /// # Errors
    ///
    /// `ValidationError` for an empty name or SKU, a negative price or stock
    /// or an unknown category; `ResourceAlreadyExists` if the SKU is taken.
    pub async fn create(&self, request: CreateProductRequest) -> Result<Product> {
        let product = NewProduct {
            name: non_empty("name", request.name)?,
            description: request.description,
            sku: non_empty("sku", request.sku)?,
            price: non_negative_price(request.price)?,
            stock: non_negative_stock(request.stock)?,
            category_id: request.category_id,
            image_url: request.image_url,
            is_active: request.is_active.unwrap_or(true),
        };
        self.ensure_category(product.category_id).await?;

        let product = self.products.create(product).await?;
        tracing::info!(product_id = %product.id, sku = %product.sku, "Created product");
        Ok(product)
    }

    /// Apply an allow-listed partial update.
    ///
    /// # Errors
    ///
    /// Same validation as [`Self::create`] for the fields present,
    /// `NotFound` if the product does not exist.
    pub async fn update(&self, id: ProductId, patch: ProductPatch) -> Result<Product> {
        let changes = ProductChanges {
            name: patch.name.map(|name| non_empty("name", name)).transpose()?,
            description: patch.description,
            sku: patch.sku.map(|sku| non_empty("sku", sku)).transpose()?,
            price: patch.price.map(non_negative_price).transpose()?,
            stock: patch.stock.map(non_negative_stock).transpose()?,
            category_id: patch.category_id,
            image_url: patch.image_url,
            is_active: patch.is_active,
        };
        if let Some(category_id) = changes.category_id {
            self.ensure_category(category_id).await?;
        }

        let product = self.products.update(id, changes).await?;
        tracing::info!(product_id = %product.id, "Updated product");
        Ok(product)
    }

    /// Hard delete.
    ///
    /// # Errors
    ///
    /// `NotFound` if no product has this id.
    pub async fn delete(&self, id: ProductId) -> Result<()> {
        self.products.delete(id).await?;
        tracing::info!(product_id = %id, "Deleted product");
        Ok(())
    }

    async fn ensure_category(&self, id: CategoryId) -> Result<()> {
        match self.categories.get(id).await {
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound) => Err(AppError::Validation(format!(
                "categoryId {id} does not exist"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

fn non_negative_price(price: Decimal) -> Result<Decimal> {
    if price < Decimal::ZERO {
        return Err(AppError::Validation("price cannot be negative".to_string()));
    }
    if !is_storable_amount(price) {
        return Err(AppError::Validation(format!(
            "price {price} needs at most two decimal places and at most 9999999999.99"
        )));
    }
    Ok(price)
}

fn non_negative_stock(stock: i32) -> Result<i32> {
    if stock < 0 {
        return Err(AppError::Validation("stock cannot be negative".to_string()));
    }
    Ok(stock)
}
