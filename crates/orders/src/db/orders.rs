//! `PostgreSQL` order store.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::PgPool;

use bazaar_core::{OrderId, OrderStatus, UserId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use super::OrderStore;
use crate::models::{NewOrder, Order, OrderItem, OrderRow};

const ORDER_COLUMNS: &str =
    "id, user_id, status, total_amount, shipping_address, created_at, updated_at";
const ITEM_COLUMNS: &str = "id, order_id, product_id, quantity, price, subtotal";

/// Order store backed by `sales.orders` and `sales.order_items`.
#[derive(Debug, Clone)]
pub struct PgOrderStore {
    pool: PgPool,
}

impl PgOrderStore {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load the items of every given order and attach them.
    async fn with_items(&self, rows: Vec<OrderRow>) -> Result<Vec<Order>, RepositoryError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i32> = rows.iter().map(|row| row.id.as_i32()).collect();
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM sales.order_items WHERE order_id = ANY($1) ORDER BY id"
        ))
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;

        let mut by_order: HashMap<OrderId, Vec<OrderItem>> = HashMap::new();
        for item in items {
            by_order.entry(item.order_id).or_default().push(item);
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let items = by_order.remove(&row.id).unwrap_or_default();
                Order::from_parts(row, items)
            })
            .collect())
    }

    async fn items_of(&self, id: OrderId) -> Result<Vec<OrderItem>, RepositoryError> {
        let items = sqlx::query_as::<_, OrderItem>(&format!(
            "SELECT {ITEM_COLUMNS} FROM sales.order_items WHERE order_id = $1 ORDER BY id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }
}

#[async_trait]
impl OrderStore for PgOrderStore {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales.orders WHERE user_id = $1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        self.with_items(rows).await
    }

    async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            "SELECT {ORDER_COLUMNS} FROM sales.orders WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = self.items_of(id).await?;
        Ok(Order::from_parts(row, items))
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            INSERT INTO sales.orders (user_id, status, total_amount, shipping_address)
            VALUES ($1, $2, $3, $4)
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(order.user_id)
        .bind(order.status)
        .bind(order.total_amount)
        .bind(&order.shipping_address)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(order.items.len());
        for item in &order.items {
            let inserted = sqlx::query_as::<_, OrderItem>(&format!(
                r"
                INSERT INTO sales.order_items (order_id, product_id, quantity, price, subtotal)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING {ITEM_COLUMNS}
                "
            ))
            .bind(row.id)
            .bind(item.product_id)
            .bind(item.quantity)
            .bind(item.unit_price)
            .bind(item.subtotal)
            .fetch_one(&mut *tx)
            .await?;
            items.push(inserted);
        }

        tx.commit().await?;

        Ok(Order::from_parts(row, items))
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(&format!(
            r"
            UPDATE sales.orders
            SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "
        ))
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let items = self.items_of(id).await?;
        Ok(Order::from_parts(row, items))
    }
}

#[async_trait]
impl HealthCheck for PgOrderStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        HealthCheck::ping(&self.pool).await
    }
}
