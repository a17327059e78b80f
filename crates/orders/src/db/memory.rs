//! In-memory order store for router tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::RwLock;

use bazaar_core::pricing::is_storable_amount;
use bazaar_core::{OrderId, OrderItemId, OrderStatus, UserId};
use bazaar_web::db::{HealthCheck, RepositoryError};

use super::OrderStore;
use crate::models::{NewOrder, Order, OrderItem};

#[derive(Debug, Default)]
struct Table {
    last_order_id: i32,
    last_item_id: i32,
    rows: BTreeMap<OrderId, Order>,
}

#[derive(Debug, Default)]
pub struct MemoryOrderStore {
    table: RwLock<Table>,
}

impl MemoryOrderStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for MemoryOrderStore {
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        Ok(self
            .table
            .read()
            .await
            .rows
            .values()
            .filter(|order| order.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn get(&self, id: OrderId) -> Result<Order, RepositoryError> {
        self.table
            .read()
            .await
            .rows
            .get(&id)
            .cloned()
            .ok_or(RepositoryError::NotFound)
    }

    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        // Same limits as the NUMERIC(12,2) columns and their checks.
        let amounts = order
            .items
            .iter()
            .flat_map(|item| [item.unit_price, item.subtotal])
            .chain([order.total_amount]);
        for amount in amounts {
            if !is_storable_amount(amount) {
                return Err(RepositoryError::DataCorruption(format!(
                    "amount {amount} does not fit NUMERIC(12,2)"
                )));
            }
        }
        if order.items.iter().any(|item| item.unit_price <= Decimal::ZERO) {
            return Err(RepositoryError::DataCorruption(
                "order item price must be positive".to_string(),
            ));
        }

        let mut table = self.table.write().await;

        table.last_order_id += 1;
        let id = OrderId::new(table.last_order_id);

        let mut items = Vec::with_capacity(order.items.len());
        for item in order.items {
            table.last_item_id += 1;
            items.push(OrderItem {
                id: OrderItemId::new(table.last_item_id),
                order_id: id,
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.unit_price,
                subtotal: item.subtotal,
            });
        }

        let now = Utc::now();
        let created = Order {
            id,
            user_id: order.user_id,
            status: order.status,
            total_amount: order.total_amount,
            shipping_address: order.shipping_address,
            items,
            created_at: now,
            updated_at: now,
        };
        table.rows.insert(id, created.clone());

        Ok(created)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError> {
        let mut table = self.table.write().await;
        let order = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound)?;
        order.status = status;
        order.updated_at = Utc::now();

        Ok(order.clone())
    }
}

#[async_trait]
impl HealthCheck for MemoryOrderStore {
    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use bazaar_core::ProductId;
    use bazaar_core::pricing::PricedItem;

    use super::*;

    fn order(price: Decimal, total: Decimal) -> NewOrder {
        NewOrder {
            user_id: UserId::new(1),
            status: OrderStatus::Pending,
            total_amount: total,
            shipping_address: String::new(),
            items: vec![PricedItem {
                product_id: ProductId::new(1),
                quantity: 1,
                unit_price: price,
                subtotal: price,
            }],
        }
    }

    #[tokio::test]
    async fn test_create_rejects_amounts_the_columns_cannot_hold() {
        let store = MemoryOrderStore::new();

        let sub_cent = Decimal::new(5, 3);
        let err = store.create(order(sub_cent, sub_cent)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));

        let huge = Decimal::new(99_999_999_999, 0);
        let err = store.create(order(huge, huge)).await.unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));

        let err = store
            .create(order(Decimal::ZERO, Decimal::ZERO))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::DataCorruption(_)));

        let ok = Decimal::new(1999, 2);
        let created = store.create(order(ok, ok)).await.unwrap();
        assert_eq!(created.id, OrderId::new(1));
    }
}
