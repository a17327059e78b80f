//! Order placement and lifecycle.

use bazaar_core::pricing::{NewOrderItem, price_items};
use bazaar_core::{OrderId, OrderStatus, UserId};
use bazaar_web::{AppError, Result};

use crate::db::OrderStore;
use crate::models::{CreateOrderRequest, NewOrder, Order};

/// Orders, scoped to the principal making the request.
pub struct OrderService<'a> {
    store: &'a dyn OrderStore,
}

impl<'a> OrderService<'a> {
    #[must_use]
    pub const fn new(store: &'a dyn OrderStore) -> Self {
        Self { store }
    }

    /// Price the requested items and store a new `pending` order.
    ///
    /// # Errors
    ///
    /// `ValidationError` for an empty item list, a non-positive quantity or
    /// price, a price with sub-cent precision, or an amount too large to
    /// store.
    pub async fn create(&self, user_id: UserId, request: CreateOrderRequest) -> Result<Order> {
        let requested: Vec<NewOrderItem> = request
            .items
            .iter()
            .map(|item| NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                price: item.price,
            })
            .collect();
        let priced = price_items(&requested)?;

        let order = self
            .store
            .create(NewOrder {
                user_id,
                status: OrderStatus::Pending,
                total_amount: priced.total,
                shipping_address: request.shipping_address,
                items: priced.items,
            })
            .await?;

        tracing::info!(
            order_id = %order.id,
            %user_id,
            total = %order.total_amount,
            items = order.items.len(),
            "Created order"
        );
        Ok(order)
    }

    /// # Errors
    ///
    /// Propagates store failures.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Order>> {
        Ok(self.store.list_by_user(user_id).await?)
    }

    /// # Errors
    ///
    /// `NotFound` if the order does not exist, `NotAuthorized` if it belongs
    /// to another principal.
    pub async fn get(&self, user_id: UserId, id: OrderId) -> Result<Order> {
        let order = self.store.get(id).await?;
        ensure_owner(&order, user_id)?;
        Ok(order)
    }

    /// Move an order to `status`. Any status may follow any other.
    ///
    /// The status is checked before the order is looked up, so an invalid
    /// status on a missing order is a `ValidationError`.
    ///
    /// # Errors
    ///
    /// `ValidationError` for an unknown status, `NotFound` if the order does
    /// not exist, `NotAuthorized` if it belongs to another principal.
    pub async fn update_status(&self, user_id: UserId, id: OrderId, status: &str) -> Result<Order> {
        let status = status
            .parse::<OrderStatus>()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        let current = self.store.get(id).await?;
        ensure_owner(&current, user_id)?;

        let order = self.store.update_status(id, status).await?;
        tracing::info!(order_id = %id, from = %current.status, to = %status, "Updated order status");
        Ok(order)
    }
}

fn ensure_owner(order: &Order, user_id: UserId) -> Result<()> {
    if order.user_id != user_id {
        tracing::warn!(order_id = %order.id, %user_id, "Order belongs to another user");
        return Err(AppError::NotAuthorized(format!(
            "order {} belongs to another user",
            order.id
        )));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;

    use bazaar_core::{ErrorKind, ProductId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::db::MemoryOrderStore;
    use crate::models::OrderItemRequest;

    fn item(product: i32, quantity: i32, price: &str) -> OrderItemRequest {
        OrderItemRequest {
            product_id: ProductId::new(product),
            quantity,
            price: Decimal::from_str(price).unwrap(),
        }
    }

    fn request(items: Vec<OrderItemRequest>) -> CreateOrderRequest {
        CreateOrderRequest {
            shipping_address: "1 Main St".to_string(),
            items,
        }
    }

    #[tokio::test]
    async fn test_create_prices_items_and_starts_pending() {
        let store = MemoryOrderStore::new();
        let service = OrderService::new(&store);

        let order = service
            .create(
                UserId::new(1),
                request(vec![item(10, 2, "10.00"), item(11, 1, "5.50")]),
            )
            .await
            .unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.total_amount, Decimal::from_str("25.50").unwrap());
        let sum: Decimal = order.items.iter().map(|i| i.subtotal).sum();
        assert_eq!(order.total_amount, sum);
        for item in &order.items {
            assert_eq!(item.subtotal, Decimal::from(item.quantity) * item.price);
        }
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_items() {
        let store = MemoryOrderStore::new();
        let service = OrderService::new(&store);

        for items in [
            vec![],
            vec![item(1, 0, "1.00")],
            vec![item(1, 1, "0")],
            vec![item(1, 1, "-3")],
        ] {
            let err = service.create(UserId::new(1), request(items)).await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::ValidationError);
        }
        assert!(service.list_for_user(UserId::new(1)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_orders_are_scoped_to_their_owner() {
        let store = MemoryOrderStore::new();
        let service = OrderService::new(&store);
        let order = service
            .create(UserId::new(1), request(vec![item(1, 1, "1.00")]))
            .await
            .unwrap();

        let err = service.get(UserId::new(2), order.id).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        let err = service
            .update_status(UserId::new(2), order.id, "paid")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotAuthorized);
        assert!(service.list_for_user(UserId::new(2)).await.unwrap().is_empty());
        assert_eq!(service.list_for_user(UserId::new(1)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_update_status_is_permissive_within_the_set() {
        let store = MemoryOrderStore::new();
        let service = OrderService::new(&store);
        let user = UserId::new(1);
        let order = service
            .create(user, request(vec![item(1, 1, "1.00")]))
            .await
            .unwrap();

        let delivered = service.update_status(user, order.id, "delivered").await.unwrap();
        assert_eq!(delivered.status, OrderStatus::Delivered);
        let pending = service.update_status(user, order.id, "pending").await.unwrap();
        assert_eq!(pending.status, OrderStatus::Pending);
        assert_eq!(pending.total_amount, order.total_amount);
    }

    #[tokio::test]
    async fn test_update_status_checks_status_before_lookup() {
        let store = MemoryOrderStore::new();
        let service = OrderService::new(&store);

        let err = service
            .update_status(UserId::new(1), OrderId::new(99), "refunded")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationError);

        let err = service
            .update_status(UserId::new(1), OrderId::new(99), "paid")
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}
