//! Order domain models.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use bazaar_core::pricing::PricedItem;
use bazaar_core::{OrderId, OrderItemId, OrderStatus, ProductId, UserId};

/// An order with its line items.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub items: Vec<OrderItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Assemble an order from its header row and its items.
    #[must_use]
    pub fn from_parts(row: OrderRow, items: Vec<OrderItem>) -> Self {
        Self {
            id: row.id,
            user_id: row.user_id,
            status: row.status,
            total_amount: row.total_amount,
            shipping_address: row.shipping_address,
            items,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// A row of `sales.orders`.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OrderRow {
    pub id: OrderId,
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A row of `sales.order_items`. `price` is the unit price at order time.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: OrderItemId,
    #[serde(skip)]
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
    pub subtotal: Decimal,
}

/// A priced order ready to be written.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub user_id: UserId,
    pub status: OrderStatus,
    pub total_amount: Decimal,
    pub shipping_address: String,
    pub items: Vec<PricedItem>,
}

/// Body of `POST /v1/order/`.
///
/// Only the items and the shipping address are read. A client-supplied
/// status or total is ignored.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub shipping_address: String,
    pub items: Vec<OrderItemRequest>,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct OrderItemRequest {
    pub product_id: ProductId,
    pub quantity: i32,
    pub price: Decimal,
}

/// Body of `PUT /v1/order/{id}/status`.
///
/// The status stays a plain string here so that an unknown value is reported
/// as a validation failure by the service rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateStatusRequest {
    pub status: String,
}
