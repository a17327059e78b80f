//! Persistence for orders.
//!
//! # Schema: `sales`
//!
//! - `orders` - order headers with the derived total
//! - `order_items` - line items with the unit price snapshot
//!
//! # Migrations
//!
//! Migrations are stored in `crates/orders/migrations/` and run via:
//! ```bash
//! cargo run -p bazaar-cli -- migrate orders
//! ```

pub mod memory;
pub mod orders;

use async_trait::async_trait;

use bazaar_core::{OrderId, OrderStatus, UserId};
use bazaar_web::db::RepositoryError;

use crate::models::{NewOrder, Order};

pub use memory::MemoryOrderStore;
pub use orders::PgOrderStore;

/// Storage port for orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Orders placed by `user_id`, oldest first, items included.
    async fn list_by_user(&self, user_id: UserId) -> Result<Vec<Order>, RepositoryError>;

    /// Fails with `NotFound` if no order has this id.
    async fn get(&self, id: OrderId) -> Result<Order, RepositoryError>;

    /// Write the order and all of its items atomically.
    async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError>;

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, RepositoryError>;
}
