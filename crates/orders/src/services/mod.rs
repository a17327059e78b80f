//! Business logic for the order service.

pub mod orders;

pub use orders::OrderService;
