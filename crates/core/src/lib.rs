//! Bazaar Core - Shared domain library.
//!
//! This crate provides the pieces every Bazaar service agrees on:
//! - `users` - Principals, registration, login and token refresh
//! - `catalog` - Categories and products
//! - `orders` - Orders and their line items
//! - `gateway` - Path-prefix reverse proxy in front of the three services
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP clients. Token signing and password hashing live here because
//! they are pure functions of their inputs (plus the wall clock for issuance).
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, emails and order statuses
//! - [`error`] - The closed error taxonomy shared by every service boundary
//! - [`token`] - Access/refresh token issuance and verification
//! - [`password`] - Argon2id password hashing
//! - [`pricing`] - Order line-item and total computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod password;
pub mod pricing;
pub mod token;
pub mod types;

pub use error::ErrorKind;
pub use types::*;
