//! Bazaar Web - HTTP plumbing shared by every Bazaar service.
//!
//! The services differ only in their routes, stores and business rules.
//! Everything around those lives here:
//!
//! - [`error`] - `AppError`, the single place failures become responses
//! - [`auth`] - Bearer access-token extractor
//! - [`extract`] - JSON body and path extractors that reject with `AppError`
//! - [`config`] - Environment loading and secret validation
//! - [`db`] - Pool creation and repository error classification
//! - [`telemetry`] - Tracing subscriber and Sentry setup
//! - [`middleware`] - Request ids, trace spans and Sentry layers
//! - [`server`] - Health routes, serving and graceful shutdown

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod server;
pub mod telemetry;

pub use auth::RequireAuth;
pub use error::{AppError, Result};
pub use extract::{JsonBody, PathParam};
pub use response::Deleted;
