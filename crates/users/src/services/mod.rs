//! Business logic for the user service.

pub mod auth;
pub mod users;

pub use auth::{AuthService, AuthTokens};
pub use users::UserService;
