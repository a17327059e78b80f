//! Business logic for the catalog service.

pub mod categories;
pub mod products;

pub use categories::CategoryService;
pub use products::ProductService;

use bazaar_web::{AppError, Result};

fn non_empty(field: &str, value: String) -> Result<String> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{field} cannot be empty")));
    }
    Ok(value)
}
