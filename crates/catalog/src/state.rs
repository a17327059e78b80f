//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use bazaar_core::token::TokenService;
use bazaar_web::db::HealthCheck;

use crate::db::{CategoryStore, ProductStore};

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    categories: Arc<dyn CategoryStore>,
    products: Arc<dyn ProductStore>,
    health: Arc<dyn HealthCheck>,
    tokens: Arc<TokenService>,
}

impl AppState {
    /// Create a new application state over a store holding both tables.
    pub fn new<S>(store: S, tokens: Arc<TokenService>) -> Self
    where
        S: CategoryStore + ProductStore + HealthCheck + 'static,
    {
        let store = Arc::new(store);
        Self {
            inner: Arc::new(AppStateInner {
                categories: store.clone(),
                products: store.clone(),
                health: store,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &dyn CategoryStore {
        self.inner.categories.as_ref()
    }

    #[must_use]
    pub fn products(&self) -> &dyn ProductStore {
        self.inner.products.as_ref()
    }
}

impl FromRef<AppState> for Arc<TokenService> {
    fn from_ref(state: &AppState) -> Self {
        state.inner.tokens.clone()
    }
}

impl FromRef<AppState> for Arc<dyn HealthCheck> {
    fn from_ref(state: &AppState) -> Self {
        state.inner.health.clone()
    }
}
