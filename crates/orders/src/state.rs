//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use bazaar_core::token::TokenService;
use bazaar_web::db::HealthCheck;

use crate::db::OrderStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    orders: Arc<dyn OrderStore>,
    health: Arc<dyn HealthCheck>,
    tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new<S>(store: S, tokens: Arc<TokenService>) -> Self
    where
        S: OrderStore + HealthCheck + 'static,
    {
        let store = Arc::new(store);
        Self {
            inner: Arc::new(AppStateInner {
                orders: store.clone(),
                health: store,
                tokens,
            }),
        }
    }

    #[must_use]
    pub fn orders(&self) -> &dyn OrderStore {
        self.inner.orders.as_ref()
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
