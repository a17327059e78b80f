//! Application state shared across handlers.

use std::sync::Arc;

use axum::extract::FromRef;
use bazaar_core::token::TokenService;
use bazaar_web::db::HealthCheck;

use crate::db::UserStore;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    users: Arc<dyn UserStore>,
    health: Arc<dyn HealthCheck>,
    tokens: Arc<TokenService>,
}

impl AppState {
    /// Create a new application state over any user store.
    pub fn new<S>(store: S, tokens: Arc<TokenService>) -> Self
    where
        S: UserStore + HealthCheck + 'static,
    {
        let store = Arc::new(store);
        Self {
            inner: Arc::new(AppStateInner {
                users: store.clone(),
                health: store,
                tokens,
            }),
        }
    }

    /// Get a reference to the user store.
    #[must_use]
    pub fn users(&self) -> &dyn UserStore {
        self.inner.users.as_ref()
    }

    /// Get a reference to the token service.
    #[must_use]
    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
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
