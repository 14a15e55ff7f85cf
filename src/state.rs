//! Application state shared across handlers

use std::sync::Arc;

use crate::auth::AuthKeys;
use crate::config::PaginationConfig;
use crate::database::Store;

/// Cheap to clone; everything lives behind one `Arc`.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn Store>,
    keys: AuthKeys,
    pagination: PaginationConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, keys: AuthKeys, pagination: PaginationConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                keys,
                pagination,
            }),
        }
    }

    pub fn store(&self) -> &dyn Store {
        self.inner.store.as_ref()
    }

    pub fn keys(&self) -> &AuthKeys {
        &self.inner.keys
    }

    pub fn pagination(&self) -> &PaginationConfig {
        &self.inner.pagination
    }
}
