//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::CatalogClient;
use crate::config::StorefrontConfig;
use crate::storage::VisitorStore;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Holds no cart state: carts live in visitor
/// storage and are loaded per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: CatalogClient,
    storage: VisitorStore,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: StorefrontConfig) -> Self {
        let catalog = CatalogClient::new(&config.catalog);
        let storage = VisitorStore::new(&config.storage);

        Self {
            inner: Arc::new(AppStateInner {
                config,
                catalog,
                storage,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the catalog service client.
    #[must_use]
    pub fn catalog(&self) -> &CatalogClient {
        &self.inner.catalog
    }

    /// Get a reference to the visitor storage.
    #[must_use]
    pub fn storage(&self) -> &VisitorStore {
        &self.inner.storage
    }
}
