//! Page controller.
//!
//! One controller lives for one page load. It opens the visitor's cart
//! store, holds the catalog fetched for that page (empty on the cart page),
//! applies dispatched actions, and projects fresh views after each one.

use shopfront_core::{Cart, CartAction, CartStore, Catalog, CategoryFilter, KeyValueStorage};

use crate::views::{CartBadgeView, CartView, ProductGridView};

/// Binds a cart store and catalog to the views of a single page.
#[derive(Debug)]
pub struct PageController<S> {
    store: CartStore<S>,
    catalog: Catalog,
}

impl<S: KeyValueStorage> PageController<S> {
    /// Controller for a page that shows the product grid.
    pub fn catalog_page(storage: S, catalog: Catalog) -> Self {
        Self {
            store: CartStore::open(storage),
            catalog,
        }
    }

    /// Controller for the cart page, which fetches no catalog.
    pub fn cart_page(storage: S) -> Self {
        Self::catalog_page(storage, Catalog::default())
    }

    /// Apply one action. Returns whether the cart changed.
    ///
    /// `Add` needs the product in this page's catalog; on the cart page it
    /// is always a no-op.
    pub fn dispatch(&mut self, action: CartAction) -> bool {
        self.store.apply(action, &self.catalog)
    }

    pub const fn cart(&self) -> &Cart {
        self.store.cart()
    }

    pub const fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[must_use]
    pub fn product_grid(&self, filter: &CategoryFilter) -> ProductGridView {
        ProductGridView::render(&self.catalog, filter)
    }

    #[must_use]
    pub fn cart_badge(&self) -> CartBadgeView {
        CartBadgeView::from(self.cart())
    }

    #[must_use]
    pub fn cart_table(&self) -> CartView {
        CartView::from(self.cart())
    }
}
