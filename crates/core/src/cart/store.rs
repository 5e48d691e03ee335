//! Write-through cart store.

use crate::cart::{Cart, CartAction};
use crate::catalog::Catalog;
use crate::storage::{self, KeyValueStorage};
use crate::types::{Price, ProductId};

/// The authoritative cart for one page session.
///
/// Opened from the persisted snapshot and written back to storage after
/// every operation that changes the cart, before the operation returns. Once
/// a call returns, the snapshot in storage matches [`CartStore::cart`].
#[derive(Debug)]
pub struct CartStore<S> {
    cart: Cart,
    storage: S,
}

impl<S: KeyValueStorage> CartStore<S> {
    /// Load the cart persisted in `storage`, or start empty.
    pub fn open(storage: S) -> Self {
        let cart = storage::load(&storage);
        Self { cart, storage }
    }

    /// Current cart contents.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Add one unit of catalog product `id`. No-op if it is not in `catalog`.
    pub fn add_item(&mut self, catalog: &Catalog, id: ProductId) -> bool {
        self.write_through(|cart| cart.add_item(catalog, id))
    }

    pub fn increment_quantity(&mut self, id: ProductId) -> bool {
        self.write_through(|cart| cart.increment_quantity(id))
    }

    /// Lower the quantity of line `id`, removing it when it would reach zero.
    pub fn decrement_quantity(&mut self, id: ProductId) -> bool {
        self.write_through(|cart| cart.decrement_quantity(id))
    }

    pub fn remove_item(&mut self, id: ProductId) -> bool {
        self.write_through(|cart| cart.remove_item(id))
    }

    /// Apply a user action and persist the result.
    pub fn apply(&mut self, action: CartAction, catalog: &Catalog) -> bool {
        let changed = self.write_through(|cart| cart.apply(action, catalog));
        tracing::debug!(?action, changed, items = self.total_item_count(), "cart action");
        changed
    }

    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.cart.total_item_count()
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.cart.subtotal()
    }

    fn write_through(&mut self, mutate: impl FnOnce(&mut Cart) -> bool) -> bool {
        let changed = mutate(&mut self.cart);
        if changed {
            self.persist();
        }
        changed
    }

    fn persist(&self) {
        if let Err(e) = storage::save(&self.storage, &self.cart) {
            tracing::error!(error = %e, "failed to write cart snapshot");
        }
    }
}
