//! Cart lines and the cart value.
//!
//! [`Cart`] is a plain value: an insertion-ordered list of lines with at most
//! one line per product and every quantity at least 1. [`CartStore`] wraps a
//! cart together with the storage it is written through to.

mod store;

pub use store::CartStore;

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::types::{Price, Product, ProductId};

/// One product in the cart with its aggregated quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    /// Id of the product this line holds.
    pub id: ProductId,
    #[serde(default)]
    pub title: String,
    /// Unit price captured when the line was created.
    pub price: Price,
    #[serde(default)]
    pub image: String,
    pub quantity: u32,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn from_product(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity: 1,
        }
    }

    /// Unit price times quantity, at full precision.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// A user action against the cart, carrying the id of the element it came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartAction {
    /// "Add to Cart" on a product card.
    Add(ProductId),
    /// "+" on a cart row.
    Increment(ProductId),
    /// "-" on a cart row.
    Decrement(ProductId),
    /// Delete on a cart row.
    Remove(ProductId),
}

impl CartAction {
    /// Id of the product or cart line the action targets.
    #[must_use]
    pub const fn product_id(&self) -> ProductId {
        match *self {
            Self::Add(id) | Self::Increment(id) | Self::Decrement(id) | Self::Remove(id) => id,
        }
    }
}

/// Ordered cart lines.
///
/// Lines stay in the order they were first added. Operations on ids that are
/// not present are silent no-ops; each mutating method reports whether the
/// cart changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Build a cart from lines of unknown provenance.
    ///
    /// Lines with quantity 0 are dropped. Repeated ids are folded into the
    /// first occurrence, summing quantities, so the result always satisfies
    /// the cart invariants.
    #[must_use]
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();
        for line in lines {
            if line.quantity == 0 {
                continue;
            }
            match cart.line_mut(line.id) {
                Some(existing) => {
                    existing.quantity = existing.quantity.saturating_add(line.quantity);
                }
                None => cart.lines.push(line),
            }
        }
        cart
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// The line for `id`, if present.
    #[must_use]
    pub fn get(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    fn line_mut(&mut self, id: ProductId) -> Option<&mut CartLine> {
        self.lines.iter_mut().find(|line| line.id == id)
    }

    /// Add one unit of `product`, merging into its existing line.
    ///
    /// Returns false only when the existing line is already at `u32::MAX`.
    pub fn add_product(&mut self, product: &Product) -> bool {
        let Some(line) = self.line_mut(product.id) else {
            self.lines.push(CartLine::from_product(product));
            return true;
        };
        match line.quantity.checked_add(1) {
            Some(quantity) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Add one unit of the catalog product `id`.
    ///
    /// No-op if the catalog has no such product or its line is at `u32::MAX`.
    pub fn add_item(&mut self, catalog: &Catalog, id: ProductId) -> bool {
        catalog
            .find(id)
            .is_some_and(|product| self.add_product(product))
    }

    /// Raise the quantity of line `id` by one.
    pub fn increment_quantity(&mut self, id: ProductId) -> bool {
        let Some(line) = self.line_mut(id) else {
            return false;
        };
        match line.quantity.checked_add(1) {
            Some(quantity) => {
                line.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Lower the quantity of line `id` by one, removing the line at zero.
    pub fn decrement_quantity(&mut self, id: ProductId) -> bool {
        let Some(line) = self.line_mut(id) else {
            return false;
        };
        if line.quantity > 1 {
            line.quantity -= 1;
        } else {
            self.remove_item(id);
        }
        true
    }

    /// Delete line `id` whatever its quantity.
    pub fn remove_item(&mut self, id: ProductId) -> bool {
        let before = self.lines.len();
        self.lines.retain(|line| line.id != id);
        self.lines.len() != before
    }

    /// Apply a user action. `catalog` is only consulted for [`CartAction::Add`].
    pub fn apply(&mut self, action: CartAction, catalog: &Catalog) -> bool {
        match action {
            CartAction::Add(id) => self.add_item(catalog, id),
            CartAction::Increment(id) => self.increment_quantity(id),
            CartAction::Decrement(id) => self.decrement_quantity(id),
            CartAction::Remove(id) => self.remove_item(id),
        }
    }

    /// Sum of all quantities.
    #[must_use]
    pub fn total_item_count(&self) -> u64 {
        self.lines.iter().map(|line| u64::from(line.quantity)).sum()
    }

    /// Sum of line totals at full precision. Round only for display.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.lines.iter().map(CartLine::line_total).sum()
    }
}
