//! Key-value storage and cart snapshot persistence.
//!
//! The cart crosses page boundaries only as a JSON snapshot stored under a
//! single fixed key. Storage implementations decide where that snapshot
//! lives; the storefront keeps one storage namespace per visitor, and tests
//! use [`MemoryStorage`].

use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::{Arc, PoisonError, RwLock};

use crate::cart::{Cart, CartLine};

/// Storage key holding the cart snapshot.
pub const CART_STORAGE_KEY: &str = "cart";

/// A synchronous string key-value store scoped to one visitor.
///
/// Methods take `&self`; implementations use interior mutability. Writes
/// overwrite unconditionally and there is no versioning.
pub trait KeyValueStorage: Send + Sync + Debug {
    /// Retrieve the value stored under `key`, if any.
    fn get_item(&self, key: &str) -> Option<String>;

    /// Insert or overwrite the value stored under `key`.
    fn set_item(&self, key: &str, value: String);

    /// Delete the value stored under `key`. Deleting a missing key is a no-op.
    fn remove_item(&self, key: &str);
}

impl<S: KeyValueStorage + ?Sized> KeyValueStorage for Arc<S> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: String) {
        (**self).set_item(key, value);
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key);
    }
}

/// In-memory storage.
///
/// Clones share the same entries, like two tabs of one browser origin.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<RwLock<HashMap<String, String>>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set_item(&self, key: &str, value: String) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value);
    }

    fn remove_item(&self, key: &str) {
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

/// Serialize `cart` and write it under [`CART_STORAGE_KEY`].
///
/// # Errors
///
/// Returns an error if the cart cannot be encoded as JSON. Nothing is written
/// in that case.
pub fn save<S: KeyValueStorage + ?Sized>(
    storage: &S,
    cart: &Cart,
) -> Result<(), serde_json::Error> {
    let snapshot = serde_json::to_string(cart.lines())?;
    storage.set_item(CART_STORAGE_KEY, snapshot);
    Ok(())
}

/// Read the cart snapshot.
///
/// A missing or unparsable snapshot yields an empty cart; corrupt data is
/// discarded rather than reported. Snapshots that break the cart invariants
/// (zero quantities, repeated ids) are repaired on the way in.
#[must_use]
pub fn load<S: KeyValueStorage + ?Sized>(storage: &S) -> Cart {
    let Some(snapshot) = storage.get_item(CART_STORAGE_KEY) else {
        tracing::debug!("no cart snapshot, starting empty");
        return Cart::new();
    };

    match serde_json::from_str::<Vec<CartLine>>(&snapshot) {
        Ok(lines) => Cart::from_lines(lines),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}
