//! Visitor-scoped key-value storage.
//!
//! Each browser gets its own namespace, addressed by the [`VisitorId`] kept
//! in its session. Reads and writes are synchronous, so cart mutations are
//! written through before a handler returns. Entries expire after a period
//! of inactivity.

use std::fmt;

use moka::sync::Cache;
use shopfront_core::KeyValueStorage;

use crate::config::StorageConfig;
use crate::models::VisitorId;

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
struct EntryKey {
    visitor: VisitorId,
    key: String,
}

impl EntryKey {
    fn new(visitor: VisitorId, key: &str) -> Self {
        Self {
            visitor,
            key: key.to_string(),
        }
    }
}

/// Storage shared by all visitors.
#[derive(Clone)]
pub struct VisitorStore {
    entries: Cache<EntryKey, String>,
}

impl VisitorStore {
    #[must_use]
    pub fn new(config: &StorageConfig) -> Self {
        let entries = Cache::builder()
            .max_capacity(config.max_entries)
            .time_to_idle(config.idle_expiry)
            .build();
        Self { entries }
    }

    /// The namespace belonging to `visitor`.
    #[must_use]
    pub fn for_visitor(&self, visitor: VisitorId) -> VisitorStorage {
        VisitorStorage {
            entries: self.entries.clone(),
            visitor,
        }
    }
}

impl fmt::Debug for VisitorStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitorStore")
            .field("entry_count", &self.entries.entry_count())
            .finish()
    }
}

/// One visitor's view of [`VisitorStore`].
#[derive(Clone)]
pub struct VisitorStorage {
    entries: Cache<EntryKey, String>,
    visitor: VisitorId,
}

// Manual impl so cart contents never end up in logs.
impl fmt::Debug for VisitorStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VisitorStorage")
            .field("visitor", &self.visitor)
            .finish_non_exhaustive()
    }
}

impl KeyValueStorage for VisitorStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.entries.get(&EntryKey::new(self.visitor, key))
    }

    fn set_item(&self, key: &str, value: String) {
        self.entries.insert(EntryKey::new(self.visitor, key), value);
    }

    fn remove_item(&self, key: &str) {
        self.entries.invalidate(&EntryKey::new(self.visitor, key));
    }
}
