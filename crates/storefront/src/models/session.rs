//! Session-related types.
//!
//! The session only identifies the browser. Cart data lives in visitor
//! storage, keyed by the id stored here.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque identifier for one browser.
///
/// Every tab of the same browser shares one visitor id and therefore one
/// cart snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VisitorId(Uuid);

impl VisitorId {
    /// Generate a fresh random visitor id.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for VisitorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Session keys.
pub mod keys {
    /// Key for the browser's visitor id.
    pub const VISITOR_ID: &str = "visitor_id";
}
