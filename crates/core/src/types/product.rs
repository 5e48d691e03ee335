//! Catalog product records.

use serde::{Deserialize, Serialize};

use crate::types::{Price, ProductId};

/// A purchasable product as published by the external catalog.
///
/// Products are read-only: the catalog service is the source of truth and
/// nothing in the storefront mutates them. Fields the catalog sends that are
/// not listed here (e.g. ratings) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    /// Image URL.
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub category: String,
}
