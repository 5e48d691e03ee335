//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod category;
pub mod id;
pub mod price;
pub mod product;

pub use category::CategoryFilter;
pub use id::ProductId;
pub use price::Price;
pub use product::Product;
