//! Shopfront Core - Cart state machine and shared types.
//!
//! This crate provides the domain pieces shared by the storefront:
//! - [`types`] - Product ids, prices, products, and category filters
//! - [`cart`] - Cart lines, the cart value, and the write-through cart store
//! - [`storage`] - Key-value storage abstraction and cart snapshot persistence
//! - [`catalog`] - In-memory catalog for one page session with category filtering
//!
//! # Architecture
//!
//! The core crate performs no network I/O and knows nothing about HTTP or
//! templates. Storage is reached only through the [`storage::KeyValueStorage`]
//! trait so the storefront can decide where snapshots live.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod storage;
pub mod types;

pub use cart::{Cart, CartAction, CartLine, CartStore};
pub use catalog::Catalog;
pub use storage::{CART_STORAGE_KEY, KeyValueStorage, MemoryStorage};
pub use types::*;
