//! External product catalog client.
//!
//! # Architecture
//!
//! - Plain `GET` of a JSON product list with `reqwest`
//! - The catalog service is the source of truth; nothing is stored locally
//! - Optional in-memory reuse of the last successful fetch via `moka`
//! - One request per page load, no retries, no request timeout
//!
//! Failures are returned as [`CatalogError`]; page handlers log them and
//! render an empty grid.

mod cache;
mod client;

pub use client::CatalogClient;

use thiserror::Error;

/// Errors that can occur when fetching the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("Catalog service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}
