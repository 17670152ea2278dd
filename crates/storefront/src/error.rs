//! Unified error handling for cart and catalog operations.
//!
//! Cart mutations return `Result<_, CartError>` so callers get a structured
//! failure value instead of a panic. A failed mutation never corrupts the
//! in-memory cart; the holder keeps its last good state.

use thiserror::Error;

use almas_dimas_core::ProductId;

use crate::storage::StorageError;

/// Errors from the cart and catalog HTTP APIs.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed (transport, timeout, invalid URL).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated for logging.
        message: String,
    },

    /// Response body could not be parsed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Errors surfaced by cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// The product does not exist in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// The product is not in the cart.
    #[error("Item not in cart: {0}")]
    ItemNotFound(ProductId),

    /// Quantity is zero or otherwise unusable.
    #[error("Invalid quantity: {0}")]
    InvalidQuantity(i64),

    /// Requested quantity exceeds the product's stock.
    #[error("Insufficient stock: requested {requested}, available {available}")]
    InsufficientStock {
        /// Quantity the cart would hold after the operation.
        requested: u32,
        /// Stock recorded for the product.
        available: u32,
    },

    /// Operation requires a signed-in session.
    #[error("Not signed in")]
    NotAuthenticated,

    /// Synchronization with the cart API failed.
    #[error("Cart sync failed: {0}")]
    Sync(#[from] ApiError),

    /// Local persistence failed.
    #[error("Cart storage failed: {0}")]
    Storage(#[from] StorageError),
}

/// First 500 characters of a response body, for error values and logs.
pub(crate) fn body_preview(body: &str) -> String {
    body.chars().take(500).collect()
}
