//! CLI command implementations.

pub mod cart;
pub mod catalog;
pub mod session;

use thiserror::Error;

use almas_dimas_storefront::config::ConfigError;
use almas_dimas_storefront::storage::StorageError;
use almas_dimas_storefront::{ApiError, CartError};

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// A catalog request failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] ApiError),

    /// Local storage could not be read or written.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// The cart could not be encoded as JSON.
    #[error("Could not encode cart as JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An option argument was not `NAME=VALUE`.
    #[error("Invalid option: {0}. Expected NAME=VALUE")]
    InvalidOption(String),

    /// Sort order was not recognized.
    #[error("Invalid sort order: {0}. Valid orders: asc, desc")]
    InvalidSortOrder(String),
}
