//! Persistence strategy behind the cart holder.

use async_trait::async_trait;

use almas_dimas_core::{ProductId, SelectedOptions};

use crate::error::CartError;

use super::types::Cart;

/// A cart persistence strategy.
///
/// Guest carts live in local storage, authenticated carts on the server; the
/// holder drives whichever matches the session through this one interface.
/// Every operation returns the canonical updated cart, with duplicate lines
/// merged and totals freshly computed.
#[async_trait]
pub trait CartAdapter: Send + Sync {
    /// Load the current cart. Missing or unreadable state yields an empty
    /// cart rather than an error.
    ///
    /// # Errors
    ///
    /// Returns an error only if the backing store or server cannot be
    /// reached at all.
    async fn load(&self) -> Result<Cart, CartError>;

    /// Add `quantity` units of a product, merging into the existing line
    /// with the same `(product_id, options)` if there is one.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ProductNotFound` if the product cannot be looked
    /// up, `CartError::InvalidQuantity` for a zero quantity, or a sync or
    /// storage error if persisting fails.
    async fn add_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
        options: &SelectedOptions,
    ) -> Result<Cart, CartError>;

    /// Set the quantity of the first line referring to the product.
    /// A quantity of zero or less removes the line.
    ///
    /// # Errors
    ///
    /// Returns `CartError::ItemNotFound` if no line refers to the product,
    /// or a sync or storage error if persisting fails.
    async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError>;

    /// Remove every line referring to the product. Removing an absent
    /// product is a no-op.
    ///
    /// # Errors
    ///
    /// Returns a sync or storage error if persisting fails.
    async fn remove_item(&self, product_id: &ProductId) -> Result<Cart, CartError>;

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns a sync or storage error if persisting fails.
    async fn clear(&self) -> Result<Cart, CartError>;
}
