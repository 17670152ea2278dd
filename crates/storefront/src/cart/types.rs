//! Cart data model.
//!
//! Wire and storage payloads use the API's field names (`id`, `price`,
//! `stockQuantity`); aliases keep older stored carts readable. Whatever a
//! payload claims, totals are recomputed from the items after loading.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use almas_dimas_core::{ProductId, SelectedOptions};

use super::totals::{CartTotals, PricingRules};

/// One line of a cart: a product snapshot plus a quantity.
///
/// `(product_id, options)` identifies a line; adding the same pair again
/// merges into the existing line instead of appending. Price, name and image
/// are snapshotted from the catalog when the line is first added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    /// Catalog product this line refers to.
    #[serde(rename = "id", alias = "productId", alias = "productID")]
    pub product_id: ProductId,
    /// Product name at the time it was added.
    pub name: String,
    /// Unit price in MAD at the time it was added.
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    /// Primary product image, if the catalog had one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Number of units; always at least 1 for a stored line.
    pub quantity: u32,
    /// Options chosen for this line (ring size, metal, ...).
    #[serde(default)]
    pub options: SelectedOptions,
    /// Stock recorded when the line was added; bounds quantity edits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock_quantity: Option<u32>,
}

impl LineItem {
    /// `unit_price x quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }

    fn matches(&self, product_id: &ProductId, options: &SelectedOptions) -> bool {
        self.product_id == *product_id && self.options == *options
    }
}

/// A shopping cart: ordered line items plus derived totals.
///
/// Item order is insertion order and is preserved across mutations for
/// display stability.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    /// Line items, one per `(product_id, options)` pair.
    #[serde(default)]
    pub items: Vec<LineItem>,
    /// Derived totals; recomputed from `items`, never trusted from payloads.
    #[serde(flatten, default)]
    pub totals: CartTotals,
}

impl Cart {
    /// An empty cart with zero totals.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the cart has no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .map(|item| item.quantity)
            .fold(0, u32::saturating_add)
    }

    /// Returns `true` if any line refers to `product_id`, whatever its
    /// options.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items
            .iter()
            .any(|item| item.product_id == *product_id)
    }

    /// Find the line matching `(product_id, options)` exactly.
    #[must_use]
    pub fn find_line(
        &self,
        product_id: &ProductId,
        options: &SelectedOptions,
    ) -> Option<&LineItem> {
        self.items
            .iter()
            .find(|item| item.matches(product_id, options))
    }

    pub(crate) fn find_line_mut(
        &mut self,
        product_id: &ProductId,
        options: &SelectedOptions,
    ) -> Option<&mut LineItem> {
        self.items
            .iter_mut()
            .find(|item| item.matches(product_id, options))
    }

    /// Restore the one-line-per-`(product_id, options)` invariant on a cart
    /// loaded from storage or the server: duplicate lines are merged by
    /// summing quantities and zero-quantity lines are dropped. First
    /// occurrence wins the position.
    pub(crate) fn normalize(&mut self) {
        let mut lines: Vec<LineItem> = Vec::with_capacity(self.items.len());
        for item in self.items.drain(..) {
            if item.quantity == 0 {
                continue;
            }
            match lines
                .iter_mut()
                .find(|line| line.matches(&item.product_id, &item.options))
            {
                Some(line) => line.quantity = line.quantity.saturating_add(item.quantity),
                None => lines.push(item),
            }
        }
        self.items = lines;
    }

    /// Recompute derived totals from the current items.
    pub fn recompute_totals(&mut self, rules: &PricingRules) {
        self.totals = CartTotals::compute(&self.items, rules);
    }
}
