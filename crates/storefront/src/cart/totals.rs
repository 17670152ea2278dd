//! Pure derivation of monetary totals from cart lines.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use super::types::LineItem;

/// Tax and shipping rules applied when computing totals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricingRules {
    /// VAT rate applied to the subtotal (e.g. 0.20 for 20%).
    pub tax_rate: Decimal,
    /// Subtotal in MAD at which shipping becomes free.
    pub free_shipping_threshold: Decimal,
    /// Flat shipping fee in MAD charged below the threshold.
    pub flat_shipping_fee: Decimal,
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(20, 2),
            free_shipping_threshold: Decimal::new(50_000, 0),
            flat_shipping_fee: Decimal::new(500, 0),
        }
    }
}

/// Monetary totals derived from a cart's line items.
///
/// Totals are never authoritative: they are recomputed from the items after
/// every mutation and on every load, whatever a stored or remote payload
/// claims.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CartTotals {
    /// Sum of `unit_price x quantity` over all lines.
    #[serde(default)]
    pub subtotal: Decimal,
    /// VAT on the subtotal, rounded to centimes.
    #[serde(default)]
    pub tax: Decimal,
    /// Shipping fee; zero once the subtotal reaches the free threshold.
    #[serde(default)]
    pub shipping: Decimal,
    /// `subtotal + tax + shipping`.
    #[serde(default)]
    pub total: Decimal,
}

impl CartTotals {
    /// Compute totals for a list of cart lines.
    ///
    /// An empty list yields all-zero totals; in particular no shipping fee
    /// is charged on an empty cart.
    #[must_use]
    pub fn compute(items: &[LineItem], rules: &PricingRules) -> Self {
        if items.is_empty() {
            return Self::default();
        }

        let subtotal: Decimal = items.iter().map(LineItem::line_total).sum();
        let tax = (subtotal * rules.tax_rate)
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        let shipping = if subtotal >= rules.free_shipping_threshold {
            Decimal::ZERO
        } else {
            rules.flat_shipping_fee
        };
        let total = subtotal + tax + shipping;

        Self {
            subtotal,
            tax,
            shipping,
            total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use almas_dimas_core::ProductId;

    fn line(price: Decimal, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new("p1"),
            name: "Bague Or".to_string(),
            unit_price: price,
            image: None,
            quantity,
            options: almas_dimas_core::SelectedOptions::new(),
            stock_quantity: None,
        }
    }

    #[test]
    fn test_empty_cart_is_all_zero() {
        let totals = CartTotals::compute(&[], &PricingRules::default());
        assert_eq!(totals, CartTotals::default());
        assert_eq!(totals.shipping, Decimal::ZERO);
    }

    #[test]
    fn test_totals_below_free_shipping() {
        let items = vec![line(Decimal::new(1000, 0), 2)];
        let totals = CartTotals::compute(&items, &PricingRules::default());

        assert_eq!(totals.subtotal, Decimal::new(2000, 0));
        assert_eq!(totals.tax, Decimal::new(400, 0));
        assert_eq!(totals.shipping, Decimal::new(500, 0));
        assert_eq!(totals.total, Decimal::new(2900, 0));
    }

    #[test]
    fn test_free_shipping_at_exact_threshold() {
        // >= threshold ships free, not just strictly above it
        let items = vec![line(Decimal::new(50_000, 0), 1)];
        let totals = CartTotals::compute(&items, &PricingRules::default());
        assert_eq!(totals.shipping, Decimal::ZERO);

        let just_below = vec![line(Decimal::new(49_999, 0), 1)];
        let totals = CartTotals::compute(&just_below, &PricingRules::default());
        assert_eq!(totals.shipping, Decimal::new(500, 0));
    }

    #[test]
    fn test_tax_rounded_to_centimes() {
        let items = vec![line(Decimal::new(33, 2), 1)]; // 0.33 * 0.20 = 0.066
        let totals = CartTotals::compute(&items, &PricingRules::default());
        assert_eq!(totals.tax, Decimal::new(7, 2));
    }

    #[test]
    fn test_recomputation_is_idempotent() {
        let items = vec![line(Decimal::new(12_500, 0), 3), line(Decimal::new(950, 0), 1)];
        let rules = PricingRules::default();
        assert_eq!(
            CartTotals::compute(&items, &rules),
            CartTotals::compute(&items, &rules)
        );
    }

    #[test]
    fn test_custom_rules() {
        let rules = PricingRules {
            tax_rate: Decimal::new(10, 2),
            free_shipping_threshold: Decimal::new(100, 0),
            flat_shipping_fee: Decimal::new(25, 0),
        };
        let items = vec![line(Decimal::new(50, 0), 1)];
        let totals = CartTotals::compute(&items, &rules);

        assert_eq!(totals.tax, Decimal::new(5, 0));
        assert_eq!(totals.shipping, Decimal::new(25, 0));
        assert_eq!(totals.total, Decimal::new(80, 0));
    }

    #[test]
    fn test_deserializes_with_missing_fields() {
        let totals: CartTotals = serde_json::from_str("{}").unwrap();
        assert_eq!(totals, CartTotals::default());
    }
}
