//! Guest cart persistence over local storage.
//!
//! Every operation is load-modify-persist: the stored snapshot is the only
//! durable state, and the returned cart always carries freshly computed
//! totals. A snapshot that fails to parse is treated as absent; guests never
//! lose the ability to shop because of a corrupt cart file.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{instrument, warn};

use almas_dimas_core::{ProductId, SelectedOptions};

use crate::error::CartError;
use crate::products::{Product, ProductLookup};
use crate::storage::{StorageBackend, StorageError};

use super::adapter::CartAdapter;
use super::totals::PricingRules;
use super::types::{Cart, LineItem};

/// Storage key for the guest cart snapshot.
const GUEST_CART_KEY: &str = "guestCart";

/// Cart adapter for anonymous shoppers.
///
/// Product data (price, name, image, stock) is snapshotted from the catalog
/// when a line is first added; later merges and edits reuse the snapshot.
pub struct GuestCartAdapter<S: StorageBackend> {
    storage: S,
    catalog: Arc<dyn ProductLookup>,
    rules: PricingRules,
}

impl<S: StorageBackend> GuestCartAdapter<S> {
    /// Create an adapter over the given storage backend and catalog.
    pub fn new(storage: S, catalog: Arc<dyn ProductLookup>, rules: PricingRules) -> Self {
        Self {
            storage,
            catalog,
            rules,
        }
    }

    /// Read and repair the stored snapshot.
    ///
    /// Missing or unparsable payloads yield an empty cart. Whatever the
    /// snapshot claims, duplicate lines are merged and totals recomputed.
    fn load_snapshot(&self) -> Result<Cart, CartError> {
        let mut cart = match self.storage.get(GUEST_CART_KEY)? {
            Some(payload) => serde_json::from_str(&payload).unwrap_or_else(|e| {
                warn!(error = %e, "Stored guest cart is unreadable, starting empty");
                Cart::empty()
            }),
            None => Cart::empty(),
        };
        cart.normalize();
        cart.recompute_totals(&self.rules);
        Ok(cart)
    }

    fn save_snapshot(&self, cart: &Cart) -> Result<(), CartError> {
        let payload = serde_json::to_string(cart).map_err(StorageError::from)?;
        self.storage.set(GUEST_CART_KEY, &payload)?;
        Ok(())
    }

    async fn fetch_product(&self, product_id: &ProductId) -> Result<Product, CartError> {
        self.catalog.get_product(product_id).await.map_err(|e| {
            warn!(product_id = %product_id, error = %e, "Product lookup failed during add to cart");
            CartError::ProductNotFound(product_id.clone())
        })
    }
}

#[async_trait]
impl<S: StorageBackend> CartAdapter for GuestCartAdapter<S> {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Cart, CartError> {
        self.load_snapshot()
    }

    #[instrument(skip(self, options), fields(product_id = %product_id))]
    async fn add_item(
        &self,
        product_id: &ProductId,
        quantity: u32,
        options: &SelectedOptions,
    ) -> Result<Cart, CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity(0));
        }

        let mut cart = self.load_snapshot()?;

        if let Some(line) = cart.find_line_mut(product_id, options) {
            let requested = line.quantity.saturating_add(quantity);
            if let Some(stock) = line.stock_quantity
                && requested > stock
            {
                return Err(CartError::InsufficientStock {
                    requested,
                    available: stock,
                });
            }
            line.quantity = requested;
        } else {
            let product = self.fetch_product(product_id).await?;
            if quantity > product.stock_quantity {
                return Err(CartError::InsufficientStock {
                    requested: quantity,
                    available: product.stock_quantity,
                });
            }
            let image = product.primary_image().map(ToOwned::to_owned);
            cart.items.push(LineItem {
                product_id: product.id,
                name: product.name,
                unit_price: product.price,
                image,
                quantity,
                options: options.clone(),
                stock_quantity: Some(product.stock_quantity),
            });
        }

        cart.recompute_totals(&self.rules);
        self.save_snapshot(&cart)?;
        Ok(cart)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        let mut cart = self.load_snapshot()?;

        let index = cart
            .items
            .iter()
            .position(|item| item.product_id == *product_id)
            .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;

        if quantity <= 0 {
            cart.items.remove(index);
        } else {
            let new_quantity =
                u32::try_from(quantity).map_err(|_| CartError::InvalidQuantity(quantity))?;
            let line = cart
                .items
                .get_mut(index)
                .ok_or_else(|| CartError::ItemNotFound(product_id.clone()))?;
            if let Some(stock) = line.stock_quantity
                && new_quantity > stock
            {
                return Err(CartError::InsufficientStock {
                    requested: new_quantity,
                    available: stock,
                });
            }
            line.quantity = new_quantity;
        }

        cart.recompute_totals(&self.rules);
        self.save_snapshot(&cart)?;
        Ok(cart)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_item(&self, product_id: &ProductId) -> Result<Cart, CartError> {
        let mut cart = self.load_snapshot()?;
        cart.items.retain(|item| item.product_id != *product_id);
        cart.recompute_totals(&self.rules);
        self.save_snapshot(&cart)?;
        Ok(cart)
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<Cart, CartError> {
        let cart = Cart::empty();
        self.save_snapshot(&cart)?;
        Ok(cart)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use rust_decimal::Decimal;

    use crate::error::ApiError;
    use crate::storage::MemoryStorage;

    struct FakeCatalog {
        products: HashMap<ProductId, Product>,
    }

    impl FakeCatalog {
        fn with(products: Vec<Product>) -> Arc<Self> {
            Arc::new(Self {
                products: products
                    .into_iter()
                    .map(|p| (p.id.clone(), p))
                    .collect(),
            })
        }
    }

    #[async_trait]
    impl ProductLookup for FakeCatalog {
        async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
            self.products
                .get(id)
                .cloned()
                .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))
        }
    }

    fn gold_ring() -> Product {
        Product {
            id: ProductId::new("ring-or"),
            name: "Bague Or 18k".to_string(),
            price: Decimal::new(4500, 0),
            image_urls: vec!["ring.jpg".to_string()],
            stock_quantity: 5,
            category: Some("bagues".to_string()),
            description: None,
        }
    }

    fn adapter(storage: MemoryStorage) -> GuestCartAdapter<MemoryStorage> {
        GuestCartAdapter::new(
            storage,
            FakeCatalog::with(vec![gold_ring()]),
            PricingRules::default(),
        )
    }

    #[tokio::test]
    async fn test_add_snapshots_product_data() {
        let adapter = adapter(MemoryStorage::new());
        let cart = adapter
            .add_item(&ProductId::new("ring-or"), 2, &SelectedOptions::new())
            .await
            .unwrap();

        let line = cart.items.first().unwrap();
        assert_eq!(line.name, "Bague Or 18k");
        assert_eq!(line.unit_price, Decimal::new(4500, 0));
        assert_eq!(line.image.as_deref(), Some("ring.jpg"));
        assert_eq!(line.stock_quantity, Some(5));
        assert_eq!(cart.totals.subtotal, Decimal::new(9000, 0));
    }

    #[tokio::test]
    async fn test_add_merges_same_product_and_options() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");
        adapter.add_item(&id, 2, &SelectedOptions::new()).await.unwrap();
        let cart = adapter.add_item(&id, 1, &SelectedOptions::new()).await.unwrap();

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().unwrap().quantity, 3);
    }

    #[tokio::test]
    async fn test_add_distinct_options_make_distinct_lines() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");
        let size52: SelectedOptions = [("Size", "52")].into_iter().collect();
        let size54: SelectedOptions = [("Size", "54")].into_iter().collect();

        adapter.add_item(&id, 1, &size52).await.unwrap();
        let cart = adapter.add_item(&id, 1, &size54).await.unwrap();
        assert_eq!(cart.items.len(), 2);
    }

    #[tokio::test]
    async fn test_add_unknown_product_leaves_cart_unchanged() {
        let storage = MemoryStorage::new();
        let adapter = adapter(storage.clone());

        let err = adapter
            .add_item(&ProductId::new("inexistant"), 1, &SelectedOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ProductNotFound(_)));
        assert!(storage.get(GUEST_CART_KEY).unwrap().is_none());
    }

    #[tokio::test]
    async fn test_add_zero_quantity_is_invalid() {
        let adapter = adapter(MemoryStorage::new());
        let err = adapter
            .add_item(&ProductId::new("ring-or"), 0, &SelectedOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity(0)));
    }

    #[tokio::test]
    async fn test_add_beyond_stock_fails() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");
        adapter.add_item(&id, 4, &SelectedOptions::new()).await.unwrap();

        // 4 in cart + 2 more exceeds the stock of 5
        let err = adapter.add_item(&id, 2, &SelectedOptions::new()).await.unwrap_err();
        assert!(matches!(
            err,
            CartError::InsufficientStock {
                requested: 6,
                available: 5
            }
        ));

        let cart = adapter.load().await.unwrap();
        assert_eq!(cart.item_count(), 4);
    }

    #[tokio::test]
    async fn test_update_zero_and_negative_remove() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");

        adapter.add_item(&id, 2, &SelectedOptions::new()).await.unwrap();
        let cart = adapter.update_quantity(&id, 0).await.unwrap();
        assert!(cart.is_empty());

        adapter.add_item(&id, 2, &SelectedOptions::new()).await.unwrap();
        let cart = adapter.update_quantity(&id, -3).await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.totals.total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_update_missing_item_errors() {
        let adapter = adapter(MemoryStorage::new());
        let err = adapter
            .update_quantity(&ProductId::new("ring-or"), 2)
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::ItemNotFound(_)));
    }

    #[tokio::test]
    async fn test_update_beyond_stock_fails() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");
        adapter.add_item(&id, 1, &SelectedOptions::new()).await.unwrap();

        let err = adapter.update_quantity(&id, 9).await.unwrap_err();
        assert!(matches!(err, CartError::InsufficientStock { .. }));

        let cart = adapter.load().await.unwrap();
        assert_eq!(cart.item_count(), 1);
    }

    #[tokio::test]
    async fn test_remove_drops_every_option_variant() {
        let adapter = adapter(MemoryStorage::new());
        let id = ProductId::new("ring-or");
        let size52: SelectedOptions = [("Size", "52")].into_iter().collect();
        adapter.add_item(&id, 1, &SelectedOptions::new()).await.unwrap();
        adapter.add_item(&id, 1, &size52).await.unwrap();

        let cart = adapter.remove_item(&id).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_remove_missing_is_noop() {
        let adapter = adapter(MemoryStorage::new());
        let cart = adapter.remove_item(&ProductId::new("ring-or")).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_clear_then_load_is_empty() {
        let storage = MemoryStorage::new();
        let adapter = adapter(storage.clone());
        let id = ProductId::new("ring-or");
        adapter.add_item(&id, 2, &SelectedOptions::new()).await.unwrap();

        let cart = adapter.clear().await.unwrap();
        assert!(cart.is_empty());

        let reloaded = adapter.load().await.unwrap();
        assert!(reloaded.is_empty());
        assert_eq!(reloaded.totals, crate::cart::CartTotals::default());
    }

    #[tokio::test]
    async fn test_load_corrupt_snapshot_falls_back_to_empty() {
        let storage = MemoryStorage::new();
        storage.set(GUEST_CART_KEY, "definitely not json{{{").unwrap();

        let adapter = adapter(storage);
        let cart = adapter.load().await.unwrap();
        assert!(cart.is_empty());
        assert_eq!(cart.totals.total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_load_ignores_stored_totals() {
        let storage = MemoryStorage::new();
        storage
            .set(
                GUEST_CART_KEY,
                r#"{"items":[{"id":"x","name":"Bague","price":100,"quantity":2}],
                    "subtotal":"1","tax":"2","shipping":"3","total":"4"}"#,
            )
            .unwrap();

        let adapter = adapter(storage);
        let cart = adapter.load().await.unwrap();
        assert_eq!(cart.totals.subtotal, Decimal::new(200, 0));
        assert_eq!(cart.totals.tax, Decimal::new(40, 0));
    }

    #[tokio::test]
    async fn test_load_merges_stored_duplicates() {
        let storage = MemoryStorage::new();
        storage
            .set(
                GUEST_CART_KEY,
                r#"{"items":[
                    {"id":"x","name":"Bague","price":100,"quantity":2},
                    {"id":"x","name":"Bague","price":100,"quantity":3}
                ]}"#,
            )
            .unwrap();

        let adapter = adapter(storage);
        let cart = adapter.load().await.unwrap();
        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.item_count(), 5);
    }
}
