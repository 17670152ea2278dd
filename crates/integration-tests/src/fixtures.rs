//! Shared fixtures: a canned catalog and cart adapters with scripted
//! behavior.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_decimal::Decimal;

use almas_dimas_core::{ProductId, SelectedOptions};
use almas_dimas_storefront::cart::GuestCartAdapter;
use almas_dimas_storefront::{
    ApiError, Cart, CartAdapter, CartError, CartTotals, LineItem, MemoryStorage, PricingRules,
    Product, ProductLookup,
};

// =============================================================================
// Catalog
// =============================================================================

/// In-memory catalog serving a fixed set of products.
pub struct FixtureCatalog {
    products: HashMap<ProductId, Product>,
}

impl FixtureCatalog {
    /// Build a catalog holding the given products.
    #[must_use]
    pub fn with(products: Vec<Product>) -> Arc<Self> {
        Arc::new(Self {
            products: products
                .into_iter()
                .map(|product| (product.id.clone(), product))
                .collect(),
        })
    }
}

#[async_trait]
impl ProductLookup for FixtureCatalog {
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.products
            .get(id)
            .cloned()
            .ok_or_else(|| ApiError::NotFound(format!("Product not found: {id}")))
    }
}

/// A catalog holding every fixture product.
#[must_use]
pub fn catalog() -> Arc<FixtureCatalog> {
    FixtureCatalog::with(vec![gold_ring(), silver_necklace(), diamond_pendant()])
}

/// 45 000 MAD ring, 5 in stock. One unit stays under the free-shipping
/// threshold; two cross it.
#[must_use]
pub fn gold_ring() -> Product {
    Product {
        id: ProductId::new("bague-or-18k"),
        name: "Bague Or 18 Carats".to_string(),
        price: Decimal::new(45_000, 0),
        image_urls: vec!["https://cdn.almasdimas.ma/bague-or-18k.jpg".to_string()],
        stock_quantity: 5,
        category: Some("bagues".to_string()),
        description: None,
    }
}

/// 1 200 MAD necklace, 10 in stock, no image.
#[must_use]
pub fn silver_necklace() -> Product {
    Product {
        id: ProductId::new("collier-argent"),
        name: "Collier Argent".to_string(),
        price: Decimal::new(1_200, 0),
        image_urls: vec![],
        stock_quantity: 10,
        category: Some("colliers".to_string()),
        description: None,
    }
}

/// 25 000 MAD pendant, 4 in stock. Two units land exactly on the
/// free-shipping threshold.
#[must_use]
pub fn diamond_pendant() -> Product {
    Product {
        id: ProductId::new("pendentif-diamant"),
        name: "Pendentif Diamant".to_string(),
        price: Decimal::new(25_000, 0),
        image_urls: vec!["https://cdn.almasdimas.ma/pendentif-diamant.jpg".to_string()],
        stock_quantity: 4,
        category: Some("pendentifs".to_string()),
        description: None,
    }
}

// =============================================================================
// Carts and adapters
// =============================================================================

/// One cart line for the product, no options selected.
#[must_use]
pub fn line(product: &Product, quantity: u32) -> LineItem {
    LineItem {
        product_id: product.id.clone(),
        name: product.name.clone(),
        unit_price: product.price,
        image: product.image_urls.first().cloned(),
        quantity,
        options: SelectedOptions::new(),
        stock_quantity: Some(product.stock_quantity),
    }
}

/// A cart holding the given lines, with totals recomputed under default
/// pricing rules.
#[must_use]
pub fn cart_with(items: Vec<LineItem>) -> Cart {
    let mut cart = Cart {
        items,
        totals: CartTotals::default(),
    };
    cart.recompute_totals(&PricingRules::default());
    cart
}

/// A guest adapter over fresh in-memory storage, plus the storage handle so
/// tests can inspect or corrupt the snapshot.
#[must_use]
pub fn guest_adapter() -> (GuestCartAdapter<MemoryStorage>, MemoryStorage) {
    let storage = MemoryStorage::new();
    let adapter = GuestCartAdapter::new(storage.clone(), catalog(), PricingRules::default());
    (adapter, storage)
}

fn service_unavailable() -> CartError {
    CartError::Sync(ApiError::Status {
        status: 503,
        message: "cart service unavailable".to_string(),
    })
}

/// Cart adapter that serves a fixed cart; mutations echo it back.
pub struct CannedCartAdapter {
    cart: Cart,
    fail_mutations: bool,
}

impl CannedCartAdapter {
    /// Serve `cart` on load and echo it on every mutation.
    #[must_use]
    pub fn serving(cart: Cart) -> Self {
        Self {
            cart,
            fail_mutations: false,
        }
    }

    /// Serve `cart` on load but fail every mutation with a 503.
    #[must_use]
    pub fn rejecting_mutations(cart: Cart) -> Self {
        Self {
            cart,
            fail_mutations: true,
        }
    }

    fn mutation_result(&self) -> Result<Cart, CartError> {
        if self.fail_mutations {
            Err(service_unavailable())
        } else {
            Ok(self.cart.clone())
        }
    }
}

#[async_trait]
impl CartAdapter for CannedCartAdapter {
    async fn load(&self) -> Result<Cart, CartError> {
        Ok(self.cart.clone())
    }

    async fn add_item(
        &self,
        _product_id: &ProductId,
        _quantity: u32,
        _options: &SelectedOptions,
    ) -> Result<Cart, CartError> {
        self.mutation_result()
    }

    async fn update_quantity(
        &self,
        _product_id: &ProductId,
        _quantity: i64,
    ) -> Result<Cart, CartError> {
        self.mutation_result()
    }

    async fn remove_item(&self, _product_id: &ProductId) -> Result<Cart, CartError> {
        self.mutation_result()
    }

    async fn clear(&self) -> Result<Cart, CartError> {
        self.mutation_result()
    }
}

/// Cart adapter where every operation, load included, fails with a 503.
pub struct FailingCartAdapter;

#[async_trait]
impl CartAdapter for FailingCartAdapter {
    async fn load(&self) -> Result<Cart, CartError> {
        Err(service_unavailable())
    }

    async fn add_item(
        &self,
        _product_id: &ProductId,
        _quantity: u32,
        _options: &SelectedOptions,
    ) -> Result<Cart, CartError> {
        Err(service_unavailable())
    }

    async fn update_quantity(
        &self,
        _product_id: &ProductId,
        _quantity: i64,
    ) -> Result<Cart, CartError> {
        Err(service_unavailable())
    }

    async fn remove_item(&self, _product_id: &ProductId) -> Result<Cart, CartError> {
        Err(service_unavailable())
    }

    async fn clear(&self) -> Result<Cart, CartError> {
        Err(service_unavailable())
    }
}
