//! Shopping cart: state holder, persistence adapters, and totals.
//!
//! [`CartHolder`] is the single source of truth for the current cart. It
//! drives one of two [`CartAdapter`] strategies depending on the session:
//! guest carts persist to local storage, authenticated carts to the cart
//! API. A failed operation never touches the held cart; callers see the
//! error and the last consistent state.

mod adapter;
mod local;
mod remote;
mod totals;
mod types;

pub use adapter::CartAdapter;
pub use local::GuestCartAdapter;
pub use remote::RemoteCartAdapter;
pub use totals::{CartTotals, PricingRules};
pub use types::{Cart, LineItem};

use std::sync::Arc;

use tracing::info;

use almas_dimas_core::{ProductId, SelectedOptions};

use crate::config::StorefrontConfig;
use crate::error::CartError;
use crate::products::HttpProductClient;
use crate::session::AuthSession;
use crate::storage::StorageBackend;

/// Which persistence strategy the holder is currently driving.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartMode {
    /// Anonymous; the cart lives in local storage.
    Guest,
    /// Signed in; the cart lives on the server.
    Authenticated,
}

/// Single source of truth for the current cart.
///
/// Mutations take `&mut self`, so overlapping cart operations are
/// unrepresentable; there is no in-flight flag to race. The holder commits
/// the adapter's returned cart only when the operation succeeds.
pub struct CartHolder {
    cart: Cart,
    mode: CartMode,
    guest: Box<dyn CartAdapter>,
    remote: Box<dyn CartAdapter>,
    session: AuthSession,
}

impl CartHolder {
    /// Create a holder over the two adapters.
    ///
    /// The initial mode follows the session; the cart starts empty until
    /// [`reload`](Self::reload) hydrates it.
    #[must_use]
    pub fn new(
        guest: Box<dyn CartAdapter>,
        remote: Box<dyn CartAdapter>,
        session: AuthSession,
    ) -> Self {
        let mode = if session.is_authenticated() {
            CartMode::Authenticated
        } else {
            CartMode::Guest
        };
        Self {
            cart: Cart::empty(),
            mode,
            guest,
            remote,
            session,
        }
    }

    /// Wire a holder from configuration: HTTP catalog and cart clients,
    /// guest cart over the given storage backend.
    #[must_use]
    pub fn from_config<S: StorageBackend + 'static>(
        config: &StorefrontConfig,
        storage: S,
        session: AuthSession,
    ) -> Self {
        let catalog = Arc::new(HttpProductClient::new(&config.catalog_base_url));
        let guest = GuestCartAdapter::new(storage, catalog, config.pricing);
        let remote = RemoteCartAdapter::new(&config.api_base_url, session.clone(), config.pricing);
        Self::new(Box::new(guest), Box::new(remote), session)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The current mode.
    #[must_use]
    pub const fn mode(&self) -> CartMode {
        self.mode
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.cart.item_count()
    }

    /// Returns `true` if any line refers to the product.
    #[must_use]
    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.cart.contains(product_id)
    }

    // =========================================================================
    // Operations
    // =========================================================================

    /// Reload the cart from the mode's adapter.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the held cart is unchanged on failure.
    pub async fn reload(&mut self) -> Result<&Cart, CartError> {
        let cart = self.adapter().load().await?;
        Ok(self.commit(cart))
    }

    /// Add `quantity` units of a product, merging into an existing line
    /// with the same `(product_id, options)`.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the held cart is unchanged on failure.
    pub async fn add_item(
        &mut self,
        product_id: &ProductId,
        quantity: u32,
        options: &SelectedOptions,
    ) -> Result<&Cart, CartError> {
        let cart = self
            .adapter()
            .add_item(product_id, quantity, options)
            .await?;
        Ok(self.commit(cart))
    }

    /// Set the quantity of the product's line; zero or negative removes it.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the held cart is unchanged on failure.
    pub async fn update_quantity(
        &mut self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<&Cart, CartError> {
        let cart = self.adapter().update_quantity(product_id, quantity).await?;
        Ok(self.commit(cart))
    }

    /// Remove every line referring to the product.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the held cart is unchanged on failure.
    pub async fn remove_item(&mut self, product_id: &ProductId) -> Result<&Cart, CartError> {
        let cart = self.adapter().remove_item(product_id).await?;
        Ok(self.commit(cart))
    }

    /// Empty the cart.
    ///
    /// # Errors
    ///
    /// Returns the adapter's error; the held cart is unchanged on failure.
    pub async fn clear(&mut self) -> Result<&Cart, CartError> {
        let cart = self.adapter().clear().await?;
        Ok(self.commit(cart))
    }

    // =========================================================================
    // Mode transitions
    // =========================================================================

    /// Switch to the authenticated cart after a sign-in.
    ///
    /// The session must already hold a bearer token. The in-memory cart is
    /// replaced by the server's cart; guest contents are not merged into it,
    /// and the guest snapshot stays in local storage for the next sign-out.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotAuthenticated` if the session has no token.
    /// If loading the remote cart fails, the holder stays in Guest mode
    /// with its cart unchanged.
    pub async fn login(&mut self) -> Result<&Cart, CartError> {
        if !self.session.is_authenticated() {
            return Err(CartError::NotAuthenticated);
        }
        let cart = self.remote.load().await?;
        self.mode = CartMode::Authenticated;
        info!(items = cart.item_count(), "Switched to authenticated cart");
        Ok(self.commit(cart))
    }

    /// Sign the session out and return to the guest cart.
    ///
    /// # Errors
    ///
    /// Returns the guest adapter's error if the local snapshot cannot be
    /// read; the holder is in Guest mode either way, and
    /// [`reload`](Self::reload) retries the load.
    pub async fn logout(&mut self) -> Result<&Cart, CartError> {
        self.session.sign_out();
        self.mode = CartMode::Guest;
        let cart = self.guest.load().await?;
        info!(items = cart.item_count(), "Switched to guest cart");
        Ok(self.commit(cart))
    }

    fn adapter(&self) -> &dyn CartAdapter {
        match self.mode {
            CartMode::Guest => self.guest.as_ref(),
            CartMode::Authenticated => self.remote.as_ref(),
        }
    }

    fn commit(&mut self, cart: Cart) -> &Cart {
        self.cart = cart;
        &self.cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    use rust_decimal::Decimal;

    use crate::error::ApiError;

    /// Stub adapter: loads a fixed cart, optionally failing all mutations.
    struct StubAdapter {
        cart: Cart,
        fail_mutations: bool,
    }

    impl StubAdapter {
        fn with_items(items: Vec<LineItem>) -> Self {
            let mut cart = Cart {
                items,
                totals: CartTotals::default(),
            };
            cart.recompute_totals(&PricingRules::default());
            Self {
                cart,
                fail_mutations: false,
            }
        }

        fn failing_mutations(mut self) -> Self {
            self.fail_mutations = true;
            self
        }

        fn result(&self) -> Result<Cart, CartError> {
            if self.fail_mutations {
                Err(CartError::Sync(ApiError::Status {
                    status: 502,
                    message: "bad gateway".to_string(),
                }))
            } else {
                Ok(self.cart.clone())
            }
        }
    }

    #[async_trait]
    impl CartAdapter for StubAdapter {
        async fn load(&self) -> Result<Cart, CartError> {
            Ok(self.cart.clone())
        }

        async fn add_item(
            &self,
            _product_id: &ProductId,
            _quantity: u32,
            _options: &SelectedOptions,
        ) -> Result<Cart, CartError> {
            self.result()
        }

        async fn update_quantity(
            &self,
            _product_id: &ProductId,
            _quantity: i64,
        ) -> Result<Cart, CartError> {
            self.result()
        }

        async fn remove_item(&self, _product_id: &ProductId) -> Result<Cart, CartError> {
            self.result()
        }

        async fn clear(&self) -> Result<Cart, CartError> {
            self.result()
        }
    }

    fn line(id: &str, quantity: u32) -> LineItem {
        LineItem {
            product_id: ProductId::new(id),
            name: format!("Produit {id}"),
            unit_price: Decimal::new(100, 0),
            image: None,
            quantity,
            options: SelectedOptions::new(),
            stock_quantity: None,
        }
    }

    #[test]
    fn test_initial_mode_follows_session() {
        let guest_holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![])),
            Box::new(StubAdapter::with_items(vec![])),
            AuthSession::guest(),
        );
        assert_eq!(guest_holder.mode(), CartMode::Guest);

        let auth_holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![])),
            Box::new(StubAdapter::with_items(vec![])),
            AuthSession::with_token("tok"),
        );
        assert_eq!(auth_holder.mode(), CartMode::Authenticated);
    }

    #[tokio::test]
    async fn test_login_requires_token() {
        let mut holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![line("a", 1)])),
            Box::new(StubAdapter::with_items(vec![])),
            AuthSession::guest(),
        );
        holder.reload().await.unwrap();

        let err = holder.login().await.unwrap_err();
        assert!(matches!(err, CartError::NotAuthenticated));
        assert_eq!(holder.mode(), CartMode::Guest);
        assert_eq!(holder.item_count(), 1);
    }

    #[tokio::test]
    async fn test_login_replaces_cart_with_remote() {
        let session = AuthSession::guest();
        let mut holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![line("guest-item", 2)])),
            Box::new(StubAdapter::with_items(vec![line("server-item", 5)])),
            session.clone(),
        );
        holder.reload().await.unwrap();
        assert!(holder.contains(&ProductId::new("guest-item")));

        session.sign_in(secrecy::SecretString::from("tok"));
        holder.login().await.unwrap();

        assert_eq!(holder.mode(), CartMode::Authenticated);
        assert!(holder.contains(&ProductId::new("server-item")));
        assert!(!holder.contains(&ProductId::new("guest-item")));
    }

    #[tokio::test]
    async fn test_logout_reloads_guest_cart() {
        let session = AuthSession::with_token("tok");
        let mut holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![line("guest-item", 2)])),
            Box::new(StubAdapter::with_items(vec![line("server-item", 1)])),
            session.clone(),
        );
        holder.reload().await.unwrap();
        assert!(holder.contains(&ProductId::new("server-item")));

        holder.logout().await.unwrap();
        assert_eq!(holder.mode(), CartMode::Guest);
        assert!(!session.is_authenticated());
        assert!(holder.contains(&ProductId::new("guest-item")));
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_last_good_state() {
        let session = AuthSession::with_token("tok");
        let mut holder = CartHolder::new(
            Box::new(StubAdapter::with_items(vec![])),
            Box::new(StubAdapter::with_items(vec![line("server-item", 2)]).failing_mutations()),
            session,
        );
        holder.reload().await.unwrap();
        let before = holder.cart().clone();

        let err = holder
            .add_item(&ProductId::new("autre"), 1, &SelectedOptions::new())
            .await
            .unwrap_err();
        assert!(matches!(err, CartError::Sync(_)));
        assert_eq!(holder.cart(), &before);
        assert_eq!(holder.mode(), CartMode::Authenticated);
    }
}
