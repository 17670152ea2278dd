//! Authenticated cart persistence against the cart API.
//!
//! The server owns the cart of a signed-in shopper. Every mutation returns
//! the server's canonical items, which replace local state wholesale; only
//! the monetary totals are recomputed client-side so tax and shipping always
//! follow the same rules as the guest cart. Requests carry the bearer token
//! read from the injected session at call time. No automatic retry.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use tracing::instrument;
use url::Url;

use almas_dimas_core::{ProductId, SelectedOptions};

use crate::error::{ApiError, CartError, body_preview};
use crate::session::AuthSession;

use super::adapter::CartAdapter;
use super::totals::PricingRules;
use super::types::Cart;

/// `{cart: {...}}` response envelope.
#[derive(Debug, Deserialize)]
struct CartEnvelope {
    cart: Cart,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct AddItemBody<'a> {
    product_id: &'a ProductId,
    quantity: u32,
    options: &'a SelectedOptions,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UpdateItemBody<'a> {
    item_id: &'a ProductId,
    quantity: i64,
}

/// Cart adapter for signed-in shoppers.
pub struct RemoteCartAdapter {
    client: reqwest::Client,
    base: String,
    session: AuthSession,
    rules: PricingRules,
}

impl RemoteCartAdapter {
    /// Create an adapter against the cart API at `base_url`.
    #[must_use]
    pub fn new(base_url: &Url, session: AuthSession, rules: PricingRules) -> Self {
        Self {
            client: reqwest::Client::new(),
            base: base_url.as_str().trim_end_matches('/').to_string(),
            session,
            rules,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Attach the bearer token, send, and parse the `{cart}` envelope.
    ///
    /// The returned cart is normalized and its totals recomputed; the
    /// server's items are canonical, its totals are not.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<Cart, CartError> {
        let token = self
            .session
            .bearer_token()
            .ok_or(CartError::NotAuthenticated)?;

        let response = request
            .bearer_auth(token.expose_secret())
            .send()
            .await
            .map_err(ApiError::from)?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body_preview(&body),
                "Cart API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body_preview(&body),
            }
            .into());
        }

        let envelope: CartEnvelope = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_preview(&body),
                "Failed to parse cart API response"
            );
            ApiError::Parse(e)
        })?;

        let mut cart = envelope.cart;
        cart.normalize();
        cart.recompute_totals(&self.rules);
        Ok(cart)
    }
}

#[async_trait]
impl CartAdapter for RemoteCartAdapter {
    #[instrument(skip(self))]
    async fn load(&self) -> Result<Cart, CartError> {
        self.send(self.client.get(self.endpoint("/cart"))).await
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
        let body = AddItemBody {
            product_id,
            quantity,
            options,
        };
        self.send(
            self.client
                .post(self.endpoint("/cart/add-item"))
                .json(&body),
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn update_quantity(
        &self,
        product_id: &ProductId,
        quantity: i64,
    ) -> Result<Cart, CartError> {
        let body = UpdateItemBody {
            item_id: product_id,
            quantity,
        };
        self.send(
            self.client
                .put(self.endpoint("/cart/update-item"))
                .json(&body),
        )
        .await
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    async fn remove_item(&self, product_id: &ProductId) -> Result<Cart, CartError> {
        let path = remove_path(product_id);
        self.send(self.client.delete(self.endpoint(&path))).await
    }

    #[instrument(skip(self))]
    async fn clear(&self) -> Result<Cart, CartError> {
        self.send(self.client.post(self.endpoint("/cart/clear"))).await
    }
}

/// Path for the remove-item endpoint; the id is escaped so it stays a
/// single path segment.
fn remove_path(product_id: &ProductId) -> String {
    format!(
        "/cart/remove-item/{}",
        urlencoding::encode(product_id.as_str())
    )
}
