//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! # Show the current cart
//! almas cart show
//!
//! # Add two units with selected options
//! almas cart add 64f1c2ab9d3e -q 2 -o Metal=Gold -o Size=52
//!
//! # Set a line's quantity (zero or less removes the line)
//! almas cart update 64f1c2ab9d3e -q 3
//!
//! # Remove a product entirely
//! almas cart remove 64f1c2ab9d3e
//! ```
//!
//! Every command hydrates a [`CartHolder`] from the stored session: guest
//! carts live in the data directory, authenticated carts on the server.

use tracing::info;

use almas_dimas_core::{ProductId, SelectedOptions, format_mad};
use almas_dimas_storefront::{Cart, CartHolder, CartMode, FileStorage, StorefrontConfig};

use super::{CliError, session};

/// Load configuration and hydrate a cart holder from the stored session.
async fn open_holder() -> Result<CartHolder, CliError> {
    let config = StorefrontConfig::from_env()?;
    let storage = FileStorage::new(&config.data_dir);
    let session = session::from_storage(&storage)?;
    let mut holder = CartHolder::from_config(&config, storage, session);
    holder.reload().await?;
    Ok(holder)
}

/// Print one line per item plus the totals block.
fn render(cart: &Cart) {
    if cart.is_empty() {
        info!("Cart is empty");
        return;
    }
    for item in &cart.items {
        let options = if item.options.is_empty() {
            String::new()
        } else {
            format!(" ({})", item.options)
        };
        info!(
            "  {} x{}{} - {}",
            item.name,
            item.quantity,
            options,
            format_mad(item.line_total())
        );
    }
    info!("Subtotal: {}", format_mad(cart.totals.subtotal));
    info!("Tax:      {}", format_mad(cart.totals.tax));
    info!("Shipping: {}", format_mad(cart.totals.shipping));
    info!("Total:    {}", format_mad(cart.totals.total));
}

/// Show the current cart.
///
/// With `json`, the cart goes to stdout as a JSON document so it can be
/// piped; the formatted rendering goes through the log layer like
/// everything else.
pub async fn show(json: bool) -> Result<(), CliError> {
    let holder = open_holder().await?;
    if json {
        #[allow(clippy::print_stdout)]
        {
            println!("{}", serde_json::to_string_pretty(holder.cart())?);
        }
        return Ok(());
    }
    match holder.mode() {
        CartMode::Guest => info!("Guest cart ({} items)", holder.item_count()),
        CartMode::Authenticated => info!("Server cart ({} items)", holder.item_count()),
    }
    render(holder.cart());
    Ok(())
}

/// Add a product to the cart.
pub async fn add(product_id: &str, quantity: u32, raw_options: &[String]) -> Result<(), CliError> {
    let options = raw_options
        .iter()
        .map(|raw| parse_option(raw))
        .collect::<Result<SelectedOptions, _>>()?;

    let mut holder = open_holder().await?;
    let id = ProductId::new(product_id);
    let cart = holder.add_item(&id, quantity, &options).await?;
    info!("Added {quantity} x {product_id}");
    render(cart);
    Ok(())
}

/// Set the quantity of the product's line.
pub async fn update(product_id: &str, quantity: i64) -> Result<(), CliError> {
    let mut holder = open_holder().await?;
    let id = ProductId::new(product_id);
    let cart = holder.update_quantity(&id, quantity).await?;
    info!("Updated {product_id} to quantity {quantity}");
    render(cart);
    Ok(())
}

/// Remove every line of the product.
pub async fn remove(product_id: &str) -> Result<(), CliError> {
    let mut holder = open_holder().await?;
    let id = ProductId::new(product_id);
    let cart = holder.remove_item(&id).await?;
    info!("Removed {product_id}");
    render(cart);
    Ok(())
}

/// Empty the cart.
pub async fn clear() -> Result<(), CliError> {
    let mut holder = open_holder().await?;
    holder.clear().await?;
    info!("Cart cleared");
    Ok(())
}

/// Parse one `-o NAME=VALUE` argument.
fn parse_option(raw: &str) -> Result<(String, String), CliError> {
    raw.split_once('=')
        .map(|(name, value)| (name.trim().to_owned(), value.trim().to_owned()))
        .filter(|(name, _)| !name.is_empty())
        .ok_or_else(|| CliError::InvalidOption(raw.to_owned()))
}
