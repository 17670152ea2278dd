//! Catalog browsing commands.
//!
//! # Usage
//!
//! ```bash
//! # Show one product
//! almas product show 64f1c2ab9d3e
//!
//! # Browse rings under 10 000 MAD, cheapest first
//! almas product list --category bagues --max-price 10000 --sort-by price --sort-order asc
//! ```

use tracing::info;

use almas_dimas_core::{ProductId, format_mad};
use almas_dimas_storefront::products::{ProductFilters, SortOrder};
use almas_dimas_storefront::{HttpProductClient, StorefrontConfig};

use super::CliError;

fn open_client() -> Result<HttpProductClient, CliError> {
    let config = StorefrontConfig::from_env()?;
    Ok(HttpProductClient::new(&config.catalog_base_url))
}

/// Show one product.
pub async fn show(product_id: &str) -> Result<(), CliError> {
    let client = open_client()?;
    let product = client
        .get_product_by_id(&ProductId::new(product_id))
        .await?;

    info!("{} ({})", product.name, product.id);
    info!("  Price: {}", format_mad(product.price));
    info!("  Stock: {}", product.stock_quantity);
    if let Some(category) = &product.category {
        info!("  Category: {category}");
    }
    if let Some(image) = product.primary_image() {
        info!("  Image: {image}");
    }
    if let Some(description) = &product.description {
        info!("  {description}");
    }
    Ok(())
}

/// List products matching the filters.
pub async fn list(filters: &ProductFilters) -> Result<(), CliError> {
    let client = open_client()?;
    let page = client.list_products(filters).await?;

    if page.products.is_empty() {
        info!("No products matched");
        return Ok(());
    }
    for product in &page.products {
        info!(
            "  {} - {} ({})",
            product.id,
            product.name,
            format_mad(product.price)
        );
    }
    info!(
        "Page {} of {} ({} products total)",
        page.pagination.page, page.pagination.total_pages, page.pagination.total
    );
    Ok(())
}

/// Parse a `--sort-order` value.
pub(crate) fn parse_sort_order(raw: &str) -> Result<SortOrder, CliError> {
    match raw {
        "asc" => Ok(SortOrder::Asc),
        "desc" => Ok(SortOrder::Desc),
        _ => Err(CliError::InvalidSortOrder(raw.to_owned())),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_sort_order() {
        assert_eq!(parse_sort_order("asc").unwrap(), SortOrder::Asc);
        assert_eq!(parse_sort_order("desc").unwrap(), SortOrder::Desc);
        assert!(matches!(
            parse_sort_order("sideways"),
            Err(CliError::InvalidSortOrder(_))
        ));
    }
}
