//! Product catalog API client.
//!
//! The catalog is read-only from this crate's point of view. Single-product
//! lookups are cached with `moka` (5-minute TTL); filtered listings are not
//! cached, their query space is too dynamic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use almas_dimas_core::ProductId;

use crate::error::{ApiError, body_preview};

/// A catalog product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Unit price in MAD.
    pub price: Decimal,
    /// Image URLs, primary first.
    #[serde(rename = "imageURLs", alias = "images", default)]
    pub image_urls: Vec<String>,
    /// Units in stock.
    #[serde(default)]
    pub stock_quantity: u32,
    /// Category slug, if categorized.
    #[serde(default)]
    pub category: Option<String>,
    /// Long-form description.
    #[serde(default)]
    pub description: Option<String>,
}

impl Product {
    /// The primary image URL, if the catalog has a non-empty one.
    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.image_urls
            .first()
            .map(String::as_str)
            .filter(|url| !url.is_empty())
    }
}

/// Sort direction for product listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filters for product listings. Unset fields are omitted from the query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductFilters {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub category: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub search: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
}

impl ProductFilters {
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(category) = &self.category {
            pairs.push(("category", category.clone()));
        }
        if let Some(min_price) = self.min_price {
            pairs.push(("minPrice", min_price.to_string()));
        }
        if let Some(max_price) = self.max_price {
            pairs.push(("maxPrice", max_price.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(sort_by) = &self.sort_by {
            pairs.push(("sortBy", sort_by.clone()));
        }
        if let Some(sort_order) = self.sort_order {
            pairs.push(("sortOrder", sort_order.as_str().to_string()));
        }
        pairs
    }

    /// Render the filters as a URL query string; empty when nothing is set.
    pub(crate) fn query_string(&self) -> String {
        self.query_pairs()
            .iter()
            .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

/// Pagination metadata returned alongside product listings.
///
/// Fields the API omits default to zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
}

/// One page of a filtered product listing.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub pagination: Pagination,
}

/// Catalog lookup used by the guest cart to snapshot product data at
/// add-to-cart time.
#[async_trait]
pub trait ProductLookup: Send + Sync {
    /// Fetch a product by ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` if the catalog has no such product, or
    /// another `ApiError` if the request fails.
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError>;
}

// =============================================================================
// HttpProductClient
// =============================================================================

/// Single-item `{data: {...}}` response envelope.
#[derive(Debug, Deserialize)]
struct ProductEnvelope {
    data: Product,
}

/// Listing `{data: [...], pagination: {...}}` response envelope.
#[derive(Debug, Deserialize)]
struct ProductListEnvelope {
    #[serde(default)]
    data: Vec<Product>,
    #[serde(default)]
    pagination: Pagination,
}

/// Client for the product catalog API.
///
/// Cheap to clone; clones share the HTTP connection pool and the cache.
#[derive(Clone)]
pub struct HttpProductClient {
    inner: Arc<HttpProductClientInner>,
}

struct HttpProductClientInner {
    client: reqwest::Client,
    base: String,
    cache: Cache<String, Product>,
}

impl HttpProductClient {
    /// Create a new catalog client for the given base URL.
    #[must_use]
    pub fn new(base_url: &Url) -> Self {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(Duration::from_secs(300)) // 5 minutes
            .build();

        Self {
            inner: Arc::new(HttpProductClientInner {
                client: reqwest::Client::new(),
                base: base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        }
    }

    /// URL for one product; the id is escaped so it stays a single path
    /// segment.
    fn product_url(&self, id: &ProductId) -> String {
        format!(
            "{}/products/{}",
            self.inner.base,
            urlencoding::encode(id.as_str())
        )
    }

    /// URL for a filtered listing.
    fn list_url(&self, filters: &ProductFilters) -> String {
        let mut url = format!("{}/products", self.inner.base);
        let query = filters.query_string();
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query);
        }
        url
    }

    /// Get a product by its catalog ID.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::NotFound` for unknown IDs, or another `ApiError`
    /// if the request or parsing fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product_by_id(&self, id: &ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        // Check cache
        if let Some(product) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(product);
        }

        let request = self.inner.client.get(self.product_url(id));
        let envelope: ProductEnvelope = match self.send_and_parse(request).await {
            Ok(envelope) => envelope,
            Err(ApiError::Status { status: 404, .. }) => {
                return Err(ApiError::NotFound(format!("Product not found: {id}")));
            }
            Err(e) => return Err(e),
        };

        let product = envelope.data;

        // Cache the result
        self.inner.cache.insert(cache_key, product.clone()).await;

        Ok(product)
    }

    /// Get a filtered, paginated product listing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request or parsing fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filters: &ProductFilters) -> Result<ProductPage, ApiError> {
        let request = self.inner.client.get(self.list_url(filters));
        let envelope: ProductListEnvelope = self.send_and_parse(request).await?;

        Ok(ProductPage {
            products: envelope.data,
            pagination: envelope.pagination,
        })
    }

    /// Send a request and parse the JSON body.
    async fn send_and_parse<T: serde::de::DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %body_preview(&body),
                "Catalog API returned non-success status"
            );
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: body_preview(&body),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body_preview(&body),
                "Failed to parse catalog API response"
            );
            ApiError::Parse(e)
        })
    }
}

#[async_trait]
impl ProductLookup for HttpProductClient {
    async fn get_product(&self, id: &ProductId) -> Result<Product, ApiError> {
        self.get_product_by_id(id).await
    }
}
