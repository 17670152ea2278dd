//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `ALMAS_API_BASE_URL` - Base URL of the cart API (e.g., <https://api.almasdimas.ma>)
//!
//! ## Optional
//! - `ALMAS_CATALOG_BASE_URL` - Base URL of the product catalog API
//!   (default: same as `ALMAS_API_BASE_URL`)
//! - `ALMAS_DATA_DIR` - Directory for local cart and token storage
//!   (default: .almas-dimas)
//! - `ALMAS_TAX_RATE` - VAT rate applied to the subtotal (default: 0.20)
//! - `ALMAS_FREE_SHIPPING_THRESHOLD` - Subtotal in MAD at which shipping
//!   becomes free (default: 50000)
//! - `ALMAS_SHIPPING_FLAT_FEE` - Flat shipping fee in MAD below the
//!   threshold (default: 500)

use std::path::PathBuf;

use rust_decimal::Decimal;
use thiserror::Error;
use url::Url;

use crate::cart::PricingRules;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// Storefront client configuration.
#[derive(Debug, Clone)]
pub struct StorefrontConfig {
    /// Base URL of the cart API
    pub api_base_url: Url,
    /// Base URL of the product catalog API
    pub catalog_base_url: Url,
    /// Directory for local cart and token storage
    pub data_dir: PathBuf,
    /// Tax and shipping rules used for client-side totals
    pub pricing: PricingRules,
}

impl StorefrontConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or any
    /// variable fails to parse.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let api_base_url = parse_url("ALMAS_API_BASE_URL", &get_required_env("ALMAS_API_BASE_URL")?)?;
        let catalog_base_url = match get_optional_env("ALMAS_CATALOG_BASE_URL") {
            Some(raw) => parse_url("ALMAS_CATALOG_BASE_URL", &raw)?,
            None => api_base_url.clone(),
        };
        let data_dir = PathBuf::from(get_env_or_default("ALMAS_DATA_DIR", ".almas-dimas"));

        let pricing = PricingRules {
            tax_rate: get_decimal_or_default("ALMAS_TAX_RATE", "0.20")?,
            free_shipping_threshold: get_decimal_or_default(
                "ALMAS_FREE_SHIPPING_THRESHOLD",
                "50000",
            )?,
            flat_shipping_fee: get_decimal_or_default("ALMAS_SHIPPING_FLAT_FEE", "500")?,
        };

        Ok(Self {
            api_base_url,
            catalog_base_url,
            data_dir,
            pricing,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Get a required environment variable.
fn get_required_env(key: &str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get an optional environment variable.
fn get_optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

/// Get an environment variable with a default value.
fn get_env_or_default(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Parse a decimal environment variable, falling back to a default.
fn get_decimal_or_default(key: &str, default: &str) -> Result<Decimal, ConfigError> {
    parse_decimal(key, &get_env_or_default(key, default))
}

fn parse_decimal(key: &str, raw: &str) -> Result<Decimal, ConfigError> {
    raw.parse::<Decimal>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

fn parse_url(key: &str, raw: &str) -> Result<Url, ConfigError> {
    raw.parse::<Url>()
        .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_valid() {
        assert_eq!(parse_decimal("TEST", "0.20").unwrap(), Decimal::new(20, 2));
        assert_eq!(
            parse_decimal("TEST", "50000").unwrap(),
            Decimal::new(50_000, 0)
        );
    }

    #[test]
    fn test_parse_decimal_invalid() {
        let err = parse_decimal("ALMAS_TAX_RATE", "twenty percent").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(key, _) if key == "ALMAS_TAX_RATE"));
    }

    #[test]
    fn test_parse_url_invalid() {
        let err = parse_url("ALMAS_API_BASE_URL", "not a url").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(_, _)));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::MissingEnvVar("ALMAS_API_BASE_URL".to_string());
        assert_eq!(
            err.to_string(),
            "Missing environment variable: ALMAS_API_BASE_URL"
        );
    }
}
