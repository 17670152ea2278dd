//! Almas & Dimas storefront library.
//!
//! Client-side storefront plumbing for the jewelry shop: the shopping cart
//! with its guest and authenticated persistence strategies, the catalog
//! client, session state and configuration. No UI lives here; the CLI and
//! any future frontend sit on top of this crate.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod error;
pub mod products;
pub mod session;
pub mod storage;

pub use cart::{Cart, CartAdapter, CartHolder, CartMode, CartTotals, LineItem, PricingRules};
pub use config::StorefrontConfig;
pub use error::{ApiError, CartError};
pub use products::{HttpProductClient, Product, ProductFilters, ProductLookup};
pub use session::AuthSession;
pub use storage::{FileStorage, MemoryStorage, StorageBackend};
