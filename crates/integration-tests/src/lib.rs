//! Integration tests for Almas & Dimas.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p almas-dimas-integration-tests
//! ```
//!
//! The suites exercise the cart stack end to end: holder, adapters, storage
//! and totals together, against a canned catalog and in-memory storage. No
//! server or network access is required.
//!
//! # Test Categories
//!
//! - `guest_cart` - Guest cart persistence, merging, stock bounds, recovery
//! - `cart_holder` - Session-driven mode selection and failure isolation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod fixtures;
