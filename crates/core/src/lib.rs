//! Almas & Dimas Core - Shared types library.
//!
//! This crate provides common types used across all Almas & Dimas components:
//! - `storefront` - Cart, catalog and session client library
//! - `cli` - Command-line storefront tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients, no storage access. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product identifiers, selected-option maps and MAD money
//!   formatting

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
