//! Core types for Almas & Dimas.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod options;
pub mod price;

pub use id::ProductId;
pub use options::SelectedOptions;
pub use price::{format_mad, parse_mad};
