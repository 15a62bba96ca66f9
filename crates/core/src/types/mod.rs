//! Core types for Stockroom.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod sku;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use sku::{Sku, SkuError};
