//! Stockroom Core - Shared types library.
//!
//! This crate provides common types used across all Stockroom components:
//! - `engine` - The inventory ledger, cart, and checkout engine
//! - `cli` - Command-line tools for seeding and inspecting a ledger
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no locking, no side
//! effects. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, and SKUs

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
