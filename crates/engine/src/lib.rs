//! Stockroom Engine - Inventory ledger, cart, and checkout.
//!
//! This crate is the authoritative in-process engine behind the Stockroom
//! storefront and warehouse dashboard:
//!
//! - [`ledger`] - The stock ledger, single source of truth for quantities.
//!   All quantity mutations for a given product are linearized; unrelated
//!   products proceed in parallel.
//! - [`cart`] - Per-session cart with add-time price snapshots. Single-owner
//!   state, no synchronization.
//! - [`checkout`] - The shipping -> payment -> review -> placed pipeline.
//!   Commit is the only operation that mutates the ledger, and it is
//!   all-or-nothing across every cart line.
//! - [`monitor`] - Read-side aggregation for the dashboard (low stock,
//!   out of stock, inventory value). Recomputed on every query.
//! - [`alerts`] - Notification sink the engine reports through; the
//!   presentation layer decides how to surface it.
//!
//! All expected failures are typed results (see [`error`]); the engine never
//! panics on a recoverable condition.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod alerts;
pub mod cart;
pub mod checkout;
pub mod error;
pub mod ledger;
pub mod monitor;

pub use alerts::{AlertSink, TracingSink};
pub use cart::{Cart, CartLine};
pub use checkout::{
    CheckoutSession, CheckoutStep, Order, OrderLine, PaymentDetails, PricingConfig,
    ShippingDetails,
};
pub use error::{CartError, CheckoutError, LedgerError, Shortage};
pub use ledger::{NewStockRecord, StockLedger, StockRecord, UpdateStockRecord};
pub use monitor::{StockCounts, StockMonitor};
