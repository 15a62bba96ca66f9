//! Engine error types.
//!
//! Every expected failure condition is a typed, recoverable result; the
//! collaborator decides how to surface it. Only an internal invariant
//! violation inside the ledger would be a programming error, and the
//! quantity types make the classic one (negative stock) unrepresentable.

use serde::Serialize;
use thiserror::Error;

use stockroom_core::{OrderId, ProductId};

use crate::checkout::CheckoutStep;

/// A cart line that current stock cannot cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Shortage {
    /// Product the cart asked for.
    pub product_id: ProductId,
    /// Quantity the cart asked for.
    pub requested: u32,
    /// Quantity actually on hand (0 if the record was deleted).
    pub available: u32,
}

/// Errors from [`StockLedger`](crate::ledger::StockLedger) operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// No record with this product ID.
    #[error("product {0} not found")]
    NotFound(ProductId),

    /// Product ID or SKU already exists on create, or a SKU update collides.
    #[error("duplicate identifier: {0}")]
    DuplicateIdentifier(String),

    /// Requested quantities exceed what is on hand.
    #[error("insufficient stock for {} line(s)", .shortages.len())]
    InsufficientStock {
        /// The offending lines, sorted by product ID.
        shortages: Vec<Shortage>,
    },
}

/// Errors from [`Cart`](crate::cart::Cart) operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Line quantities must be at least 1.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// No line with this product ID in the cart.
    #[error("product {0} is not in the cart")]
    NotFound(ProductId),
}

/// Errors from the checkout pipeline.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Required fields for the current step are missing.
    #[error("missing required fields: {}", .missing.join(", "))]
    Validation {
        /// Names of the missing fields.
        missing: Vec<&'static str>,
    },

    /// The requested step change is not a legal transition.
    #[error("cannot move from {from:?} to {to:?}")]
    InvalidTransition {
        /// Current step.
        from: CheckoutStep,
        /// Requested step.
        to: CheckoutStep,
    },

    /// Commit was called with an empty cart; the ledger is untouched.
    #[error("cart is empty")]
    EmptyCart,

    /// Commit was already completed for this session.
    #[error("checkout already committed as order {order_id}")]
    AlreadyCommitted {
        /// The order produced by the original commit.
        order_id: OrderId,
    },

    /// The ledger rejected the commit (or another ledger operation failed).
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}
