//! Embedded demo catalog.
//!
//! The engine holds no durable state, so every CLI invocation seeds a fresh
//! ledger from the YAML catalog baked into the binary.

use thiserror::Error;

use stockroom_engine::{LedgerError, NewStockRecord, StockLedger};

/// The embedded catalog source.
const CATALOG_YAML: &str = include_str!("catalog.yaml");

/// Errors loading or seeding the demo catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The embedded YAML failed to parse.
    #[error("invalid catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// The ledger rejected a catalog entry.
    #[error("seeding failed: {0}")]
    Seed(#[from] LedgerError),
}

/// Parse the embedded catalog.
///
/// # Errors
///
/// Returns [`CatalogError::Parse`] if the embedded YAML is malformed.
pub fn records() -> Result<Vec<NewStockRecord>, CatalogError> {
    Ok(serde_yaml::from_str(CATALOG_YAML)?)
}

/// Build a fresh ledger seeded with the catalog.
///
/// # Errors
///
/// Returns [`CatalogError`] if parsing or a ledger insert fails.
pub fn seed_ledger() -> Result<StockLedger, CatalogError> {
    let ledger = StockLedger::new();
    for record in records()? {
        ledger.add_item(record)?;
    }
    tracing::debug!(products = ledger.len(), "ledger seeded from catalog");
    Ok(ledger)
}
