//! Inventory inspection commands.
//!
//! # Usage
//!
//! ```bash
//! # List the full ledger
//! sr-cli inventory list
//!
//! # Show products at or below their reorder point
//! sr-cli inventory low-stock
//!
//! # Show dashboard counts
//! sr-cli inventory counts
//! ```

use std::sync::Arc;

use stockroom_engine::{StockMonitor, StockRecord};

use crate::catalog::{self, CatalogError};

/// Print the full ledger contents.
///
/// # Errors
///
/// Returns [`CatalogError`] if seeding fails.
#[allow(clippy::print_stdout)]
pub fn list() -> Result<(), CatalogError> {
    let ledger = catalog::seed_ledger()?;
    println!(
        "{:<4} {:<10} {:<22} {:>6} {:>8} {:>10}  {}",
        "ID", "SKU", "NAME", "QTY", "REORDER", "PRICE", "LOCATION"
    );
    for record in ledger.query() {
        print_row(&record);
    }
    Ok(())
}

/// Print products at or below their reorder point.
///
/// # Errors
///
/// Returns [`CatalogError`] if seeding fails.
#[allow(clippy::print_stdout)]
pub fn low_stock() -> Result<(), CatalogError> {
    let ledger = Arc::new(catalog::seed_ledger()?);
    let monitor = StockMonitor::new(ledger);

    let items = monitor.low_stock_items();
    if items.is_empty() {
        println!("No products are low on stock.");
        return Ok(());
    }
    println!("{} product(s) at or below reorder point:", items.len());
    for record in items {
        println!(
            "  {:<10} {:<22} {} / {}",
            record.sku, record.name, record.quantity_on_hand, record.reorder_point
        );
    }
    Ok(())
}

/// Print dashboard counts.
///
/// # Errors
///
/// Returns [`CatalogError`] if seeding fails.
#[allow(clippy::print_stdout)]
pub fn counts() -> Result<(), CatalogError> {
    let ledger = Arc::new(catalog::seed_ledger()?);
    let monitor = StockMonitor::new(ledger);

    let counts = monitor.counts();
    println!("Products:        {}", counts.products);
    println!("Units on hand:   {}", counts.total_units);
    println!("Low stock:       {}", counts.low_stock);
    println!("Out of stock:    {}", counts.out_of_stock);
    println!("Inventory value: {}", counts.inventory_value);
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_row(record: &StockRecord) {
    let flag = if record.is_out_of_stock() {
        " OUT"
    } else if record.is_low_stock() {
        " LOW"
    } else {
        ""
    };
    println!(
        "{:<4} {:<10} {:<22} {:>6} {:>8} {:>10}  {}{flag}",
        record.product_id,
        record.sku,
        record.name,
        record.quantity_on_hand,
        record.reorder_point,
        record.selling_price.to_string(),
        record.location,
    );
}
