//! Read-side stock aggregation for the warehouse dashboard.
//!
//! Pure derived views over the ledger: nothing here owns state or caches
//! beyond a single query, because the ledger may mutate between reads.

use std::sync::Arc;

use serde::Serialize;

use stockroom_core::{CurrencyCode, Price};

use crate::ledger::{StockLedger, StockRecord};

/// Aggregate stock counts for one dashboard query.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockCounts {
    /// Number of distinct products.
    pub products: usize,
    /// Total units on hand across all products.
    pub total_units: u64,
    /// Products at or below their reorder point.
    pub low_stock: usize,
    /// Products with zero units on hand.
    pub out_of_stock: usize,
    /// Total cost-price value of everything on hand.
    pub inventory_value: Price,
}

/// Derived view over a shared [`StockLedger`].
#[derive(Debug, Clone)]
pub struct StockMonitor {
    ledger: Arc<StockLedger>,
}

impl StockMonitor {
    /// Create a monitor over a ledger.
    #[must_use]
    pub const fn new(ledger: Arc<StockLedger>) -> Self {
        Self { ledger }
    }

    /// Records at or below their reorder point, sorted by product ID.
    #[must_use]
    pub fn low_stock_items(&self) -> Vec<StockRecord> {
        let mut items: Vec<StockRecord> = self.ledger.low_stock_items().collect();
        items.sort_by_key(|r| r.product_id);
        items
    }

    /// Compute all dashboard counts from one ledger snapshot.
    #[must_use]
    pub fn counts(&self) -> StockCounts {
        let records = self.ledger.query();
        let currency = records
            .first()
            .map_or_else(CurrencyCode::default, |r| r.cost_price.currency_code);

        let mut counts = StockCounts {
            products: records.len(),
            total_units: 0,
            low_stock: 0,
            out_of_stock: 0,
            inventory_value: Price::zero(currency),
        };
        for record in &records {
            counts.total_units += u64::from(record.quantity_on_hand);
            if record.is_low_stock() {
                counts.low_stock += 1;
            }
            if record.is_out_of_stock() {
                counts.out_of_stock += 1;
            }
            counts.inventory_value = counts
                .inventory_value
                .plus(&record.cost_price.times(record.quantity_on_hand));
        }
        counts
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use stockroom_core::{ProductId, Sku};

    use crate::ledger::NewStockRecord;

    use super::*;

    fn record(id: i32, quantity: u32, reorder_point: u32, cost: rust_decimal::Decimal) -> NewStockRecord {
        NewStockRecord {
            product_id: ProductId::new(id),
            sku: Sku::parse(&format!("PROD-{id:03}")).unwrap(),
            name: format!("Product {id}"),
            category: "Electronics".to_string(),
            quantity_on_hand: quantity,
            reorder_point,
            cost_price: Price::new(cost, CurrencyCode::USD),
            selling_price: Price::new(cost * dec!(2), CurrencyCode::USD),
            location: "A1-S1".to_string(),
            supplier: "Test Suppliers Inc.".to_string(),
            image_url: None,
            last_restocked_at: None,
        }
    }

    #[test]
    fn test_counts() {
        let ledger = Arc::new(StockLedger::new());
        ledger.add_item(record(1, 10, 5, dec!(2.00))).unwrap();
        ledger.add_item(record(2, 3, 5, dec!(1.50))).unwrap(); // low stock
        ledger.add_item(record(3, 0, 5, dec!(4.00))).unwrap(); // out (and low)

        let monitor = StockMonitor::new(Arc::clone(&ledger));
        let counts = monitor.counts();
        assert_eq!(counts.products, 3);
        assert_eq!(counts.total_units, 13);
        assert_eq!(counts.low_stock, 2);
        assert_eq!(counts.out_of_stock, 1);
        assert_eq!(counts.inventory_value.amount, dec!(24.50));
    }

    #[test]
    fn test_counts_follow_mutations() {
        let ledger = Arc::new(StockLedger::new());
        ledger.add_item(record(1, 10, 5, dec!(1.00))).unwrap();
        let monitor = StockMonitor::new(Arc::clone(&ledger));
        assert_eq!(monitor.counts().low_stock, 0);

        ledger.decrease(ProductId::new(1), 6).unwrap();
        // No caching: the next query reflects the mutation
        assert_eq!(monitor.counts().low_stock, 1);
        assert_eq!(monitor.low_stock_items().len(), 1);
    }

    #[test]
    fn test_empty_ledger_counts() {
        let monitor = StockMonitor::new(Arc::new(StockLedger::new()));
        let counts = monitor.counts();
        assert_eq!(counts.products, 0);
        assert_eq!(counts.total_units, 0);
        assert_eq!(counts.inventory_value.amount, rust_decimal::Decimal::ZERO);
    }
}
