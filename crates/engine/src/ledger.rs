//! The stock ledger: authoritative mapping from product ID to quantity.
//!
//! All quantity mutations for a given product run under that record's
//! mutex, so two concurrent decrements can never both observe the
//! pre-mutation quantity. Unrelated products share nothing but the map
//! shards and proceed in parallel. Create/remove/SKU changes additionally
//! serialize on a registry mutex so the record map and the SKU uniqueness
//! index stay consistent with each other.
//!
//! [`StockLedger::commit_sale`] is the multi-key transaction used by
//! checkout commit: it locks every touched record in product-ID order,
//! validates all lines against current stock, and only then applies the
//! decrements while every lock is still held. No partial application is
//! ever observable.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::NaiveDate;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockroom_core::{Price, ProductId, Sku};

use crate::error::{LedgerError, Shortage};

/// One product's entry in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    /// Unique, immutable product ID.
    pub product_id: ProductId,
    /// Unique, human-readable SKU.
    pub sku: Sku,
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Units currently on hand. Never negative by construction.
    pub quantity_on_hand: u32,
    /// Threshold at or below which the product counts as low stock.
    pub reorder_point: u32,
    /// Per-unit acquisition cost.
    pub cost_price: Price,
    /// Per-unit selling price; carts snapshot this at add time.
    pub selling_price: Price,
    /// Warehouse location code (e.g., "A1-S3").
    pub location: String,
    /// Supplier name.
    pub supplier: String,
    /// Product image URL, if any.
    pub image_url: Option<String>,
    /// Date of the most recent restock.
    pub last_restocked_at: Option<NaiveDate>,
}

impl StockRecord {
    /// Whether the record is at or below its reorder point.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity_on_hand <= self.reorder_point
    }

    /// Whether the record has no units on hand.
    #[must_use]
    pub const fn is_out_of_stock(&self) -> bool {
        self.quantity_on_hand == 0
    }
}

/// Input for creating a stock record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewStockRecord {
    /// Unique product ID.
    pub product_id: ProductId,
    /// Unique SKU.
    pub sku: Sku,
    /// Display name.
    pub name: String,
    /// Product category.
    pub category: String,
    /// Initial units on hand.
    pub quantity_on_hand: u32,
    /// Low-stock threshold.
    pub reorder_point: u32,
    /// Per-unit acquisition cost.
    pub cost_price: Price,
    /// Per-unit selling price.
    pub selling_price: Price,
    /// Warehouse location code.
    pub location: String,
    /// Supplier name.
    pub supplier: String,
    /// Product image URL, if any.
    pub image_url: Option<String>,
    /// Date of the most recent restock, if known.
    pub last_restocked_at: Option<NaiveDate>,
}

impl From<NewStockRecord> for StockRecord {
    fn from(input: NewStockRecord) -> Self {
        Self {
            product_id: input.product_id,
            sku: input.sku,
            name: input.name,
            category: input.category,
            quantity_on_hand: input.quantity_on_hand,
            reorder_point: input.reorder_point,
            cost_price: input.cost_price,
            selling_price: input.selling_price,
            location: input.location,
            supplier: input.supplier,
            image_url: input.image_url,
            last_restocked_at: input.last_restocked_at,
        }
    }
}

/// Partial update for a stock record; `None` fields are left unchanged.
///
/// Quantities are unsigned, so a negative `quantity_on_hand` is
/// unrepresentable rather than validated at runtime.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateStockRecord {
    /// New SKU (must not collide with another record).
    pub sku: Option<Sku>,
    /// New display name.
    pub name: Option<String>,
    /// New category.
    pub category: Option<String>,
    /// New on-hand quantity.
    pub quantity_on_hand: Option<u32>,
    /// New low-stock threshold.
    pub reorder_point: Option<u32>,
    /// New per-unit cost.
    pub cost_price: Option<Price>,
    /// New per-unit selling price.
    pub selling_price: Option<Price>,
    /// New warehouse location.
    pub location: Option<String>,
    /// New supplier.
    pub supplier: Option<String>,
    /// New image URL.
    pub image_url: Option<String>,
}

/// Lock a mutex, recovering the guard if a holder panicked.
///
/// Record state is always left consistent before any operation can panic,
/// so a poisoned lock carries no torn data.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// The authoritative store of product quantities.
///
/// Cheap to share behind an [`Arc`]; all methods take `&self`.
#[derive(Debug, Default)]
pub struct StockLedger {
    /// Per-product records. The per-record mutex linearizes all quantity
    /// mutations for that product.
    records: DashMap<ProductId, Arc<Mutex<StockRecord>>>,
    /// SKU uniqueness index.
    sku_index: DashMap<Sku, ProductId>,
    /// Serializes create/remove/SKU changes across the two maps.
    registry: Mutex<()>,
}

impl StockLedger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of products in the ledger.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the ledger holds no products.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Insert a new record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::DuplicateIdentifier`] if the product ID or the
    /// SKU already exists.
    #[instrument(skip(self, input), fields(product_id = %input.product_id, sku = %input.sku))]
    pub fn add_item(&self, input: NewStockRecord) -> Result<StockRecord, LedgerError> {
        let _registry = lock(&self.registry);

        if self.records.contains_key(&input.product_id) {
            return Err(LedgerError::DuplicateIdentifier(format!(
                "product ID {}",
                input.product_id
            )));
        }
        if self.sku_index.contains_key(&input.sku) {
            return Err(LedgerError::DuplicateIdentifier(format!(
                "SKU {}",
                input.sku
            )));
        }

        let record = StockRecord::from(input);
        self.sku_index
            .insert(record.sku.clone(), record.product_id);
        self.records
            .insert(record.product_id, Arc::new(Mutex::new(record.clone())));

        tracing::debug!(quantity = record.quantity_on_hand, "stock record added");
        Ok(record)
    }

    /// Merge a partial update into a record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown, or
    /// [`LedgerError::DuplicateIdentifier`] if a SKU change collides with
    /// another record.
    #[instrument(skip(self, update))]
    pub fn update_item(
        &self,
        id: ProductId,
        update: UpdateStockRecord,
    ) -> Result<StockRecord, LedgerError> {
        // SKU changes touch the uniqueness index, so take the registry
        // lock for the whole update in that case.
        let _registry = update.sku.is_some().then(|| lock(&self.registry));

        let entry = self.record_handle(id)?;
        let mut record = lock(&entry);

        if let Some(sku) = update.sku {
            if sku != record.sku {
                if let Some(existing) = self.sku_index.get(&sku) {
                    if *existing.value() != id {
                        return Err(LedgerError::DuplicateIdentifier(format!("SKU {sku}")));
                    }
                }
                self.sku_index.remove(&record.sku);
                self.sku_index.insert(sku.clone(), id);
                record.sku = sku;
            }
        }
        if let Some(name) = update.name {
            record.name = name;
        }
        if let Some(category) = update.category {
            record.category = category;
        }
        if let Some(quantity) = update.quantity_on_hand {
            record.quantity_on_hand = quantity;
        }
        if let Some(reorder_point) = update.reorder_point {
            record.reorder_point = reorder_point;
        }
        if let Some(cost_price) = update.cost_price {
            record.cost_price = cost_price;
        }
        if let Some(selling_price) = update.selling_price {
            record.selling_price = selling_price;
        }
        if let Some(location) = update.location {
            record.location = location;
        }
        if let Some(supplier) = update.supplier {
            record.supplier = supplier;
        }
        if let Some(image_url) = update.image_url {
            record.image_url = Some(image_url);
        }

        Ok(record.clone())
    }

    /// Delete a record, returning its final state.
    ///
    /// A checkout commit already in flight for this product will observe it
    /// as zero stock and fail its validation pass.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown.
    #[instrument(skip(self))]
    pub fn remove_item(&self, id: ProductId) -> Result<StockRecord, LedgerError> {
        let _registry = lock(&self.registry);

        let (_, entry) = self
            .records
            .remove(&id)
            .ok_or(LedgerError::NotFound(id))?;
        let record = lock(&entry).clone();
        self.sku_index.remove(&record.sku);

        tracing::debug!(sku = %record.sku, "stock record removed");
        Ok(record)
    }

    /// Reduce on-hand quantity, flooring at zero.
    ///
    /// The clamp is deliberate policy: if over-selling happened upstream, the
    /// ledger must not go negative or reject at this late stage. Returns the
    /// new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown.
    #[instrument(skip(self))]
    pub fn decrease(&self, id: ProductId, quantity: u32) -> Result<u32, LedgerError> {
        let entry = self.record_handle(id)?;
        let mut record = lock(&entry);
        record.quantity_on_hand = record.quantity_on_hand.saturating_sub(quantity);
        tracing::debug!(new_quantity = record.quantity_on_hand, "stock decreased");
        Ok(record.quantity_on_hand)
    }

    /// Add to on-hand quantity, unbounded above.
    ///
    /// Used for restocks and for compensating a cancelled order. Returns the
    /// new quantity.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown.
    #[instrument(skip(self))]
    pub fn increase(&self, id: ProductId, quantity: u32) -> Result<u32, LedgerError> {
        let entry = self.record_handle(id)?;
        let mut record = lock(&entry);
        record.quantity_on_hand = record.quantity_on_hand.saturating_add(quantity);
        tracing::debug!(new_quantity = record.quantity_on_hand, "stock increased");
        Ok(record.quantity_on_hand)
    }

    /// [`increase`](Self::increase) that also stamps the restock date.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown.
    #[instrument(skip(self))]
    pub fn restock(
        &self,
        id: ProductId,
        quantity: u32,
        date: NaiveDate,
    ) -> Result<u32, LedgerError> {
        let entry = self.record_handle(id)?;
        let mut record = lock(&entry);
        record.quantity_on_hand = record.quantity_on_hand.saturating_add(quantity);
        record.last_restocked_at = Some(date);
        tracing::info!(new_quantity = record.quantity_on_hand, %date, "restocked");
        Ok(record.quantity_on_hand)
    }

    /// Snapshot a single record.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] if the product is unknown.
    pub fn get(&self, id: ProductId) -> Result<StockRecord, LedgerError> {
        let entry = self.record_handle(id)?;
        let record = lock(&entry).clone();
        Ok(record)
    }

    /// Snapshot every record, sorted by product ID.
    #[must_use]
    pub fn query(&self) -> Vec<StockRecord> {
        let mut records: Vec<StockRecord> = self
            .records
            .iter()
            .map(|entry| lock(entry.value()).clone())
            .collect();
        records.sort_by_key(|r| r.product_id);
        records
    }

    /// Lazy, restartable sequence of records at or below their reorder
    /// point. Recomputed from live state on every call.
    pub fn low_stock_items(&self) -> impl Iterator<Item = StockRecord> + '_ {
        self.records.iter().filter_map(|entry| {
            let record = lock(entry.value());
            record.is_low_stock().then(|| record.clone())
        })
    }

    /// Check that `quantity` units of a product are available right now.
    ///
    /// Intended for UI collaborators gating cart quantity changes; the
    /// answer is only as fresh as the moment of the call.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::NotFound`] for an unknown product and
    /// [`LedgerError::InsufficientStock`] when the request exceeds stock.
    pub fn check_available(&self, id: ProductId, quantity: u32) -> Result<(), LedgerError> {
        let record = self.get(id)?;
        if quantity > record.quantity_on_hand {
            return Err(LedgerError::InsufficientStock {
                shortages: vec![Shortage {
                    product_id: id,
                    requested: quantity,
                    available: record.quantity_on_hand,
                }],
            });
        }
        Ok(())
    }

    /// Atomically decrement stock for every line, or nothing at all.
    ///
    /// Locks are acquired in product-ID order (deadlock-free against other
    /// commits), every line is validated against current stock, and the
    /// decrements are applied only while all locks are still held. Duplicate
    /// product IDs are merged before locking. A line whose record has been
    /// deleted counts as available 0.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::InsufficientStock`] listing every offending
    /// line; in that case no quantity has changed.
    #[instrument(skip(self, lines), fields(line_count = lines.len()))]
    pub fn commit_sale(&self, lines: &[(ProductId, u32)]) -> Result<(), LedgerError> {
        if lines.is_empty() {
            return Ok(());
        }

        // BTreeMap both merges duplicates and fixes the lock order.
        let mut demand: BTreeMap<ProductId, u32> = BTreeMap::new();
        for (product_id, quantity) in lines {
            let entry = demand.entry(*product_id).or_insert(0);
            *entry = entry.saturating_add(*quantity);
        }

        let mut shortages = Vec::new();
        let mut keyed = Vec::with_capacity(demand.len());
        for (product_id, quantity) in demand {
            match self.records.get(&product_id) {
                Some(entry) => keyed.push((product_id, quantity, Arc::clone(entry.value()))),
                // Deleted mid-flight: treated as zero stock.
                None => shortages.push(Shortage {
                    product_id,
                    requested: quantity,
                    available: 0,
                }),
            }
        }

        let mut guards = Vec::with_capacity(keyed.len());
        for (product_id, quantity, record) in &keyed {
            let guard = lock(record);
            if *quantity > guard.quantity_on_hand {
                shortages.push(Shortage {
                    product_id: *product_id,
                    requested: *quantity,
                    available: guard.quantity_on_hand,
                });
            }
            guards.push((*quantity, guard));
        }

        if !shortages.is_empty() {
            shortages.sort_by_key(|s| s.product_id);
            tracing::warn!(shortage_count = shortages.len(), "commit rejected");
            return Err(LedgerError::InsufficientStock { shortages });
        }

        // Every line validated; apply while all locks are held.
        for (quantity, guard) in &mut guards {
            guard.quantity_on_hand -= *quantity;
        }
        tracing::info!("sale committed");
        Ok(())
    }

    fn record_handle(&self, id: ProductId) -> Result<Arc<Mutex<StockRecord>>, LedgerError> {
        self.records
            .get(&id)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or(LedgerError::NotFound(id))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use stockroom_core::CurrencyCode;

    use super::*;

    fn record(id: i32, sku: &str, quantity: u32, reorder_point: u32) -> NewStockRecord {
        NewStockRecord {
            product_id: ProductId::new(id),
            sku: Sku::parse(sku).unwrap(),
            name: format!("Product {id}"),
            category: "Electronics".to_string(),
            quantity_on_hand: quantity,
            reorder_point,
            cost_price: Price::new(dec!(10.00), CurrencyCode::USD),
            selling_price: Price::new(dec!(19.99), CurrencyCode::USD),
            location: "A1-S1".to_string(),
            supplier: "Test Suppliers Inc.".to_string(),
            image_url: None,
            last_restocked_at: None,
        }
    }

    #[test]
    fn test_add_then_get_roundtrip() {
        let ledger = StockLedger::new();
        let added = ledger.add_item(record(1, "PROD-001", 45, 10)).unwrap();
        let fetched = ledger.get(ProductId::new(1)).unwrap();
        assert_eq!(added, fetched);
    }

    #[test]
    fn test_add_duplicate_product_id() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let err = ledger.add_item(record(1, "PROD-002", 5, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_add_duplicate_sku() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let err = ledger.add_item(record(2, "PROD-001", 5, 1)).unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_update_merges_fields() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let updated = ledger
            .update_item(
                ProductId::new(1),
                UpdateStockRecord {
                    name: Some("Renamed".to_string()),
                    quantity_on_hand: Some(12),
                    ..UpdateStockRecord::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.quantity_on_hand, 12);
        // Untouched fields survive
        assert_eq!(updated.location, "A1-S1");
    }

    #[test]
    fn test_update_unknown_product() {
        let ledger = StockLedger::new();
        let err = ledger
            .update_item(ProductId::new(9), UpdateStockRecord::default())
            .unwrap_err();
        assert!(matches!(err, LedgerError::NotFound(_)));
    }

    #[test]
    fn test_update_sku_collision() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        ledger.add_item(record(2, "PROD-002", 5, 1)).unwrap();
        let err = ledger
            .update_item(
                ProductId::new(2),
                UpdateStockRecord {
                    sku: Some(Sku::parse("PROD-001").unwrap()),
                    ..UpdateStockRecord::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::DuplicateIdentifier(_)));
    }

    #[test]
    fn test_update_sku_frees_old_sku() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        ledger
            .update_item(
                ProductId::new(1),
                UpdateStockRecord {
                    sku: Some(Sku::parse("PROD-099").unwrap()),
                    ..UpdateStockRecord::default()
                },
            )
            .unwrap();
        // Old SKU is reusable again
        assert!(ledger.add_item(record(2, "PROD-001", 5, 1)).is_ok());
    }

    #[test]
    fn test_remove_item() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let removed = ledger.remove_item(ProductId::new(1)).unwrap();
        assert_eq!(removed.product_id, ProductId::new(1));
        assert!(matches!(
            ledger.get(ProductId::new(1)),
            Err(LedgerError::NotFound(_))
        ));
        // SKU is released with the record
        assert!(ledger.add_item(record(2, "PROD-001", 5, 1)).is_ok());
    }

    #[test]
    fn test_remove_unknown_product() {
        let ledger = StockLedger::new();
        assert!(matches!(
            ledger.remove_item(ProductId::new(1)),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn test_decrease_returns_new_quantity() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 10, 2)).unwrap();
        assert_eq!(ledger.decrease(ProductId::new(1), 4).unwrap(), 6);
    }

    #[test]
    fn test_decrease_clamps_to_zero() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 3, 1)).unwrap();
        // Over-decrease floors at zero, never errors, never goes negative
        assert_eq!(ledger.decrease(ProductId::new(1), 10).unwrap(), 0);
        assert_eq!(ledger.get(ProductId::new(1)).unwrap().quantity_on_hand, 0);
    }

    #[test]
    fn test_increase_unbounded() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        assert_eq!(ledger.increase(ProductId::new(1), 1000).unwrap(), 1005);
    }

    #[test]
    fn test_increase_decrease_sequences_stay_non_negative() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let id = ProductId::new(1);
        for (up, down) in [(3_u32, 9_u32), (0, 4), (7, 2), (1, 100)] {
            ledger.increase(id, up).unwrap();
            ledger.decrease(id, down).unwrap();
            let quantity = ledger.get(id).unwrap().quantity_on_hand;
            assert!(quantity <= 1005, "sanity: {quantity}");
        }
    }

    #[test]
    fn test_restock_stamps_date() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 3, 15).unwrap();
        assert_eq!(ledger.restock(ProductId::new(1), 20, date).unwrap(), 25);
        assert_eq!(
            ledger.get(ProductId::new(1)).unwrap().last_restocked_at,
            Some(date)
        );
    }

    #[test]
    fn test_low_stock_tracks_mutations() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 10, 5)).unwrap();
        assert_eq!(ledger.low_stock_items().count(), 0);

        // qty 10, reorder 5, decrease 6 -> qty 4 -> low stock
        ledger.decrease(ProductId::new(1), 6).unwrap();
        let low: Vec<StockRecord> = ledger.low_stock_items().collect();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].quantity_on_hand, 4);
    }

    #[test]
    fn test_low_stock_is_restartable() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 1, 5)).unwrap();
        assert_eq!(ledger.low_stock_items().count(), 1);
        assert_eq!(ledger.low_stock_items().count(), 1);
    }

    #[test]
    fn test_query_sorted_by_id() {
        let ledger = StockLedger::new();
        ledger.add_item(record(3, "PROD-003", 1, 1)).unwrap();
        ledger.add_item(record(1, "PROD-001", 1, 1)).unwrap();
        ledger.add_item(record(2, "PROD-002", 1, 1)).unwrap();
        let ids: Vec<i32> = ledger.query().iter().map(|r| r.product_id.as_i32()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_check_available() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 3, 1)).unwrap();
        assert!(ledger.check_available(ProductId::new(1), 3).is_ok());
        let err = ledger.check_available(ProductId::new(1), 4).unwrap_err();
        match err {
            LedgerError::InsufficientStock { shortages } => {
                assert_eq!(shortages[0].available, 3);
                assert_eq!(shortages[0].requested, 4);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_commit_sale_all_or_nothing() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 10, 1)).unwrap();
        ledger.add_item(record(2, "PROD-002", 1, 1)).unwrap();

        let err = ledger
            .commit_sale(&[(ProductId::new(1), 5), (ProductId::new(2), 3)])
            .unwrap_err();
        match err {
            LedgerError::InsufficientStock { shortages } => {
                assert_eq!(shortages.len(), 1);
                assert_eq!(shortages[0].product_id, ProductId::new(2));
                assert_eq!(shortages[0].available, 1);
            }
            other => panic!("unexpected error: {other}"),
        }
        // The passing line was not decremented either
        assert_eq!(ledger.get(ProductId::new(1)).unwrap().quantity_on_hand, 10);
        assert_eq!(ledger.get(ProductId::new(2)).unwrap().quantity_on_hand, 1);
    }

    #[test]
    fn test_commit_sale_applies_every_line() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 10, 1)).unwrap();
        ledger.add_item(record(2, "PROD-002", 4, 1)).unwrap();

        ledger
            .commit_sale(&[(ProductId::new(2), 4), (ProductId::new(1), 5)])
            .unwrap();
        assert_eq!(ledger.get(ProductId::new(1)).unwrap().quantity_on_hand, 5);
        assert_eq!(ledger.get(ProductId::new(2)).unwrap().quantity_on_hand, 0);
    }

    #[test]
    fn test_commit_sale_merges_duplicate_lines() {
        let ledger = StockLedger::new();
        ledger.add_item(record(1, "PROD-001", 5, 1)).unwrap();

        // 3 + 3 > 5, so the merged demand must be rejected
        let err = ledger
            .commit_sale(&[(ProductId::new(1), 3), (ProductId::new(1), 3)])
            .unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientStock { .. }));
        assert_eq!(ledger.get(ProductId::new(1)).unwrap().quantity_on_hand, 5);
    }

    #[test]
    fn test_commit_sale_deleted_record_is_zero_stock() {
        let ledger = StockLedger::new();
        let err = ledger
            .commit_sale(&[(ProductId::new(7), 1)])
            .unwrap_err();
        match err {
            LedgerError::InsufficientStock { shortages } => {
                assert_eq!(shortages[0].available, 0);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_commit_sale_empty_is_noop() {
        let ledger = StockLedger::new();
        assert!(ledger.commit_sale(&[]).is_ok());
    }
}
