//! The shopping cart: a session's provisional selection.
//!
//! The cart only enforces local shape invariants (quantity >= 1). Stock
//! truth lives in the ledger and is re-checked at decision points: the UI
//! collaborator gates quantity changes with
//! [`StockLedger::check_available`](crate::ledger::StockLedger::check_available),
//! and checkout commit re-validates every line. Unit prices are snapshotted
//! at add time and never re-read afterward.

use serde::Serialize;

use stockroom_core::{CurrencyCode, Price, ProductId};

use crate::error::CartError;
use crate::ledger::StockRecord;

/// One product in the cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    /// Product this line references. The record itself may have changed or
    /// been deleted since the line was created.
    pub product_id: ProductId,
    /// Name at add time.
    pub name: String,
    /// Selling price at add time.
    pub unit_price: Price,
    /// Requested quantity, always >= 1.
    pub quantity: u32,
    /// Image URL at add time.
    pub image_url: Option<String>,
}

impl CartLine {
    /// Price times quantity for this line.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.unit_price.times(self.quantity)
    }
}

/// A single-owner, per-session cart.
///
/// Lines keep their insertion order for display.
#[derive(Debug, Clone, Default)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `quantity` units of a product.
    ///
    /// If a line for this product already exists its quantity is increased;
    /// otherwise a new line snapshots the product's current selling price.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is 0.
    pub fn add_line(&mut self, product: &StockRecord, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == product.product_id)
        {
            line.quantity = line.quantity.saturating_add(quantity);
        } else {
            self.lines.push(CartLine {
                product_id: product.product_id,
                name: product.name.clone(),
                unit_price: product.selling_price,
                quantity,
                image_url: product.image_url.clone(),
            });
        }
        Ok(())
    }

    /// Overwrite a line's quantity.
    ///
    /// The caller is responsible for checking the new quantity against
    /// current ledger stock first; the cart does not re-validate.
    ///
    /// # Errors
    ///
    /// Returns [`CartError::InvalidQuantity`] if `quantity` is 0 and
    /// [`CartError::NotFound`] if no line references this product.
    pub fn set_quantity(&mut self, id: ProductId, quantity: u32) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity);
        }
        let line = self
            .lines
            .iter_mut()
            .find(|line| line.product_id == id)
            .ok_or(CartError::NotFound(id))?;
        line.quantity = quantity;
        Ok(())
    }

    /// Remove a line, returning it if it existed.
    pub fn remove_line(&mut self, id: ProductId) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.product_id == id)?;
        Some(self.lines.remove(index))
    }

    /// Discard all lines.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// The lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Total number of units across all lines (the cart badge count).
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines
            .iter()
            .fold(0, |count, line| count.saturating_add(line.quantity))
    }

    /// Sum of unit price times quantity over all lines.
    #[must_use]
    pub fn total(&self) -> Price {
        let currency = self
            .lines
            .first()
            .map_or_else(CurrencyCode::default, |line| line.unit_price.currency_code);
        self.lines
            .iter()
            .fold(Price::zero(currency), |total, line| {
                total.plus(&line.line_total())
            })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal_macros::dec;
    use stockroom_core::Sku;

    use super::*;

    fn product(id: i32, selling_price: rust_decimal::Decimal) -> StockRecord {
        StockRecord {
            product_id: ProductId::new(id),
            sku: Sku::parse(format!("PROD-{id:03}").as_str()).unwrap(),
            name: format!("Product {id}"),
            category: "Electronics".to_string(),
            quantity_on_hand: 50,
            reorder_point: 10,
            cost_price: Price::new(dec!(10.00), CurrencyCode::USD),
            selling_price: Price::new(selling_price, CurrencyCode::USD),
            location: "A1-S1".to_string(),
            supplier: "Test Suppliers Inc.".to_string(),
            image_url: Some("https://example.com/p.jpg".to_string()),
            last_restocked_at: None,
        }
    }

    #[test]
    fn test_add_line_snapshots_price() {
        let mut cart = Cart::new();
        let mut p = product(1, dec!(29.99));
        cart.add_line(&p, 2).unwrap();

        // Later price changes do not affect the existing line
        p.selling_price = Price::new(dec!(99.99), CurrencyCode::USD);
        assert_eq!(cart.lines()[0].unit_price.amount, dec!(29.99));
    }

    #[test]
    fn test_add_line_merges_same_product() {
        let mut cart = Cart::new();
        let p = product(1, dec!(29.99));
        cart.add_line(&p, 2).unwrap();
        cart.add_line(&p, 3).unwrap();
        assert_eq!(cart.lines().len(), 1);
        assert_eq!(cart.lines()[0].quantity, 5);
    }

    #[test]
    fn test_add_line_zero_quantity_rejected() {
        let mut cart = Cart::new();
        let err = cart.add_line(&product(1, dec!(29.99)), 0).unwrap_err();
        assert!(matches!(err, CartError::InvalidQuantity));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_set_quantity() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, dec!(29.99)), 2).unwrap();
        cart.set_quantity(ProductId::new(1), 7).unwrap();
        assert_eq!(cart.lines()[0].quantity, 7);
    }

    #[test]
    fn test_set_quantity_zero_rejected() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, dec!(29.99)), 2).unwrap();
        assert!(matches!(
            cart.set_quantity(ProductId::new(1), 0),
            Err(CartError::InvalidQuantity)
        ));
    }

    #[test]
    fn test_set_quantity_unknown_line() {
        let mut cart = Cart::new();
        assert!(matches!(
            cart.set_quantity(ProductId::new(1), 1),
            Err(CartError::NotFound(_))
        ));
    }

    #[test]
    fn test_remove_line() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, dec!(29.99)), 2).unwrap();
        let removed = cart.remove_line(ProductId::new(1)).unwrap();
        assert_eq!(removed.quantity, 2);
        assert!(cart.is_empty());
        assert!(cart.remove_line(ProductId::new(1)).is_none());
    }

    #[test]
    fn test_clear() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, dec!(29.99)), 2).unwrap();
        cart.add_line(&product(2, dec!(9.99)), 1).unwrap();
        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.item_count(), 0);
    }

    #[test]
    fn test_total_and_item_count() {
        let mut cart = Cart::new();
        cart.add_line(&product(1, dec!(29.99)), 2).unwrap();
        cart.add_line(&product(2, dec!(10.00)), 3).unwrap();
        assert_eq!(cart.total().amount, dec!(89.98));
        assert_eq!(cart.item_count(), 5);
    }

    #[test]
    fn test_empty_cart_total_is_zero() {
        let cart = Cart::new();
        assert_eq!(cart.total().amount, rust_decimal::Decimal::ZERO);
    }
}
