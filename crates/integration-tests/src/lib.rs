//! Shared fixtures for Stockroom integration tests.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::unwrap_used)]

use rust_decimal_macros::dec;
use secrecy::SecretString;

use stockroom_core::{CurrencyCode, Price, ProductId, Sku};
use stockroom_engine::{
    Cart, CheckoutSession, NewStockRecord, PaymentDetails, ShippingDetails, StockLedger,
};

/// Build a catalog entry with the given id, quantity, and reorder point.
#[must_use]
pub fn stock_record(id: i32, quantity: u32, reorder_point: u32) -> NewStockRecord {
    NewStockRecord {
        product_id: ProductId::new(id),
        sku: Sku::parse(&format!("PROD-{id:03}")).unwrap(),
        name: format!("Product {id}"),
        category: "Electronics".to_string(),
        quantity_on_hand: quantity,
        reorder_point,
        cost_price: Price::new(dec!(10.00), CurrencyCode::USD),
        selling_price: Price::new(dec!(25.00), CurrencyCode::USD),
        location: "A1-S1".to_string(),
        supplier: "Test Suppliers Inc.".to_string(),
        image_url: None,
        last_restocked_at: None,
    }
}

/// Build a ledger from `(id, quantity, reorder_point)` triples.
#[must_use]
pub fn seeded_ledger(items: &[(i32, u32, u32)]) -> StockLedger {
    let ledger = StockLedger::new();
    for (id, quantity, reorder_point) in items {
        ledger
            .add_item(stock_record(*id, *quantity, *reorder_point))
            .unwrap();
    }
    ledger
}

/// Complete shipping details.
#[must_use]
pub fn shipping_details() -> ShippingDetails {
    ShippingDetails {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        email: "ada@example.com".to_string(),
        phone: "555-0100".to_string(),
        address: "1 Analytical Way".to_string(),
        city: "London".to_string(),
        state: "LDN".to_string(),
        postal_code: "EC1A".to_string(),
    }
}

/// Complete payment details.
#[must_use]
pub fn payment_details() -> PaymentDetails {
    PaymentDetails {
        card_number: SecretString::from("4242 4242 4242 4242".to_string()),
        card_name: "Ada Lovelace".to_string(),
        expiry: "12/27".to_string(),
        cvv: SecretString::from("123".to_string()),
    }
}

/// Fill a cart from the ledger and drive a session to the review step.
#[must_use]
pub fn session_at_review(ledger: &StockLedger, items: &[(i32, u32)]) -> CheckoutSession {
    let mut cart = Cart::new();
    for (id, quantity) in items {
        let record = ledger.get(ProductId::new(*id)).unwrap();
        cart.add_line(&record, *quantity).unwrap();
    }
    let mut session = CheckoutSession::start(cart);
    session.submit_shipping(shipping_details()).unwrap();
    session.submit_payment(payment_details()).unwrap();
    session
}
