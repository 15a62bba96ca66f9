//! Scripted checkout walk-through.
//!
//! # Usage
//!
//! ```bash
//! sr-cli demo
//! ```
//!
//! Seeds the demo catalog, fills a cart, walks the full checkout pipeline
//! (including a deliberately over-stock quantity change that the ledger
//! pre-check rejects), and prints the resulting order.

use secrecy::SecretString;
use thiserror::Error;

use stockroom_core::ProductId;
use stockroom_engine::{
    Cart, CartError, CheckoutError, CheckoutSession, LedgerError, PaymentDetails,
    ShippingDetails,
};

use crate::catalog::{self, CatalogError};
use crate::config::{self, ConfigError};

/// Errors from the demo run.
#[derive(Debug, Error)]
pub enum DemoError {
    /// Catalog seeding failed.
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// Pricing configuration failed to load.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// A ledger read failed.
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// A cart operation failed.
    #[error(transparent)]
    Cart(#[from] CartError),

    /// A checkout step failed.
    #[error(transparent)]
    Checkout(#[from] CheckoutError),
}

const HEADPHONES: ProductId = ProductId::new(1);
const USB_C_HUB: ProductId = ProductId::new(6);

/// Run the scripted checkout.
///
/// # Errors
///
/// Returns [`DemoError`] if any step of the walk-through fails
/// unexpectedly.
#[allow(clippy::print_stdout)]
pub fn run() -> Result<(), DemoError> {
    let ledger = catalog::seed_ledger()?;
    let pricing = config::pricing_from_env()?;

    let mut cart = Cart::new();
    cart.add_line(&ledger.get(HEADPHONES)?, 1)?;
    cart.add_line(&ledger.get(USB_C_HUB)?, 2)?;
    println!("Cart: {} unit(s), subtotal {}", cart.item_count(), cart.total());

    // The hub only has 3 on hand; the ledger pre-check gates the UI gesture.
    match ledger.check_available(USB_C_HUB, 5) {
        Err(LedgerError::InsufficientStock { shortages }) => {
            for s in &shortages {
                println!(
                    "Cannot set quantity to {}: only {} left in stock",
                    s.requested, s.available
                );
            }
        }
        other => other?,
    }

    let mut session = CheckoutSession::start(cart);
    session.submit_shipping(ShippingDetails {
        first_name: "Jordan".to_string(),
        last_name: "Reyes".to_string(),
        email: "jordan@example.com".to_string(),
        phone: "555-0134".to_string(),
        address: "42 Warehouse Row".to_string(),
        city: "Springfield".to_string(),
        state: "OR".to_string(),
        postal_code: "97477".to_string(),
    })?;
    session.submit_payment(PaymentDetails {
        card_number: SecretString::from("4242 4242 4242 4242".to_string()),
        card_name: "Jordan Reyes".to_string(),
        expiry: "09/28".to_string(),
        cvv: SecretString::from("123".to_string()),
    })?;

    let order = session.commit(&ledger, &pricing)?;

    println!();
    println!("Order {} ({})", order.reference, order.id);
    for line in &order.lines {
        println!(
            "  {} x {:<22} {}",
            line.quantity,
            line.name,
            line.unit_price.times(line.quantity)
        );
    }
    println!("  Subtotal {}", order.subtotal);
    println!("  Shipping {}", order.shipping);
    println!("  Tax      {}", order.tax);
    println!("  Total    {}", order.total);
    println!("  Paid with {}", order.payment_reference);

    println!();
    println!("Low stock after checkout:");
    for record in ledger.low_stock_items() {
        println!(
            "  {:<10} {:<22} {} / {}",
            record.sku, record.name, record.quantity_on_hand, record.reorder_point
        );
    }
    Ok(())
}
