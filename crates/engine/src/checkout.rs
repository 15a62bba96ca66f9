//! The checkout pipeline: shipping -> payment -> review -> placed.
//!
//! A [`CheckoutSession`] owns the cart for the duration of checkout.
//! Every transition except commit is side-effect free; commit is the one
//! place the ledger is mutated, and it is all-or-nothing across the whole
//! cart via [`StockLedger::commit_sale`](crate::ledger::StockLedger::commit_sale).
//! A committed session rejects repeat commits with the original order ID.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use rand::Rng;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use stockroom_core::{CurrencyCode, OrderId, Price, ProductId};

use crate::alerts::{AlertSink, TracingSink};
use crate::cart::Cart;
use crate::error::{CheckoutError, LedgerError};
use crate::ledger::StockLedger;

/// Pipeline steps. `Placed` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Shipping,
    Payment,
    Review,
    Placed,
}

/// Shipping fields captured on the first step.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShippingDetails {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
}

impl ShippingDetails {
    /// Names of required fields that are empty or whitespace.
    fn missing_fields(&self) -> Vec<&'static str> {
        let fields = [
            ("first_name", &self.first_name),
            ("last_name", &self.last_name),
            ("email", &self.email),
            ("phone", &self.phone),
            ("address", &self.address),
            ("city", &self.city),
            ("state", &self.state),
            ("postal_code", &self.postal_code),
        ];
        fields
            .into_iter()
            .filter(|(_, value)| value.trim().is_empty())
            .map(|(name, _)| name)
            .collect()
    }
}

/// Payment fields captured on the second step.
///
/// Card number and CVV are held as secrets, never serialized, and never
/// persisted beyond the session. Only the masked last four digits reach
/// the order record. Format validation beyond non-emptiness is a UI
/// concern.
#[derive(Debug)]
pub struct PaymentDetails {
    pub card_number: SecretString,
    pub card_name: String,
    pub expiry: String,
    pub cvv: SecretString,
}

impl PaymentDetails {
    /// Names of required fields that are empty or whitespace.
    fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.card_number.expose_secret().trim().is_empty() {
            missing.push("card_number");
        }
        if self.card_name.trim().is_empty() {
            missing.push("card_name");
        }
        if self.expiry.trim().is_empty() {
            missing.push("expiry");
        }
        if self.cvv.expose_secret().trim().is_empty() {
            missing.push("cvv");
        }
        missing
    }

    /// Masked display reference, e.g. `**** **** **** 1234`.
    fn masked_reference(&self) -> String {
        let digits: String = self
            .card_number
            .expose_secret()
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        let last4 = digits
            .get(digits.len().saturating_sub(4)..)
            .unwrap_or_default();
        format!("**** **** **** {last4}")
    }
}

/// One line of an order snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Price,
    pub quantity: u32,
}

/// An immutable record of a successful checkout commit.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    /// Unique ID, never reused.
    pub id: OrderId,
    /// Human-readable display reference, e.g. `ORD-482913`.
    pub reference: String,
    /// Snapshot of the cart at commit time.
    pub lines: Vec<OrderLine>,
    pub subtotal: Price,
    pub shipping: Price,
    pub tax: Price,
    pub total: Price,
    /// Shipping address snapshot.
    pub shipping_address: ShippingDetails,
    /// Masked payment reference; the full card data is never stored.
    pub payment_reference: String,
    pub placed_at: DateTime<Utc>,
}

/// Fees applied at commit: a flat shipping fee and a tax rate on the
/// subtotal.
#[derive(Debug, Clone)]
pub struct PricingConfig {
    pub shipping_fee: Decimal,
    pub tax_rate: Decimal,
    pub currency: CurrencyCode,
}

impl Default for PricingConfig {
    /// $10.00 flat shipping and 7% tax.
    fn default() -> Self {
        Self {
            shipping_fee: dec!(10.00),
            tax_rate: dec!(0.07),
            currency: CurrencyCode::USD,
        }
    }
}

/// A single customer's walk through checkout.
///
/// Owns the cart until the session either commits (cart destroyed with the
/// session's purpose fulfilled) or is abandoned (cart handed back intact).
pub struct CheckoutSession {
    cart: Cart,
    step: CheckoutStep,
    shipping: Option<ShippingDetails>,
    payment: Option<PaymentDetails>,
    is_processing: bool,
    committed: Option<OrderId>,
    alerts: Arc<dyn AlertSink>,
}

impl std::fmt::Debug for CheckoutSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckoutSession")
            .field("step", &self.step)
            .field("is_processing", &self.is_processing)
            .field("committed", &self.committed)
            .field("lines", &self.cart.lines().len())
            .finish_non_exhaustive()
    }
}

impl CheckoutSession {
    /// Begin checkout for a cart, reporting through the default
    /// [`TracingSink`].
    #[must_use]
    pub fn start(cart: Cart) -> Self {
        Self::with_alerts(cart, Arc::new(TracingSink))
    }

    /// Begin checkout with a custom alert sink.
    #[must_use]
    pub fn with_alerts(cart: Cart, alerts: Arc<dyn AlertSink>) -> Self {
        Self {
            cart,
            step: CheckoutStep::Shipping,
            shipping: None,
            payment: None,
            is_processing: false,
            committed: None,
            alerts,
        }
    }

    /// Current pipeline step.
    #[must_use]
    pub const fn step(&self) -> CheckoutStep {
        self.step
    }

    /// Whether a commit is currently applying.
    #[must_use]
    pub const fn is_processing(&self) -> bool {
        self.is_processing
    }

    /// The order produced by a successful commit, if any.
    #[must_use]
    pub const fn committed_order(&self) -> Option<OrderId> {
        self.committed
    }

    /// The cart being checked out.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Abandon the session, handing the cart back untouched.
    ///
    /// Allowed at any point before a successful commit; once commit has
    /// begun applying it runs to completion or rollback internally.
    #[must_use]
    pub fn abandon(self) -> Cart {
        self.cart
    }

    /// Capture shipping details and advance to the payment step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] listing empty required fields
    /// (no state changes on failure), or
    /// [`CheckoutError::InvalidTransition`] if the session is not on the
    /// shipping step.
    pub fn submit_shipping(&mut self, details: ShippingDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Shipping, CheckoutStep::Payment)?;

        let missing = details.missing_fields();
        if !missing.is_empty() {
            self.alerts.validation_failed(&missing);
            return Err(CheckoutError::Validation { missing });
        }

        self.shipping = Some(details);
        self.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Capture payment details and advance to the review step.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::Validation`] listing empty required fields
    /// (no state changes on failure), or
    /// [`CheckoutError::InvalidTransition`] if the session is not on the
    /// payment step.
    pub fn submit_payment(&mut self, details: PaymentDetails) -> Result<(), CheckoutError> {
        self.expect_step(CheckoutStep::Payment, CheckoutStep::Review)?;

        let missing = details.missing_fields();
        if !missing.is_empty() {
            self.alerts.validation_failed(&missing);
            return Err(CheckoutError::Validation { missing });
        }

        self.payment = Some(details);
        self.step = CheckoutStep::Review;
        Ok(())
    }

    /// Step backward to edit an earlier step. No side effects.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::InvalidTransition`] for anything other than
    /// review -> shipping, review -> payment, or payment -> shipping.
    pub fn go_back_to(&mut self, step: CheckoutStep) -> Result<(), CheckoutError> {
        match (self.step, step) {
            (CheckoutStep::Review, CheckoutStep::Shipping | CheckoutStep::Payment)
            | (CheckoutStep::Payment, CheckoutStep::Shipping) => {
                self.step = step;
                Ok(())
            }
            (from, to) => Err(CheckoutError::InvalidTransition { from, to }),
        }
    }

    /// Commit the checkout: re-validate every cart line against current
    /// stock, decrement atomically, and produce the immutable order.
    ///
    /// On a stock shortage the session stays on the review step, nothing is
    /// mutated, and the error identifies the offending lines. A repeat call
    /// after success returns [`CheckoutError::AlreadyCommitted`] with the
    /// original order ID and does not touch the ledger again.
    ///
    /// # Errors
    ///
    /// [`CheckoutError::AlreadyCommitted`], [`CheckoutError::InvalidTransition`]
    /// (not on review), [`CheckoutError::EmptyCart`] (rejected before the
    /// ledger is consulted), or [`CheckoutError::Ledger`] carrying
    /// [`LedgerError::InsufficientStock`].
    #[instrument(skip(self, ledger, pricing), fields(step = ?self.step))]
    pub fn commit(
        &mut self,
        ledger: &StockLedger,
        pricing: &PricingConfig,
    ) -> Result<Order, CheckoutError> {
        if let Some(order_id) = self.committed {
            return Err(CheckoutError::AlreadyCommitted { order_id });
        }
        self.expect_step(CheckoutStep::Review, CheckoutStep::Placed)?;
        if self.cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        // The FSM guarantees both are present on the review step.
        let Some(shipping_address) = self.shipping.clone() else {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Placed,
            });
        };
        let Some(payment) = self.payment.as_ref() else {
            return Err(CheckoutError::InvalidTransition {
                from: self.step,
                to: CheckoutStep::Placed,
            });
        };
        let payment_reference = payment.masked_reference();

        self.is_processing = true;
        let lines: Vec<(ProductId, u32)> = self
            .cart
            .lines()
            .iter()
            .map(|line| (line.product_id, line.quantity))
            .collect();

        if let Err(err) = ledger.commit_sale(&lines) {
            self.is_processing = false;
            if let LedgerError::InsufficientStock { shortages } = &err {
                self.alerts.insufficient_stock(shortages);
            }
            // Stay on review so the customer can fix the offending lines.
            return Err(err.into());
        }

        let subtotal = self.cart.total();
        let shipping = Price::new(pricing.shipping_fee, pricing.currency);
        let tax = Price::new(
            (subtotal.amount * pricing.tax_rate).round_dp(2),
            pricing.currency,
        );
        let total = subtotal.plus(&shipping).plus(&tax);

        let order = Order {
            id: OrderId::generate(),
            reference: generate_reference(),
            lines: self
                .cart
                .lines()
                .iter()
                .map(|line| OrderLine {
                    product_id: line.product_id,
                    name: line.name.clone(),
                    unit_price: line.unit_price,
                    quantity: line.quantity,
                })
                .collect(),
            subtotal,
            shipping,
            tax,
            total,
            shipping_address,
            payment_reference,
            placed_at: Utc::now(),
        };

        self.cart.clear();
        self.step = CheckoutStep::Placed;
        self.committed = Some(order.id);
        self.is_processing = false;

        tracing::info!(
            order_id = %order.id,
            reference = %order.reference,
            total = %order.total,
            "order placed"
        );
        Ok(order)
    }

    fn expect_step(&self, expected: CheckoutStep, to: CheckoutStep) -> Result<(), CheckoutError> {
        if self.step == expected {
            Ok(())
        } else {
            Err(CheckoutError::InvalidTransition {
                from: self.step,
                to,
            })
        }
    }
}

/// Six-digit display reference in the storefront's `ORD-nnnnnn` format.
fn generate_reference() -> String {
    let digits = rand::rng().random_range(100_000..1_000_000);
    format!("ORD-{digits}")
}
