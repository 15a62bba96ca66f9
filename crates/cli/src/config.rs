//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `STOCKROOM_SHIPPING_FEE` - Flat shipping fee (default: 10.00)
//! - `STOCKROOM_TAX_RATE` - Tax rate on the subtotal (default: 0.07)

use rust_decimal::Decimal;
use thiserror::Error;

use stockroom_engine::PricingConfig;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// An environment variable is set but unparseable.
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(&'static str, String),
}

/// Load checkout pricing, applying env-var overrides over the defaults.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidEnvVar`] if an override is not a valid
/// decimal.
pub fn pricing_from_env() -> Result<PricingConfig, ConfigError> {
    dotenvy::dotenv().ok();

    let mut pricing = PricingConfig::default();
    if let Some(fee) = parse_env("STOCKROOM_SHIPPING_FEE")? {
        pricing.shipping_fee = fee;
    }
    if let Some(rate) = parse_env("STOCKROOM_TAX_RATE")? {
        pricing.tax_rate = rate;
    }
    Ok(pricing)
}

fn parse_env(name: &'static str) -> Result<Option<Decimal>, ConfigError> {
    match std::env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidEnvVar(name, e.to_string())),
        Err(_) => Ok(None),
    }
}
