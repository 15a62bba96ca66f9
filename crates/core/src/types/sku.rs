//! Stock-keeping unit (SKU) type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Sku`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SkuError {
    /// The input string is empty.
    #[error("SKU cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("SKU must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The input contains a character outside `[A-Za-z0-9_-]`.
    #[error("SKU contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// A human-readable stock-keeping unit, unique per ledger.
///
/// ## Constraints
///
/// - Length: 1-64 characters
/// - ASCII letters, digits, `-`, and `_` only
/// - Stored uppercase so lookups are case-insensitive
///
/// ## Examples
///
/// ```
/// use stockroom_core::Sku;
///
/// assert!(Sku::parse("PROD-001").is_ok());
/// assert!(Sku::parse("prod-001").is_ok()); // normalized to PROD-001
///
/// assert!(Sku::parse("").is_err());
/// assert!(Sku::parse("PROD 001").is_err()); // whitespace
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    /// Maximum length of a SKU.
    pub const MAX_LENGTH: usize = 64;

    /// Parse a `Sku` from a string, normalizing to uppercase.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty
    /// - Is longer than 64 characters
    /// - Contains a character outside `[A-Za-z0-9_-]`
    pub fn parse(s: &str) -> Result<Self, SkuError> {
        if s.is_empty() {
            return Err(SkuError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SkuError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if let Some(c) = s
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SkuError::InvalidCharacter(c));
        }

        Ok(Self(s.to_ascii_uppercase()))
    }

    /// Returns the SKU as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Sku` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Sku {
    type Err = SkuError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Sku {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
