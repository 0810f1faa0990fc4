//! Cart lines

use std::fmt;

use rusty_money::{Money, iso::Currency};
use thiserror::Error;

/// Errors raised when constructing or totalling a cart line.
#[derive(Debug, Error, PartialEq)]
pub enum LineError {
    /// Quantity below one.
    #[error("line {sku} has quantity 0; must be at least 1")]
    ZeroQuantity {
        /// Sku of the offending line.
        sku: Sku,
    },

    /// Negative unit price.
    #[error("line {sku} has a negative unit price")]
    NegativePrice {
        /// Sku of the offending line.
        sku: Sku,
    },

    /// Line total overflowed minor-unit arithmetic.
    #[error("line total for {sku} overflows")]
    Overflow {
        /// Sku of the offending line.
        sku: Sku,
    },
}

/// Stable product identifier (slug).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Sku(String);

impl Sku {
    /// Create a sku from any string-like value.
    pub fn new(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    /// Return the sku as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Sku {
    fn from(sku: &str) -> Self {
        Self::new(sku)
    }
}

/// One purchasable line: a sku, a unit price and a quantity.
///
/// Construction validates the line, so a `CartLine` with a zero quantity or a
/// negative unit price cannot exist.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine<'a> {
    sku: Sku,
    unit_price: Money<'a, Currency>,
    quantity: u32,
}

impl<'a> CartLine<'a> {
    /// Create a validated cart line.
    ///
    /// # Errors
    ///
    /// - [`LineError::ZeroQuantity`]: `quantity` is zero.
    /// - [`LineError::NegativePrice`]: `unit_price` is below zero.
    pub fn new(
        sku: impl Into<Sku>,
        unit_price: Money<'a, Currency>,
        quantity: u32,
    ) -> Result<Self, LineError> {
        let sku = sku.into();

        if quantity == 0 {
            return Err(LineError::ZeroQuantity { sku });
        }

        if unit_price.to_minor_units() < 0 {
            return Err(LineError::NegativePrice { sku });
        }

        Ok(Self {
            sku,
            unit_price,
            quantity,
        })
    }

    /// Returns the sku of the line.
    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    /// Returns the unit price of the line.
    pub fn unit_price(&self) -> &Money<'a, Currency> {
        &self.unit_price
    }

    /// Returns the quantity of the line.
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// The line's contribution to the subtotal: `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// - [`LineError::Overflow`]: the multiplication overflows minor units.
    pub fn line_total(&self) -> Result<Money<'a, Currency>, LineError> {
        let minor = self
            .unit_price
            .to_minor_units()
            .checked_mul(i64::from(self.quantity))
            .ok_or_else(|| LineError::Overflow {
                sku: self.sku.clone(),
            })?;

        Ok(Money::from_minor(minor, self.unit_price.currency()))
    }
}
