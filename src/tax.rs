//! Sales tax

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{PricingError, percent_of_minor};

/// Errors specific to sales tax calculation.
#[derive(Debug, Error)]
pub enum TaxError {
    /// Rate outside the valid [0, 1] fractional range.
    #[error("tax rate must be a fraction between 0 and 1")]
    RateOutOfRange,

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// A fractional sales-tax rate in [0, 1] (e.g., 0.07 for 7%).
#[derive(Debug, Clone, Copy)]
pub struct TaxRate(Percentage);

impl TaxRate {
    /// Create a validated tax rate.
    ///
    /// # Errors
    ///
    /// - [`TaxError::RateOutOfRange`]: the fraction is below 0 or above 1.
    pub fn new(rate: Percentage) -> Result<Self, TaxError> {
        let fraction = rate * Decimal::ONE;

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(TaxError::RateOutOfRange);
        }

        Ok(Self(rate))
    }

    /// A zero rate, for tax-free quotes.
    #[must_use]
    pub fn zero() -> Self {
        Self(Percentage::from(0.0))
    }

    /// Return the fractional rate.
    pub const fn rate(&self) -> &Percentage {
        &self.0
    }

    /// Calculate the sales tax on a subtotal.
    ///
    /// Tax is charged on the pre-discount subtotal. That matches the
    /// storefront's observed policy; confirm with the business owner before
    /// switching to a post-discount base.
    ///
    /// # Errors
    ///
    /// - [`TaxError::Pricing`]: percentage arithmetic overflowed.
    pub fn tax_on<'a>(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, TaxError> {
        let minor = percent_of_minor(&self.0, subtotal.to_minor_units())?;

        Ok(Money::from_minor(minor, subtotal.currency()))
    }
}
