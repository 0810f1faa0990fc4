//! Pricing arithmetic
//!
//! Shared minor-unit arithmetic used by subtotals, coupon discounts and
//! sales tax.

use decimal_percentage::Percentage;
use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{Money, MoneyError, iso::Currency};
use thiserror::Error;

use crate::lines::{CartLine, LineError};

/// Errors that can occur while calculating prices.
#[derive(Debug, Error)]
pub enum PricingError {
    /// No lines were provided, so currency could not be determined.
    #[error("no lines provided; cannot determine currency")]
    NoLines,

    /// Percentage calculation could not be safely converted.
    #[error("percentage conversion overflowed or was not finite")]
    PercentConversion,

    /// Wrapped line validation or line total error.
    #[error(transparent)]
    Line(#[from] LineError),

    /// Wrapped money arithmetic or currency mismatch error.
    #[error(transparent)]
    Money(#[from] MoneyError),
}

/// Calculates the subtotal of a list of cart lines.
///
/// # Errors
///
/// - [`PricingError::NoLines`]: No lines were provided, so currency could not be determined.
/// - [`PricingError::Line`]: A line total overflowed.
/// - [`PricingError::Money`]: Wrapped money arithmetic or currency mismatch error.
pub fn subtotal<'a>(lines: &[CartLine<'a>]) -> Result<Money<'a, Currency>, PricingError> {
    let first = lines.first().ok_or(PricingError::NoLines)?;

    let total = lines.iter().try_fold(
        Money::from_minor(0, first.unit_price().currency()),
        |acc, line| -> Result<Money<'a, Currency>, PricingError> {
            Ok(acc.add(line.line_total()?)?)
        },
    )?;

    Ok(total)
}

/// Calculate a percentage of a minor-unit amount, rounded half away from zero.
///
/// This is the single rounding point for all percentage maths (coupon
/// discounts, sales tax), so currency display never drifts.
///
/// # Errors
///
/// Returns an error if:
/// - The percentage calculation overflows or cannot be safely represented (`PricingError::PercentConversion`).
pub fn percent_of_minor(percent: &Percentage, minor: i64) -> Result<i64, PricingError> {
    let minor = Decimal::from_i64(minor).ok_or(PricingError::PercentConversion)?;

    ((*percent) * Decimal::ONE) // decimal_percentage crate doesn't actually expose the underlying Decimal
        .checked_mul(minor)
        .ok_or(PricingError::PercentConversion)?
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PricingError::PercentConversion)
}
