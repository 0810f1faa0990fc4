//! Coupons
//!
//! An administrator-defined discount rule identified by a case-insensitive
//! code, with a percentage or flat-amount kind and an optional minimum-order
//! gate. Coupons arrive already resolved; lookup and expiry are the catalog
//! subsystem's concern.

use std::fmt;

use decimal_percentage::Percentage;
use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use thiserror::Error;

use crate::pricing::{PricingError, percent_of_minor};

/// Errors specific to coupon validation and discount calculations.
#[derive(Debug, Error)]
pub enum CouponError {
    /// Percentage outside the valid 0%..=100% range.
    #[error("coupon percentage must be between 0% and 100%")]
    PercentOutOfRange,

    /// Flat discount amount below zero.
    #[error("coupon amount must not be negative")]
    NegativeAmount,

    /// Subtotal below the coupon's minimum order value. The caller treats
    /// this as "no discount, warn the user", not as an abort.
    #[error(
        "coupon {code} requires a minimum subtotal of {minimum_minor} minor units, got {subtotal_minor}"
    )]
    BelowMinimum {
        /// Code of the rejected coupon.
        code: CouponCode,
        /// Minimum order value in minor units.
        minimum_minor: i64,
        /// Actual subtotal in minor units.
        subtotal_minor: i64,
    },

    /// Coupon money uses a different currency than the subtotal.
    #[error("coupon currency {found} does not match subtotal currency {expected}")]
    CurrencyMismatch {
        /// Currency of the subtotal.
        expected: &'static str,
        /// Currency carried by the coupon.
        found: &'static str,
    },

    /// Wrapped percentage arithmetic error.
    #[error(transparent)]
    Pricing(#[from] PricingError),
}

/// Case-insensitive coupon code.
///
/// Normalised to a trimmed, lowercased form on construction; equality and
/// hashing use the normalised form, so `SAVE10` and `save10` are the same
/// coupon.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CouponCode(String);

impl CouponCode {
    /// Create a coupon code, normalising case and surrounding whitespace.
    pub fn new(code: impl AsRef<str>) -> Self {
        Self(code.as_ref().trim().to_lowercase())
    }

    /// Return the normalised code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CouponCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CouponCode {
    fn from(code: &str) -> Self {
        Self::new(code)
    }
}

/// Discount kind for a coupon.
#[derive(Debug, Copy, Clone)]
pub enum CouponKind<'a> {
    /// Apply a fractional percentage of the subtotal (e.g., 0.10 for "10% off").
    PercentageOff(Percentage),

    /// Subtract a fixed amount from the subtotal (e.g., "$5 off"), clamped
    /// so the discount never exceeds the subtotal.
    AmountOff(Money<'a, Currency>),
}

/// An administrator-defined discount rule.
#[derive(Debug, Clone)]
pub struct Coupon<'a> {
    code: CouponCode,
    kind: CouponKind<'a>,
    min_order_value: Option<Money<'a, Currency>>,
}

impl<'a> Coupon<'a> {
    /// Create a percentage coupon from a fractional percentage in [0, 1].
    ///
    /// # Errors
    ///
    /// - [`CouponError::PercentOutOfRange`]: the fraction is below 0 or above 1.
    pub fn percentage_off(
        code: impl Into<CouponCode>,
        percent: Percentage,
    ) -> Result<Self, CouponError> {
        let fraction = percent * Decimal::ONE;

        if fraction < Decimal::ZERO || fraction > Decimal::ONE {
            return Err(CouponError::PercentOutOfRange);
        }

        Ok(Self {
            code: code.into(),
            kind: CouponKind::PercentageOff(percent),
            min_order_value: None,
        })
    }

    /// Create a flat-amount coupon.
    ///
    /// # Errors
    ///
    /// - [`CouponError::NegativeAmount`]: the amount is below zero.
    pub fn amount_off(
        code: impl Into<CouponCode>,
        amount: Money<'a, Currency>,
    ) -> Result<Self, CouponError> {
        if amount.to_minor_units() < 0 {
            return Err(CouponError::NegativeAmount);
        }

        Ok(Self {
            code: code.into(),
            kind: CouponKind::AmountOff(amount),
            min_order_value: None,
        })
    }

    /// Gate the coupon behind a minimum order value.
    #[must_use]
    pub fn with_min_order_value(mut self, minimum: Money<'a, Currency>) -> Self {
        self.min_order_value = Some(minimum);
        self
    }

    /// Return the coupon code.
    pub fn code(&self) -> &CouponCode {
        &self.code
    }

    /// Return the discount kind.
    pub const fn kind(&self) -> &CouponKind<'a> {
        &self.kind
    }

    /// Return the optional minimum order value.
    pub fn min_order_value(&self) -> Option<&Money<'a, Currency>> {
        self.min_order_value.as_ref()
    }

    /// Calculate the discount this coupon grants on a subtotal.
    ///
    /// The result is always within [0, subtotal]: percentage coupons are
    /// validated to at most 100%, and flat coupons are clamped to the
    /// subtotal.
    ///
    /// # Errors
    ///
    /// - [`CouponError::BelowMinimum`]: the subtotal is under the coupon's
    ///   minimum order value.
    /// - [`CouponError::CurrencyMismatch`]: the coupon's money uses a
    ///   different currency than the subtotal.
    /// - [`CouponError::Pricing`]: percentage arithmetic overflowed.
    pub fn discount_on(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, CouponError> {
        let currency = subtotal.currency();
        let subtotal_minor = subtotal.to_minor_units();

        if let Some(minimum) = &self.min_order_value {
            check_currency(currency, minimum.currency())?;

            let minimum_minor = minimum.to_minor_units();

            if subtotal_minor < minimum_minor {
                return Err(CouponError::BelowMinimum {
                    code: self.code.clone(),
                    minimum_minor,
                    subtotal_minor,
                });
            }
        }

        let discount_minor = match &self.kind {
            CouponKind::PercentageOff(percent) => {
                percent_of_minor(percent, subtotal_minor)?.clamp(0, subtotal_minor)
            }
            CouponKind::AmountOff(amount) => {
                check_currency(currency, amount.currency())?;

                amount.to_minor_units().min(subtotal_minor)
            }
        };

        Ok(Money::from_minor(discount_minor, currency))
    }
}

fn check_currency(expected: &Currency, found: &Currency) -> Result<(), CouponError> {
    if expected == found {
        Ok(())
    } else {
        Err(CouponError::CurrencyMismatch {
            expected: expected.iso_alpha_code,
            found: found.iso_alpha_code,
        })
    }
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{GBP, USD};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn codes_are_case_insensitive() {
        assert_eq!(CouponCode::new("SAVE10"), CouponCode::new("save10"));
        assert_eq!(CouponCode::new("  Save10  ").as_str(), "save10");
    }

    #[test]
    fn percentage_discount_is_fraction_of_subtotal() -> TestResult {
        let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?;
        let discount = coupon.discount_on(&Money::from_minor(60_000, USD))?;

        assert_eq!(discount, Money::from_minor(6_000, USD));

        Ok(())
    }

    #[test]
    fn flat_discount_is_clamped_to_subtotal() -> TestResult {
        let coupon = Coupon::amount_off("WELCOME", Money::from_minor(5_000, USD))?;

        let small = coupon.discount_on(&Money::from_minor(2_000, USD))?;
        let large = coupon.discount_on(&Money::from_minor(20_000, USD))?;

        assert_eq!(small, Money::from_minor(2_000, USD));
        assert_eq!(large, Money::from_minor(5_000, USD));

        Ok(())
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() -> TestResult {
        let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?
            .with_min_order_value(Money::from_minor(15_000, USD));

        let result = coupon.discount_on(&Money::from_minor(10_000, USD));

        assert!(matches!(
            result,
            Err(CouponError::BelowMinimum {
                minimum_minor: 15_000,
                subtotal_minor: 10_000,
                ..
            })
        ));

        Ok(())
    }

    #[test]
    fn subtotal_at_minimum_is_accepted() -> TestResult {
        let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?
            .with_min_order_value(Money::from_minor(15_000, USD));

        let discount = coupon.discount_on(&Money::from_minor(15_000, USD))?;

        assert_eq!(discount, Money::from_minor(1_500, USD));

        Ok(())
    }

    #[test]
    fn percentage_above_one_is_rejected() {
        let result = Coupon::percentage_off("TOOBIG", Percentage::from(1.5));

        assert!(matches!(result, Err(CouponError::PercentOutOfRange)));
    }

    #[test]
    fn negative_percentage_is_rejected() {
        let result = Coupon::percentage_off("NEGATIVE", Percentage::from(-0.1));

        assert!(matches!(result, Err(CouponError::PercentOutOfRange)));
    }

    #[test]
    fn negative_amount_is_rejected() {
        let result = Coupon::amount_off("NEGATIVE", Money::from_minor(-100, USD));

        assert!(matches!(result, Err(CouponError::NegativeAmount)));
    }

    #[test]
    fn hundred_percent_discount_equals_subtotal() -> TestResult {
        let coupon = Coupon::percentage_off("FREE", Percentage::from(1.0))?;
        let discount = coupon.discount_on(&Money::from_minor(60_000, USD))?;

        assert_eq!(discount, Money::from_minor(60_000, USD));

        Ok(())
    }

    #[test]
    fn flat_coupon_currency_mismatch_is_rejected() -> TestResult {
        let coupon = Coupon::amount_off("WELCOME", Money::from_minor(5_000, GBP))?;
        let result = coupon.discount_on(&Money::from_minor(20_000, USD));

        assert!(matches!(
            result,
            Err(CouponError::CurrencyMismatch {
                expected: "USD",
                found: "GBP"
            })
        ));

        Ok(())
    }

    #[test]
    fn accessors_return_constructor_values() -> TestResult {
        let coupon = Coupon::amount_off("WELCOME", Money::from_minor(5_000, USD))?
            .with_min_order_value(Money::from_minor(10_000, USD));

        assert_eq!(coupon.code(), &CouponCode::new("welcome"));
        assert!(matches!(coupon.kind(), CouponKind::AmountOff(_)));
        assert_eq!(
            coupon.min_order_value(),
            Some(&Money::from_minor(10_000, USD))
        );

        Ok(())
    }
}
