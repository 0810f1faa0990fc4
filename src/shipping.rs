//! Shipping tiers
//!
//! A shipping tier table maps subtotal ranges to flat shipping costs,
//! approximating carrier rates without a live lookup. Tiers use strict
//! "above" comparisons: an order with a subtotal exactly at a threshold
//! takes the lower tier. Tables are supplied as configuration so callers
//! can vary tiers by locale or carrier.

use rusty_money::{Money, iso::Currency};
use smallvec::SmallVec;
use thiserror::Error;

/// Errors raised when building or querying a shipping tier table.
#[derive(Debug, Error)]
pub enum ShippingError {
    /// A tier or subtotal uses a different currency than the table.
    #[error("currency {found} does not match table currency {expected}")]
    CurrencyMismatch {
        /// Currency of the table.
        expected: &'static str,
        /// Currency found on the tier or subtotal.
        found: &'static str,
    },

    /// Two tiers share the same threshold.
    #[error("duplicate shipping tier threshold at {minor} minor units")]
    DuplicateThreshold {
        /// The duplicated threshold in minor units.
        minor: i64,
    },

    /// A tier cost or the base cost is below zero.
    #[error("shipping costs must not be negative")]
    NegativeCost,

    /// A tier threshold is below zero.
    #[error("shipping tier thresholds must not be negative")]
    NegativeThreshold,
}

/// A single tier: orders with a subtotal strictly above `above` ship for `cost`.
#[derive(Debug, Clone, Copy)]
pub struct ShippingTier<'a> {
    above: Money<'a, Currency>,
    cost: Money<'a, Currency>,
}

impl<'a> ShippingTier<'a> {
    /// Create a new tier.
    #[must_use]
    pub const fn new(above: Money<'a, Currency>, cost: Money<'a, Currency>) -> Self {
        Self { above, cost }
    }

    /// Return the threshold a subtotal must exceed to use this tier.
    pub const fn above(&self) -> &Money<'a, Currency> {
        &self.above
    }

    /// Return the flat shipping cost for this tier.
    pub const fn cost(&self) -> &Money<'a, Currency> {
        &self.cost
    }
}

/// An ordered threshold table evaluated highest-threshold-first, with a base
/// cost for orders below every threshold.
#[derive(Debug, Clone)]
pub struct ShippingTierTable<'a> {
    tiers: SmallVec<[ShippingTier<'a>; 4]>,
    base_cost: Money<'a, Currency>,
    currency: &'a Currency,
}

impl<'a> ShippingTierTable<'a> {
    /// Create a validated table. Tiers may be supplied in any order; they are
    /// stored highest-threshold-first.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::CurrencyMismatch`]: a tier's currency differs from
    ///   the base cost's.
    /// - [`ShippingError::DuplicateThreshold`]: two tiers share a threshold.
    /// - [`ShippingError::NegativeCost`]: a cost is below zero.
    /// - [`ShippingError::NegativeThreshold`]: a threshold is below zero.
    pub fn new(
        tiers: impl Into<Vec<ShippingTier<'a>>>,
        base_cost: Money<'a, Currency>,
    ) -> Result<Self, ShippingError> {
        let mut tiers: SmallVec<[ShippingTier<'a>; 4]> = tiers.into().into_iter().collect();
        let currency = base_cost.currency();

        if base_cost.to_minor_units() < 0 {
            return Err(ShippingError::NegativeCost);
        }

        for tier in &tiers {
            check_currency(currency, tier.above.currency())?;
            check_currency(currency, tier.cost.currency())?;

            if tier.above.to_minor_units() < 0 {
                return Err(ShippingError::NegativeThreshold);
            }

            if tier.cost.to_minor_units() < 0 {
                return Err(ShippingError::NegativeCost);
            }
        }

        tiers.sort_by_key(|tier| std::cmp::Reverse(tier.above.to_minor_units()));

        for pair in tiers.windows(2) {
            if let [a, b] = pair
                && a.above.to_minor_units() == b.above.to_minor_units()
            {
                return Err(ShippingError::DuplicateThreshold {
                    minor: a.above.to_minor_units(),
                });
            }
        }

        Ok(Self {
            tiers,
            base_cost,
            currency,
        })
    }

    /// Look up the shipping cost for a subtotal.
    ///
    /// Walks tiers highest-threshold-first and returns the first tier the
    /// subtotal is strictly above; falls back to the base cost.
    ///
    /// # Errors
    ///
    /// - [`ShippingError::CurrencyMismatch`]: the subtotal's currency differs
    ///   from the table's.
    pub fn cost_for(
        &self,
        subtotal: &Money<'a, Currency>,
    ) -> Result<Money<'a, Currency>, ShippingError> {
        check_currency(self.currency, subtotal.currency())?;

        let subtotal_minor = subtotal.to_minor_units();

        let cost = self
            .tiers
            .iter()
            .find(|tier| subtotal_minor > tier.above.to_minor_units())
            .map_or(self.base_cost, |tier| tier.cost);

        Ok(cost)
    }

    /// The tiers, highest threshold first.
    pub fn tiers(&self) -> &[ShippingTier<'a>] {
        &self.tiers
    }

    /// The cost for orders below every threshold.
    pub const fn base_cost(&self) -> &Money<'a, Currency> {
        &self.base_cost
    }

    /// The currency of the table.
    #[must_use]
    pub fn currency(&self) -> &'a Currency {
        self.currency
    }
}

fn check_currency(expected: &Currency, found: &Currency) -> Result<(), ShippingError> {
    if expected == found {
        Ok(())
    } else {
        Err(ShippingError::CurrencyMismatch {
            expected: expected.iso_alpha_code,
            found: found.iso_alpha_code,
        })
    }
}
