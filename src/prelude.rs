//! Tally prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponCode, CouponError, CouponKind},
    fixtures::{Fixture, FixtureError},
    lines::{CartLine, LineError, Sku},
    pricing::{PricingError, percent_of_minor, subtotal},
    shipping::{ShippingError, ShippingTier, ShippingTierTable},
    tax::{TaxError, TaxRate},
    totals::{CouponOutcome, OrderTotals, TotalsError, compute_totals},
};
