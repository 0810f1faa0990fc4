//! Order totals
//!
//! The totals calculator: subtotal, coupon discount, tiered shipping and
//! sales tax folded into a validated grand total. Pure computation; the
//! caller persists the result alongside its order record.

use std::io;

use rusty_money::{Money, iso::Currency};
use tabled::{
    builder::Builder,
    grid::config::HorizontalLine,
    settings::{
        Alignment, Color, Style, Theme,
        object::{Columns, Rows},
    },
};
use thiserror::Error;

use crate::{
    cart::Cart,
    coupons::{Coupon, CouponCode, CouponError},
    pricing::PricingError,
    shipping::{ShippingError, ShippingTierTable},
    tax::{TaxError, TaxRate},
};

/// Errors that can occur when computing order totals.
#[derive(Debug, Error)]
pub enum TotalsError {
    /// The cart has no lines; there is nothing to total.
    #[error("cannot compute totals for an empty cart")]
    EmptyCart,

    /// The computed grand total came out below zero. Discounts are clamped
    /// to the subtotal, so this indicates a shipping or tax misconfiguration.
    #[error("grand total is negative ({minor} minor units)")]
    NegativeTotal {
        /// The negative total in minor units.
        minor: i64,
    },

    /// Minor-unit arithmetic overflowed.
    #[error("order total overflows minor-unit arithmetic")]
    Overflow,

    /// Error calculating the cart subtotal.
    #[error(transparent)]
    Pricing(#[from] PricingError),

    /// Coupon arithmetic or currency error. A coupon under its minimum is
    /// not an error here; it is reported as [`CouponOutcome::BelowMinimum`].
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Shipping table lookup error.
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Sales tax error.
    #[error(transparent)]
    Tax(#[from] TaxError),

    /// IO error
    #[error("IO error")]
    Io,
}

/// How the presented coupon affected the order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CouponOutcome {
    /// No coupon was presented.
    NotPresented,

    /// The coupon applied; its discount is recorded on the totals.
    Applied(CouponCode),

    /// The subtotal was below the coupon's minimum order value. The
    /// discount is zero; the caller uses this for user messaging.
    BelowMinimum(CouponCode),
}

/// Computed totals for an order.
///
/// Invariant: `grand_total = subtotal - discount + shipping_cost + sales_tax`,
/// and `grand_total >= 0`. All values are whole minor units in the cart's
/// currency.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals<'a> {
    subtotal: Money<'a, Currency>,
    discount: Money<'a, Currency>,
    shipping_cost: Money<'a, Currency>,
    sales_tax: Money<'a, Currency>,
    grand_total: Money<'a, Currency>,
    coupon: CouponOutcome,
    currency: &'static Currency,
}

impl<'a> OrderTotals<'a> {
    /// Sum of line totals before discount, shipping and tax.
    #[must_use]
    pub fn subtotal(&self) -> Money<'a, Currency> {
        self.subtotal
    }

    /// Coupon discount; zero when no coupon applied.
    #[must_use]
    pub fn discount(&self) -> Money<'a, Currency> {
        self.discount
    }

    /// Flat shipping cost from the tier table.
    #[must_use]
    pub fn shipping_cost(&self) -> Money<'a, Currency> {
        self.shipping_cost
    }

    /// Sales tax charged on the pre-discount subtotal.
    #[must_use]
    pub fn sales_tax(&self) -> Money<'a, Currency> {
        self.sales_tax
    }

    /// The final payable amount.
    #[must_use]
    pub fn grand_total(&self) -> Money<'a, Currency> {
        self.grand_total
    }

    /// How the presented coupon affected the order.
    pub const fn coupon(&self) -> &CouponOutcome {
        &self.coupon
    }

    /// Currency used for all monetary values.
    #[must_use]
    pub fn currency(&self) -> &'static Currency {
        self.currency
    }

    /// Render the totals as a summary table.
    ///
    /// # Errors
    ///
    /// Returns [`TotalsError::Io`] if writing to `out` fails.
    pub fn write_to(&self, mut out: impl io::Write) -> Result<(), TotalsError> {
        let mut builder = Builder::default();

        builder.push_record(["Subtotal".to_string(), format!("{}", self.subtotal)]);

        match &self.coupon {
            CouponOutcome::NotPresented => {}
            CouponOutcome::Applied(code) => {
                builder.push_record([format!("Discount ({code})"), format!("-{}", self.discount)]);
            }
            CouponOutcome::BelowMinimum(code) => {
                builder.push_record([
                    format!("Discount ({code}: below minimum)"),
                    format!("{}", self.discount),
                ]);
            }
        }

        builder.push_record(["Shipping".to_string(), format!("{}", self.shipping_cost)]);
        builder.push_record(["Sales tax".to_string(), format!("{}", self.sales_tax)]);
        builder.push_record(["Total".to_string(), format!("{}", self.grand_total)]);

        // Subtotal row, optional discount row, shipping, tax, total.
        let total_row = if matches!(self.coupon, CouponOutcome::NotPresented) {
            3
        } else {
            4
        };

        let mut table = builder.build();

        let mut theme = Theme::from(Style::modern_rounded());
        let separator = HorizontalLine::new(Some('─'), Some('┼'), Some('├'), Some('┤'));

        theme.remove_horizontal_lines();
        theme.insert_horizontal_line(total_row, separator);

        table.with(theme);
        table.modify(Columns::last(), Alignment::right());
        table.modify(Rows::last(), Color::BOLD);

        writeln!(out, "{table}").map_err(|_err| TotalsError::Io)
    }
}

/// Compute the totals for a cart, an optional coupon, a shipping tier table
/// and a tax rate.
///
/// A coupon whose minimum order value exceeds the subtotal does not abort
/// the computation: the discount is zero and the rejection is reported via
/// [`OrderTotals::coupon`]. Every other failure is an error.
///
/// # Errors
///
/// - [`TotalsError::EmptyCart`]: the cart has no lines.
/// - [`TotalsError::Pricing`]: the subtotal could not be calculated.
/// - [`TotalsError::Coupon`]: coupon arithmetic or currency error.
/// - [`TotalsError::Shipping`]: the shipping lookup failed.
/// - [`TotalsError::Tax`]: the sales tax could not be calculated.
/// - [`TotalsError::Overflow`]: minor-unit arithmetic overflowed.
/// - [`TotalsError::NegativeTotal`]: the grand total came out below zero.
pub fn compute_totals<'a>(
    cart: &Cart<'a>,
    coupon: Option<&Coupon<'a>>,
    shipping: &ShippingTierTable<'a>,
    tax_rate: TaxRate,
) -> Result<OrderTotals<'a>, TotalsError> {
    if cart.is_empty() {
        return Err(TotalsError::EmptyCart);
    }

    let subtotal = cart.subtotal()?;
    let currency = cart.currency();

    let (discount, coupon_outcome) = match coupon {
        None => (Money::from_minor(0, currency), CouponOutcome::NotPresented),
        Some(coupon) => match coupon.discount_on(&subtotal) {
            Ok(discount) => (discount, CouponOutcome::Applied(coupon.code().clone())),
            Err(CouponError::BelowMinimum { code, .. }) => (
                Money::from_minor(0, currency),
                CouponOutcome::BelowMinimum(code),
            ),
            Err(err) => return Err(err.into()),
        },
    };

    let shipping_cost = shipping.cost_for(&subtotal)?;
    let sales_tax = tax_rate.tax_on(&subtotal)?;

    let grand_minor = subtotal
        .to_minor_units()
        .checked_sub(discount.to_minor_units())
        .and_then(|value| value.checked_add(shipping_cost.to_minor_units()))
        .and_then(|value| value.checked_add(sales_tax.to_minor_units()))
        .ok_or(TotalsError::Overflow)?;

    if grand_minor < 0 {
        return Err(TotalsError::NegativeTotal { minor: grand_minor });
    }

    Ok(OrderTotals {
        subtotal,
        discount,
        shipping_cost,
        sales_tax,
        grand_total: Money::from_minor(grand_minor, currency),
        coupon: coupon_outcome,
        currency,
    })
}

#[cfg(test)]
mod tests {
    use decimal_percentage::Percentage;
    use rusty_money::iso::USD;
    use testresult::TestResult;

    use crate::{lines::CartLine, shipping::ShippingTier};

    use super::*;

    fn standard_shipping() -> Result<ShippingTierTable<'static>, ShippingError> {
        ShippingTierTable::new(
            [
                ShippingTier::new(Money::from_minor(50_000, USD), Money::from_minor(10_000, USD)),
                ShippingTier::new(
                    Money::from_minor(200_000, USD),
                    Money::from_minor(20_000, USD),
                ),
            ],
            Money::from_minor(5_000, USD),
        )
    }

    #[test]
    fn empty_cart_is_rejected() -> TestResult {
        let cart = Cart::new(USD);
        let shipping = standard_shipping()?;

        let result = compute_totals(&cart, None, &shipping, TaxRate::zero());

        assert!(matches!(result, Err(TotalsError::EmptyCart)));

        Ok(())
    }

    #[test]
    fn no_coupon_total_is_subtotal_plus_shipping_plus_tax() -> TestResult {
        let lines = [CartLine::new("roof-rack", Money::from_minor(30_000, USD), 1)?];
        let cart = Cart::with_lines(lines, USD)?;
        let shipping = standard_shipping()?;
        let rate = TaxRate::new(Percentage::from(0.07))?;

        let totals = compute_totals(&cart, None, &shipping, rate)?;

        assert_eq!(totals.subtotal(), Money::from_minor(30_000, USD));
        assert_eq!(totals.discount(), Money::from_minor(0, USD));
        assert_eq!(totals.shipping_cost(), Money::from_minor(5_000, USD));
        assert_eq!(totals.sales_tax(), Money::from_minor(2_100, USD));
        assert_eq!(totals.grand_total(), Money::from_minor(37_100, USD));
        assert_eq!(totals.coupon(), &CouponOutcome::NotPresented);

        Ok(())
    }

    #[test]
    fn below_minimum_coupon_keeps_totals_and_reports_outcome() -> TestResult {
        let lines = [CartLine::new("wiper-blade", Money::from_minor(10_000, USD), 1)?];
        let cart = Cart::with_lines(lines, USD)?;
        let shipping = standard_shipping()?;
        let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?
            .with_min_order_value(Money::from_minor(15_000, USD));

        let totals = compute_totals(&cart, Some(&coupon), &shipping, TaxRate::zero())?;

        assert_eq!(totals.discount(), Money::from_minor(0, USD));
        assert_eq!(
            totals.coupon(),
            &CouponOutcome::BelowMinimum(CouponCode::new("save10"))
        );
        assert_eq!(totals.grand_total(), Money::from_minor(15_000, USD));

        Ok(())
    }

    #[test]
    fn coupon_currency_mismatch_aborts_the_computation() -> TestResult {
        use rusty_money::iso::GBP;

        let lines = [CartLine::new("roof-rack", Money::from_minor(30_000, USD), 1)?];
        let cart = Cart::with_lines(lines, USD)?;
        let shipping = standard_shipping()?;
        let coupon = Coupon::amount_off("WELCOME", Money::from_minor(5_000, GBP))?;

        let result = compute_totals(&cart, Some(&coupon), &shipping, TaxRate::zero());

        assert!(matches!(
            result,
            Err(TotalsError::Coupon(CouponError::CurrencyMismatch { .. }))
        ));

        Ok(())
    }

    #[test]
    fn write_to_renders_every_component() -> TestResult {
        let lines = [CartLine::new("roof-rack", Money::from_minor(30_000, USD), 2)?];
        let cart = Cart::with_lines(lines, USD)?;
        let shipping = standard_shipping()?;
        let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?;
        let rate = TaxRate::new(Percentage::from(0.07))?;

        let totals = compute_totals(&cart, Some(&coupon), &shipping, rate)?;

        let mut rendered = Vec::new();
        totals.write_to(&mut rendered)?;

        let rendered = String::from_utf8(rendered)?;

        assert!(rendered.contains("Subtotal"), "missing subtotal row");
        assert!(rendered.contains("save10"), "missing coupon code");
        assert!(rendered.contains("Shipping"), "missing shipping row");
        assert!(rendered.contains("Sales tax"), "missing tax row");
        assert!(rendered.contains("Total"), "missing total row");

        Ok(())
    }
}
