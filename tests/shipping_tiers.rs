//! Integration tests for tiered shipping through the totals calculator.

use rusty_money::{Money, iso::USD};
use testresult::TestResult;

use tally::{
    cart::Cart,
    lines::CartLine,
    shipping::{ShippingError, ShippingTier, ShippingTierTable},
    tax::TaxRate,
    totals::compute_totals,
};

fn standard_table() -> Result<ShippingTierTable<'static>, ShippingError> {
    // { >2000: 200, >500: 100, else: 50 }, in minor units. Deliberately
    // supplied lowest-threshold-first; the table orders itself.
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

fn quote_shipping_for(subtotal_minor: i64) -> TestResult<i64> {
    let lines = [CartLine::new(
        "brake-pad-set",
        Money::from_minor(subtotal_minor, USD),
        1,
    )?];
    let cart = Cart::with_lines(lines, USD)?;

    let totals = compute_totals(&cart, None, &standard_table()?, TaxRate::zero())?;

    Ok(totals.shipping_cost().to_minor_units())
}

/// Tier thresholds are strict "above" comparisons: a subtotal exactly at a
/// threshold stays in the lower tier.
#[test]
fn boundary_at_five_hundred() -> TestResult {
    assert_eq!(quote_shipping_for(49_999)?, 5_000);
    assert_eq!(quote_shipping_for(50_000)?, 5_000);
    assert_eq!(quote_shipping_for(50_001)?, 10_000);

    Ok(())
}

#[test]
fn boundary_at_two_thousand() -> TestResult {
    assert_eq!(quote_shipping_for(199_999)?, 10_000);
    assert_eq!(quote_shipping_for(200_000)?, 10_000);
    assert_eq!(quote_shipping_for(200_001)?, 20_000);

    Ok(())
}

#[test]
fn smallest_orders_use_the_base_cost() -> TestResult {
    assert_eq!(quote_shipping_for(1)?, 5_000);

    Ok(())
}

/// Shipping is chosen from the subtotal, not the discounted or grand total:
/// a coupon that drags the subtotal under a threshold must not change the
/// shipping tier.
#[test]
fn shipping_is_keyed_on_subtotal_not_grand_total() -> TestResult {
    use decimal_percentage::Percentage;
    use tally::coupons::Coupon;

    let lines = [CartLine::new("roof-box", Money::from_minor(52_000, USD), 1)?];
    let cart = Cart::with_lines(lines, USD)?;
    let coupon = Coupon::percentage_off("SAVE10", Percentage::from(0.10))?;

    let totals = compute_totals(&cart, Some(&coupon), &standard_table()?, TaxRate::zero())?;

    // 52000 - 5200 = 46800 is under the 50000 threshold, but the tier was
    // selected from the 52000 subtotal.
    assert_eq!(totals.shipping_cost(), Money::from_minor(10_000, USD));

    Ok(())
}

#[test]
fn tiers_are_reordered_highest_first() -> TestResult {
    let table = standard_table()?;

    let thresholds: Vec<i64> = table
        .tiers()
        .iter()
        .map(|tier| tier.above().to_minor_units())
        .collect();

    assert_eq!(thresholds, [200_000, 50_000]);

    Ok(())
}
