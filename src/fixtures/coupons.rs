//! Coupon Fixtures

use rustc_hash::FxHashMap;
use serde::Deserialize;

/// Wrapper for coupons in YAML
#[derive(Debug, Deserialize)]
pub struct CouponsFixture {
    /// Map of coupon code -> coupon fixture
    pub coupons: FxHashMap<String, CouponFixture>,
}

/// Coupon Fixture
#[derive(Debug, Deserialize)]
pub struct CouponFixture {
    /// Discount kind: "percentage" or "flat"
    pub kind: String,

    /// Discount amount: a percentage ("10%" or "0.10") for percentage
    /// coupons, a price ("5.00 USD") for flat coupons
    pub amount: String,

    /// Optional minimum order value (e.g., "50.00 USD")
    pub min_order_value: Option<String>,
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn coupons_fixture_parses_from_yaml() {
        let yaml = r"
coupons:
  SAVE10:
    kind: percentage
    amount: 10%
    min_order_value: 50.00 USD
  WELCOME5:
    kind: flat
    amount: 5.00 USD
";

        let result: Result<CouponsFixture, _> = serde_norway::from_str(yaml);

        assert!(result.is_ok(), "expected fixture to parse");
    }

    #[test]
    fn min_order_value_is_optional() -> TestResult {
        let yaml = r"
coupons:
  WELCOME5:
    kind: flat
    amount: 5.00 USD
";

        let fixture: CouponsFixture = serde_norway::from_str(yaml)?;

        assert!(
            fixture
                .coupons
                .values()
                .all(|coupon| coupon.min_order_value.is_none()),
            "expected no minimum order value"
        );

        Ok(())
    }
}
