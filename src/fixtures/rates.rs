//! Rate Fixtures
//!
//! Shipping tier tables and tax rates, supplied as configuration so tiers
//! can vary by locale or carrier.

use serde::Deserialize;

/// Wrapper for shipping and tax rates in YAML
#[derive(Debug, Deserialize)]
pub struct RatesFixture {
    /// Shipping tier configuration
    pub shipping: ShippingFixture,

    /// Sales tax rate (e.g., "7%" or "0.07")
    pub tax_rate: String,
}

/// Shipping tier table fixture
#[derive(Debug, Deserialize)]
pub struct ShippingFixture {
    /// Cost for orders below every threshold (e.g., "50.00 USD")
    pub base_cost: String,

    /// Threshold tiers, any order
    pub tiers: Vec<TierFixture>,
}

/// Single shipping tier fixture
#[derive(Debug, Deserialize)]
pub struct TierFixture {
    /// Subtotals strictly above this amount use this tier (e.g., "500.00 USD")
    pub above: String,

    /// Flat cost for this tier (e.g., "100.00 USD")
    pub cost: String,
}
