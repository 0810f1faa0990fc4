//! Line Fixtures

use serde::Deserialize;

/// Wrapper for cart lines in YAML
#[derive(Debug, Deserialize)]
pub struct LinesFixture {
    /// List of line fixtures
    pub lines: Vec<LineFixture>,
}

/// Cart Line Fixture
#[derive(Debug, Deserialize)]
pub struct LineFixture {
    /// Product sku (slug)
    pub sku: String,

    /// Unit price (e.g., "299.99 USD")
    pub price: String,

    /// Quantity, at least 1
    pub quantity: u32,
}
