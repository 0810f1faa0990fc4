//! Fixtures
//!
//! YAML-backed configuration sets: cart lines, coupons, and shipping/tax
//! rates. This is how the production shipping tier table reaches the
//! calculator without being hard-coded.

use std::{fs, path::PathBuf};

use decimal_percentage::Percentage;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use rustc_hash::FxHashMap;
use rusty_money::{
    Money,
    iso::{Currency, EUR, GBP, USD},
};
use thiserror::Error;

use crate::{
    cart::{Cart, CartError},
    coupons::{Coupon, CouponCode, CouponError},
    fixtures::{coupons::CouponsFixture, lines::LinesFixture, rates::RatesFixture},
    lines::{CartLine, LineError},
    shipping::{ShippingError, ShippingTier, ShippingTierTable},
    tax::{TaxError, TaxRate},
};

pub mod coupons;
pub mod lines;
pub mod rates;

/// Fixture Parsing Errors
#[derive(Debug, Error)]
pub enum FixtureError {
    /// IO error reading fixture files
    #[error("Failed to read fixture file: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("Failed to parse YAML: {0}")]
    Yaml(#[from] serde_norway::Error),

    /// Invalid price format
    #[error("Invalid price format: {0}")]
    InvalidPrice(String),

    /// Invalid percentage format
    #[error("Invalid percentage format: {0}")]
    InvalidPercentage(String),

    /// Unknown currency code
    #[error("Unknown currency code: {0}")]
    UnknownCurrency(String),

    /// Coupon not found
    #[error("Coupon not found: {0}")]
    CouponNotFound(String),

    /// Unsupported coupon kind
    #[error("Unsupported coupon kind: {0}")]
    UnsupportedCouponKind(String),

    /// Currency mismatch between fixture values
    #[error("Currency mismatch: expected {0}, found {1}")]
    CurrencyMismatch(String, String),

    /// No monetary values loaded yet
    #[error("No monetary values loaded yet; currency unknown")]
    NoCurrency,

    /// No lines loaded
    #[error("No lines loaded; cannot create a cart")]
    NoLines,

    /// No rates loaded
    #[error("No rates loaded; shipping table and tax rate unknown")]
    NoRates,

    /// Not enough lines in fixture
    #[error("Not enough lines in fixture, available: {available}, requested: {requested}")]
    NotEnoughLines {
        /// Number of lines defined in the fixture
        available: usize,
        /// Number of lines requested
        requested: usize,
    },

    /// Line validation error
    #[error(transparent)]
    Line(#[from] LineError),

    /// Coupon validation error
    #[error(transparent)]
    Coupon(#[from] CouponError),

    /// Shipping table validation error
    #[error(transparent)]
    Shipping(#[from] ShippingError),

    /// Tax rate validation error
    #[error(transparent)]
    Tax(#[from] TaxError),

    /// Cart creation error
    #[error("Failed to create cart: {0}")]
    Cart(#[from] CartError),
}

/// Fixture
#[derive(Debug)]
pub struct Fixture<'a> {
    /// Base path for fixture files
    base_path: PathBuf,

    /// Pre-built cart lines
    lines: Vec<CartLine<'a>>,

    /// Coupon registry keyed by normalised code
    coupons: FxHashMap<CouponCode, Coupon<'a>>,

    /// Shipping tier table
    shipping: Option<ShippingTierTable<'a>>,

    /// Sales tax rate
    tax_rate: Option<TaxRate>,

    /// Currency for the fixture set
    currency: Option<&'static Currency>,
}

impl<'a> Fixture<'a> {
    /// Create a new empty fixture with default base path
    pub fn new() -> Self {
        Self::with_base_path("./fixtures")
    }

    /// Create a new empty fixture with custom base path
    pub fn with_base_path(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
            lines: Vec::new(),
            coupons: FxHashMap::default(),
            shipping: None,
            tax_rate: None,
            currency: None,
        }
    }

    /// Load cart lines from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a line is
    /// invalid or uses a mismatched currency.
    pub fn load_lines(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("lines").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: LinesFixture = serde_norway::from_str(&contents)?;

        for line_fixture in fixture.lines {
            let (minor_units, currency) = parse_price(&line_fixture.price)?;

            self.note_currency(currency)?;

            let line = CartLine::new(
                line_fixture.sku.as_str(),
                Money::from_minor(minor_units, currency),
                line_fixture.quantity,
            )?;

            self.lines.push(line);
        }

        Ok(self)
    }

    /// Load coupons from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if a coupon
    /// kind is unsupported or its amounts are invalid.
    pub fn load_coupons(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("coupons").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: CouponsFixture = serde_norway::from_str(&contents)?;

        for (key, coupon_fixture) in fixture.coupons {
            let code = CouponCode::new(&key);

            let mut coupon = match coupon_fixture.kind.as_str() {
                "percentage" => {
                    let percent = parse_percentage(&coupon_fixture.amount)?;

                    Coupon::percentage_off(code.clone(), percent)?
                }
                "flat" => {
                    let (minor_units, currency) = parse_price(&coupon_fixture.amount)?;

                    self.note_currency(currency)?;

                    Coupon::amount_off(code.clone(), Money::from_minor(minor_units, currency))?
                }
                other => return Err(FixtureError::UnsupportedCouponKind(other.to_string())),
            };

            if let Some(minimum) = &coupon_fixture.min_order_value {
                let (minor_units, currency) = parse_price(minimum)?;

                self.note_currency(currency)?;

                coupon = coupon.with_min_order_value(Money::from_minor(minor_units, currency));
            }

            self.coupons.insert(code, coupon);
        }

        Ok(self)
    }

    /// Load the shipping tier table and tax rate from a YAML fixture file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or if the table
    /// or rate fail validation.
    pub fn load_rates(&mut self, name: &str) -> Result<&mut Self, FixtureError> {
        let file_path = self.base_path.join("rates").join(format!("{name}.yml"));
        let contents = fs::read_to_string(&file_path)?;
        let fixture: RatesFixture = serde_norway::from_str(&contents)?;

        let (base_minor, base_currency) = parse_price(&fixture.shipping.base_cost)?;

        self.note_currency(base_currency)?;

        let mut tiers = Vec::with_capacity(fixture.shipping.tiers.len());

        for tier in &fixture.shipping.tiers {
            let (above_minor, above_currency) = parse_price(&tier.above)?;
            let (cost_minor, cost_currency) = parse_price(&tier.cost)?;

            self.note_currency(above_currency)?;
            self.note_currency(cost_currency)?;

            tiers.push(ShippingTier::new(
                Money::from_minor(above_minor, above_currency),
                Money::from_minor(cost_minor, cost_currency),
            ));
        }

        self.shipping = Some(ShippingTierTable::new(
            tiers,
            Money::from_minor(base_minor, base_currency),
        )?);

        self.tax_rate = Some(TaxRate::new(parse_percentage(&fixture.tax_rate)?)?);

        Ok(self)
    }

    /// Load a complete fixture set (lines, coupons, and rates with the same name)
    ///
    /// # Errors
    ///
    /// Returns an error if any of the fixture files cannot be loaded.
    pub fn from_set(name: &str) -> Result<Self, FixtureError> {
        let mut fixture = Self::new();

        fixture
            .load_lines(name)?
            .load_coupons(name)?
            .load_rates(name)?;

        Ok(fixture)
    }

    /// Get a coupon by its code, case-insensitively
    ///
    /// # Errors
    ///
    /// Returns an error if the coupon is not found.
    pub fn coupon(&self, code: &str) -> Result<&Coupon<'a>, FixtureError> {
        self.coupons
            .get(&CouponCode::new(code))
            .ok_or_else(|| FixtureError::CouponNotFound(code.to_string()))
    }

    /// Get all loaded lines
    pub fn lines(&self) -> &[CartLine<'a>] {
        &self.lines
    }

    /// Get the shipping tier table
    ///
    /// # Errors
    ///
    /// Returns an error if no rates have been loaded yet.
    pub fn shipping(&self) -> Result<&ShippingTierTable<'a>, FixtureError> {
        self.shipping.as_ref().ok_or(FixtureError::NoRates)
    }

    /// Get the sales tax rate
    ///
    /// # Errors
    ///
    /// Returns an error if no rates have been loaded yet.
    pub fn tax_rate(&self) -> Result<TaxRate, FixtureError> {
        self.tax_rate.ok_or(FixtureError::NoRates)
    }

    /// Create a cart from the loaded lines
    ///
    /// # Errors
    ///
    /// Returns an error if no lines are loaded or if cart creation fails.
    pub fn cart(&self, n: Option<usize>) -> Result<Cart<'a>, FixtureError> {
        let currency = self.currency.ok_or(FixtureError::NoCurrency)?;

        if self.lines.is_empty() {
            return Err(FixtureError::NoLines);
        }

        if let Some(n) = n
            && n > self.lines.len()
        {
            return Err(FixtureError::NotEnoughLines {
                requested: n,
                available: self.lines.len(),
            });
        }

        let lines: Vec<CartLine<'_>> = self
            .lines
            .iter()
            .take(n.unwrap_or(self.lines.len()))
            .cloned()
            .collect();

        Ok(Cart::with_lines(lines, currency)?)
    }

    /// Get the currency
    ///
    /// # Errors
    ///
    /// Returns an error if no monetary values have been loaded yet.
    pub fn currency(&self) -> Result<&'static Currency, FixtureError> {
        self.currency.ok_or(FixtureError::NoCurrency)
    }

    /// Record a currency, validating consistency with previously loaded values.
    fn note_currency(&mut self, currency: &'static Currency) -> Result<(), FixtureError> {
        if let Some(existing) = self.currency {
            if existing != currency {
                return Err(FixtureError::CurrencyMismatch(
                    existing.iso_alpha_code.to_string(),
                    currency.iso_alpha_code.to_string(),
                ));
            }
        } else {
            self.currency = Some(currency);
        }

        Ok(())
    }
}

impl Default for Fixture<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse price string (e.g., "2.99 USD") into minor units and currency
///
/// # Errors
///
/// Returns an error if the string is not in the format "AMOUNT CURRENCY",
/// if the amount cannot be parsed as a decimal, or if the currency code
/// is not recognized.
pub fn parse_price(s: &str) -> Result<(i64, &'static Currency), FixtureError> {
    let parts: Vec<&str> = s.split_whitespace().collect();

    if parts.len() != 2 {
        return Err(FixtureError::InvalidPrice(format!(
            "Expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    }

    let amount = parts
        .first()
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?
        .parse::<Decimal>()
        .map_err(|_err| FixtureError::InvalidPrice(s.to_string()))?;

    let minor_units = amount
        .checked_mul(Decimal::new(100, 0))
        .and_then(|value| value.round_dp(0).to_i64())
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency_code = parts
        .get(1)
        .ok_or_else(|| FixtureError::InvalidPrice(s.to_string()))?;

    let currency = match *currency_code {
        "GBP" => GBP,
        "USD" => USD,
        "EUR" => EUR,
        other => return Err(FixtureError::UnknownCurrency(other.to_string())),
    };

    Ok((minor_units, currency))
}

/// Parse percentage string (e.g., "15%" or "0.15") into a `Percentage`
///
/// Accepts two formats:
/// - Percentage format: "15%" for 15%
/// - Decimal format: "0.15" for 15%
///
/// # Errors
///
/// Returns an error if the string cannot be parsed or if the value is invalid.
pub fn parse_percentage(s: &str) -> Result<Percentage, FixtureError> {
    let trimmed = s.trim();

    if let Some(percent_str) = trimmed.strip_suffix('%') {
        // Parse as percentage (e.g., "15%" -> 0.15)
        let value = percent_str
            .trim()
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        // Convert from percentage to decimal (15 -> 0.15)
        Ok(Percentage::from(value / 100.0))
    } else {
        // Parse as decimal (e.g., "0.15" -> 0.15)
        let value = trimmed
            .parse::<f64>()
            .map_err(|_err| FixtureError::InvalidPercentage(s.to_string()))?;

        Ok(Percentage::from(value))
    }
}
