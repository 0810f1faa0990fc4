//! Utils

use clap::Parser;

/// Arguments for the quote example
#[derive(Debug, Parser)]
pub struct QuoteArgs {
    /// Number of lines to include from the fixture set
    #[clap(short, long)]
    pub n: Option<usize>,

    /// Fixture set to use for the lines, coupons & rates
    #[clap(short, long, default_value = "standard")]
    pub fixture: String,

    /// Coupon code to apply to the quote
    #[clap(short, long)]
    pub coupon: Option<String>,
}
