//! Order Totals Quote Example
//!
//! This example computes a full order quote from a fixture set.
//!
//! Use `-f` to load a fixture set by name
//! Use `-n` to limit the number of cart lines
//! Use `-c` to apply a coupon by code

use std::{io, time::Instant};

use anyhow::Result;
use clap::Parser;
use humanize_duration::{Truncate, prelude::DurationExt};

use tally::{fixtures::Fixture, totals::compute_totals, utils::QuoteArgs};

/// Order Totals Quote Example
#[expect(clippy::print_stdout, reason = "Example program output to user")]
pub fn main() -> Result<()> {
    let args = QuoteArgs::parse();

    let fixture = Fixture::from_set(&args.fixture)?;
    let cart = fixture.cart(args.n)?;

    let coupon = args
        .coupon
        .as_deref()
        .map(|code| fixture.coupon(code))
        .transpose()?;

    let start = Instant::now();

    let totals = compute_totals(&cart, coupon, fixture.shipping()?, fixture.tax_rate()?)?;

    let elapsed = start.elapsed();

    let stdout = io::stdout();
    let handle = stdout.lock();

    totals.write_to(handle)?;

    println!(" {} ({}s)", elapsed.human(Truncate::Nano), elapsed.as_secs_f32());

    Ok(())
}
