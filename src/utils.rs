// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::time::Duration;

use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::error::Result;

const UA: &str = concat!(
    "costbook/",
    env!("CARGO_PKG_VERSION"),
    " (+https://github.com/alphavelocity/costbook)"
);

/// Upper bound on a single rates request, connect included.
pub const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

pub fn http_client() -> Result<reqwest::blocking::Client> {
    let c = reqwest::blocking::Client::builder()
        .timeout(HTTP_TIMEOUT)
        .user_agent(UA)
        .build()?;
    Ok(c)
}

/// Rounds a money amount to cents, midpoint away from zero.
///
/// Values that cannot be represented as a `Decimal` come back untouched.
pub fn round_money(x: f64) -> f64 {
    Decimal::from_f64(x)
        .map(|d| d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(x)
}

pub fn fmt_money(amount: f64, ccy: &str) -> String {
    format!("{:.2} {}", amount, ccy)
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(json_flag: bool, v: &T) -> anyhow::Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    Ok(false)
}
