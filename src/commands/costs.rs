// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::ledger::Ledger;
use crate::models::NewCost;
use crate::utils::fmt_money;

pub fn handle(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let input = new_cost_from_args(sub)?;
    let rec = ledger.add_cost(&input)?;
    println!(
        "Recorded #{} {} for '{}' on {}-{:02}-{:02}",
        rec.id,
        fmt_money(rec.sum, rec.currency.code()),
        rec.category,
        rec.year,
        rec.month,
        rec.day
    );
    Ok(())
}

pub fn new_cost_from_args(sub: &clap::ArgMatches) -> Result<NewCost> {
    let sum = *sub.get_one::<f64>("sum").context("--sum is required")?;
    let currency = sub
        .get_one::<String>("currency")
        .context("--currency is required")?
        .clone();
    let category = sub
        .get_one::<String>("category")
        .context("--category is required")?
        .clone();
    let description = sub
        .get_one::<String>("description")
        .cloned()
        .unwrap_or_default();
    Ok(NewCost {
        sum,
        currency,
        category,
        description,
    })
}
