// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};

use crate::ledger::Ledger;
use crate::models::Currency;
use crate::rates::DEFAULT_RATES_URL;
use crate::utils::pretty_table;

pub fn handle(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("show", _)) => {
            println!("Rates URL: {}", ledger.rates_url()?);
            println!("Default:   {}", DEFAULT_RATES_URL);
        }
        Some(("set-url", sub)) => {
            let url = sub.get_one::<String>("url").context("url is required")?;
            ledger.set_rates_url(url)?;
            println!("Saved rates URL: {}", ledger.rates_url()?);
        }
        Some(("test", sub)) => {
            let url = match sub.get_one::<String>("url") {
                Some(u) => u.trim().to_string(),
                None => ledger.rates_url()?,
            };
            let rates = ledger
                .fetch_rates_strict(&url)
                .with_context(|| format!("Rates fetch from {} failed", url))?;
            let rows = Currency::ALL
                .iter()
                .map(|c| vec![c.code().to_string(), format!("{}", rates.get(*c))])
                .collect();
            println!("Rates fetched successfully from {}", url);
            println!("{}", pretty_table(&["Currency", "Per USD"], rows));
        }
        _ => {}
    }
    Ok(())
}
