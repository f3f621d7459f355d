// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use chrono::{Datelike, Local};

use crate::ledger::Ledger;
use crate::utils::{fmt_money, maybe_print_json, pretty_table};

/// Year and month from the arguments, falling back to today's.
fn period(sub: &clap::ArgMatches) -> (i32, u32) {
    let today = Local::now().date_naive();
    let year = sub.get_one::<i32>("year").copied().unwrap_or(today.year());
    let month = sub
        .try_get_one::<u32>("month")
        .ok()
        .flatten()
        .copied()
        .unwrap_or(today.month());
    (year, month)
}

fn currency(sub: &clap::ArgMatches) -> Result<&str> {
    sub.get_one::<String>("currency")
        .map(String::as_str)
        .context("--currency is required")
}

pub fn report(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = period(sub);
    let rep = ledger.get_report(year, month, currency(sub)?)?;
    if maybe_print_json(sub.get_flag("json"), &rep)? {
        return Ok(());
    }
    let rows: Vec<Vec<String>> = rep
        .costs
        .iter()
        .map(|c| {
            vec![
                c.id.to_string(),
                format!("{}-{:02}-{:02}", rep.year, rep.month, c.day),
                c.category.clone(),
                c.description.clone(),
                fmt_money(c.sum, c.currency.code()),
            ]
        })
        .collect();
    println!(
        "{}",
        pretty_table(&["ID", "Date", "Category", "Description", "Sum"], rows)
    );
    println!(
        "Total: {}",
        fmt_money(rep.total.total, rep.total.currency.code())
    );
    Ok(())
}

pub fn chart(ledger: &Ledger, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("categories", sub)) => categories(ledger, sub)?,
        Some(("months", sub)) => months(ledger, sub)?,
        _ => {}
    }
    Ok(())
}

fn categories(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let (year, month) = period(sub);
    let ccy = currency(sub)?;
    let mut totals = ledger.get_category_totals(year, month, ccy)?;
    totals.sort_by(|a, b| b.total.total_cmp(&a.total).then_with(|| a.category.cmp(&b.category)));
    if maybe_print_json(sub.get_flag("json"), &totals)? {
        return Ok(());
    }
    let rows = totals
        .into_iter()
        .map(|t| vec![t.category, format!("{:.2}", t.total)])
        .collect();
    let hdr = format!("Spent ({})", ccy.trim().to_uppercase());
    println!("{}", pretty_table(&["Category", &hdr], rows));
    Ok(())
}

fn months(ledger: &Ledger, sub: &clap::ArgMatches) -> Result<()> {
    let (year, _) = period(sub);
    let ccy = currency(sub)?;
    let totals = ledger.get_year_monthly_totals(year, ccy)?;
    if maybe_print_json(sub.get_flag("json"), &totals)? {
        return Ok(());
    }
    let rows = totals
        .into_iter()
        .map(|t| vec![t.month.to_string(), format!("{:.2}", t.total)])
        .collect();
    let hdr = format!("Spent ({})", ccy.trim().to_uppercase());
    println!("{}", pretty_table(&[&year.to_string(), &hdr], rows));
    Ok(())
}
