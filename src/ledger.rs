// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! The public ledger operations: record a cost, and read a month back as a
//! report, per-category totals or per-month totals for a year.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{Datelike, Local, NaiveDate};
use once_cell::sync::Lazy;
use tracing::info;

use crate::convert::convert;
use crate::db::{Index, IndexKey, KeyRange, LedgerStore};
use crate::error::{LedgerError, Result};
use crate::models::{
    CategoryTotal, CostEntry, CostRecord, Currency, MonthTotal, NewCost, Report, ReportLine,
    ReportTotal,
};
use crate::rates::{RateProvider, RateTable, DEFAULT_RATES_URL, RATES_URL_KEY};
use crate::utils::round_money;

pub const DB_NAME: &str = "costsdb";
pub const DB_VERSION: u32 = 1;

pub const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const UNCATEGORIZED: &str = "Uncategorized";

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

fn validate_year(year: i32) -> Result<()> {
    if !(1..=9999).contains(&year) {
        return Err(LedgerError::InvalidInput(format!(
            "year {} is out of range 1..9999",
            year
        )));
    }
    Ok(())
}

fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(LedgerError::InvalidInput(format!(
            "month must be in range 1..12, got {}",
            month
        )));
    }
    Ok(())
}

#[derive(Debug)]
pub struct Ledger {
    store: LedgerStore,
    rates: RateProvider,
    today: fn() -> NaiveDate,
}

impl Ledger {
    pub fn new(store: LedgerStore) -> Result<Self> {
        Ok(Self::with_rate_provider(store, RateProvider::new()?))
    }

    pub fn with_rate_provider(store: LedgerStore, rates: RateProvider) -> Self {
        Ledger {
            store,
            rates,
            today: local_today,
        }
    }

    /// Replaces the source of "today" used to date new costs.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn store(&self) -> &LedgerStore {
        &self.store
    }

    /// Validates and records a cost dated today.
    pub fn add_cost(&self, input: &NewCost) -> Result<CostRecord> {
        if !input.sum.is_finite() {
            return Err(LedgerError::InvalidInput(format!(
                "sum must be a finite number, got {}",
                input.sum
            )));
        }
        let currency: Currency = input.currency.parse()?;
        let category = input.category.trim();
        if category.is_empty() {
            return Err(LedgerError::InvalidInput("category is required".into()));
        }

        let today = (self.today)();
        let entry = CostEntry {
            sum: input.sum,
            currency,
            category: category.to_string(),
            description: input.description.trim().to_string(),
            year: today.year(),
            month: today.month(),
            day: today.day(),
        };
        let record = self.store.insert(&entry)?;
        info!(
            id = record.id,
            sum = record.sum,
            currency = %record.currency,
            category = %record.category,
            "cost recorded"
        );
        Ok(record)
    }

    /// All costs of one month, with amounts as recorded and a total in `currency`.
    pub fn get_report(&self, year: i32, month: u32, currency: &str) -> Result<Report> {
        let (target, rates, records) = self.month_costs(year, month, currency)?;
        let total: f64 = records
            .iter()
            .map(|r| convert(r.sum, r.currency, target, &rates))
            .sum();
        Ok(Report {
            year,
            month,
            costs: records.into_iter().map(ReportLine::from).collect(),
            total: ReportTotal {
                currency: target,
                total: round_money(total),
            },
        })
    }

    /// Converted spend per category for one month, in no particular order.
    pub fn get_category_totals(
        &self,
        year: i32,
        month: u32,
        currency: &str,
    ) -> Result<Vec<CategoryTotal>> {
        let (target, rates, records) = self.month_costs(year, month, currency)?;
        let mut agg: HashMap<String, f64> = HashMap::new();
        for r in records {
            let cat = if r.category.trim().is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                r.category
            };
            *agg.entry(cat).or_insert(0.0) += convert(r.sum, r.currency, target, &rates);
        }
        Ok(agg
            .into_iter()
            .map(|(category, total)| CategoryTotal {
                category,
                total: round_money(total),
            })
            .collect())
    }

    /// Converted spend for each month of `year`, always twelve entries Jan..Dec.
    pub fn get_year_monthly_totals(&self, year: i32, currency: &str) -> Result<Vec<MonthTotal>> {
        validate_year(year)?;
        let target: Currency = currency.parse()?;
        let rates = self.current_rates()?;
        let records = self
            .store
            .scan_by_index(Index::Year, KeyRange::only(IndexKey::Year(year)))?;

        let mut months = [0.0_f64; 12];
        for r in records {
            if (1..=12).contains(&r.month) {
                months[(r.month - 1) as usize] += convert(r.sum, r.currency, target, &rates);
            }
        }
        Ok(MONTH_LABELS
            .into_iter()
            .zip(months)
            .map(|(label, total)| MonthTotal {
                month: label,
                total: round_money(total),
            })
            .collect())
    }

    /// The configured rates URL, or [`DEFAULT_RATES_URL`] when none is saved.
    pub fn rates_url(&self) -> Result<String> {
        let v = self.store.get_setting(RATES_URL_KEY)?;
        Ok(v.map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| DEFAULT_RATES_URL.to_string()))
    }

    pub fn set_rates_url(&self, url: &str) -> Result<()> {
        self.store.set_setting(RATES_URL_KEY, url.trim())
    }

    /// Fetches and validates rates from `url`, reporting any failure.
    pub fn fetch_rates_strict(&self, url: &str) -> Result<RateTable> {
        self.rates.fetch_rates_strict(url)
    }

    pub fn close(self) -> Result<()> {
        self.store.close()
    }

    fn current_rates(&self) -> Result<RateTable> {
        let url = self.rates_url()?;
        Ok(self.rates.get_rates(&url))
    }

    fn month_costs(
        &self,
        year: i32,
        month: u32,
        currency: &str,
    ) -> Result<(Currency, RateTable, Vec<CostRecord>)> {
        validate_year(year)?;
        validate_month(month)?;
        let target: Currency = currency.parse()?;
        let rates = self.current_rates()?;
        let records = self.store.scan_by_index(
            Index::YearMonth,
            KeyRange::only(IndexKey::YearMonth(year, month)),
        )?;
        Ok((target, rates, records))
    }
}

static SHARED: Lazy<Mutex<Option<Arc<Ledger>>>> = Lazy::new(|| Mutex::new(None));

/// The process-wide ledger, opened from the default store on first use.
pub fn shared() -> Result<Arc<Ledger>> {
    shared_with(|| Ledger::new(LedgerStore::open(DB_NAME, DB_VERSION)?))
}

/// The process-wide ledger, built by `init` if none is open yet.
pub fn shared_with(init: impl FnOnce() -> Result<Ledger>) -> Result<Arc<Ledger>> {
    let mut slot = SHARED.lock().unwrap_or_else(PoisonError::into_inner);
    if let Some(ledger) = slot.as_ref() {
        return Ok(Arc::clone(ledger));
    }
    let ledger = Arc::new(init()?);
    *slot = Some(Arc::clone(&ledger));
    Ok(ledger)
}

/// Forgets the process-wide ledger. Returns whether one was open.
///
/// The connection closes once the last outstanding handle is dropped.
pub fn close_shared() -> bool {
    SHARED
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .take()
        .is_some()
}
