// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fmt;
use std::str::FromStr;

use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ToSql, ToSqlOutput, ValueRef};
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// The fixed set of currencies a cost can be recorded in or reported as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
    #[serde(rename = "GBP")]
    Gbp,
    #[serde(rename = "EURO")]
    Euro,
    #[serde(rename = "ILS")]
    Ils,
}

impl Currency {
    pub const ALL: [Currency; 4] = [Currency::Usd, Currency::Gbp, Currency::Euro, Currency::Ils];

    pub fn code(self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Gbp => "GBP",
            Currency::Euro => "EURO",
            Currency::Ils => "ILS",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Parses a currency code, ignoring case and surrounding whitespace.
impl FromStr for Currency {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_uppercase();
        Currency::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| LedgerError::InvalidInput(format!("Unsupported currency: {}", code)))
    }
}

impl ToSql for Currency {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.code()))
    }
}

impl FromSql for Currency {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        s.parse().map_err(|e: LedgerError| FromSqlError::Other(Box::new(e)))
    }
}

/// Caller-supplied fields of a cost, before validation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewCost {
    pub sum: f64,
    pub currency: String,
    pub category: String,
    #[serde(default)]
    pub description: String,
}

/// One stored ledger entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostRecord {
    pub id: i64,
    pub sum: f64,
    pub currency: Currency,
    pub category: String,
    pub description: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A cost as it appears in a month report: original amount and currency.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportLine {
    pub id: i64,
    pub sum: f64,
    pub currency: Currency,
    pub category: String,
    pub description: String,
    pub day: u32,
}

impl From<CostRecord> for ReportLine {
    fn from(r: CostRecord) -> Self {
        ReportLine {
            id: r.id,
            sum: r.sum,
            currency: r.currency,
            category: r.category,
            description: r.description,
            day: r.day,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ReportTotal {
    pub currency: Currency,
    pub total: f64,
}

/// Month report: every cost of the month plus one converted grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub year: i32,
    pub month: u32,
    pub costs: Vec<ReportLine>,
    pub total: ReportTotal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthTotal {
    pub month: &'static str,
    pub total: f64,
}

/// A validated cost stamped with its date, not yet assigned an id.
#[derive(Debug, Clone, PartialEq)]
pub struct CostEntry {
    pub sum: f64,
    pub currency: Currency,
    pub category: String,
    pub description: String,
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

impl CostEntry {
    pub fn into_record(self, id: i64) -> CostRecord {
        CostRecord {
            id,
            sum: self.sum,
            currency: self.currency,
            category: self.category,
            description: self.description,
            year: self.year,
            month: self.month,
            day: self.day,
        }
    }
}
