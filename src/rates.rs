// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Exchange rate acquisition.
//!
//! Rates are quoted against USD: `rates[X]` is how many units of `X` buy one
//! dollar. Two payload shapes are understood, a flat table keyed by our own
//! codes and the Frankfurter `{ base, rates }` response.

use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::error::{LedgerError, Result};
use crate::models::Currency;
use crate::utils::http_client;

pub const DEFAULT_RATES_URL: &str =
    "https://api.frankfurter.dev/v1/latest?base=USD&symbols=GBP,EUR,ILS";

/// Settings key holding the configured rates URL.
pub const RATES_URL_KEY: &str = "rates_url";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    #[serde(rename = "USD")]
    pub usd: f64,
    #[serde(rename = "GBP")]
    pub gbp: f64,
    #[serde(rename = "EURO")]
    pub euro: f64,
    #[serde(rename = "ILS")]
    pub ils: f64,
}

impl RateTable {
    /// Used whenever real rates are unavailable: every currency trades 1:1.
    pub const FALLBACK: RateTable = RateTable {
        usd: 1.0,
        gbp: 1.0,
        euro: 1.0,
        ils: 1.0,
    };

    pub fn get(&self, ccy: Currency) -> f64 {
        match ccy {
            Currency::Usd => self.usd,
            Currency::Gbp => self.gbp,
            Currency::Euro => self.euro,
            Currency::Ils => self.ils,
        }
    }

    /// True when all four rates are finite and strictly positive.
    pub fn is_valid(&self) -> bool {
        Currency::ALL
            .into_iter()
            .map(|c| self.get(c))
            .all(|v| v.is_finite() && v > 0.0)
    }
}

fn coerce(v: Option<&Value>) -> Option<f64> {
    match v? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn checked(table: RateTable) -> Result<RateTable> {
    if table.is_valid() {
        Ok(table)
    } else {
        Err(LedgerError::InvalidRateFormat(
            "rate values must be positive finite numbers".into(),
        ))
    }
}

fn from_flat(obj: &Map<String, Value>) -> Result<RateTable> {
    let rate = |code: &str| {
        coerce(obj.get(code)).ok_or_else(|| {
            LedgerError::InvalidRateFormat(format!("rate for {} is not a number", code))
        })
    };
    checked(RateTable {
        usd: rate("USD")?,
        gbp: rate("GBP")?,
        euro: rate("EURO")?,
        ils: rate("ILS")?,
    })
}

fn from_usd_based(base: &Value, rates: &Value) -> Result<RateTable> {
    if base.as_str() != Some("USD") {
        return Err(LedgerError::InvalidRateFormat(format!(
            "rates must be based on USD, got {}",
            base
        )));
    }
    let rates = rates.as_object().ok_or_else(|| {
        LedgerError::InvalidRateFormat("'rates' must be an object".into())
    })?;
    let euro = rates.get("EUR").or_else(|| rates.get("EURO"));
    let (Some(gbp), Some(euro), Some(ils)) = (rates.get("GBP"), euro, rates.get("ILS")) else {
        return Err(LedgerError::InvalidRateFormat(
            "response is missing one of GBP, EUR, ILS".into(),
        ));
    };
    let number = |v: &Value| {
        coerce(Some(v)).ok_or_else(|| {
            LedgerError::InvalidRateFormat(format!("rate value {} is not a number", v))
        })
    };
    checked(RateTable {
        usd: 1.0,
        gbp: number(gbp)?,
        euro: number(euro)?,
        ils: number(ils)?,
    })
}

/// Turns a raw rates payload into a complete, validated rate table.
pub fn normalize(raw: &Value) -> Result<RateTable> {
    let Some(obj) = raw.as_object() else {
        return Err(LedgerError::InvalidRateFormat(
            "rates payload must be a JSON object".into(),
        ));
    };
    if Currency::ALL.iter().all(|c| obj.contains_key(c.code())) {
        return from_flat(obj);
    }
    if let (Some(base), Some(rates)) = (obj.get("base"), obj.get("rates")) {
        return from_usd_based(base, rates);
    }
    Err(LedgerError::InvalidRateFormat(
        "unsupported rates JSON format".into(),
    ))
}

/// Fetches rate tables over HTTP.
///
/// [`RateProvider::get_rates`] never fails and is what reporting uses;
/// [`RateProvider::fetch_rates_strict`] reports every failure and is meant
/// for checking a URL before saving it.
#[derive(Debug, Clone)]
pub struct RateProvider {
    client: Client,
}

impl RateProvider {
    pub fn new() -> Result<Self> {
        Ok(RateProvider {
            client: http_client()?,
        })
    }

    pub fn with_client(client: Client) -> Self {
        RateProvider { client }
    }

    pub fn get_rates(&self, url: &str) -> RateTable {
        match self.fetch(url) {
            Ok(rates) => rates,
            Err(e) => {
                warn!(url, error = %e, "rates unavailable, using fallback table");
                RateTable::FALLBACK
            }
        }
    }

    pub fn fetch_rates_strict(&self, url: &str) -> Result<RateTable> {
        self.fetch(url)
    }

    fn fetch(&self, url: &str) -> Result<RateTable> {
        let resp = self.client.get(url.trim()).send()?.error_for_status()?;
        let body = resp.text()?;
        let raw: Value = serde_json::from_str(&body).map_err(|e| {
            LedgerError::InvalidRateFormat(format!("response body is not JSON: {}", e))
        })?;
        let rates = normalize(&raw)?;
        debug!(url, ?rates, "rates fetched");
        Ok(rates)
    }
}
