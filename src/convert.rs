// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::models::Currency;
use crate::rates::RateTable;

/// Converts `amount` from one currency to another through USD.
///
/// Same-currency conversion returns `amount` untouched. An invalid `rates`
/// table is swapped for [`RateTable::FALLBACK`].
pub fn convert(amount: f64, from: Currency, to: Currency, rates: &RateTable) -> f64 {
    if from == to {
        return amount;
    }
    let rates = if rates.is_valid() {
        rates
    } else {
        &RateTable::FALLBACK
    };
    let usd = amount / rates.get(from);
    usd * rates.get(to)
}

/// Like [`convert`], for currency codes given as text (case-insensitive).
///
/// Codes outside the supported set are valued at 1 USD rather than rejected.
pub fn convert_codes(amount: f64, from: &str, to: &str, rates: &RateTable) -> f64 {
    let from_code = from.trim().to_uppercase();
    let to_code = to.trim().to_uppercase();
    if from_code == to_code {
        return amount;
    }
    match (from_code.parse::<Currency>(), to_code.parse::<Currency>()) {
        (Ok(f), Ok(t)) => convert(amount, f, t, rates),
        (Ok(f), Err(_)) => convert(amount, f, Currency::Usd, rates),
        (Err(_), Ok(t)) => convert(amount, Currency::Usd, t, rates),
        (Err(_), Err(_)) => amount,
    }
}
