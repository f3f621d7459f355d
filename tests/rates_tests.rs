// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

mod common;

use costbook::convert::{convert, convert_codes};
use costbook::models::Currency;
use costbook::rates::{normalize, RateTable};
use costbook::LedgerError;
use serde_json::json;

fn table(usd: f64, gbp: f64, euro: f64, ils: f64) -> RateTable {
    RateTable { usd, gbp, euro, ils }
}

#[test]
fn normalize_accepts_flat_table() {
    let raw = json!({"USD": 1, "GBP": 0.6, "EURO": 0.7, "ILS": 3.4});
    assert_eq!(normalize(&raw).unwrap(), table(1.0, 0.6, 0.7, 3.4));
}

#[test]
fn normalize_coerces_numeric_strings() {
    let raw = json!({"USD": "1", "GBP": " 0.6 ", "EURO": 0.7, "ILS": "3.4"});
    assert_eq!(normalize(&raw).unwrap(), table(1.0, 0.6, 0.7, 3.4));
}

#[test]
fn normalize_reshapes_usd_based_response() {
    let raw = json!({
        "amount": 1.0,
        "base": "USD",
        "date": "2025-08-01",
        "rates": {"GBP": 0.8, "EUR": 0.9, "ILS": 3.6}
    });
    let rates = normalize(&raw).unwrap();
    assert_eq!(rates, table(1.0, 0.8, 0.9, 3.6));

    // A normalized table is itself an accepted payload.
    let again = normalize(&serde_json::to_value(rates).unwrap()).unwrap();
    assert_eq!(again, rates);
}

#[test]
fn normalize_accepts_euro_key_in_rates() {
    let raw = json!({"base": "USD", "rates": {"GBP": 0.8, "EURO": 0.9, "ILS": 3.6}});
    assert_eq!(normalize(&raw).unwrap().euro, 0.9);
}

#[test]
fn normalize_rejects_other_base() {
    let raw = json!({"base": "EUR", "rates": {"GBP": 0.8, "USD": 1.1, "ILS": 3.6}});
    assert!(matches!(normalize(&raw), Err(LedgerError::InvalidRateFormat(_))));
}

#[test]
fn normalize_rejects_missing_currency() {
    let raw = json!({"base": "USD", "rates": {"GBP": 0.8, "EUR": 0.9}});
    assert!(matches!(normalize(&raw), Err(LedgerError::InvalidRateFormat(_))));
}

#[test]
fn normalize_rejects_bad_values_and_shapes() {
    for raw in [
        json!({"USD": 1, "GBP": 0, "EURO": 0.7, "ILS": 3.4}),
        json!({"USD": 1, "GBP": -2, "EURO": 0.7, "ILS": 3.4}),
        json!({"USD": 1, "GBP": "abc", "EURO": 0.7, "ILS": 3.4}),
        json!({"USD": 1, "GBP": null, "EURO": 0.7, "ILS": 3.4}),
        json!({"base": "USD", "rates": {"GBP": "NaN", "EUR": 0.9, "ILS": 3.6}}),
        json!({"USD": 1, "GBP": 0.6}),
        json!([1, 2, 3]),
        json!("rates"),
        json!(null),
    ] {
        assert!(
            matches!(normalize(&raw), Err(LedgerError::InvalidRateFormat(_))),
            "accepted {}",
            raw
        );
    }
}

#[test]
fn convert_same_currency_is_identity() {
    let odd = table(1.0, 0.3, 7.0, 1e-9);
    for ccy in Currency::ALL {
        for amount in [0.1 + 0.2, -17.35, 1e15, 0.0] {
            assert_eq!(convert(amount, ccy, ccy, &odd), amount);
        }
    }
    assert_eq!(convert_codes(12.34, "gbp", "GBP", &odd), 12.34);
}

#[test]
fn convert_pivots_through_usd() {
    let rates = table(1.0, 2.0, 1.0, 1.0);
    assert_eq!(convert(100.0, Currency::Usd, Currency::Gbp, &rates), 200.0);
    assert_eq!(convert(200.0, Currency::Gbp, Currency::Usd, &rates), 100.0);

    let rates = table(1.0, 0.5, 0.8, 4.0);
    // 10 GBP -> 20 USD -> 80 ILS
    assert_eq!(convert(10.0, Currency::Gbp, Currency::Ils, &rates), 80.0);
    assert_eq!(convert_codes(100.0, "usd", " gbp ", &table(1.0, 2.0, 1.0, 1.0)), 200.0);
}

#[test]
fn convert_with_invalid_table_uses_fallback() {
    let broken = table(1.0, 0.0, f64::NAN, 3.0);
    assert_eq!(convert(42.0, Currency::Usd, Currency::Ils, &broken), 42.0);
    assert_eq!(convert(42.0, Currency::Euro, Currency::Gbp, &broken), 42.0);
}

#[test]
fn convert_codes_values_unknown_codes_at_one_dollar() {
    let rates = table(1.0, 2.0, 1.0, 4.0);
    assert_eq!(convert_codes(10.0, "XYZ", "ILS", &rates), 40.0);
    assert_eq!(convert_codes(10.0, "XYZ", "ABC", &rates), 10.0);
}

#[test]
fn provider_fetches_and_normalizes() {
    let url = common::serve_json(r#"{"base":"USD","rates":{"GBP":0.8,"EUR":0.9,"ILS":3.6}}"#);
    let provider = common::provider();
    assert_eq!(provider.get_rates(&url), table(1.0, 0.8, 0.9, 3.6));
    assert_eq!(provider.fetch_rates_strict(&url).unwrap(), table(1.0, 0.8, 0.9, 3.6));
}

#[test]
fn provider_falls_back_while_strict_fetch_fails() {
    let provider = common::provider();

    let dead = common::dead_url();
    assert_eq!(provider.get_rates(&dead), RateTable::FALLBACK);
    assert!(matches!(provider.fetch_rates_strict(&dead), Err(LedgerError::Network(_))));

    let not_found = common::serve(404, r#"{"error":"nope"}"#);
    assert_eq!(provider.get_rates(&not_found), RateTable::FALLBACK);
    assert!(matches!(provider.fetch_rates_strict(&not_found), Err(LedgerError::Network(_))));

    let garbage = common::serve_json("<html>not json</html>");
    assert_eq!(provider.get_rates(&garbage), RateTable::FALLBACK);
    assert!(matches!(
        provider.fetch_rates_strict(&garbage),
        Err(LedgerError::InvalidRateFormat(_))
    ));

    let wrong_shape = common::serve_json(r#"{"base":"EUR","rates":{"GBP":0.8}}"#);
    assert_eq!(provider.get_rates(&wrong_shape), RateTable::FALLBACK);
    assert!(matches!(
        provider.fetch_rates_strict(&wrong_shape),
        Err(LedgerError::InvalidRateFormat(_))
    ));

    assert_eq!(provider.get_rates("not a url"), RateTable::FALLBACK);
    assert!(provider.fetch_rates_strict("not a url").is_err());
}
