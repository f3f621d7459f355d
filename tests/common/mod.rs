// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

#![allow(dead_code)]

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::thread;

use costbook::db::LedgerStore;
use costbook::rates::RateProvider;
use costbook::Ledger;

/// Serves `body` with `status` to every request on a local port and returns its URL.
pub fn serve(status: u16, body: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    let body = body.to_string();
    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap_or(0) > 0 {
                if line == "\r\n" {
                    break;
                }
                line.clear();
            }
            let resp = format!(
                "HTTP/1.1 {} X\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            let _ = stream.write_all(resp.as_bytes());
            let _ = stream.flush();
        }
    });
    format!("http://{}/rates.json", addr)
}

pub fn serve_json(body: &str) -> String {
    serve(200, body)
}

/// A URL on a local port nothing listens on.
pub fn dead_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/rates.json", addr)
}

/// Rate provider that talks to the local test servers directly, ignoring proxy settings.
pub fn provider() -> RateProvider {
    let client = reqwest::blocking::Client::builder()
        .no_proxy()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .unwrap();
    RateProvider::with_client(client)
}

pub fn memory_ledger() -> Ledger {
    let store = LedgerStore::open_in_memory(1).unwrap();
    Ledger::with_rate_provider(store, provider())
}

/// In-memory ledger whose rates come from a local server returning `rates_json`.
pub fn ledger_with_rates(rates_json: &str) -> Ledger {
    let ledger = memory_ledger();
    ledger.set_rates_url(&serve_json(rates_json)).unwrap();
    ledger
}
