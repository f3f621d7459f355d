// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::path::PathBuf;

/// Errors surfaced by the ledger library.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Bad connection parameters (store name or version).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Bad caller-supplied business data. Nothing was written or read.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The store could not be opened or its schema could not be prepared.
    #[error("failed to open ledger store at {}: {source}", .path.display())]
    StoreOpen {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A read or write transaction failed and was rolled back.
    #[error("transaction failed: {0}")]
    Transaction(#[from] rusqlite::Error),

    /// The rates payload is not one of the accepted shapes, or holds a bad value.
    #[error("invalid rates format: {0}")]
    InvalidRateFormat(String),

    /// The rates source could not be reached or answered with a non-success status.
    #[error("rates fetch failed: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, LedgerError>;

impl LedgerError {
    pub(crate) fn store_open(
        path: impl Into<PathBuf>,
        source: impl Into<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        LedgerError::StoreOpen {
            path: path.into(),
            source: source.into(),
        }
    }
}
