// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::{
    params, params_from_iter, Connection, OptionalExtension, Row, Transaction,
    TransactionBehavior,
};
use tracing::debug;

use crate::error::{LedgerError, Result};
use crate::models::{CostEntry, CostRecord};

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Costbook", "costbook"));

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS costs(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        sum REAL NOT NULL,
        currency TEXT NOT NULL,
        category TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        year INTEGER NOT NULL,
        month INTEGER NOT NULL,
        day INTEGER NOT NULL,
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );
    CREATE INDEX IF NOT EXISTS idx_costs_year ON costs(year);
    CREATE INDEX IF NOT EXISTS idx_costs_month ON costs(month);
    CREATE INDEX IF NOT EXISTS idx_costs_year_month ON costs(year, month);

    CREATE TABLE IF NOT EXISTS settings(
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    );
"#;

pub fn data_dir() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2).ok_or_else(|| {
        LedgerError::store_open(
            PathBuf::new(),
            "could not determine platform-specific data dir",
        )
    })?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).map_err(|e| LedgerError::store_open(data_dir, e))?;
    Ok(data_dir.to_path_buf())
}

/// The indices a scan can walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Index {
    Year,
    Month,
    YearMonth,
}

impl Index {
    pub fn name(self) -> &'static str {
        match self {
            Index::Year => "year",
            Index::Month => "month",
            Index::YearMonth => "year_month",
        }
    }
}

/// A key in one of the indices. Composite keys order by year, then month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKey {
    Year(i32),
    Month(u32),
    YearMonth(i32, u32),
}

impl IndexKey {
    fn index(self) -> Index {
        match self {
            IndexKey::Year(_) => Index::Year,
            IndexKey::Month(_) => Index::Month,
            IndexKey::YearMonth(..) => Index::YearMonth,
        }
    }

    fn values(self) -> Vec<i64> {
        match self {
            IndexKey::Year(y) => vec![i64::from(y)],
            IndexKey::Month(m) => vec![i64::from(m)],
            IndexKey::YearMonth(y, m) => vec![i64::from(y), i64::from(m)],
        }
    }
}

/// Inclusive key range over one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyRange {
    lower: IndexKey,
    upper: IndexKey,
}

impl KeyRange {
    pub fn only(key: IndexKey) -> Self {
        KeyRange {
            lower: key,
            upper: key,
        }
    }

    pub fn bound(lower: IndexKey, upper: IndexKey) -> Self {
        KeyRange { lower, upper }
    }

    fn query(&self, index: Index) -> Result<(String, Vec<i64>)> {
        if self.lower.index() != index || self.upper.index() != index {
            return Err(LedgerError::InvalidArgument(format!(
                "key range does not match index '{}'",
                index.name()
            )));
        }
        let filter = match index {
            Index::Year => "year BETWEEN ?1 AND ?2 ORDER BY year, id",
            Index::Month => "month BETWEEN ?1 AND ?2 ORDER BY month, id",
            Index::YearMonth => {
                "(year, month) >= (?1, ?2) AND (year, month) <= (?3, ?4) ORDER BY year, month, id"
            }
        };
        let sql = format!(
            "SELECT id, sum, currency, category, description, year, month, day FROM costs WHERE {}",
            filter
        );
        let mut bounds = self.lower.values();
        bounds.extend(self.upper.values());
        Ok((sql, bounds))
    }
}

/// Owner of the single ledger connection and its schema.
pub struct LedgerStore {
    conn: Mutex<Connection>,
    path: PathBuf,
    transactions: AtomicU64,
}

impl std::fmt::Debug for LedgerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerStore")
            .field("path", &self.path)
            .field("transactions", &self.transaction_count())
            .finish()
    }
}

fn validate_version(version: u32) -> Result<()> {
    if version == 0 {
        return Err(LedgerError::InvalidArgument(
            "database version must be a positive number".into(),
        ));
    }
    Ok(())
}

fn validate_name(name: &str) -> Result<&str> {
    let name = name.trim();
    if name.is_empty() {
        return Err(LedgerError::InvalidArgument(
            "database name must be a non-empty string".into(),
        ));
    }
    if name.contains(['/', '\\']) {
        return Err(LedgerError::InvalidArgument(format!(
            "database name '{}' must not contain path separators",
            name
        )));
    }
    Ok(name)
}

impl LedgerStore {
    /// Opens `<data dir>/<name>.sqlite`, creating or upgrading the schema to `version`.
    pub fn open(name: &str, version: u32) -> Result<Self> {
        let name = validate_name(name)?;
        validate_version(version)?;
        let path = data_dir()?.join(format!("{}.sqlite", name));
        Self::open_at(path, version)
    }

    pub fn open_at(path: impl AsRef<Path>, version: u32) -> Result<Self> {
        validate_version(version)?;
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| LedgerError::store_open(path, e))?;
        Self::init(conn, path.to_path_buf(), version)
    }

    pub fn open_in_memory(version: u32) -> Result<Self> {
        validate_version(version)?;
        let path = PathBuf::from(":memory:");
        let conn = Connection::open_in_memory().map_err(|e| LedgerError::store_open(&path, e))?;
        Self::init(conn, path, version)
    }

    fn init(mut conn: Connection, path: PathBuf, version: u32) -> Result<Self> {
        upgrade(&mut conn, &path, version)?;
        debug!(path = %path.display(), version, "ledger store open");
        Ok(LedgerStore {
            conn: Mutex::new(conn),
            path,
            transactions: AtomicU64::new(0),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of transactions begun through this handle.
    pub fn transaction_count(&self) -> u64 {
        self.transactions.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, Connection> {
        // A panic mid-transaction drops the transaction, which rolls it back.
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin<'c>(
        &self,
        conn: &'c mut Connection,
        behavior: TransactionBehavior,
    ) -> Result<Transaction<'c>> {
        self.transactions.fetch_add(1, Ordering::SeqCst);
        Ok(conn.transaction_with_behavior(behavior)?)
    }

    /// Appends one cost atomically and returns it with its assigned id.
    pub fn insert(&self, entry: &CostEntry) -> Result<CostRecord> {
        let mut conn = self.lock();
        let tx = self.begin(&mut conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO costs(sum, currency, category, description, year, month, day)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                entry.sum,
                entry.currency,
                entry.category,
                entry.description,
                entry.year,
                entry.month,
                entry.day
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;
        Ok(entry.clone().into_record(id))
    }

    /// Every cost whose key in `index` falls inside `range`, in index order
    /// and insertion order among equal keys.
    pub fn scan_by_index(&self, index: Index, range: KeyRange) -> Result<Vec<CostRecord>> {
        let (sql, bounds) = range.query(index)?;
        let mut conn = self.lock();
        let tx = self.begin(&mut conn, TransactionBehavior::Deferred)?;
        let records = {
            let mut stmt = tx.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(bounds), map_cost)?;
            rows.collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        debug!(index = index.name(), count = records.len(), "index scan");
        Ok(records)
    }

    pub fn get_setting(&self, key: &str) -> Result<Option<String>> {
        let mut conn = self.lock();
        let tx = self.begin(&mut conn, TransactionBehavior::Deferred)?;
        let v: Option<String> = tx
            .query_row("SELECT value FROM settings WHERE key=?1", params![key], |r| {
                r.get(0)
            })
            .optional()?;
        tx.commit()?;
        Ok(v)
    }

    pub fn set_setting(&self, key: &str, value: &str) -> Result<()> {
        let mut conn = self.lock();
        let tx = self.begin(&mut conn, TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO settings(key, value) VALUES(?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            params![key, value],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn close(self) -> Result<()> {
        let conn = self.conn.into_inner().unwrap_or_else(PoisonError::into_inner);
        conn.close().map_err(|(_, e)| LedgerError::Transaction(e))
    }
}

fn upgrade(conn: &mut Connection, path: &Path, version: u32) -> Result<()> {
    let fail = |e: rusqlite::Error| LedgerError::store_open(path, e);
    let current: u32 = conn
        .pragma_query_value(None, "user_version", |r| r.get(0))
        .map_err(fail)?;
    if current > version {
        return Err(LedgerError::store_open(
            path,
            format!(
                "requested version {} is older than on-disk version {}",
                version, current
            ),
        ));
    }
    if current < version {
        let tx = conn.transaction().map_err(fail)?;
        tx.execute_batch(SCHEMA).map_err(fail)?;
        tx.pragma_update(None, "user_version", version).map_err(fail)?;
        tx.commit().map_err(fail)?;
        debug!(from = current, to = version, "ledger schema upgraded");
    }
    Ok(())
}

fn map_cost(r: &Row<'_>) -> rusqlite::Result<CostRecord> {
    Ok(CostRecord {
        id: r.get(0)?,
        sum: r.get(1)?,
        currency: r.get(2)?,
        category: r.get(3)?,
        description: r.get(4)?,
        year: r.get(5)?,
        month: r.get(6)?,
        day: r.get(7)?,
    })
}
