//! Local `DuckDB` store for daily index history.
//!
//! One table holds the daily bars keyed by `(symbol, date)`; a second
//! holds per-symbol coverage metadata so callers can answer "what do we
//! have for this symbol" without scanning the bar table.

use std::fs;
use std::path::{Path, PathBuf};

use ::duckdb::Connection;
use ::duckdb::ToSql;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod migrations;
pub mod pool;

pub use pool::{ConnectionPool, StoreConnection};

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// `DuckDB` database error.
    #[error(transparent)]
    DuckDb(#[from] ::duckdb::Error),

    /// I/O error (file system operations).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Input was rejected before touching the database.
    #[error("store rejected input: {0}")]
    Rejected(String),
}

/// Configuration for the store database.
#[derive(Debug, Clone)]
pub struct StoreConfig {
    /// Root directory for tidemark data.
    pub tidemark_home: PathBuf,
    /// Path to the `DuckDB` database file.
    pub db_path: PathBuf,
    /// Maximum number of connections in the pool.
    pub max_pool_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        let tidemark_home = resolve_tidemark_home();
        let db_path = tidemark_home.join("cache").join("store.duckdb");
        Self {
            tidemark_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

impl StoreConfig {
    /// Configuration rooted at an explicit data directory.
    pub fn at(data_dir: impl Into<PathBuf>) -> Self {
        let tidemark_home = data_dir.into();
        let db_path = tidemark_home.join("cache").join("store.duckdb");
        Self {
            tidemark_home,
            db_path,
            max_pool_size: 4,
        }
    }
}

/// One persisted daily bar. Dates travel as ISO `YYYY-MM-DD` strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyBarRow {
    pub symbol: String,
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<i64>,
}

/// Coverage metadata for one symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub symbol: String,
    pub start_date: String,
    pub end_date: String,
    pub total_records: i64,
    pub last_updated: String,
}

/// The main store interface.
#[derive(Clone)]
pub struct Store {
    config: StoreConfig,
    pool: ConnectionPool,
}

impl Store {
    /// Open a store with default configuration.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(StoreConfig::default())
    }

    /// Open a store with the specified configuration.
    pub fn open(config: StoreConfig) -> Result<Self, StoreError> {
        if let Some(parent) = config.db_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let pool = ConnectionPool::new(config.db_path.clone(), config.max_pool_size);
        let store = Self { config, pool };
        store.initialize()?;
        Ok(store)
    }

    /// Initialize the database schema.
    pub fn initialize(&self) -> Result<(), StoreError> {
        let connection = self.pool.checkout()?;
        migrations::apply_migrations(&connection)?;
        Ok(())
    }

    pub fn db_path(&self) -> &Path {
        self.pool.db_path()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Replace the full history for a symbol in one transaction.
    ///
    /// A refresh always lands the provider's complete answer, so the
    /// previous rows for the symbol are dropped rather than merged.
    /// Passing an empty slice clears the symbol entirely.
    pub fn replace_bars(&self, symbol: &str, rows: &[DailyBarRow]) -> Result<(), StoreError> {
        for row in rows {
            if row.symbol != symbol {
                return Err(StoreError::Rejected(format!(
                    "row for '{}' in a replace of '{symbol}'",
                    row.symbol
                )));
            }
        }

        let connection = self.pool.checkout()?;
        connection.execute_batch("BEGIN TRANSACTION")?;
        let result = (|| -> Result<(), StoreError> {
            let params: [&dyn ToSql; 1] = [&symbol];
            connection.execute("DELETE FROM daily_bars WHERE symbol = ?", params.as_slice())?;

            if rows.is_empty() {
                let params: [&dyn ToSql; 1] = [&symbol];
                connection.execute(
                    "DELETE FROM series_meta WHERE symbol = ?",
                    params.as_slice(),
                )?;
                return Ok(());
            }

            for row in rows {
                let params: [&dyn ToSql; 7] = [
                    &row.symbol,
                    &row.date,
                    &row.open,
                    &row.high,
                    &row.low,
                    &row.close,
                    &row.volume,
                ];
                connection.execute(
                    "INSERT INTO daily_bars \
                     (symbol, date, open, high, low, close, volume, updated_at) \
                     VALUES (?, TRY_CAST(? AS DATE), ?, ?, ?, ?, ?, CURRENT_TIMESTAMP)",
                    params.as_slice(),
                )?;
            }

            // ISO dates compare correctly as strings.
            let start_date = rows
                .iter()
                .map(|row| row.date.as_str())
                .min()
                .unwrap_or_default();
            let end_date = rows
                .iter()
                .map(|row| row.date.as_str())
                .max()
                .unwrap_or_default();
            let total_records = rows.len() as i64;

            let params: [&dyn ToSql; 4] = [&symbol, &start_date, &end_date, &total_records];
            connection.execute(
                "INSERT OR REPLACE INTO series_meta \
                 (symbol, start_date, end_date, total_records, last_updated) \
                 VALUES (?, TRY_CAST(? AS DATE), TRY_CAST(? AS DATE), ?, CURRENT_TIMESTAMP)",
                params.as_slice(),
            )?;

            Ok(())
        })();

        finalize_transaction(&connection, result)
    }

    /// Load bars for a symbol ordered by date, optionally bounded by an
    /// inclusive ISO date range.
    pub fn load_bars(
        &self,
        symbol: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<Vec<DailyBarRow>, StoreError> {
        let start = start.map(str::to_owned);
        let end = end.map(str::to_owned);

        let mut sql = String::from(
            "SELECT symbol, CAST(date AS VARCHAR), open, high, low, close, volume \
             FROM daily_bars WHERE symbol = ?",
        );
        let mut params: Vec<&dyn ToSql> = vec![&symbol];

        if let Some(ref start) = start {
            sql.push_str(" AND date >= TRY_CAST(? AS DATE)");
            params.push(start);
        }
        if let Some(ref end) = end {
            sql.push_str(" AND date <= TRY_CAST(? AS DATE)");
            params.push(end);
        }
        sql.push_str(" ORDER BY date");

        let connection = self.pool.checkout()?;
        let mut statement = connection.prepare(&sql)?;
        let rows = statement.query_map(params.as_slice(), |row| {
            Ok(DailyBarRow {
                symbol: row.get(0)?,
                date: row.get(1)?,
                open: row.get(2)?,
                high: row.get(3)?,
                low: row.get(4)?,
                close: row.get(5)?,
                volume: row.get(6)?,
            })
        })?;

        let mut bars = Vec::new();
        for row in rows {
            bars.push(row?);
        }
        Ok(bars)
    }

    /// Coverage metadata for a symbol, or `None` if nothing is stored.
    pub fn coverage(&self, symbol: &str) -> Result<Option<Coverage>, StoreError> {
        let connection = self.pool.checkout()?;
        let params: [&dyn ToSql; 1] = [&symbol];
        let result = connection.query_row(
            "SELECT symbol, CAST(start_date AS VARCHAR), CAST(end_date AS VARCHAR), \
             total_records, CAST(last_updated AS VARCHAR) \
             FROM series_meta WHERE symbol = ?",
            params.as_slice(),
            |row| {
                Ok(Coverage {
                    symbol: row.get(0)?,
                    start_date: row.get(1)?,
                    end_date: row.get(2)?,
                    total_records: row.get(3)?,
                    last_updated: row.get(4)?,
                })
            },
        );

        match result {
            Ok(coverage) => Ok(Some(coverage)),
            Err(::duckdb::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(StoreError::DuckDb(error)),
        }
    }
}

/// Finalize a transaction, committing on success or rolling back on failure.
fn finalize_transaction<T>(
    connection: &Connection,
    result: Result<T, StoreError>,
) -> Result<T, StoreError> {
    match result {
        Ok(value) => {
            connection.execute_batch("COMMIT")?;
            Ok(value)
        }
        Err(error) => {
            let _ = connection.execute_batch("ROLLBACK");
            Err(error)
        }
    }
}

fn resolve_tidemark_home() -> PathBuf {
    if let Ok(home) = std::env::var("TIDEMARK_HOME") {
        if !home.trim().is_empty() {
            return PathBuf::from(home);
        }
    }
    if let Ok(home) = std::env::var("HOME") {
        if !home.trim().is_empty() {
            return PathBuf::from(home).join(".tidemark");
        }
    }
    PathBuf::from(".tidemark")
}
