mod cycles;
mod fetch;
mod monthly;
mod seasonal;
mod sharpe;
mod status;
mod yearly;

use std::time::Instant;

use serde_json::Value;
use tidemark_core::{Envelope, PriceObservation, PriceSeries, ReportError, ReportMeta, Symbol, TradingDate};
use tidemark_store::{Store, StoreConfig};

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub warnings: Vec<String>,
    pub errors: Vec<ReportError>,
    pub source: &'static str,
}

impl CommandResult {
    pub fn ok(data: Value, source: &'static str) -> Self {
        Self {
            data,
            warnings: Vec::new(),
            errors: Vec::new(),
            source,
        }
    }

    /// A command that ran but produced no data, only a structured error.
    pub fn failed(error: ReportError, source: &'static str) -> Self {
        Self {
            data: Value::Null,
            warnings: Vec::new(),
            errors: vec![error],
            source,
        }
    }

    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    pub fn with_warnings(mut self, warnings: Vec<String>) -> Self {
        self.warnings.extend(warnings);
        self
    }
}

pub async fn run(cli: &Cli) -> Result<Envelope<Value>, CliError> {
    let started = Instant::now();
    let store = open_store(cli)?;

    let command_result = match &cli.command {
        Command::Fetch(args) => fetch::run(args, &store, cli.timeout_ms).await?,
        Command::Status(args) => status::run(args, &store)?,
        Command::Cycles(args) => cycles::run(args, &store)?,
        Command::Monthly(args) => monthly::run(args, &store)?,
        Command::Sharpe(args) => sharpe::run(args, &store)?,
        Command::Seasonal(args) => seasonal::run(args, &store)?,
        Command::Yearly(args) => yearly::run(args, &store)?,
    };

    let latency_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    let mut meta = ReportMeta::new(
        uuid::Uuid::new_v4().to_string(),
        command_result.source,
    )
    .with_latency_ms(latency_ms);
    for warning in command_result.warnings {
        meta.push_warning(warning);
    }

    Ok(Envelope {
        meta,
        data: Some(command_result.data),
        errors: command_result.errors,
    })
}

fn open_store(cli: &Cli) -> Result<Store, CliError> {
    let config = match &cli.data_dir {
        Some(dir) => StoreConfig::at(dir.clone()),
        None => StoreConfig::default(),
    };
    Store::open(config).map_err(CliError::from)
}

/// Validate an optional ISO date argument before it reaches SQL.
fn checked_date(value: Option<&str>) -> Result<Option<&str>, CliError> {
    if let Some(value) = value {
        TradingDate::parse(value)?;
    }
    Ok(value)
}

/// Load the stored history for a symbol as a validated in-memory series.
fn load_series(
    store: &Store,
    symbol: &Symbol,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<PriceSeries, CliError> {
    let start = checked_date(start)?;
    let end = checked_date(end)?;
    let rows = store.load_bars(symbol.as_str(), start, end)?;

    let mut observations = Vec::with_capacity(rows.len());
    for row in rows {
        let date = TradingDate::parse(&row.date)?;
        let volume = row.volume.and_then(|v| u64::try_from(v).ok());
        observations.push(PriceObservation::new(
            date, row.open, row.high, row.low, row.close, volume,
        )?);
    }

    Ok(PriceSeries::new(observations)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tidemark_store::DailyBarRow;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Store::open(StoreConfig::at(dir.path())).expect("store open");
        (dir, store)
    }

    #[test]
    fn load_series_round_trips_stored_bars() {
        let (_dir, store) = temp_store();
        let rows = vec![
            DailyBarRow {
                symbol: "^NDX".to_string(),
                date: "2024-01-02".to_string(),
                open: 100.0,
                high: 105.0,
                low: 99.0,
                close: 104.0,
                volume: Some(1_000),
            },
            DailyBarRow {
                symbol: "^NDX".to_string(),
                date: "2024-01-03".to_string(),
                open: 104.0,
                high: 106.0,
                low: 101.0,
                close: 105.0,
                volume: None,
            },
        ];
        store.replace_bars("^NDX", &rows).expect("replace");

        let symbol = Symbol::parse("^NDX").expect("symbol");
        let series = load_series(&store, &symbol, None, None).expect("series");
        assert_eq!(series.len(), 2);
        assert_eq!(series.first().map(|o| o.close), Some(104.0));
        assert_eq!(series.last().and_then(|o| o.volume), None);
    }

    #[test]
    fn malformed_date_filters_are_rejected_before_sql() {
        let err = checked_date(Some("not-a-date")).expect_err("must fail");
        assert!(matches!(err, CliError::Validation(_)));
    }
}
