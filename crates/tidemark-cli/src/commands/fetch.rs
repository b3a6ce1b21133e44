use std::sync::Arc;

use serde_json::json;
use tidemark_core::{
    HistoryRequest, ReportError, ReqwestHttpClient, SeriesSource, Symbol, TradingDate,
    YahooChartSource,
};
use tidemark_store::{DailyBarRow, Store};

use crate::cli::FetchArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub async fn run(
    args: &FetchArgs,
    store: &Store,
    timeout_ms: u64,
) -> Result<CommandResult, CliError> {
    let source = YahooChartSource::new(Arc::new(ReqwestHttpClient::new()));
    run_with_source(args, store, &source, timeout_ms).await
}

async fn run_with_source(
    args: &FetchArgs,
    store: &Store,
    source: &dyn SeriesSource,
    timeout_ms: u64,
) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let start = TradingDate::parse(&args.start)?;
    let end = match &args.end {
        Some(end) => TradingDate::parse(end)?,
        None => TradingDate::from_date(time::OffsetDateTime::now_utc().date()),
    };

    let request = HistoryRequest::new(symbol.clone(), start, end)?.with_timeout_ms(timeout_ms);

    // A provider failure is a command outcome, not a crash: the local
    // store is untouched and the error travels in the envelope.
    let fetch = match source.daily_history(request).await {
        Ok(fetch) => fetch,
        Err(error) => {
            return Ok(CommandResult::failed(
                ReportError::new(error.code(), error.message()),
                source.provider(),
            ));
        }
    };

    let rows: Vec<DailyBarRow> = fetch
        .series
        .iter()
        .map(|observation| DailyBarRow {
            symbol: symbol.as_str().to_owned(),
            date: observation.date.format_iso(),
            open: observation.open,
            high: observation.high,
            low: observation.low,
            close: observation.close,
            volume: observation.volume.and_then(|v| i64::try_from(v).ok()),
        })
        .collect();

    store.replace_bars(symbol.as_str(), &rows)?;
    let coverage = store.coverage(symbol.as_str())?;

    let mut result = CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "stored_records": rows.len(),
            "coverage": coverage,
        }),
        source.provider(),
    );

    if fetch.skipped_rows > 0 {
        result = result.with_warning(format!(
            "provider returned {} unusable rows; they were skipped",
            fetch.skipped_rows
        ));
    }
    if rows.is_empty() {
        result = result.with_warning(format!(
            "provider returned no rows for {} in the requested range",
            symbol.as_str()
        ));
    }

    Ok(result)
}
