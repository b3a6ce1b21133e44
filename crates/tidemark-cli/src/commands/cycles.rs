use serde_json::json;
use tidemark_core::{AnalyticsError, RegimeSummary, RegimeType, Symbol};
use tidemark_store::Store;

use crate::cli::CyclesArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &CyclesArgs, store: &Store) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = super::load_series(store, &symbol, args.start.as_deref(), args.end.as_deref())?;

    let records = tidemark_core::detect(&series, args.threshold)?;

    let mut warnings = Vec::new();
    if records.is_empty() {
        warnings.push(format!(
            "no stored history for {} in the requested range",
            symbol.as_str()
        ));
    }

    let bull = regime_summary(&records, RegimeType::Bull, &mut warnings)?;
    let bear = regime_summary(&records, RegimeType::Bear, &mut warnings)?;

    Ok(CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "threshold_pct": args.threshold,
            "cycles": records,
            "bull": bull,
            "bear": bear,
        }),
        "store",
    )
    .with_warnings(warnings))
}

/// A regime with zero cycles is a property of the data, not a failure.
fn regime_summary(
    records: &[tidemark_core::CycleRecord],
    regime: RegimeType,
    warnings: &mut Vec<String>,
) -> Result<Option<RegimeSummary>, CliError> {
    match tidemark_core::summarize(records, regime) {
        Ok(summary) => Ok(Some(summary)),
        Err(AnalyticsError::NoCycles { regime }) => {
            if !records.is_empty() {
                warnings.push(format!("no completed {regime} cycles at this threshold"));
            }
            Ok(None)
        }
        Err(error) => Err(error.into()),
    }
}
