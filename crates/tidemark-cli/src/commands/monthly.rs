use serde_json::json;
use tidemark_core::{AnalyticsError, Symbol};
use tidemark_store::Store;

use crate::cli::MonthlyArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &MonthlyArgs, store: &Store) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = super::load_series(store, &symbol, None, None)?;

    let returns = tidemark_core::monthly_returns(&series);

    let mut warnings = Vec::new();
    let summary = match tidemark_core::seasonality(&returns) {
        Ok(summary) => Some(summary),
        Err(AnalyticsError::EmptySeries) => {
            warnings.push(format!(
                "not enough stored history for {} to derive monthly returns",
                symbol.as_str()
            ));
            None
        }
        Err(error) => return Err(error.into()),
    };

    Ok(CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "returns": returns,
            "seasonality": summary,
        }),
        "store",
    )
    .with_warnings(warnings))
}
