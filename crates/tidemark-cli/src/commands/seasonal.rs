use serde_json::json;
use tidemark_core::{AnalyticsError, Symbol};
use tidemark_store::Store;

use crate::cli::SeasonalArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &SeasonalArgs, store: &Store) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = super::load_series(store, &symbol, None, None)?;

    let years = tidemark_core::month_history(&series, args.month)?;

    let mut warnings = Vec::new();
    let summary = match tidemark_core::month_summary(&series, args.month) {
        Ok(summary) => Some(summary),
        Err(AnalyticsError::EmptySeries) => {
            warnings.push(format!(
                "no {} observations stored for {}",
                tidemark_core::month_name(args.month),
                symbol.as_str()
            ));
            None
        }
        Err(error) => return Err(error.into()),
    };

    Ok(CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "month": args.month,
            "month_name": tidemark_core::month_name(args.month),
            "years": years,
            "summary": summary,
        }),
        "store",
    )
    .with_warnings(warnings))
}
