use serde_json::json;
use tidemark_core::{AnalyticsError, RollingSharpePoint, Symbol};
use tidemark_store::Store;

use crate::cli::SharpeArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &SharpeArgs, store: &Store) -> Result<CommandResult, CliError> {
    if args.window < 2 {
        return Err(CliError::Command(format!(
            "--window must be at least 2 months, got {}",
            args.window
        )));
    }

    let symbol = Symbol::parse(&args.symbol)?;
    let series = super::load_series(store, &symbol, None, None)?;
    let returns = tidemark_core::monthly_returns(&series);

    let mut warnings = Vec::new();
    let summary = match tidemark_core::sharpe_ratio(&returns, args.risk_free) {
        Ok(summary) => Some(summary),
        Err(
            error @ (AnalyticsError::InsufficientData { .. } | AnalyticsError::ZeroVolatility),
        ) => {
            warnings.push(error.to_string());
            None
        }
        Err(error) => return Err(error.into()),
    };

    let rolling: Vec<RollingSharpePoint> =
        match tidemark_core::rolling_sharpe(&returns, args.window, args.risk_free) {
            Ok(points) => points,
            Err(AnalyticsError::InvalidWindow { window, len }) => {
                warnings.push(format!(
                    "rolling window of {window} months exceeds the {len} available"
                ));
                Vec::new()
            }
            Err(error) => return Err(error.into()),
        };

    Ok(CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "window_months": args.window,
            "summary": summary,
            "rolling": rolling,
        }),
        "store",
    )
    .with_warnings(warnings))
}
