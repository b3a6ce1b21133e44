use serde_json::json;
use tidemark_core::Symbol;
use tidemark_store::Store;

use crate::cli::YearlyArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &YearlyArgs, store: &Store) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;
    let series = super::load_series(store, &symbol, None, None)?;

    let years = tidemark_core::yearly_returns(&series);
    let no_history = years.is_empty();

    let mut result = CommandResult::ok(
        json!({
            "symbol": symbol.as_str(),
            "years": years,
        }),
        "store",
    );

    if no_history {
        result = result.with_warning(format!(
            "no stored history for {}; run 'tidemark fetch {}' first",
            symbol.as_str(),
            symbol.as_str()
        ));
    }

    Ok(result)
}
