use serde_json::json;
use tidemark_core::Symbol;
use tidemark_store::Store;

use crate::cli::StatusArgs;
use crate::commands::CommandResult;
use crate::error::CliError;

pub fn run(args: &StatusArgs, store: &Store) -> Result<CommandResult, CliError> {
    let symbol = Symbol::parse(&args.symbol)?;

    match store.coverage(symbol.as_str())? {
        Some(coverage) => Ok(CommandResult::ok(json!(coverage), "store")),
        None => Ok(
            CommandResult::ok(json!(null), "store").with_warning(format!(
                "no local data for {}; run 'tidemark fetch {}' first",
                symbol.as_str(),
                symbol.as_str()
            )),
        ),
    }
}
