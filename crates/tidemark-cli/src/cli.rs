//! CLI argument definitions for tidemark.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `fetch` | Download daily history into the local store |
//! | `status` | Show local coverage for a symbol |
//! | `cycles` | Segment the price history into bull/bear cycles |
//! | `monthly` | Monthly return profile and seasonality summary |
//! | `sharpe` | Risk-adjusted return summary and rolling Sharpe |
//! | `seasonal` | Per-year performance for a calendar month |
//! | `yearly` | Calendar-year returns |
//!
//! # Examples
//!
//! ```bash
//! # Pull the full Nasdaq-100 history
//! tidemark fetch ^NDX --start 1985-10-01
//!
//! # Segment it with a 20% reversal threshold
//! tidemark cycles ^NDX --threshold 20 --pretty
//!
//! # November, every year on record
//! tidemark seasonal ^NDX --month 11
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Index-history analytics over a local DuckDB store.
///
/// Downloads daily OHLC data from Yahoo Finance, persists it locally,
/// and runs cycle segmentation and return analytics against the cache.
#[derive(Debug, Parser)]
#[command(
    name = "tidemark",
    author,
    version,
    about = "Bull/bear cycle and seasonality analytics for index price history"
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Data directory override (defaults to $TIDEMARK_HOME or ~/.tidemark).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Request timeout budget in milliseconds.
    #[arg(long, global = true, default_value_t = 10_000)]
    pub timeout_ms: u64,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Newline-delimited JSON (one object per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download daily history from Yahoo and replace the local copy.
    ///
    /// # Examples
    ///
    ///   tidemark fetch ^NDX --start 1985-10-01
    ///   tidemark fetch ^NDX --start 2020-01-01 --end 2024-12-31
    Fetch(FetchArgs),

    /// Show what the local store holds for a symbol.
    Status(StatusArgs),

    /// Segment the stored history into bull/bear cycles.
    ///
    /// A bull cycle ends when price falls more than the threshold below
    /// its running high; a bear cycle ends when price rises more than
    /// the threshold above its running low.
    ///
    /// # Examples
    ///
    ///   tidemark cycles ^NDX
    ///   tidemark cycles ^NDX --threshold 15 --start 2000-01-01
    Cycles(CyclesArgs),

    /// Monthly returns and the per-calendar-month seasonality profile.
    Monthly(MonthlyArgs),

    /// Annualized Sharpe ratio plus a rolling window series.
    Sharpe(SharpeArgs),

    /// Year-by-year performance of a single calendar month.
    ///
    /// # Examples
    ///
    ///   tidemark seasonal ^NDX --month 11
    Seasonal(SeasonalArgs),

    /// Calendar-year returns for the stored history.
    Yearly(YearlyArgs),
}

/// Arguments for the `fetch` command.
#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Market symbol (e.g., ^NDX, QQQ).
    pub symbol: String,

    /// Inclusive start date (YYYY-MM-DD).
    #[arg(long)]
    pub start: String,

    /// Inclusive end date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<String>,
}

/// Arguments for the `status` command.
#[derive(Debug, Args)]
pub struct StatusArgs {
    /// Market symbol to inspect.
    pub symbol: String,
}

/// Arguments for the `cycles` command.
#[derive(Debug, Args)]
pub struct CyclesArgs {
    /// Market symbol to analyze.
    pub symbol: String,

    /// Reversal threshold in percent, exclusive bounds (0, 100).
    /// Values between 10 and 30 are the useful range for daily data.
    #[arg(long, default_value_t = 20.0)]
    pub threshold: f64,

    /// Restrict analysis to dates on or after this one (YYYY-MM-DD).
    #[arg(long)]
    pub start: Option<String>,

    /// Restrict analysis to dates on or before this one (YYYY-MM-DD).
    #[arg(long)]
    pub end: Option<String>,
}

/// Arguments for the `monthly` command.
#[derive(Debug, Args)]
pub struct MonthlyArgs {
    /// Market symbol to analyze.
    pub symbol: String,
}

/// Arguments for the `sharpe` command.
#[derive(Debug, Args)]
pub struct SharpeArgs {
    /// Market symbol to analyze.
    pub symbol: String,

    /// Rolling window length in months.
    #[arg(long, default_value_t = 12)]
    pub window: usize,

    /// Annual risk-free rate in percent.
    #[arg(long, default_value_t = tidemark_core::DEFAULT_RISK_FREE_PCT)]
    pub risk_free: f64,
}

/// Arguments for the `seasonal` command.
#[derive(Debug, Args)]
pub struct SeasonalArgs {
    /// Market symbol to analyze.
    pub symbol: String,

    /// Calendar month to profile (1-12).
    #[arg(long, default_value_t = 11)]
    pub month: u8,
}

/// Arguments for the `yearly` command.
#[derive(Debug, Args)]
pub struct YearlyArgs {
    /// Market symbol to analyze.
    pub symbol: String,
}
