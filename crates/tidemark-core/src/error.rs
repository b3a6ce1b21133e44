use thiserror::Error;

use crate::cycles::RegimeType;
use crate::domain::TradingDate;

/// Validation and contract errors exposed by `tidemark-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be ISO YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("no such calendar date: {year}-{month:02}-{day:02}")]
    DateOutOfRange { year: i32, month: u8, day: u8 },

    #[error("field '{field}' must be finite")]
    NonFiniteValue { field: &'static str },
    #[error("field '{field}' must be non-negative")]
    NegativeValue { field: &'static str },

    #[error("observation high must be >= low")]
    InvalidBarRange,
    #[error("observation open/close must be within high/low range")]
    InvalidBarBounds,

    #[error("series dates must be strictly increasing: {date} repeats or precedes its predecessor")]
    OutOfOrderDate { date: TradingDate },
}

/// Errors raised by the analytics layer.
///
/// The analytics never log and never return partial results; every
/// precondition violation is surfaced to the caller as a typed failure
/// before any scanning work happens.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AnalyticsError {
    /// Reversal threshold outside the open interval (0, 100) percent.
    #[error("threshold_pct must be within (0, 100), got {value}")]
    InvalidThreshold { value: f64 },

    /// No cycles of the requested regime were observed; callers should
    /// report "no data" instead of averaging over nothing.
    #[error("no {regime} cycles in the detected sequence")]
    NoCycles { regime: RegimeType },

    #[error("series contains no usable observations")]
    EmptySeries,

    #[error("need at least {required} data points, got {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("rolling window {window} is invalid for {len} data points")]
    InvalidWindow { window: usize, len: usize },

    #[error("volatility is zero; risk-adjusted return is undefined")]
    ZeroVolatility,

    #[error("calendar month must be within 1..=12, got {value}")]
    InvalidMonth { value: u8 },
}
