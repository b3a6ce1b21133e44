//! Acquisition of daily price history from an external provider.

pub mod http;
pub mod retry;
pub mod yahoo;

use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;

use serde::{Deserialize, Serialize};

use crate::domain::{PriceSeries, Symbol, TradingDate};

pub use http::{HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient};
pub use retry::{Backoff, RetryConfig};
pub use yahoo::YahooChartSource;

/// Error categories a provider can surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceErrorKind {
    Unavailable,
    RateLimited,
    Decode,
    NotFound,
    InvalidRequest,
}

/// Provider-boundary error with a stable machine-readable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn rate_limited(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::RateLimited,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Decode,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::RateLimited => "source.rate_limited",
            SourceErrorKind::Decode => "source.decode",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::InvalidRequest => "source.invalid_request",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code(), self.message)
    }
}

impl std::error::Error for SourceError {}

/// Inclusive date-range request for daily history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryRequest {
    pub symbol: Symbol,
    pub start: TradingDate,
    pub end: TradingDate,
    pub timeout_ms: u64,
}

impl HistoryRequest {
    pub fn new(
        symbol: Symbol,
        start: TradingDate,
        end: TradingDate,
    ) -> Result<Self, SourceError> {
        if start > end {
            return Err(SourceError::invalid_request(format!(
                "start {start} must not be after end {end}"
            )));
        }

        Ok(Self {
            symbol,
            start,
            end,
            timeout_ms: 10_000,
        })
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

/// A fetched history plus acquisition diagnostics.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesFetch {
    pub series: PriceSeries,
    /// Rows the provider returned but that carried null or unusable values.
    pub skipped_rows: usize,
}

/// Provider contract for daily OHLC history.
pub trait SeriesSource: Send + Sync {
    fn provider(&self) -> &'static str;

    fn daily_history<'a>(
        &'a self,
        request: HistoryRequest,
    ) -> Pin<Box<dyn Future<Output = Result<SeriesFetch, SourceError>> + Send + 'a>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_inverted_range() {
        let symbol = Symbol::parse("^NDX").expect("symbol");
        let start = TradingDate::from_calendar(2024, 2, 1).expect("date");
        let end = TradingDate::from_calendar(2024, 1, 1).expect("date");
        let err = HistoryRequest::new(symbol, start, end).expect_err("must fail");
        assert_eq!(err.kind(), SourceErrorKind::InvalidRequest);
    }

    #[test]
    fn error_codes_are_stable() {
        assert_eq!(SourceError::decode("x").code(), "source.decode");
        assert_eq!(SourceError::not_found("x").code(), "source.not_found");
    }
}
