//! Core contracts for tidemark.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - Bull/bear regime segmentation and cycle statistics
//! - Monthly, seasonal, and risk-adjusted return analytics
//! - Provider trait and the Yahoo chart adapter
//! - Report envelope and structured errors

pub mod analytics;
pub mod cycles;
pub mod domain;
pub mod error;
pub mod fetch;
pub mod report;

pub use analytics::{
    month_history, month_name, month_summary, monthly_returns, rolling_sharpe, seasonality,
    sharpe_ratio, yearly_returns, MonthHistorySummary, MonthProfile, MonthYearPerformance,
    MonthlyReturn, RollingSharpePoint, SeasonalitySummary, SharpeSummary, YearlyReturn,
    DEFAULT_RISK_FREE_PCT,
};
pub use cycles::{detect, summarize, CycleRecord, RegimeSummary, RegimeType};
pub use domain::{PriceObservation, PriceSeries, Symbol, TradingDate};
pub use error::{AnalyticsError, ValidationError};
pub use fetch::{
    Backoff, HistoryRequest, HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient,
    ReqwestHttpClient, RetryConfig, SeriesFetch, SeriesSource, SourceError, SourceErrorKind,
    YahooChartSource,
};
pub use report::{Envelope, ReportError, ReportMeta};
