//! Statistical reductions over a resampled price history.
//!
//! Everything here is a pure aggregation with no state machine; the
//! regime segmentation lives in [`crate::cycles`].

pub mod monthly;
pub mod seasonal;
pub mod sharpe;

pub use monthly::{
    monthly_returns, month_name, seasonality, MonthProfile, MonthlyReturn, SeasonalitySummary,
};
pub use seasonal::{
    month_history, month_summary, yearly_returns, MonthHistorySummary, MonthYearPerformance,
    YearlyReturn,
};
pub use sharpe::{
    rolling_sharpe, sharpe_ratio, RollingSharpePoint, SharpeSummary, DEFAULT_RISK_FREE_PCT,
};
