//! Fixed-month and calendar-year performance breakdowns.

use serde::{Deserialize, Serialize};

use crate::analytics::monthly::mean;
use crate::domain::{PriceObservation, PriceSeries};
use crate::AnalyticsError;

/// One year's performance for a fixed calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthYearPerformance {
    pub year: i32,
    /// First-to-last close within the month, percent.
    pub return_pct: f64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
}

/// Historical profile of a fixed calendar month across all years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthHistorySummary {
    pub month: u8,
    pub years: Vec<MonthYearPerformance>,
    pub mean_return_pct: f64,
    pub best_return_pct: f64,
    pub worst_return_pct: f64,
    /// Share of years the month closed higher than it started, percent.
    pub win_rate_pct: f64,
    pub sample_years: usize,
}

/// Calendar-year return, first to last close of the year.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearlyReturn {
    pub year: i32,
    pub return_pct: f64,
    pub first_close: f64,
    pub last_close: f64,
}

/// Per-year performance of a fixed calendar month (e.g. every November).
///
/// Years with no observations in that month are simply absent.
pub fn month_history(
    series: &PriceSeries,
    month: u8,
) -> Result<Vec<MonthYearPerformance>, AnalyticsError> {
    if !(1..=12).contains(&month) {
        return Err(AnalyticsError::InvalidMonth { value: month });
    }

    let mut years: Vec<MonthYearPerformance> = Vec::new();
    let mut first_close = 0.0f64;

    for observation in series
        .iter()
        .filter(|observation| observation.date.month() == month)
    {
        let year = observation.date.year();
        match years.last_mut() {
            Some(current) if current.year == year => {
                fold_observation(current, observation, first_close)
            }
            _ => {
                first_close = observation.close;
                years.push(MonthYearPerformance {
                    year,
                    return_pct: 0.0,
                    open: observation.open,
                    close: observation.close,
                    high: observation.high,
                    low: observation.low,
                });
            }
        }
    }

    Ok(years)
}

fn fold_observation(
    current: &mut MonthYearPerformance,
    observation: &PriceObservation,
    first_close: f64,
) {
    current.close = observation.close;
    current.high = current.high.max(observation.high);
    current.low = current.low.min(observation.low);
    current.return_pct = (observation.close - first_close) / first_close * 100.0;
}

/// [`month_history`] plus aggregate figures and the win rate.
pub fn month_summary(
    series: &PriceSeries,
    month: u8,
) -> Result<MonthHistorySummary, AnalyticsError> {
    let years = month_history(series, month)?;
    if years.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }

    let returns: Vec<f64> = years.iter().map(|y| y.return_pct).collect();
    let wins = returns.iter().filter(|value| **value > 0.0).count();

    Ok(MonthHistorySummary {
        month,
        mean_return_pct: mean(&returns),
        best_return_pct: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        worst_return_pct: returns.iter().copied().fold(f64::INFINITY, f64::min),
        win_rate_pct: wins as f64 / returns.len() as f64 * 100.0,
        sample_years: years.len(),
        years,
    })
}

/// First-to-last close return for every calendar year with data.
pub fn yearly_returns(series: &PriceSeries) -> Vec<YearlyReturn> {
    let mut years: Vec<YearlyReturn> = Vec::new();
    for observation in series {
        let year = observation.date.year();
        match years.last_mut() {
            Some(current) if current.year == year => {
                current.last_close = observation.close;
                current.return_pct =
                    (current.last_close - current.first_close) / current.first_close * 100.0;
            }
            _ => years.push(YearlyReturn {
                year,
                return_pct: 0.0,
                first_close: observation.close,
                last_close: observation.close,
            }),
        }
    }
    years
}
