//! Monthly resampling and calendar-month seasonality.

use serde::{Deserialize, Serialize};

use crate::domain::PriceSeries;
use crate::AnalyticsError;

/// Percent change of the month-end close versus the previous sampled month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyReturn {
    pub year: i32,
    pub month: u8,
    pub return_pct: f64,
}

/// Seasonality profile of one calendar month across all sampled years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthProfile {
    pub month: u8,
    pub mean_return_pct: f64,
    pub best_return_pct: f64,
    pub worst_return_pct: f64,
    /// Sample standard deviation; `None` with fewer than two samples.
    pub std_dev_pct: Option<f64>,
    pub samples: usize,
}

/// Full seasonality table plus headline figures.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonalitySummary {
    pub months: Vec<MonthProfile>,
    pub mean_monthly_return_pct: f64,
    /// Compounded from the mean of the per-month means.
    pub annualized_return_pct: f64,
    pub best_month: u8,
    pub worst_month: u8,
}

/// Resample the series to the last close of each calendar month and take
/// percent changes between consecutive sampled months.
///
/// The first sampled month has no predecessor and yields no return. Gaps
/// in the calendar are tolerated: the change is taken against the
/// previous month that has data.
pub fn monthly_returns(series: &PriceSeries) -> Vec<MonthlyReturn> {
    let mut month_end: Vec<(i32, u8, f64)> = Vec::new();
    for observation in series {
        let key = (observation.date.year(), observation.date.month());
        match month_end.last_mut() {
            Some(last) if (last.0, last.1) == key => last.2 = observation.close,
            _ => month_end.push((key.0, key.1, observation.close)),
        }
    }

    month_end
        .windows(2)
        .map(|pair| MonthlyReturn {
            year: pair[1].0,
            month: pair[1].1,
            return_pct: (pair[1].2 - pair[0].2) / pair[0].2 * 100.0,
        })
        .collect()
}

/// Group monthly returns by calendar month and profile each month.
pub fn seasonality(returns: &[MonthlyReturn]) -> Result<SeasonalitySummary, AnalyticsError> {
    if returns.is_empty() {
        return Err(AnalyticsError::EmptySeries);
    }

    let mut months = Vec::new();
    for month in 1u8..=12 {
        let samples: Vec<f64> = returns
            .iter()
            .filter(|r| r.month == month)
            .map(|r| r.return_pct)
            .collect();
        if samples.is_empty() {
            continue;
        }

        let mean = mean(&samples);
        let best = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let worst = samples.iter().copied().fold(f64::INFINITY, f64::min);
        months.push(MonthProfile {
            month,
            mean_return_pct: mean,
            best_return_pct: best,
            worst_return_pct: worst,
            std_dev_pct: sample_std(&samples),
            samples: samples.len(),
        });
    }

    let month_means: Vec<f64> = months.iter().map(|m| m.mean_return_pct).collect();
    let mean_monthly = mean(&month_means);
    let annualized = ((1.0 + mean_monthly / 100.0).powi(12) - 1.0) * 100.0;

    let best_month = months
        .iter()
        .max_by(|a, b| a.mean_return_pct.total_cmp(&b.mean_return_pct))
        .map(|m| m.month)
        .unwrap_or_default();
    let worst_month = months
        .iter()
        .min_by(|a, b| a.mean_return_pct.total_cmp(&b.mean_return_pct))
        .map(|m| m.month)
        .unwrap_or_default();

    Ok(SeasonalitySummary {
        months,
        mean_monthly_return_pct: mean_monthly,
        annualized_return_pct: annualized,
        best_month,
        worst_month,
    })
}

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (ddof = 1); `None` with fewer than two values.
pub(crate) fn sample_std(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let mean = mean(values);
    let variance = values
        .iter()
        .map(|value| (value - mean).powi(2))
        .sum::<f64>()
        / (values.len() - 1) as f64;
    Some(variance.sqrt())
}

/// English month name for report output (`1` => `January`).
pub fn month_name(month: u8) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PriceObservation, TradingDate};

    fn close(year: i32, month: u8, day: u8, close: f64) -> PriceObservation {
        let date = TradingDate::from_calendar(year, month, day).expect("date");
        PriceObservation::new(date, close, close, close, close, None).expect("observation")
    }

    #[test]
    fn samples_last_close_of_each_month() {
        let series = PriceSeries::new(vec![
            close(2024, 1, 15, 90.0),
            close(2024, 1, 31, 100.0),
            close(2024, 2, 10, 140.0),
            close(2024, 2, 29, 110.0),
            close(2024, 3, 29, 99.0),
        ])
        .expect("series");

        let returns = monthly_returns(&series);
        assert_eq!(returns.len(), 2);
        assert_eq!((returns[0].year, returns[0].month), (2024, 2));
        assert!((returns[0].return_pct - 10.0).abs() < 1e-9);
        assert!((returns[1].return_pct - -10.0).abs() < 1e-9);
    }

    #[test]
    fn tolerates_calendar_gaps() {
        let series = PriceSeries::new(vec![
            close(2024, 1, 31, 100.0),
            // February missing entirely.
            close(2024, 3, 29, 120.0),
        ])
        .expect("series");

        let returns = monthly_returns(&series);
        assert_eq!(returns.len(), 1);
        assert_eq!(returns[0].month, 3);
        assert!((returns[0].return_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn seasonality_profiles_each_month() {
        let returns = vec![
            MonthlyReturn {
                year: 2022,
                month: 1,
                return_pct: 2.0,
            },
            MonthlyReturn {
                year: 2023,
                month: 1,
                return_pct: 4.0,
            },
            MonthlyReturn {
                year: 2023,
                month: 2,
                return_pct: -1.0,
            },
        ];

        let summary = seasonality(&returns).expect("summary");
        assert_eq!(summary.months.len(), 2);
        let january = &summary.months[0];
        assert_eq!(january.month, 1);
        assert_eq!(january.samples, 2);
        assert!((january.mean_return_pct - 3.0).abs() < 1e-9);
        assert!((january.std_dev_pct.expect("std") - std::f64::consts::SQRT_2).abs() < 1e-9);
        assert_eq!(summary.best_month, 1);
        assert_eq!(summary.worst_month, 2);

        let february = &summary.months[1];
        assert_eq!(february.samples, 1);
        assert!(february.std_dev_pct.is_none());
    }

    #[test]
    fn seasonality_rejects_empty_input() {
        let err = seasonality(&[]).expect_err("must fail");
        assert_eq!(err, AnalyticsError::EmptySeries);
    }
}
