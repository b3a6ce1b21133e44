//! Annualized and rolling Sharpe ratio over monthly returns.

use serde::{Deserialize, Serialize};

use crate::analytics::monthly::{mean, sample_std, MonthlyReturn};
use crate::AnalyticsError;

/// Default risk-free rate benchmark, percent per year.
pub const DEFAULT_RISK_FREE_PCT: f64 = 2.0;

/// Whole-history risk-adjusted return.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SharpeSummary {
    pub sharpe_ratio: f64,
    pub annual_return_pct: f64,
    pub annual_volatility_pct: f64,
    pub risk_free_pct: f64,
    pub months: usize,
}

/// One trailing-window Sharpe observation, keyed by the window's last month.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RollingSharpePoint {
    pub year: i32,
    pub month: u8,
    pub sharpe_ratio: f64,
}

/// Sharpe ratio over the full monthly-return history.
///
/// Annualizes by `mean * 12` and `std * sqrt(12)`. Needs at least two
/// returns for a defined standard deviation; a dispersion of exactly
/// zero is surfaced as [`AnalyticsError::ZeroVolatility`] rather than an
/// infinite ratio.
pub fn sharpe_ratio(
    returns: &[MonthlyReturn],
    risk_free_pct: f64,
) -> Result<SharpeSummary, AnalyticsError> {
    if returns.len() < 2 {
        return Err(AnalyticsError::InsufficientData {
            required: 2,
            actual: returns.len(),
        });
    }

    let values: Vec<f64> = returns.iter().map(|r| r.return_pct).collect();
    let annual_return = mean(&values) * 12.0;
    let annual_std = sample_std(&values)
        .ok_or(AnalyticsError::InsufficientData {
            required: 2,
            actual: values.len(),
        })?
        * 12f64.sqrt();

    if annual_std == 0.0 {
        return Err(AnalyticsError::ZeroVolatility);
    }

    Ok(SharpeSummary {
        sharpe_ratio: (annual_return - risk_free_pct) / annual_std,
        annual_return_pct: annual_return,
        annual_volatility_pct: annual_std,
        risk_free_pct,
        months: returns.len(),
    })
}

/// Sharpe ratio over each trailing `window` of monthly returns.
///
/// `window` must be at least 2 and no larger than the history. Windows
/// whose dispersion is zero are skipped; an undefined ratio is never
/// emitted as NaN or infinity.
pub fn rolling_sharpe(
    returns: &[MonthlyReturn],
    window: usize,
    risk_free_pct: f64,
) -> Result<Vec<RollingSharpePoint>, AnalyticsError> {
    if window < 2 || window > returns.len() {
        return Err(AnalyticsError::InvalidWindow {
            window,
            len: returns.len(),
        });
    }

    let mut points = Vec::with_capacity(returns.len() - window + 1);
    for slice in returns.windows(window) {
        let values: Vec<f64> = slice.iter().map(|r| r.return_pct).collect();
        let Some(std) = sample_std(&values) else {
            continue;
        };
        if std == 0.0 {
            continue;
        }

        let annual_return = mean(&values) * 12.0;
        let annual_std = std * 12f64.sqrt();
        let last = slice[slice.len() - 1];
        points.push(RollingSharpePoint {
            year: last.year,
            month: last.month,
            sharpe_ratio: (annual_return - risk_free_pct) / annual_std,
        });
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn returns(values: &[f64]) -> Vec<MonthlyReturn> {
        values
            .iter()
            .enumerate()
            .map(|(index, value)| MonthlyReturn {
                year: 2024 + (index / 12) as i32,
                month: (index % 12) as u8 + 1,
                return_pct: *value,
            })
            .collect()
    }

    #[test]
    fn annualizes_mean_and_dispersion() {
        let history = returns(&[1.0, 3.0]);
        let summary = sharpe_ratio(&history, 2.0).expect("summary");

        assert!((summary.annual_return_pct - 24.0).abs() < 1e-9);
        let expected_std = std::f64::consts::SQRT_2 * 12f64.sqrt();
        assert!((summary.annual_volatility_pct - expected_std).abs() < 1e-9);
        assert!((summary.sharpe_ratio - (24.0 - 2.0) / expected_std).abs() < 1e-9);
        assert_eq!(summary.months, 2);
    }

    #[test]
    fn needs_two_returns() {
        let err = sharpe_ratio(&returns(&[1.0]), 2.0).expect_err("must fail");
        assert!(matches!(err, AnalyticsError::InsufficientData { .. }));
    }

    #[test]
    fn flat_returns_are_not_an_infinite_ratio() {
        let err = sharpe_ratio(&returns(&[1.0, 1.0, 1.0]), 2.0).expect_err("must fail");
        assert_eq!(err, AnalyticsError::ZeroVolatility);
    }

    #[test]
    fn rolling_emits_one_point_per_window() {
        let history = returns(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let points = rolling_sharpe(&history, 3, 2.0).expect("points");
        assert_eq!(points.len(), 3);
        assert_eq!((points[0].year, points[0].month), (2024, 3));
        assert_eq!((points[2].year, points[2].month), (2024, 5));
    }

    #[test]
    fn rolling_skips_zero_dispersion_windows() {
        let history = returns(&[1.0, 1.0, 1.0, 2.0]);
        let points = rolling_sharpe(&history, 3, 2.0).expect("points");
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].month, 4);
    }

    #[test]
    fn rolling_rejects_bad_window() {
        let history = returns(&[1.0, 2.0, 3.0]);
        for window in [0, 1, 4] {
            let err = rolling_sharpe(&history, window, 2.0).expect_err("must fail");
            assert!(matches!(err, AnalyticsError::InvalidWindow { .. }));
        }
    }
}
