//! Aggregate summaries over a detected cycle sequence.

use serde::{Deserialize, Serialize};

use crate::cycles::{CycleRecord, RegimeType};
use crate::AnalyticsError;

/// Per-regime aggregate over a cycle sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegimeSummary {
    pub regime: RegimeType,
    pub count: usize,
    pub mean_duration_days: f64,
    pub mean_return_pct: f64,
}

/// Summarize all records of `regime` in the sequence.
///
/// Returns [`AnalyticsError::NoCycles`] when the sequence holds no record
/// of the requested regime, so callers can render "no data" instead of
/// dividing by zero.
pub fn summarize(
    records: &[CycleRecord],
    regime: RegimeType,
) -> Result<RegimeSummary, AnalyticsError> {
    let mut count = 0usize;
    let mut total_days = 0i64;
    let mut total_return_pct = 0.0f64;

    for record in records.iter().filter(|record| record.regime == regime) {
        count += 1;
        total_days += record.duration_days();
        total_return_pct += record.return_pct();
    }

    if count == 0 {
        return Err(AnalyticsError::NoCycles { regime });
    }

    Ok(RegimeSummary {
        regime,
        count,
        mean_duration_days: total_days as f64 / count as f64,
        mean_return_pct: total_return_pct / count as f64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TradingDate;

    fn record(regime: RegimeType, start: (u8, f64), end: (u8, f64)) -> CycleRecord {
        CycleRecord {
            regime,
            start_date: TradingDate::from_calendar(2024, 1, start.0).expect("date"),
            start_price: start.1,
            end_date: TradingDate::from_calendar(2024, 1, end.0).expect("date"),
            end_price: end.1,
        }
    }

    #[test]
    fn averages_returns_per_regime() {
        let records = vec![
            record(RegimeType::Bull, (1, 100.0), (11, 110.0)),
            record(RegimeType::Bear, (11, 110.0), (16, 90.0)),
            record(RegimeType::Bull, (16, 90.0), (31, 117.0)),
        ];

        let bull = summarize(&records, RegimeType::Bull).expect("bull summary");
        assert_eq!(bull.count, 2);
        // +10% and +30% average to +20%.
        assert!((bull.mean_return_pct - 20.0).abs() < 1e-9);
        assert!((bull.mean_duration_days - 12.5).abs() < 1e-9);
    }

    #[test]
    fn missing_regime_is_a_typed_condition() {
        let records = vec![record(RegimeType::Bull, (1, 100.0), (11, 110.0))];
        let err = summarize(&records, RegimeType::Bear).expect_err("must fail");
        assert_eq!(
            err,
            AnalyticsError::NoCycles {
                regime: RegimeType::Bear
            }
        );
    }

    #[test]
    fn empty_sequence_has_no_cycles_of_either_regime() {
        for regime in [RegimeType::Bull, RegimeType::Bear] {
            let err = summarize(&[], regime).expect_err("must fail");
            assert!(matches!(err, AnalyticsError::NoCycles { .. }));
        }
    }
}
