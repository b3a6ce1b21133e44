//! Bull/bear regime segmentation.
//!
//! `detect` folds a daily price history into an ordered sequence of
//! non-overlapping [`CycleRecord`]s using a peak-to-trough reversal
//! threshold: while a bull regime runs, the detector tracks the highest
//! close seen so far, and only a drop of more than `threshold_pct` below
//! that high confirms the switch to a bear regime (and symmetrically for
//! rallies off a running low). Moves inside the band never flip the
//! regime, which keeps the segmentation insensitive to noise below the
//! threshold.
//!
//! The threshold is symmetric in percentage terms but asymmetric in
//! price units: the rally that ends a bear market starts from a lower
//! base than the drawdown that ends a bull market. That asymmetry is
//! intentional and preserved.

pub mod stats;

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::{PriceSeries, TradingDate};
use crate::AnalyticsError;

pub use stats::{summarize, RegimeSummary};

/// Direction of a market regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegimeType {
    Bull,
    Bear,
}

impl RegimeType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bull => "bull",
            Self::Bear => "bear",
        }
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::Bull => Self::Bear,
            Self::Bear => Self::Bull,
        }
    }
}

impl Display for RegimeType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One maximal contiguous regime span.
///
/// Consecutive records alternate regime and share their boundary: record
/// *i*'s end date/price is record *i+1*'s start date/price (the extremum
/// at which the reversal was later confirmed). For a bull record the end
/// price is the highest close inside the span; for a bear record the
/// lowest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub regime: RegimeType,
    pub start_date: TradingDate,
    pub start_price: f64,
    pub end_date: TradingDate,
    pub end_price: f64,
}

impl CycleRecord {
    /// Price change over the record, in percent of the start price.
    pub fn return_pct(&self) -> f64 {
        (self.end_price - self.start_price) / self.start_price * 100.0
    }

    /// Span length in calendar days.
    pub fn duration_days(&self) -> i64 {
        self.start_date.days_until(self.end_date)
    }
}

/// Segment `series` into alternating bull/bear cycles.
///
/// `threshold_pct` is expressed in percent (`20` means a 20% reversal)
/// and must lie strictly inside `(0, 100)`; anything else is rejected
/// before the scan starts. An empty series yields an empty record
/// sequence rather than an error.
///
/// The scan is a single forward pass, `O(n)` time and `O(1)` state
/// beyond the output. The regime of the first record is undetermined
/// until the second observation: it becomes bull when the second close
/// is above the first, bear otherwise. A one-observation series emits a
/// single bull record with equal start and end, the same convention as
/// a bull regime that never updated.
///
/// Reversal checks use strict inequality: a close landing exactly on
/// `extreme * (1 ± threshold/100)` stays inside the band.
pub fn detect(
    series: &PriceSeries,
    threshold_pct: f64,
) -> Result<Vec<CycleRecord>, AnalyticsError> {
    if !threshold_pct.is_finite() || threshold_pct <= 0.0 || threshold_pct >= 100.0 {
        return Err(AnalyticsError::InvalidThreshold {
            value: threshold_pct,
        });
    }

    let Some(first) = series.first() else {
        return Ok(Vec::new());
    };

    let drop_limit = 1.0 - threshold_pct / 100.0;
    let rally_limit = 1.0 + threshold_pct / 100.0;

    let mut records = Vec::new();
    let mut regime: Option<RegimeType> = None;
    let mut start_date = first.date;
    let mut start_price = first.close;
    let mut extreme_date = first.date;
    let mut extreme_price = first.close;

    for observation in series.iter().skip(1) {
        let close = observation.close;
        let current = *regime.get_or_insert(if close > extreme_price {
            RegimeType::Bull
        } else {
            RegimeType::Bear
        });

        match current {
            RegimeType::Bull => {
                if close > extreme_price {
                    // New high extends the bull run; the start of the next
                    // potential bear regime is not fixed yet.
                    extreme_price = close;
                    extreme_date = observation.date;
                } else if close < extreme_price * drop_limit {
                    records.push(CycleRecord {
                        regime: RegimeType::Bull,
                        start_date,
                        start_price,
                        end_date: extreme_date,
                        end_price: extreme_price,
                    });
                    regime = Some(RegimeType::Bear);
                    start_date = extreme_date;
                    start_price = extreme_price;
                    extreme_date = observation.date;
                    extreme_price = close;
                }
            }
            RegimeType::Bear => {
                if close < extreme_price {
                    extreme_price = close;
                    extreme_date = observation.date;
                } else if close > extreme_price * rally_limit {
                    records.push(CycleRecord {
                        regime: RegimeType::Bear,
                        start_date,
                        start_price,
                        end_date: extreme_date,
                        end_price: extreme_price,
                    });
                    regime = Some(RegimeType::Bull);
                    start_date = extreme_date;
                    start_price = extreme_price;
                    extreme_date = observation.date;
                    extreme_price = close;
                }
            }
        }
    }

    // The last regime is always emitted, closed at its running extremum,
    // even when it never reversed.
    records.push(CycleRecord {
        regime: regime.unwrap_or(RegimeType::Bull),
        start_date,
        start_price,
        end_date: extreme_date,
        end_price: extreme_price,
    });

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PriceObservation;

    fn series(closes: &[f64]) -> PriceSeries {
        let base = TradingDate::from_calendar(2024, 1, 1).expect("date");
        let mut date = base;
        let mut observations = Vec::with_capacity(closes.len());
        for close in closes {
            observations.push(
                PriceObservation::new(date, *close, *close, *close, *close, None)
                    .expect("observation"),
            );
            date = date.next_day().expect("next day");
        }
        PriceSeries::new(observations).expect("series")
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let data = series(&[100.0, 110.0]);
        for value in [0.0, -5.0, 100.0, 250.0, f64::NAN] {
            let err = detect(&data, value).expect_err("must fail");
            assert!(matches!(err, AnalyticsError::InvalidThreshold { .. }));
        }
    }

    #[test]
    fn empty_series_yields_no_records() {
        let records = detect(&PriceSeries::empty(), 20.0).expect("detect");
        assert!(records.is_empty());
    }

    #[test]
    fn single_observation_emits_degenerate_bull_record() {
        let records = detect(&series(&[100.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.regime, RegimeType::Bull);
        assert_eq!(record.start_date, record.end_date);
        assert_eq!(record.start_price, 100.0);
        assert_eq!(record.end_price, 100.0);
    }

    #[test]
    fn confirmed_drawdown_splits_bull_and_bear() {
        // 120 -> 95 is -20.8%, beyond the 20% band.
        let records = detect(&series(&[100.0, 120.0, 95.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].regime, RegimeType::Bull);
        assert_eq!(records[0].start_price, 100.0);
        assert_eq!(records[0].end_price, 120.0);
        assert_eq!(records[1].regime, RegimeType::Bear);
        assert_eq!(records[1].start_price, 120.0);
        assert_eq!(records[1].end_price, 95.0);
        assert_eq!(records[0].end_date, records[1].start_date);
    }

    #[test]
    fn pullback_inside_band_keeps_bull_open() {
        // 105 is only -4.5% off the 110 high; the record closes at the
        // running high, not at the last observation.
        let records = detect(&series(&[100.0, 110.0, 105.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 1);
        let record = &records[0];
        assert_eq!(record.regime, RegimeType::Bull);
        assert_eq!(record.end_price, 110.0);
        assert_eq!(
            record.end_date,
            TradingDate::from_calendar(2024, 1, 2).expect("date")
        );
    }

    #[test]
    fn exact_threshold_boundary_does_not_reverse() {
        // 80 == 100 * (1 - 20/100); strict inequality keeps the bull open.
        let records = detect(&series(&[90.0, 100.0, 80.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].regime, RegimeType::Bull);

        // 120 == 100 * (1 + 20/100) on the bear side.
        let records = detect(&series(&[110.0, 100.0, 120.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].regime, RegimeType::Bear);
    }

    #[test]
    fn constant_series_yields_exactly_one_record() {
        let records = detect(&series(&[100.0, 100.0, 100.0, 100.0]), 20.0).expect("detect");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].start_price, 100.0);
        assert_eq!(records[0].end_price, 100.0);
    }

    #[test]
    fn seed_regime_follows_second_close() {
        let down = detect(&series(&[100.0, 99.0]), 20.0).expect("detect");
        assert_eq!(down[0].regime, RegimeType::Bear);

        let up = detect(&series(&[100.0, 101.0]), 20.0).expect("detect");
        assert_eq!(up[0].regime, RegimeType::Bull);
    }

    #[test]
    fn regimes_alternate_and_stay_contiguous() {
        let closes = [
            100.0, 130.0, 95.0, 90.0, 120.0, 160.0, 110.0, 105.0, 150.0, 200.0,
        ];
        let records = detect(&series(&closes), 20.0).expect("detect");
        assert!(records.len() >= 3);
        for pair in records.windows(2) {
            assert_eq!(pair[0].regime.opposite(), pair[1].regime);
            assert_eq!(pair[0].end_date, pair[1].start_date);
            assert_eq!(pair[0].end_price, pair[1].start_price);
        }
    }

    #[test]
    fn coarser_threshold_never_adds_records() {
        let closes = [
            100.0, 130.0, 95.0, 90.0, 120.0, 160.0, 110.0, 105.0, 150.0, 200.0, 120.0, 180.0,
        ];
        let data = series(&closes);
        let mut previous = usize::MAX;
        for threshold in [5.0, 10.0, 20.0, 30.0, 50.0] {
            let count = detect(&data, threshold).expect("detect").len();
            assert!(count <= previous, "threshold {threshold} added records");
            previous = count;
        }
    }
}
