// Shared helpers for behavior tests
pub use tidemark_core::{PriceObservation, PriceSeries, TradingDate};

pub fn date(year: i32, month: u8, day: u8) -> TradingDate {
    TradingDate::from_calendar(year, month, day).expect("valid date")
}

/// One observation where open/high/low all track the close.
pub fn obs(year: i32, month: u8, day: u8, close: f64) -> PriceObservation {
    PriceObservation::new(date(year, month, day), close, close, close, close, Some(1_000))
        .expect("valid observation")
}

/// Build a series from `(year, month, day, close)` rows.
pub fn series_from(rows: &[(i32, u8, u8, f64)]) -> PriceSeries {
    let observations = rows
        .iter()
        .map(|&(year, month, day, close)| obs(year, month, day, close))
        .collect();
    PriceSeries::new(observations).expect("ordered series")
}

/// Consecutive calendar days starting 2020-01-01, one close per day.
pub fn daily_series(closes: &[f64]) -> PriceSeries {
    let mut current = date(2020, 1, 1);
    let mut observations = Vec::with_capacity(closes.len());
    for &close in closes {
        observations.push(
            PriceObservation::new(current, close, close, close, close, Some(1_000))
                .expect("valid observation"),
        );
        current = current.next_day().expect("next day");
    }
    PriceSeries::new(observations).expect("ordered series")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
