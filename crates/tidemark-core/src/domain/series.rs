use serde::{Deserialize, Serialize};

use crate::domain::TradingDate;
use crate::ValidationError;

/// Single daily OHLC observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub date: TradingDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: Option<u64>,
}

impl PriceObservation {
    pub fn new(
        date: TradingDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: Option<u64>,
    ) -> Result<Self, ValidationError> {
        validate_non_negative("open", open)?;
        validate_non_negative("high", high)?;
        validate_non_negative("low", low)?;
        validate_non_negative("close", close)?;

        if high < low {
            return Err(ValidationError::InvalidBarRange);
        }

        if open < low || open > high || close < low || close > high {
            return Err(ValidationError::InvalidBarBounds);
        }

        Ok(Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        })
    }
}

/// Date-ordered daily price history.
///
/// The constructor enforces strictly increasing dates; downstream
/// consumers (the cycle detector in particular) rely on this and do not
/// re-validate ordering during their single forward pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    observations: Vec<PriceObservation>,
}

impl PriceSeries {
    pub fn new(observations: Vec<PriceObservation>) -> Result<Self, ValidationError> {
        for window in observations.windows(2) {
            if window[1].date <= window[0].date {
                return Err(ValidationError::OutOfOrderDate {
                    date: window[1].date,
                });
            }
        }

        Ok(Self { observations })
    }

    pub fn empty() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    pub fn first(&self) -> Option<&PriceObservation> {
        self.observations.first()
    }

    pub fn last(&self) -> Option<&PriceObservation> {
        self.observations.last()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PriceObservation> {
        self.observations.iter()
    }

    pub fn observations(&self) -> &[PriceObservation] {
        &self.observations
    }
}

impl<'a> IntoIterator for &'a PriceSeries {
    type Item = &'a PriceObservation;
    type IntoIter = std::slice::Iter<'a, PriceObservation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn validate_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if !value.is_finite() {
        return Err(ValidationError::NonFiniteValue { field });
    }
    if value < 0.0 {
        return Err(ValidationError::NegativeValue { field });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u8) -> TradingDate {
        TradingDate::from_calendar(2024, 1, day).expect("date")
    }

    fn obs(day: u8, close: f64) -> PriceObservation {
        PriceObservation::new(date(day), close, close, close, close, None).expect("observation")
    }

    #[test]
    fn rejects_close_outside_range() {
        let err = PriceObservation::new(date(1), 10.0, 12.0, 9.0, 12.5, Some(10))
            .expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarBounds));
    }

    #[test]
    fn rejects_high_below_low() {
        let err =
            PriceObservation::new(date(1), 10.0, 9.0, 11.0, 10.0, None).expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidBarRange));
    }

    #[test]
    fn rejects_duplicate_dates() {
        let err = PriceSeries::new(vec![obs(1, 100.0), obs(1, 101.0)]).expect_err("must fail");
        assert!(matches!(err, ValidationError::OutOfOrderDate { .. }));
    }

    #[test]
    fn rejects_backwards_dates() {
        let err = PriceSeries::new(vec![obs(2, 100.0), obs(1, 101.0)]).expect_err("must fail");
        assert!(matches!(err, ValidationError::OutOfOrderDate { .. }));
    }

    #[test]
    fn accepts_gap_tolerant_history() {
        let series =
            PriceSeries::new(vec![obs(2, 100.0), obs(5, 101.0), obs(9, 99.0)]).expect("series");
        assert_eq!(series.len(), 3);
        assert_eq!(series.first().map(|o| o.close), Some(100.0));
        assert_eq!(series.last().map(|o| o.close), Some(99.0));
    }
}
