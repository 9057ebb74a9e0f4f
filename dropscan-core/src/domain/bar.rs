//! PriceBar — one trading-day observation for one ticker.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily OHLCV observation.
///
/// A close of NaN marks a missing observation: the provider returned a row
/// for the date but no usable closing price. Such bars stay in the series
/// so the diagnostics can count them, but they are never used as a start
/// or end price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl PriceBar {
    /// Bar carrying only a closing price. OHL are set to the close.
    pub fn from_close(date: NaiveDate, close: f64) -> Self {
        Self {
            date,
            open: close,
            high: close,
            low: close,
            close,
            volume: 0,
        }
    }

    /// Returns true if the closing price is missing (NaN) or not finite.
    pub fn is_missing_close(&self) -> bool {
        !self.close.is_finite()
    }

    /// Basic OHLC sanity check: high >= low, high >= open/close, prices positive.
    pub fn is_sane(&self) -> bool {
        if self.is_missing_close() {
            return false;
        }
        self.high >= self.low
            && self.high >= self.open
            && self.high >= self.close
            && self.low <= self.open
            && self.low <= self.close
            && self.open > 0.0
            && self.close > 0.0
    }
}
