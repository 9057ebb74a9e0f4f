//! PriceSeries — date-ordered bars for a single ticker.

use chrono::NaiveDate;
use serde::Serialize;
use thiserror::Error;

use super::bar::PriceBar;

/// Errors raised while constructing a series.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeriesError {
    #[error("duplicate bar for {ticker} on {date}")]
    DuplicateDate { ticker: String, date: NaiveDate },
}

/// Ascending, duplicate-free sequence of bars for one ticker.
///
/// Immutable after construction. Dates need not be contiguous: non-trading
/// days are simply absent.
#[derive(Debug, Clone, Serialize)]
pub struct PriceSeries {
    ticker: String,
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting bars by date. Rejects two bars on the same date.
    pub fn new(ticker: impl Into<String>, mut bars: Vec<PriceBar>) -> Result<Self, SeriesError> {
        let ticker = ticker.into();
        bars.sort_by_key(|b| b.date);
        if let Some(pair) = bars.windows(2).find(|w| w[0].date == w[1].date) {
            return Err(SeriesError::DuplicateDate {
                ticker,
                date: pair[0].date,
            });
        }
        Ok(Self { ticker, bars })
    }

    /// Series of close-only bars on consecutive calendar days starting at `start`.
    pub fn from_closes(ticker: impl Into<String>, start: NaiveDate, closes: &[f64]) -> Self {
        let bars = closes
            .iter()
            .enumerate()
            .map(|(i, &c)| PriceBar::from_close(start + chrono::Duration::days(i as i64), c))
            .collect();
        Self {
            ticker: ticker.into(),
            bars,
        }
    }

    pub fn ticker(&self) -> &str {
        &self.ticker
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.bars.first().map(|b| b.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.bars.last().map(|b| b.date)
    }
}
