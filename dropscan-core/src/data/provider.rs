//! Price source trait and the loaded-data container.
//!
//! The `PriceSource` trait abstracts over where bars come from (CSV files,
//! an in-memory fixture, a remote API living outside this workspace) so
//! the scanner never performs I/O itself.

use std::collections::HashMap;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{PriceSeries, SeriesError};

/// Structured error types for data loading.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("no data for {ticker} (looked for {})", .path.display())]
    NotFound { ticker: String, path: PathBuf },

    #[error("no data for {ticker}")]
    UnknownTicker { ticker: String },

    #[error("I/O error reading {ticker}: {source}")]
    Io {
        ticker: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed data for {ticker} at line {line}: {detail}")]
    Parse {
        ticker: String,
        line: u64,
        detail: String,
    },

    #[error(transparent)]
    Series(#[from] SeriesError),
}

/// Anything that can hand back a price series for a ticker.
pub trait PriceSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch the full series for one ticker. An empty series is a valid
    /// answer (e.g. a delisted symbol); the scanner decides what to do with it.
    fn fetch(&self, ticker: &str) -> Result<PriceSeries, DataError>;
}

/// Series that were loaded plus the reasons the rest were not.
#[derive(Debug, Clone, Default)]
pub struct MarketData {
    series: HashMap<String, PriceSeries>,
    failures: HashMap<String, String>,
}

impl MarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap already-built series, keyed by their ticker.
    pub fn from_series(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        let mut data = Self::new();
        for s in series {
            data.insert(s);
        }
        data
    }

    pub fn insert(&mut self, series: PriceSeries) {
        self.failures.remove(series.ticker());
        self.series.insert(series.ticker().to_string(), series);
    }

    pub fn record_failure(&mut self, ticker: impl Into<String>, reason: impl Into<String>) {
        self.failures.insert(ticker.into(), reason.into());
    }

    pub fn get(&self, ticker: &str) -> Option<&PriceSeries> {
        self.series.get(ticker)
    }

    /// Why loading `ticker` failed, if it did.
    pub fn failure(&self, ticker: &str) -> Option<&str> {
        self.failures.get(ticker).map(|s| s.as_str())
    }

    pub fn series(&self) -> &HashMap<String, PriceSeries> {
        &self.series
    }

    pub fn failures(&self) -> &HashMap<String, String> {
        &self.failures
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}

/// Load every ticker from `source`. Failures are recorded, never fatal.
pub fn load_market_data(source: &dyn PriceSource, tickers: &[&str]) -> MarketData {
    let mut data = MarketData::new();
    for ticker in tickers {
        match source.fetch(ticker) {
            Ok(series) => {
                log::debug!("{}: loaded {} bars for {ticker}", source.name(), series.len());
                data.insert(series);
            }
            Err(e) => {
                log::warn!("{}: {ticker} not loaded: {e}", source.name());
                data.record_failure(*ticker, e.to_string());
            }
        }
    }
    log::info!(
        "{}: loaded {}/{} tickers",
        source.name(),
        data.len(),
        tickers.len()
    );
    data
}

/// Source backed by a map of prebuilt series. Used by tests and benches.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    series: HashMap<String, PriceSeries>,
}

impl InMemorySource {
    pub fn new(series: impl IntoIterator<Item = PriceSeries>) -> Self {
        Self {
            series: series
                .into_iter()
                .map(|s| (s.ticker().to_string(), s))
                .collect(),
        }
    }
}

impl PriceSource for InMemorySource {
    fn name(&self) -> &str {
        "in-memory"
    }

    fn fetch(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        self.series
            .get(ticker)
            .cloned()
            .ok_or_else(|| DataError::UnknownTicker {
                ticker: ticker.to_string(),
            })
    }
}
