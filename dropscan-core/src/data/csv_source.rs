//! CSV directory source.
//!
//! One file per ticker at `<dir>/<TICKER>.csv`, with a header row in the
//! layout a Yahoo Finance export produces:
//!
//! ```text
//! Date,Open,High,Low,Close,Adj Close,Volume
//! 2024-01-02,2580.0,2601.5,2571.1,2590.3,2590.3,5123400
//! ```
//!
//! Column names are matched case-insensitively in their usual spellings;
//! unknown columns are ignored. An empty or unparsable price cell is a
//! missing observation (NaN), not a load error. An unparsable date is.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde::Deserialize;

use super::provider::{DataError, PriceSource};
use crate::domain::{PriceBar, PriceSeries};

#[derive(Debug, Deserialize)]
struct CsvRow {
    date: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// Reads `<dir>/<TICKER>.csv` files.
#[derive(Debug, Clone)]
pub struct CsvDirSource {
    dir: PathBuf,
}

impl CsvDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding `ticker`.
    pub fn path_for(&self, ticker: &str) -> PathBuf {
        self.dir.join(format!("{ticker}.csv"))
    }

    /// Tickers that have a file in the directory, sorted.
    pub fn available_tickers(&self) -> Result<Vec<String>, std::io::Error> {
        let mut tickers = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|e| e.to_str()) == Some("csv") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    tickers.push(stem.to_string());
                }
            }
        }
        tickers.sort();
        Ok(tickers)
    }
}

impl PriceSource for CsvDirSource {
    fn name(&self) -> &str {
        "csv"
    }

    fn fetch(&self, ticker: &str) -> Result<PriceSeries, DataError> {
        let path = self.path_for(ticker);
        if !path.exists() {
            return Err(DataError::NotFound {
                ticker: ticker.to_string(),
                path,
            });
        }
        let file = std::fs::File::open(&path).map_err(|source| DataError::Io {
            ticker: ticker.to_string(),
            source,
        })?;
        read_series(ticker, file)
    }
}

/// Parse CSV content from any reader into a series.
pub fn read_series<R: std::io::Read>(ticker: &str, reader: R) -> Result<PriceSeries, DataError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    // Header names are matched in lowercase.
    let headers = rdr
        .headers()
        .map_err(|e| parse_error(ticker, 1, e))?
        .iter()
        .map(|h| h.to_ascii_lowercase())
        .collect::<csv::StringRecord>();

    let mut bars = Vec::new();
    for result in rdr.records() {
        let record = result.map_err(|e| {
            let line = e.position().map(|p| p.line()).unwrap_or(0);
            parse_error(ticker, line, e)
        })?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row: CsvRow = record
            .deserialize(Some(&headers))
            .map_err(|e| parse_error(ticker, line, e))?;
        let date = parse_date(&row.date).ok_or_else(|| DataError::Parse {
            ticker: ticker.to_string(),
            line,
            detail: format!("unrecognized date '{}'", row.date),
        })?;
        let close = row.close.unwrap_or(f64::NAN);
        bars.push(PriceBar {
            date,
            open: row.open.unwrap_or(close),
            high: row.high.unwrap_or(close),
            low: row.low.unwrap_or(close),
            close,
            volume: row
                .volume
                .filter(|v| v.is_finite() && *v > 0.0)
                .map(|v| v.round() as u64)
                .unwrap_or(0),
        });
    }

    Ok(PriceSeries::new(ticker, bars)?)
}

fn parse_error(ticker: &str, line: u64, e: csv::Error) -> DataError {
    DataError::Parse {
        ticker: ticker.to_string(),
        line,
        detail: e.to_string(),
    }
}

/// Accepts `YYYY-MM-DD`, optionally followed by a time and offset
/// (`2024-01-02 00:00:00+05:30`), and `DD-MM-YYYY`.
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(head, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(head, "%d-%m-%Y"))
        .ok()
}
