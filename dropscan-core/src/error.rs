//! Per-ticker error taxonomy.
//!
//! Every variant here is recoverable: the scanner records the ticker as
//! skipped with the error's message and carries on with the rest of the
//! universe. Configuration problems are not in this enum; they are fatal
//! and live with the configuration types.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Why a single ticker could not produce a PerformanceRecord.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum ScanError {
    /// Ticker absent from the fetched data, the fetch failed, or the series is empty.
    #[error("missing data for {ticker}: {detail}")]
    MissingData { ticker: String, detail: String },

    /// Fewer than two usable observations inside the requested window.
    #[error("insufficient data for {ticker}: {found} valid observation(s) in window, need at least {required}")]
    InsufficientWindow {
        ticker: String,
        found: usize,
        required: usize,
    },

    /// Percentage change is undefined for the given prices.
    #[error("invalid input for {ticker}: {detail}")]
    InvalidInput { ticker: String, detail: String },
}

impl ScanError {
    pub fn ticker(&self) -> &str {
        match self {
            Self::MissingData { ticker, .. }
            | Self::InsufficientWindow { ticker, .. }
            | Self::InvalidInput { ticker, .. } => ticker,
        }
    }

    /// Short machine-friendly kind, used as a column in exports.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingData { .. } => "missing_data",
            Self::InsufficientWindow { .. } => "insufficient_window",
            Self::InvalidInput { .. } => "invalid_input",
        }
    }
}
