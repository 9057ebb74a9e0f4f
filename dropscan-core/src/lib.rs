//! Dropscan Core — domain types and pure per-ticker computations.
//!
//! This crate contains everything that looks at a single ticker:
//! - Domain types (price bars, price series, performance records)
//! - Window selection over a series (calendar-day or observation lookback)
//! - Percentage change and threshold classification
//! - Per-series diagnostics (missing closes, rising trend, volatility)
//! - The market-data boundary (`PriceSource`, CSV directory source, universe)
//!
//! Nothing here ranks tickers against each other; that lives in
//! `dropscan-runner`.

pub mod change;
pub mod classify;
pub mod data;
pub mod diagnostics;
pub mod domain;
pub mod error;
pub mod evaluate;
pub mod window;

pub use change::{percent_change, round2, InvalidPrice};
pub use classify::{ClassificationMode, ThresholdConfig, ThresholdError};
pub use diagnostics::TickerDiagnostics;
pub use domain::{Classification, PerformanceRecord, PriceBar, PriceSeries};
pub use error::ScanError;
pub use evaluate::evaluate_series;
pub use window::{select_window, Anchor, WindowSelection, WindowSpec};
