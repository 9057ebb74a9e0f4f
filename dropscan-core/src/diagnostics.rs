//! Per-series diagnostics — pure reductions over a window of bars.
//!
//! Each function stands alone; the scanner combines them into
//! `TickerDiagnostics`, but none of them depends on a ranking pass.

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::domain::{PriceBar, PriceSeries};
use crate::window::{window_bars, WindowSpec};

/// Trend length used by the dashboards.
pub const DEFAULT_TREND_LENGTH: usize = 5;

/// Count of bars whose close is missing.
pub fn missing_close_count(bars: &[PriceBar]) -> usize {
    bars.iter().filter(|b| b.is_missing_close()).count()
}

/// True if the last `k` bars have strictly increasing closes.
///
/// Fewer than `k` bars, `k < 2`, or a missing close among them gives false.
pub fn is_rising(bars: &[PriceBar], k: usize) -> bool {
    if k < 2 || bars.len() < k {
        return false;
    }
    let tail = &bars[bars.len() - k..];
    if tail.iter().any(|b| b.is_missing_close()) {
        return false;
    }
    tail.windows(2).all(|w| w[1].close > w[0].close)
}

/// Sample standard deviation (n - 1) of the valid closes.
///
/// `None` when fewer than two valid closes exist.
pub fn close_std_dev(bars: &[PriceBar]) -> Option<f64> {
    let closes: Vec<f64> = bars
        .iter()
        .filter(|b| !b.is_missing_close())
        .map(|b| b.close)
        .collect();
    if closes.len() < 2 {
        return None;
    }
    Some(closes.std_dev())
}

/// True if the sample standard deviation exceeds `threshold` (currency units).
pub fn is_volatile(bars: &[PriceBar], threshold: f64) -> bool {
    close_std_dev(bars).is_some_and(|sd| sd > threshold)
}

/// Diagnostics for one ticker over the scan window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerDiagnostics {
    pub bars_in_window: usize,
    pub missing_closes: usize,
    pub rising: bool,
    pub std_dev: Option<f64>,
    pub volatile: bool,
}

impl TickerDiagnostics {
    /// Compute every diagnostic over the window `spec` of `series`.
    pub fn compute(
        series: &PriceSeries,
        spec: WindowSpec,
        trend_length: usize,
        volatility_threshold: f64,
    ) -> Self {
        let bars = window_bars(series, spec);
        let std_dev = close_std_dev(bars);
        Self {
            bars_in_window: bars.len(),
            missing_closes: missing_close_count(bars),
            rising: is_rising(bars, trend_length),
            std_dev,
            volatile: std_dev.is_some_and(|sd| sd > volatility_threshold),
        }
    }
}
