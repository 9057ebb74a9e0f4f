//! Per-ticker evaluation: window → change → classification.

use crate::change::percent_change;
use crate::classify::ThresholdConfig;
use crate::domain::{PerformanceRecord, PriceSeries};
use crate::error::ScanError;
use crate::window::{select_window, Anchor, WindowSpec};

/// Produce the PerformanceRecord for one series, or the reason it has none.
///
/// Pure: reads only `series` and the supplied parameters.
pub fn evaluate_series(
    series: &PriceSeries,
    spec: WindowSpec,
    anchor: Anchor,
    thresholds: &ThresholdConfig,
) -> Result<PerformanceRecord, ScanError> {
    let selection = select_window(series, spec, anchor)?;
    let start = selection.start;
    let end = selection.end;

    let pct = percent_change(start.close, end.close).map_err(|e| ScanError::InvalidInput {
        ticker: series.ticker().to_string(),
        detail: e.to_string(),
    })?;

    Ok(PerformanceRecord {
        ticker: series.ticker().to_string(),
        start_date: start.date,
        end_date: end.date,
        start_price: start.close,
        end_price: end.close,
        change: end.close - start.close,
        percent_change: pct,
        classification: thresholds.classify(pct),
        degraded: selection.degraded,
    })
}
