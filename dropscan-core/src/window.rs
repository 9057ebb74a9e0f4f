//! Window Selector — picks the bars a comparison runs over.
//!
//! Two lookback units exist and each call site names one explicitly:
//! - `CalendarDays(n)`: bars dated within `n` calendar days of the
//!   series' last bar (inclusive on both ends).
//! - `Observations(n)`: the last `n` bars of the series.
//!
//! Bars with a missing close stay in the window (diagnostics count them)
//! but are never chosen as start or end. The end is always the latest
//! valid bar. The start depends on the anchor:
//! - `Earliest`: the oldest valid bar in the window.
//! - `Lag(k)`: the valid bar `k` observations before the end. With fewer
//!   than `k + 1` valid bars it falls back to the oldest valid bar and the
//!   selection is flagged `degraded`.

use serde::{Deserialize, Serialize};

use crate::domain::{PriceBar, PriceSeries};
use crate::error::ScanError;

/// Minimum valid observations for a comparison.
pub const MIN_OBSERVATIONS: usize = 2;

/// Lookback length and unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "unit", content = "length", rename_all = "snake_case")]
pub enum WindowSpec {
    CalendarDays(u32),
    Observations(usize),
}

impl WindowSpec {
    pub fn length(&self) -> usize {
        match *self {
            WindowSpec::CalendarDays(n) => n as usize,
            WindowSpec::Observations(n) => n,
        }
    }
}

impl Default for WindowSpec {
    /// Seven weeks of calendar days.
    fn default() -> Self {
        WindowSpec::CalendarDays(49)
    }
}

/// Which bar in the window the comparison starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Anchor {
    Earliest,
    Lag(usize),
}

impl Default for Anchor {
    /// Five observations back: one trading week.
    fn default() -> Self {
        Anchor::Lag(5)
    }
}

/// Bars in the window plus the chosen start and end observations.
#[derive(Debug, Clone)]
pub struct WindowSelection<'a> {
    /// Every bar in the window, missing closes included.
    pub bars: &'a [PriceBar],
    pub start: &'a PriceBar,
    pub end: &'a PriceBar,
    /// Number of bars in the window with a usable close.
    pub valid_count: usize,
    /// Lag anchor fell back to the oldest valid bar.
    pub degraded: bool,
}

/// Slice of `series` covered by `spec`. Empty for an empty series.
pub fn window_bars(series: &PriceSeries, spec: WindowSpec) -> &[PriceBar] {
    let bars = series.bars();
    let Some(last) = bars.last() else {
        return bars;
    };
    let first = match spec {
        // A cutoff before the earliest representable date covers the whole series.
        WindowSpec::CalendarDays(n) => last
            .date
            .checked_sub_signed(chrono::Duration::days(i64::from(n)))
            .map_or(0, |cutoff| bars.partition_point(|b| b.date < cutoff)),
        WindowSpec::Observations(n) => bars.len().saturating_sub(n),
    };
    &bars[first..]
}

/// Select the comparison window for one series.
///
/// Empty series are `MissingData`; fewer than two valid closes in the
/// window are `InsufficientWindow`. Never panics.
pub fn select_window(
    series: &PriceSeries,
    spec: WindowSpec,
    anchor: Anchor,
) -> Result<WindowSelection<'_>, ScanError> {
    if series.is_empty() {
        return Err(ScanError::MissingData {
            ticker: series.ticker().to_string(),
            detail: "price series is empty".into(),
        });
    }

    let bars = window_bars(series, spec);
    let valid: Vec<&PriceBar> = bars.iter().filter(|b| !b.is_missing_close()).collect();

    if valid.len() < MIN_OBSERVATIONS {
        return Err(ScanError::InsufficientWindow {
            ticker: series.ticker().to_string(),
            found: valid.len(),
            required: MIN_OBSERVATIONS,
        });
    }

    let end = valid[valid.len() - 1];
    let (start, degraded) = match anchor {
        Anchor::Earliest => (valid[0], false),
        Anchor::Lag(k) if valid.len() > k => (valid[valid.len() - 1 - k], false),
        Anchor::Lag(_) => (valid[0], true),
    };

    Ok(WindowSelection {
        bars,
        start,
        end,
        valid_count: valid.len(),
        degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(n: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, n).unwrap()
    }

    fn series(closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes("X.NS", day(1), closes)
    }

    #[test]
    fn observations_takes_last_n() {
        let s = series(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let sel = select_window(&s, WindowSpec::Observations(3), Anchor::Earliest).unwrap();
        assert_eq!(sel.bars.len(), 3);
        assert_eq!(sel.start.close, 3.0);
        assert_eq!(sel.end.close, 5.0);
        assert!(!sel.degraded);
    }

    #[test]
    fn observations_longer_than_series_takes_all() {
        let s = series(&[1.0, 2.0]);
        let sel = select_window(&s, WindowSpec::Observations(10), Anchor::Earliest).unwrap();
        assert_eq!(sel.bars.len(), 2);
        assert_eq!(sel.start.close, 1.0);
    }

    #[test]
    fn calendar_days_is_inclusive_of_cutoff() {
        // Bars on May 1..=10; a 7-day window from May 10 reaches back to May 3.
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        let s = series(&closes);
        let sel = select_window(&s, WindowSpec::CalendarDays(7), Anchor::Earliest).unwrap();
        assert_eq!(sel.bars.first().unwrap().date, day(3));
        assert_eq!(sel.bars.len(), 8);
        assert_eq!(sel.start.close, 3.0);
        assert_eq!(sel.end.close, 10.0);
    }

    #[test]
    fn calendar_window_past_earliest_date_takes_all() {
        let s = series(&[1.0, 2.0, 3.0]);
        assert_eq!(window_bars(&s, WindowSpec::CalendarDays(u32::MAX)).len(), 3);
        let sel = select_window(&s, WindowSpec::CalendarDays(200_000_000), Anchor::Earliest)
            .unwrap();
        assert_eq!(sel.start.close, 1.0);
        assert_eq!(sel.end.close, 3.0);
    }

    #[test]
    fn calendar_days_skips_gaps() {
        let s = PriceSeries::new(
            "GAP.NS",
            vec![
                PriceBar::from_close(day(1), 100.0),
                PriceBar::from_close(day(2), 101.0),
                PriceBar::from_close(day(9), 110.0),
                PriceBar::from_close(day(10), 111.0),
            ],
        )
        .unwrap();
        let sel = select_window(&s, WindowSpec::CalendarDays(5), Anchor::Earliest).unwrap();
        assert_eq!(sel.bars.len(), 2);
        assert_eq!(sel.start.close, 110.0);
    }

    #[test]
    fn lag_anchor_picks_bar_k_back() {
        let s = series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0, 16.0, 17.0]);
        let sel = select_window(&s, WindowSpec::Observations(8), Anchor::Lag(5)).unwrap();
        assert_eq!(sel.start.close, 12.0);
        assert_eq!(sel.end.close, 17.0);
        assert!(!sel.degraded);
    }

    #[test]
    fn lag_anchor_exactly_k_plus_one_is_not_degraded() {
        let s = series(&[10.0, 11.0, 12.0, 13.0, 14.0, 15.0]);
        let sel = select_window(&s, WindowSpec::Observations(6), Anchor::Lag(5)).unwrap();
        assert_eq!(sel.start.close, 10.0);
        assert!(!sel.degraded);
    }

    #[test]
    fn lag_anchor_falls_back_to_oldest_and_flags() {
        let s = series(&[10.0, 11.0, 12.0]);
        let sel = select_window(&s, WindowSpec::Observations(10), Anchor::Lag(5)).unwrap();
        assert_eq!(sel.start.close, 10.0);
        assert_eq!(sel.end.close, 12.0);
        assert!(sel.degraded);
    }

    #[test]
    fn missing_closes_are_skipped_for_start_and_end() {
        let s = series(&[f64::NAN, 10.0, 11.0, f64::NAN]);
        let sel = select_window(&s, WindowSpec::Observations(4), Anchor::Earliest).unwrap();
        assert_eq!(sel.bars.len(), 4);
        assert_eq!(sel.valid_count, 2);
        assert_eq!(sel.start.close, 10.0);
        assert_eq!(sel.end.close, 11.0);
    }

    #[test]
    fn empty_series_is_missing_data() {
        let s = PriceSeries::new("NONE.NS", vec![]).unwrap();
        let err = select_window(&s, WindowSpec::Observations(5), Anchor::Earliest).unwrap_err();
        assert!(matches!(err, ScanError::MissingData { .. }));
    }

    #[test]
    fn single_bar_is_insufficient() {
        let s = series(&[100.0]);
        let err = select_window(&s, WindowSpec::CalendarDays(7), Anchor::Earliest).unwrap_err();
        assert_eq!(
            err,
            ScanError::InsufficientWindow {
                ticker: "X.NS".into(),
                found: 1,
                required: 2
            }
        );
    }

    #[test]
    fn only_one_valid_close_is_insufficient() {
        let s = series(&[f64::NAN, f64::NAN, 100.0]);
        let err = select_window(&s, WindowSpec::Observations(3), Anchor::Earliest).unwrap_err();
        assert!(matches!(
            err,
            ScanError::InsufficientWindow { found: 1, .. }
        ));
    }

    #[test]
    fn window_spec_serde_shape() {
        let spec: WindowSpec =
            serde_json::from_str(r#"{"unit":"observations","length":20}"#).unwrap();
        assert_eq!(spec, WindowSpec::Observations(20));
        assert_eq!(spec.length(), 20);
    }
}
