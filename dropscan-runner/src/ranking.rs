//! Ranking primitives over PerformanceRecord slices.
//!
//! Ordering is by full-precision percentage change with ties broken by
//! ticker ascending in both directions, so a ranking never depends on the
//! order tickers were supplied in.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};

use dropscan_core::domain::{Classification, PerformanceRecord};

use crate::config::SortDirection;

/// Lowest change first; ties by ticker.
pub fn cmp_ascending(a: &PerformanceRecord, b: &PerformanceRecord) -> Ordering {
    a.percent_change
        .total_cmp(&b.percent_change)
        .then_with(|| a.ticker.cmp(&b.ticker))
}

/// Highest change first; ties by ticker.
pub fn cmp_descending(a: &PerformanceRecord, b: &PerformanceRecord) -> Ordering {
    b.percent_change
        .total_cmp(&a.percent_change)
        .then_with(|| a.ticker.cmp(&b.ticker))
}

/// Borrowed view of `records` sorted in `direction`.
pub fn sorted(records: &[PerformanceRecord], direction: SortDirection) -> Vec<&PerformanceRecord> {
    let mut view: Vec<&PerformanceRecord> = records.iter().collect();
    match direction {
        SortDirection::Ascending => view.sort_by(|a, b| cmp_ascending(a, b)),
        SortDirection::Descending => view.sort_by(|a, b| cmp_descending(a, b)),
    }
    view
}

/// The `n` highest-change records, best first.
pub fn top_gainers(records: &[PerformanceRecord], n: usize) -> Vec<&PerformanceRecord> {
    let mut view = sorted(records, SortDirection::Descending);
    view.truncate(n);
    view
}

/// The `n` lowest-change records, worst first.
pub fn top_losers(records: &[PerformanceRecord], n: usize) -> Vec<&PerformanceRecord> {
    let mut view = sorted(records, SortDirection::Ascending);
    view.truncate(n);
    view
}

/// Top-`n` losers with every ticker in the top-`n` gainers removed.
///
/// When `n` exceeds half the ranked set the two slices overlap; panels that
/// show both side by side use this on the loser side so no ticker appears
/// twice. May return fewer than `n` records.
pub fn top_losers_disjoint(records: &[PerformanceRecord], n: usize) -> Vec<&PerformanceRecord> {
    let gainers: HashSet<&str> = top_gainers(records, n)
        .into_iter()
        .map(|r| r.ticker.as_str())
        .collect();
    top_losers(records, n)
        .into_iter()
        .filter(|r| !gainers.contains(r.ticker.as_str()))
        .collect()
}

/// Group records by classification. Each bucket is sorted ascending.
/// Every label is present, possibly with an empty list.
pub fn buckets(records: &[PerformanceRecord]) -> BTreeMap<Classification, Vec<&PerformanceRecord>> {
    let mut map: BTreeMap<Classification, Vec<&PerformanceRecord>> = Classification::ALL
        .iter()
        .map(|c| (*c, Vec::new()))
        .collect();
    for rec in sorted(records, SortDirection::Ascending) {
        map.entry(rec.classification).or_default().push(rec);
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn rec(ticker: &str, pct: f64, classification: Classification) -> PerformanceRecord {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        PerformanceRecord {
            ticker: ticker.into(),
            start_date: date,
            end_date: date,
            start_price: 100.0,
            end_price: 100.0 + pct,
            change: pct,
            percent_change: pct,
            classification,
            degraded: false,
        }
    }

    fn tickers<'a>(view: &[&'a PerformanceRecord]) -> Vec<&'a str> {
        view.iter().map(|r| r.ticker.as_str()).collect()
    }

    fn sample() -> Vec<PerformanceRecord> {
        vec![
            rec("C", 0.0, Classification::Hold),
            rec("A", -6.0, Classification::Buy),
            rec("B", 6.0, Classification::Sell),
            rec("D", -12.0, Classification::StrongBuy),
        ]
    }

    #[test]
    fn ascending_and_descending() {
        let records = sample();
        assert_eq!(
            tickers(&sorted(&records, SortDirection::Ascending)),
            vec!["D", "A", "C", "B"]
        );
        assert_eq!(
            tickers(&sorted(&records, SortDirection::Descending)),
            vec!["B", "C", "A", "D"]
        );
    }

    #[test]
    fn ties_break_by_ticker_in_both_directions() {
        let records = vec![
            rec("ZEE", 1.0, Classification::Hold),
            rec("ABB", 1.0, Classification::Hold),
            rec("MID", 1.0, Classification::Hold),
        ];
        assert_eq!(
            tickers(&sorted(&records, SortDirection::Ascending)),
            vec!["ABB", "MID", "ZEE"]
        );
        assert_eq!(
            tickers(&sorted(&records, SortDirection::Descending)),
            vec!["ABB", "MID", "ZEE"]
        );
    }

    #[test]
    fn top_slices() {
        let records = sample();
        assert_eq!(tickers(&top_gainers(&records, 1)), vec!["B"]);
        assert_eq!(tickers(&top_losers(&records, 2)), vec!["D", "A"]);
        assert_eq!(top_gainers(&records, 10).len(), 4);
        assert!(top_losers(&records, 0).is_empty());
    }

    #[test]
    fn disjoint_losers_drop_overlap() {
        let records = sample();
        // n = 3: gainers B, C, A; losers D, A, C → disjoint losers D.
        assert_eq!(tickers(&top_losers_disjoint(&records, 3)), vec!["D"]);
        // n = 2 has no overlap.
        assert_eq!(tickers(&top_losers_disjoint(&records, 2)), vec!["D", "A"]);
    }

    #[test]
    fn buckets_cover_every_label() {
        let records = sample();
        let b = buckets(&records);
        assert_eq!(b.len(), 5);
        assert_eq!(tickers(&b[&Classification::StrongBuy]), vec!["D"]);
        assert_eq!(tickers(&b[&Classification::Buy]), vec!["A"]);
        assert_eq!(tickers(&b[&Classification::Hold]), vec!["C"]);
        assert_eq!(tickers(&b[&Classification::Sell]), vec!["B"]);
        assert!(b[&Classification::StrongSell].is_empty());
    }
}
