//! ScanReport — the immutable result of one scan.
//!
//! Holds the ranked records, the skipped tickers with reasons, and the
//! per-ticker diagnostics. Every view (sorted table, gainers, losers,
//! buckets, search) is re-derived from the stored records on demand, so a
//! renderer can show any subset without recomputing the scan.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use dropscan_core::diagnostics::TickerDiagnostics;
use dropscan_core::domain::{Classification, PerformanceRecord};
use dropscan_core::error::ScanError;

use crate::config::SortDirection;
use crate::ranking;

/// Current schema version for persisted reports.
pub const SCHEMA_VERSION: u32 = 1;

/// A ticker excluded from ranking, and why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedTicker {
    pub ticker: String,
    pub error: ScanError,
}

impl SkippedTicker {
    pub fn reason(&self) -> String {
        self.error.to_string()
    }

    pub fn kind(&self) -> &'static str {
        self.error.kind()
    }
}

/// Result of evaluating one ticker, before aggregation.
#[derive(Debug, Clone)]
pub struct TickerOutcome {
    pub ticker: String,
    pub result: Result<PerformanceRecord, ScanError>,
    pub diagnostics: Option<TickerDiagnostics>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Schema version for forward-compatible deserialization.
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub config_id: String,
    pub top_n: usize,
    pub direction: SortDirection,
    /// Ranked records, sorted in `direction`.
    records: Vec<PerformanceRecord>,
    /// Skipped tickers, sorted by ticker.
    skipped: Vec<SkippedTicker>,
    diagnostics: BTreeMap<String, TickerDiagnostics>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl ScanReport {
    /// Fold per-ticker outcomes into a report.
    ///
    /// Takes every outcome at once: aggregation never starts on a partial set.
    pub fn from_outcomes(
        outcomes: Vec<TickerOutcome>,
        config_id: String,
        top_n: usize,
        direction: SortDirection,
    ) -> Self {
        let mut records = Vec::new();
        let mut skipped = Vec::new();
        let mut diagnostics = BTreeMap::new();

        for outcome in outcomes {
            if let Some(diag) = outcome.diagnostics {
                diagnostics.insert(outcome.ticker.clone(), diag);
            }
            match outcome.result {
                Ok(record) => records.push(record),
                Err(error) => skipped.push(SkippedTicker {
                    ticker: outcome.ticker,
                    error,
                }),
            }
        }

        match direction {
            SortDirection::Ascending => records.sort_by(ranking::cmp_ascending),
            SortDirection::Descending => records.sort_by(ranking::cmp_descending),
        }
        skipped.sort_by(|a, b| a.ticker.cmp(&b.ticker));

        Self {
            schema_version: SCHEMA_VERSION,
            config_id,
            top_n,
            direction,
            records,
            skipped,
            diagnostics,
        }
    }

    /// All ranked records in the configured direction.
    pub fn records(&self) -> &[PerformanceRecord] {
        &self.records
    }

    /// All ranked records in an explicit direction.
    pub fn table(&self, direction: SortDirection) -> Vec<&PerformanceRecord> {
        ranking::sorted(&self.records, direction)
    }

    pub fn record(&self, ticker: &str) -> Option<&PerformanceRecord> {
        self.records.iter().find(|r| r.ticker == ticker)
    }

    /// Configured number of top gainers.
    pub fn gainers(&self) -> Vec<&PerformanceRecord> {
        self.top_gainers(self.top_n)
    }

    /// Configured number of top losers, with gainers removed.
    pub fn losers(&self) -> Vec<&PerformanceRecord> {
        self.top_losers_disjoint(self.top_n)
    }

    pub fn top_gainers(&self, n: usize) -> Vec<&PerformanceRecord> {
        ranking::top_gainers(&self.records, n)
    }

    pub fn top_losers(&self, n: usize) -> Vec<&PerformanceRecord> {
        ranking::top_losers(&self.records, n)
    }

    pub fn top_losers_disjoint(&self, n: usize) -> Vec<&PerformanceRecord> {
        ranking::top_losers_disjoint(&self.records, n)
    }

    pub fn buckets(&self) -> BTreeMap<Classification, Vec<&PerformanceRecord>> {
        ranking::buckets(&self.records)
    }

    /// Buy and StrongBuy records, biggest drop first.
    pub fn buy_recommendations(&self) -> Vec<&PerformanceRecord> {
        self.table(SortDirection::Ascending)
            .into_iter()
            .filter(|r| r.classification.is_buy())
            .collect()
    }

    /// Sell and StrongSell records, biggest gain first.
    pub fn sell_recommendations(&self) -> Vec<&PerformanceRecord> {
        self.table(SortDirection::Descending)
            .into_iter()
            .filter(|r| r.classification.is_sell())
            .collect()
    }

    /// Records whose ticker contains `query`, case-insensitive, in table order.
    /// A blank query matches nothing.
    pub fn search(&self, query: &str) -> Vec<&PerformanceRecord> {
        let needle = query.trim().to_uppercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.records
            .iter()
            .filter(|r| r.ticker.to_uppercase().contains(&needle))
            .collect()
    }

    pub fn skipped(&self) -> &[SkippedTicker] {
        &self.skipped
    }

    pub fn diagnostics(&self) -> &BTreeMap<String, TickerDiagnostics> {
        &self.diagnostics
    }

    pub fn diagnostics_for(&self, ticker: &str) -> Option<&TickerDiagnostics> {
        self.diagnostics.get(ticker)
    }

    pub fn ranked_tickers(&self) -> BTreeSet<&str> {
        self.records.iter().map(|r| r.ticker.as_str()).collect()
    }

    pub fn skipped_tickers(&self) -> BTreeSet<&str> {
        self.skipped.iter().map(|s| s.ticker.as_str()).collect()
    }

    /// Most recent `end_date` across ranked records.
    pub fn latest_end_date(&self) -> Option<NaiveDate> {
        self.records.iter().map(|r| r.end_date).max()
    }

    /// Records whose series ended before the latest end date. Calendar
    /// windows are measured back from each series' own last bar, so these
    /// cover an earlier period than the rest of the table.
    pub fn stale_records(&self) -> Vec<&PerformanceRecord> {
        let Some(latest) = self.latest_end_date() else {
            return Vec::new();
        };
        self.records.iter().filter(|r| r.end_date < latest).collect()
    }

    /// Ranked plus skipped: the full de-duplicated input set.
    pub fn total_tickers(&self) -> usize {
        self.records.len() + self.skipped.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
