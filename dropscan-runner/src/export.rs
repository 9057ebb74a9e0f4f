//! Report export — JSON and CSV artifacts.
//!
//! - **JSON**: full round-trip serialization with schema versioning
//! - **CSV**: the ranked table and the skipped list for spreadsheets
//!
//! Persisted reports carry `schema_version`; newer versions are rejected
//! on load.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};

use crate::report::{ScanReport, SkippedTicker, SCHEMA_VERSION};
use dropscan_core::domain::PerformanceRecord;

// ─── JSON export ────────────────────────────────────────────────────

/// Serialize a `ScanReport` to pretty JSON.
pub fn export_json(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).context("failed to serialize ScanReport to JSON")
}

/// Deserialize a `ScanReport` from JSON, rejecting unknown schema versions.
pub fn import_json(json: &str) -> Result<ScanReport> {
    let report: ScanReport =
        serde_json::from_str(json).context("failed to deserialize ScanReport from JSON")?;
    if report.schema_version > SCHEMA_VERSION {
        bail!(
            "unsupported schema version {} (max supported: {})",
            report.schema_version,
            SCHEMA_VERSION
        );
    }
    Ok(report)
}

// ─── CSV export ─────────────────────────────────────────────────────

/// Export ranked records as CSV. Prices and changes are rounded to two
/// decimals; the order is the order given.
///
/// Columns: ticker, start_date, end_date, start_price, end_price,
/// change, percent_change, classification, degraded
pub fn export_records_csv(records: &[&PerformanceRecord]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record([
        "ticker",
        "start_date",
        "end_date",
        "start_price",
        "end_price",
        "change",
        "percent_change",
        "classification",
        "degraded",
    ])?;

    for r in records {
        wtr.write_record([
            &r.ticker,
            &r.start_date.to_string(),
            &r.end_date.to_string(),
            &format!("{:.2}", r.display_start_price()),
            &format!("{:.2}", r.display_end_price()),
            &format!("{:.2}", r.display_change()),
            &format!("{:.2}", r.display_percent_change()),
            r.classification.label(),
            &r.degraded.to_string(),
        ])?;
    }

    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

/// Export skipped tickers as CSV with ticker, kind and reason columns.
pub fn export_skipped_csv(skipped: &[SkippedTicker]) -> Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(["ticker", "kind", "reason"])?;
    for s in skipped {
        wtr.write_record([s.ticker.as_str(), s.kind(), &s.reason()])?;
    }
    let data = wtr.into_inner().context("failed to flush CSV writer")?;
    String::from_utf8(data).context("CSV output is not valid UTF-8")
}

// ─── Artifact bundle ────────────────────────────────────────────────

/// Save the full artifact set for one scan.
///
/// Creates a directory named `scan_{timestamp}/` under `output_dir`
/// containing:
/// - `report.json`: the full `ScanReport`
/// - `records.csv`: the ranked table in the report's direction
/// - `skipped.csv`: skipped tickers with reasons
///
/// Returns the path to the created directory.
pub fn save_report(report: &ScanReport, output_dir: &Path) -> Result<PathBuf> {
    let dirname = format!("scan_{}", chrono::Local::now().format("%Y%m%d_%H%M%S"));
    let run_dir = output_dir.join(dirname);
    std::fs::create_dir_all(&run_dir)
        .with_context(|| format!("failed to create report dir: {}", run_dir.display()))?;

    let json = export_json(report)?;
    std::fs::write(run_dir.join("report.json"), &json)?;

    let records_csv = export_records_csv(&report.table(report.direction))?;
    std::fs::write(run_dir.join("records.csv"), &records_csv)?;

    let skipped_csv = export_skipped_csv(report.skipped())?;
    std::fs::write(run_dir.join("skipped.csv"), &skipped_csv)?;

    Ok(run_dir)
}

/// Load a `ScanReport` from a report directory's report.json.
pub fn load_report(run_dir: &Path) -> Result<ScanReport> {
    let path = run_dir.join("report.json");
    let json = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    import_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SortDirection;
    use crate::report::TickerOutcome;
    use chrono::NaiveDate;
    use dropscan_core::domain::Classification;
    use dropscan_core::error::ScanError;

    fn sample_report() -> ScanReport {
        let date = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        let rec = PerformanceRecord {
            ticker: "SBIN.NS".into(),
            start_date: date,
            end_date: date + chrono::Duration::days(7),
            start_price: 812.349,
            end_price: 770.1,
            change: 770.1 - 812.349,
            percent_change: (770.1 - 812.349) / 812.349 * 100.0,
            classification: Classification::Buy,
            degraded: false,
        };
        ScanReport::from_outcomes(
            vec![
                TickerOutcome {
                    ticker: "SBIN.NS".into(),
                    result: Ok(rec),
                    diagnostics: None,
                },
                TickerOutcome {
                    ticker: "DMART.NS".into(),
                    result: Err(ScanError::InsufficientWindow {
                        ticker: "DMART.NS".into(),
                        found: 1,
                        required: 2,
                    }),
                    diagnostics: None,
                },
            ],
            "abc".into(),
            5,
            SortDirection::Ascending,
        )
    }

    #[test]
    fn records_csv_rounds_to_two_decimals() {
        let report = sample_report();
        let rows: Vec<&PerformanceRecord> = report.records().iter().collect();
        let csv = export_records_csv(&rows).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("ticker,start_date"));
        assert_eq!(
            lines[1],
            "SBIN.NS,2024-07-01,2024-07-08,812.35,770.10,-42.25,-5.20,BUY,false"
        );
    }

    #[test]
    fn skipped_csv_has_reason() {
        let report = sample_report();
        let csv = export_skipped_csv(report.skipped()).unwrap();
        assert!(csv.contains("DMART.NS,insufficient_window,"));
        assert!(csv.contains("insufficient data"));
    }

    #[test]
    fn json_roundtrip() {
        let report = sample_report();
        let json = export_json(&report).unwrap();
        let back = import_json(&json).unwrap();
        assert_eq!(back.config_id, "abc");
        assert_eq!(back.records().len(), 1);
        assert_eq!(back.skipped().len(), 1);
    }

    #[test]
    fn rejects_future_schema() {
        let report = sample_report();
        let json = export_json(&report)
            .unwrap()
            .replace("\"schema_version\": 1", "\"schema_version\": 99");
        let err = import_json(&json).unwrap_err();
        assert!(err.to_string().contains("unsupported schema version 99"));
    }

    #[test]
    fn save_and_load_bundle() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();
        let run_dir = save_report(&report, dir.path()).unwrap();
        assert!(run_dir.join("records.csv").exists());
        assert!(run_dir.join("skipped.csv").exists());
        let loaded = load_report(&run_dir).unwrap();
        assert_eq!(loaded.records().len(), 1);
    }
}
