//! Dropscan Runner — scan orchestration, ranking, report views, export.
//!
//! This crate builds on `dropscan-core` to provide:
//! - TOML scan configuration with up-front validation
//! - The Scanner: a parallel per-ticker pass folded into one report
//! - Deterministic ranking (top gainers, top losers, classification buckets)
//! - Symbol search and buy/sell recommendation views
//! - CSV and JSON export of a report

pub mod config;
pub mod export;
pub mod ranking;
pub mod report;
pub mod scanner;

pub use config::{
    ConfigError, DiagnosticsConfig, RankingConfig, ScanConfig, SortDirection, UniverseConfig,
    WindowConfig, WindowUnit, MAX_TOP_N, MAX_WINDOW_LENGTH,
};
pub use export::{
    export_json, export_records_csv, export_skipped_csv, import_json, load_report, save_report,
};
pub use report::{ScanReport, SkippedTicker, TickerOutcome, SCHEMA_VERSION};
pub use scanner::Scanner;
