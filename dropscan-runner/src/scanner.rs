//! Scanner — drives the per-ticker pass and folds it into a ScanReport.
//!
//! Construction validates the configuration once; a bad config never
//! reaches a ticker. The per-ticker pass runs on rayon: each ticker reads
//! only its own series, and every outcome is collected before ranking
//! begins.

use std::collections::BTreeSet;

use rayon::prelude::*;

use dropscan_core::data::MarketData;
use dropscan_core::diagnostics::TickerDiagnostics;
use dropscan_core::error::ScanError;
use dropscan_core::evaluate::evaluate_series;

use crate::config::{ConfigError, ScanConfig};
use crate::report::{ScanReport, TickerOutcome};

#[derive(Debug, Clone)]
pub struct Scanner {
    config: ScanConfig,
    config_id: String,
}

impl Scanner {
    /// Validate `config` and build a scanner. Fails before any per-ticker work.
    pub fn new(config: ScanConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let config_id = config.config_id();
        Ok(Self { config, config_id })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn config_id(&self) -> &str {
        &self.config_id
    }

    /// Scan the configured universe.
    pub fn scan(&self, data: &MarketData) -> ScanReport {
        self.scan_tickers(self.config.universe.tickers.as_slice(), data)
    }

    /// Scan an explicit ticker set. Order is irrelevant and duplicates collapse.
    pub fn scan_tickers<S: AsRef<str>>(&self, tickers: &[S], data: &MarketData) -> ScanReport {
        let unique: Vec<&str> = tickers
            .iter()
            .map(|t| t.as_ref())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let outcomes: Vec<TickerOutcome> = unique
            .par_iter()
            .map(|ticker| self.evaluate(ticker, data))
            .collect();

        let report = ScanReport::from_outcomes(
            outcomes,
            self.config_id.clone(),
            self.config.ranking.top_n,
            self.config.ranking.direction,
        );

        for skip in report.skipped() {
            log::warn!("{} skipped: {}", skip.ticker, skip.reason());
        }
        log::info!(
            "scan {}: {} ranked, {} skipped of {} tickers",
            &self.config_id[..12.min(self.config_id.len())],
            report.records().len(),
            report.skipped().len(),
            unique.len()
        );

        report
    }

    /// Evaluate a single ticker against `data`.
    pub fn evaluate(&self, ticker: &str, data: &MarketData) -> TickerOutcome {
        let Some(series) = data.get(ticker) else {
            let detail = match data.failure(ticker) {
                Some(reason) => format!("fetch failed: {reason}"),
                None => "ticker not in fetched data".to_string(),
            };
            return TickerOutcome {
                ticker: ticker.to_string(),
                result: Err(ScanError::MissingData {
                    ticker: ticker.to_string(),
                    detail,
                }),
                diagnostics: None,
            };
        };

        let spec = self.config.window.spec();
        let result = evaluate_series(
            series,
            spec,
            self.config.window.anchor,
            &self.config.thresholds,
        );
        if let Ok(rec) = &result {
            log::debug!(
                "{ticker}: {:.2} -> {:.2} ({:+.2}%) {}",
                rec.start_price,
                rec.end_price,
                rec.percent_change,
                rec.classification
            );
        }

        let diagnostics = (!series.is_empty()).then(|| {
            TickerDiagnostics::compute(
                series,
                spec,
                self.config.diagnostics.trend_length,
                self.config.diagnostics.volatility_threshold,
            )
        });

        TickerOutcome {
            ticker: ticker.to_string(),
            result,
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dropscan_core::classify::ThresholdConfig;
    use dropscan_core::domain::PriceSeries;
    use dropscan_core::window::Anchor;

    use crate::config::WindowUnit;

    fn config() -> ScanConfig {
        let mut c = ScanConfig::default();
        c.window.unit = WindowUnit::Observations;
        c.window.length = 10;
        c.window.anchor = Anchor::Earliest;
        c.thresholds = ThresholdConfig::new(7.0, 3.0, 5.0, 10.0);
        c
    }

    fn series(ticker: &str, closes: &[f64]) -> PriceSeries {
        PriceSeries::from_closes(ticker, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(), closes)
    }

    #[test]
    fn rejects_bad_config_up_front() {
        let mut c = config();
        c.thresholds = ThresholdConfig::new(1.0, 5.0, 5.0, 10.0);
        assert!(matches!(Scanner::new(c), Err(ConfigError::Thresholds(_))));
    }

    #[test]
    fn missing_ticker_reason_mentions_fetch_failure() {
        let mut data = MarketData::new();
        data.record_failure("X.NS", "connection reset");
        let scanner = Scanner::new(config()).unwrap();
        let outcome = scanner.evaluate("X.NS", &data);
        let err = outcome.result.unwrap_err();
        assert!(err.to_string().contains("fetch failed: connection reset"));
        assert!(outcome.diagnostics.is_none());
    }

    #[test]
    fn duplicates_collapse() {
        let data = MarketData::from_series(vec![series("A.NS", &[100.0, 94.0])]);
        let scanner = Scanner::new(config()).unwrap();
        let report = scanner.scan_tickers(&["A.NS", "A.NS", "A.NS"], &data);
        assert_eq!(report.records().len(), 1);
        assert_eq!(report.total_tickers(), 1);
    }

    #[test]
    fn diagnostics_for_every_nonempty_series() {
        let data = MarketData::from_series(vec![
            series("A.NS", &[100.0, 94.0]),
            series("D.NS", &[100.0]),
            PriceSeries::new("EMPTY.NS", vec![]).unwrap(),
        ]);
        let scanner = Scanner::new(config()).unwrap();
        let report = scanner.scan_tickers(&["A.NS", "D.NS", "EMPTY.NS"], &data);
        assert!(report.diagnostics_for("A.NS").is_some());
        assert!(report.diagnostics_for("D.NS").is_some());
        assert!(report.diagnostics_for("EMPTY.NS").is_none());
    }

    #[test]
    fn uses_configured_universe() {
        let mut c = config();
        c.universe.tickers = vec!["A.NS".into(), "B.NS".into()];
        let data = MarketData::from_series(vec![series("A.NS", &[100.0, 101.0])]);
        let report = Scanner::new(c).unwrap().scan(&data);
        assert_eq!(report.records().len(), 1);
        assert_eq!(report.skipped().len(), 1);
        assert_eq!(report.skipped()[0].ticker, "B.NS");
    }
}
