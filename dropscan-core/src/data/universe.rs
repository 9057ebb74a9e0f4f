//! Universe configuration — sector-organized ticker lists.
//!
//! Stored as TOML with sector names mapping to exchange-suffixed tickers.
//! The scanner only sees the flattened, de-duplicated ticker list.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// The complete universe configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Universe {
    pub sectors: BTreeMap<String, Vec<String>>,
}

fn tickers(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Universe {
    /// Load a universe from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, String> {
        let content =
            std::fs::read_to_string(path).map_err(|e| format!("read universe file: {e}"))?;
        Self::from_toml(&content)
    }

    /// Parse a universe from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| format!("parse universe TOML: {e}"))
    }

    /// Serialize the universe to TOML.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("serialize universe: {e}"))
    }

    /// All tickers across all sectors, sorted, duplicates collapsed.
    pub fn all_tickers(&self) -> Vec<String> {
        self.sectors
            .values()
            .flatten()
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Tickers for a specific sector.
    pub fn sector_tickers(&self, sector: &str) -> Option<&[String]> {
        self.sectors.get(sector).map(|v| v.as_slice())
    }

    pub fn sector_names(&self) -> Vec<&str> {
        self.sectors.keys().map(|s| s.as_str()).collect()
    }

    /// Number of distinct tickers.
    pub fn ticker_count(&self) -> usize {
        self.all_tickers().len()
    }

    /// Fifty NSE large caps, grouped by sector.
    pub fn nse_default() -> Self {
        let mut sectors = BTreeMap::new();

        sectors.insert(
            "Financials".into(),
            tickers(&[
                "ICICIBANK.NS",
                "HDFCBANK.NS",
                "SBIN.NS",
                "BAJFINANCE.NS",
                "AXISBANK.NS",
                "KOTAKBANK.NS",
                "BAJAJFINSV.NS",
                "INDUSINDBK.NS",
                "HDFCLIFE.NS",
                "SBILIFE.NS",
                "ICICIPRULI.NS",
            ]),
        );

        sectors.insert(
            "Technology".into(),
            tickers(&["TCS.NS", "INFY.NS", "WIPRO.NS", "TECHM.NS", "HCLTECH.NS"]),
        );

        sectors.insert(
            "Energy".into(),
            tickers(&[
                "RELIANCE.NS",
                "POWERGRID.NS",
                "NTPC.NS",
                "ADANIENT.NS",
                "COALINDIA.NS",
                "BPCL.NS",
                "ONGC.NS",
            ]),
        );

        sectors.insert(
            "Consumer".into(),
            tickers(&[
                "ITC.NS",
                "ASIANPAINT.NS",
                "NESTLEIND.NS",
                "TITAN.NS",
                "HINDUNILVR.NS",
                "TATACONSUM.NS",
                "BRITANNIA.NS",
                "DMART.NS",
                "PIDILITIND.NS",
            ]),
        );

        sectors.insert(
            "Healthcare".into(),
            tickers(&[
                "SUNPHARMA.NS",
                "CIPLA.NS",
                "DIVISLAB.NS",
                "DRREDDY.NS",
                "APOLLOHOSP.NS",
            ]),
        );

        sectors.insert(
            "Automobile".into(),
            tickers(&["MARUTI.NS", "EICHERMOT.NS", "HEROMOTOCO.NS", "M&M.NS"]),
        );

        sectors.insert(
            "Materials".into(),
            tickers(&[
                "ULTRACEMCO.NS",
                "JSWSTEEL.NS",
                "GRASIM.NS",
                "SHREECEM.NS",
                "UPL.NS",
                "HINDALCO.NS",
                "TATASTEEL.NS",
            ]),
        );

        sectors.insert(
            "Industrials & Telecom".into(),
            tickers(&["LT.NS", "BHARTIARTL.NS"]),
        );

        Self { sectors }
    }
}
