//! Scan configuration, loaded from TOML.
//!
//! Every section is optional. Missing sections and keys fall back to a
//! weekly drop scan over the 50-symbol NSE list: seven calendar weeks of
//! history, a five-observation lag anchor and top 5 panels.
//!
//! ```toml
//! [universe]
//! tickers = ["RELIANCE.NS", "TCS.NS"]
//!
//! [window]
//! unit = "calendar_days"   # or "observations"
//! length = 49
//! anchor = { lag = 5 }     # or "earliest"
//!
//! [thresholds]
//! strong_buy = 10.0
//! buy = 5.0
//! sell = 5.0
//! strong_sell = 10.0
//! mode = "five_way"        # or "three_way"
//!
//! [ranking]
//! top_n = 5
//! direction = "ascending"
//!
//! [diagnostics]
//! trend_length = 5
//! volatility_threshold = 50.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use dropscan_core::classify::{ThresholdConfig, ThresholdError};
use dropscan_core::data::Universe;
use dropscan_core::diagnostics::DEFAULT_TREND_LENGTH;
use dropscan_core::window::{Anchor, WindowSpec};

/// Largest top-N the gainer/loser panels accept.
pub const MAX_TOP_N: usize = 10;

/// Longest accepted window, in days or observations (one hundred years).
pub const MAX_WINDOW_LENGTH: usize = 36_500;

/// Errors from loading or validating a scan configuration. Fatal to a scan.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("inconsistent thresholds: {0}")]
    Thresholds(#[from] ThresholdError),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Complete scan configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub universe: UniverseConfig,
    pub window: WindowConfig,
    pub thresholds: ThresholdConfig,
    pub ranking: RankingConfig,
    pub diagnostics: DiagnosticsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UniverseConfig {
    pub tickers: Vec<String>,
}

impl Default for UniverseConfig {
    fn default() -> Self {
        Self {
            tickers: Universe::nse_default().all_tickers(),
        }
    }
}

/// Lookback unit. Always explicit in the config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowUnit {
    CalendarDays,
    Observations,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub unit: WindowUnit,
    pub length: usize,
    pub anchor: Anchor,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            unit: WindowUnit::CalendarDays,
            length: WindowSpec::default().length(),
            anchor: Anchor::default(),
        }
    }
}

impl WindowConfig {
    /// Convert to the core window spec. Lengths past u32 saturate.
    pub fn spec(&self) -> WindowSpec {
        match self.unit {
            WindowUnit::CalendarDays => {
                WindowSpec::CalendarDays(u32::try_from(self.length).unwrap_or(u32::MAX))
            }
            WindowUnit::Observations => WindowSpec::Observations(self.length),
        }
    }
}

/// Sort direction of the full table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Biggest drop first.
    #[default]
    Ascending,
    /// Biggest gain first.
    Descending,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingConfig {
    pub top_n: usize,
    pub direction: SortDirection,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            top_n: 5,
            direction: SortDirection::Ascending,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticsConfig {
    /// Closes that must rise strictly to flag a trend.
    pub trend_length: usize,
    /// Sample standard deviation above which a ticker is flagged volatile.
    pub volatility_threshold: f64,
}

impl Default for DiagnosticsConfig {
    fn default() -> Self {
        Self {
            trend_length: DEFAULT_TREND_LENGTH,
            volatility_threshold: 50.0,
        }
    }
}

impl ScanConfig {
    /// Load and validate a config from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Reject configurations that would make a scan meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.thresholds.validate()?;

        if self.window.length == 0 || self.window.length > MAX_WINDOW_LENGTH {
            return Err(ConfigError::Invalid(format!(
                "window.length must be between 1 and {MAX_WINDOW_LENGTH}, got {}",
                self.window.length
            )));
        }
        if let Anchor::Lag(0) = self.window.anchor {
            return Err(ConfigError::Invalid(
                "window.anchor lag must be at least 1".into(),
            ));
        }
        if self.ranking.top_n == 0 || self.ranking.top_n > MAX_TOP_N {
            return Err(ConfigError::Invalid(format!(
                "ranking.top_n must be between 1 and {MAX_TOP_N}, got {}",
                self.ranking.top_n
            )));
        }
        if self.diagnostics.trend_length < 2 {
            return Err(ConfigError::Invalid(
                "diagnostics.trend_length must be at least 2".into(),
            ));
        }
        let vt = self.diagnostics.volatility_threshold;
        if !vt.is_finite() || vt < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "diagnostics.volatility_threshold must be finite and non-negative, got {vt}"
            )));
        }
        if self.universe.tickers.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid(
                "universe.tickers contains an empty symbol".into(),
            ));
        }
        Ok(())
    }

    /// Deterministic id of this configuration (BLAKE3 over canonical JSON).
    ///
    /// Two scans with the same config id and the same input data produce
    /// identical reports.
    pub fn config_id(&self) -> String {
        let json = serde_json::to_string(self).unwrap_or_default();
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
