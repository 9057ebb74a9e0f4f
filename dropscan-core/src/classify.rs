//! Threshold classification.
//!
//! Breakpoints are non-negative magnitudes. The buy side compares against
//! the negated magnitude with `<=`, the sell side against the magnitude
//! with `>=`, so a change exactly on a breakpoint lands in the stronger
//! signal on both sides.
//!
//! The rule list is evaluated top-down and the first match wins. Strong
//! rules precede their weak counterparts; an extreme move would otherwise
//! stop at the weaker bucket.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::Classification;

/// Inconsistent or malformed breakpoints.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ThresholdError {
    #[error("threshold '{name}' must be a finite non-negative number, got {value}")]
    NotNonNegative { name: &'static str, value: f64 },

    #[error("buy threshold ({buy}) exceeds strong_buy threshold ({strong_buy})")]
    BuyAboveStrongBuy { buy: f64, strong_buy: f64 },

    #[error("sell threshold ({sell}) exceeds strong_sell threshold ({strong_sell})")]
    SellAboveStrongSell { sell: f64, strong_sell: f64 },
}

/// How many labels the scan emits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClassificationMode {
    /// StrongBuy, Buy, Hold, Sell, StrongSell.
    #[default]
    FiveWay,
    /// Buy, Hold, Sell. Strong labels collapse into their weak side.
    ThreeWay,
}

/// Named percentage breakpoints, applied uniformly to every ticker.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThresholdConfig {
    /// StrongBuy if change <= -strong_buy.
    pub strong_buy: f64,
    /// Buy if change <= -buy.
    pub buy: f64,
    /// Sell if change >= sell.
    pub sell: f64,
    /// StrongSell if change >= strong_sell.
    pub strong_sell: f64,
    pub mode: ClassificationMode,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            strong_buy: 10.0,
            buy: 5.0,
            sell: 5.0,
            strong_sell: 10.0,
            mode: ClassificationMode::FiveWay,
        }
    }
}

/// One side of a breakpoint comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Bound {
    AtOrBelow(f64),
    AtOrAbove(f64),
}

impl Bound {
    pub fn matches(&self, change: f64) -> bool {
        match *self {
            Bound::AtOrBelow(limit) => change <= limit,
            Bound::AtOrAbove(limit) => change >= limit,
        }
    }
}

/// A (predicate, label) pair in the classification rule list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rule {
    pub bound: Bound,
    pub label: Classification,
}

impl ThresholdConfig {
    pub fn new(strong_buy: f64, buy: f64, sell: f64, strong_sell: f64) -> Self {
        Self {
            strong_buy,
            buy,
            sell,
            strong_sell,
            mode: ClassificationMode::FiveWay,
        }
    }

    pub fn with_mode(mut self, mode: ClassificationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Check breakpoints once, before any ticker is classified.
    pub fn validate(&self) -> Result<(), ThresholdError> {
        for (name, value) in [
            ("strong_buy", self.strong_buy),
            ("buy", self.buy),
            ("sell", self.sell),
            ("strong_sell", self.strong_sell),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(ThresholdError::NotNonNegative { name, value });
            }
        }
        if self.buy > self.strong_buy {
            return Err(ThresholdError::BuyAboveStrongBuy {
                buy: self.buy,
                strong_buy: self.strong_buy,
            });
        }
        if self.sell > self.strong_sell {
            return Err(ThresholdError::SellAboveStrongSell {
                sell: self.sell,
                strong_sell: self.strong_sell,
            });
        }
        Ok(())
    }

    /// Ordered rule list, highest priority first. Hold is the fallthrough.
    pub fn rules(&self) -> [Rule; 4] {
        [
            Rule {
                bound: Bound::AtOrBelow(-self.strong_buy),
                label: Classification::StrongBuy,
            },
            Rule {
                bound: Bound::AtOrBelow(-self.buy),
                label: Classification::Buy,
            },
            Rule {
                bound: Bound::AtOrAbove(self.strong_sell),
                label: Classification::StrongSell,
            },
            Rule {
                bound: Bound::AtOrAbove(self.sell),
                label: Classification::Sell,
            },
        ]
    }

    /// Classify a full-precision percentage change.
    pub fn classify(&self, change: f64) -> Classification {
        let label = self
            .rules()
            .iter()
            .find(|rule| rule.bound.matches(change))
            .map(|rule| rule.label)
            .unwrap_or(Classification::Hold);

        match (self.mode, label) {
            (ClassificationMode::ThreeWay, Classification::StrongBuy) => Classification::Buy,
            (ClassificationMode::ThreeWay, Classification::StrongSell) => Classification::Sell,
            _ => label,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario() -> ThresholdConfig {
        ThresholdConfig::new(7.0, 3.0, 5.0, 10.0)
    }

    #[test]
    fn scenario_labels() {
        let t = scenario();
        assert_eq!(t.classify(-6.0), Classification::Buy);
        assert_eq!(t.classify(6.0), Classification::Sell);
        assert_eq!(t.classify(0.0), Classification::Hold);
        assert_eq!(t.classify(-7.5), Classification::StrongBuy);
        assert_eq!(t.classify(12.0), Classification::StrongSell);
    }

    #[test]
    fn boundaries_are_inclusive_on_both_sides() {
        let t = scenario();
        assert_eq!(t.classify(-7.0), Classification::StrongBuy);
        assert_eq!(t.classify(-3.0), Classification::Buy);
        assert_eq!(t.classify(5.0), Classification::Sell);
        assert_eq!(t.classify(10.0), Classification::StrongSell);
    }

    #[test]
    fn just_inside_boundaries_stay_weaker() {
        let t = scenario();
        assert_eq!(t.classify(-2.999_999), Classification::Hold);
        assert_eq!(t.classify(-6.999_999), Classification::Buy);
        assert_eq!(t.classify(4.999_999), Classification::Hold);
        assert_eq!(t.classify(9.999_999), Classification::Sell);
    }

    #[test]
    fn unrounded_value_decides() {
        // -2.996 rounds to -3.00 for display but has not crossed the breakpoint.
        assert_eq!(scenario().classify(-2.996), Classification::Hold);
    }

    #[test]
    fn strong_rules_come_first() {
        let rules = scenario().rules();
        assert_eq!(rules[0].label, Classification::StrongBuy);
        assert_eq!(rules[1].label, Classification::Buy);
        assert_eq!(rules[2].label, Classification::StrongSell);
        assert_eq!(rules[3].label, Classification::Sell);
    }

    #[test]
    fn three_way_collapses_strong_labels() {
        let t = scenario().with_mode(ClassificationMode::ThreeWay);
        assert_eq!(t.classify(-20.0), Classification::Buy);
        assert_eq!(t.classify(20.0), Classification::Sell);
        assert_eq!(t.classify(1.0), Classification::Hold);
    }

    #[test]
    fn zero_thresholds_resolve_flat_to_buy_side() {
        let t = ThresholdConfig::new(0.0, 0.0, 0.0, 0.0);
        // Buy side is checked first, so 0.0 resolves to StrongBuy.
        assert_eq!(t.classify(0.0), Classification::StrongBuy);
        assert_eq!(t.classify(0.01), Classification::StrongSell);
    }

    #[test]
    fn validate_accepts_default_and_scenario() {
        assert!(ThresholdConfig::default().validate().is_ok());
        assert!(scenario().validate().is_ok());
    }

    #[test]
    fn validate_rejects_inverted_buy_side() {
        let t = ThresholdConfig::new(3.0, 7.0, 5.0, 10.0);
        assert_eq!(
            t.validate(),
            Err(ThresholdError::BuyAboveStrongBuy {
                buy: 7.0,
                strong_buy: 3.0
            })
        );
    }

    #[test]
    fn validate_rejects_inverted_sell_side() {
        let t = ThresholdConfig::new(7.0, 3.0, 12.0, 10.0);
        assert!(matches!(
            t.validate(),
            Err(ThresholdError::SellAboveStrongSell { .. })
        ));
    }

    #[test]
    fn validate_rejects_negative_and_nan() {
        let t = ThresholdConfig::new(7.0, -1.0, 5.0, 10.0);
        assert!(matches!(
            t.validate(),
            Err(ThresholdError::NotNonNegative { name: "buy", .. })
        ));
        let t = ThresholdConfig::new(f64::NAN, 3.0, 5.0, 10.0);
        assert!(t.validate().is_err());
    }

    #[test]
    fn deserializes_from_toml_with_defaults() {
        let t: ThresholdConfig = toml::from_str("buy = 3.0\nmode = \"three_way\"").unwrap();
        assert_eq!(t.buy, 3.0);
        assert_eq!(t.strong_buy, 10.0);
        assert_eq!(t.mode, ClassificationMode::ThreeWay);
    }
}
