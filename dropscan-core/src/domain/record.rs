//! PerformanceRecord — one ticker's result for one scan.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::change::round2;

/// Recommendation bucket derived from percentage change.
///
/// Variant order is the display order (most bullish first) and the
/// `Ord` used when grouping records into buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Classification {
    StrongBuy,
    Buy,
    Hold,
    Sell,
    StrongSell,
}

impl Classification {
    pub const ALL: [Classification; 5] = [
        Classification::StrongBuy,
        Classification::Buy,
        Classification::Hold,
        Classification::Sell,
        Classification::StrongSell,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::StrongBuy => "STRONG BUY",
            Self::Buy => "BUY",
            Self::Hold => "HOLD",
            Self::Sell => "SELL",
            Self::StrongSell => "STRONG SELL",
        }
    }

    /// True for StrongBuy and Buy.
    pub fn is_buy(&self) -> bool {
        matches!(self, Self::StrongBuy | Self::Buy)
    }

    /// True for StrongSell and Sell.
    pub fn is_sell(&self) -> bool {
        matches!(self, Self::StrongSell | Self::Sell)
    }
}

impl std::fmt::Display for Classification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Derived per-ticker result.
///
/// `percent_change` is kept at full precision; it is what classification
/// and ranking compare. Use the `display_*` helpers for two-decimal output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceRecord {
    pub ticker: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub start_price: f64,
    pub end_price: f64,
    /// end_price - start_price, in currency.
    pub change: f64,
    /// (end - start) / start * 100.
    pub percent_change: f64,
    pub classification: Classification,
    /// The lag anchor fell back to the oldest bar in the window, so the
    /// comparison spans fewer observations than requested.
    pub degraded: bool,
}

impl PerformanceRecord {
    pub fn display_start_price(&self) -> f64 {
        round2(self.start_price)
    }

    pub fn display_end_price(&self) -> f64 {
        round2(self.end_price)
    }

    pub fn display_change(&self) -> f64 {
        round2(self.change)
    }

    pub fn display_percent_change(&self) -> f64 {
        round2(self.percent_change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classification_order_is_bullish_first() {
        let mut labels = vec![
            Classification::Sell,
            Classification::StrongBuy,
            Classification::Hold,
            Classification::StrongSell,
            Classification::Buy,
        ];
        labels.sort();
        assert_eq!(labels, Classification::ALL.to_vec());
    }

    #[test]
    fn buy_and_sell_sides() {
        assert!(Classification::StrongBuy.is_buy());
        assert!(Classification::Buy.is_buy());
        assert!(!Classification::Hold.is_buy());
        assert!(!Classification::Hold.is_sell());
        assert!(Classification::Sell.is_sell());
        assert!(Classification::StrongSell.is_sell());
    }

    #[test]
    fn display_helpers_round_to_cents() {
        let rec = PerformanceRecord {
            ticker: "INFY.NS".into(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 1, 8).unwrap(),
            start_price: 1500.0,
            end_price: 1432.456,
            change: -67.544,
            percent_change: -4.502933333,
            classification: Classification::Buy,
            degraded: false,
        };
        assert_eq!(rec.display_end_price(), 1432.46);
        assert_eq!(rec.display_change(), -67.54);
        assert_eq!(rec.display_percent_change(), -4.5);
    }
}
