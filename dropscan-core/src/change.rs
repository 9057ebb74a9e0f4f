//! Change Calculator — signed percentage change between two prices.
//!
//! The returned value is full precision. Rounding to two decimals is a
//! display concern (`round2`); classification must compare the raw value
//! so that a move of -2.996% is not pulled onto a -3.00% breakpoint.

use thiserror::Error;

/// A price pair for which percentage change is undefined.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InvalidPrice {
    #[error("start price is {0}, percentage change needs a positive start price")]
    NonPositiveStart(f64),
    #[error("end price is {0}, expected a finite non-negative price")]
    BadEnd(f64),
    #[error("change from {start} to {end} is not a finite percentage")]
    NotFinite { start: f64, end: f64 },
}

/// (end - start) / start * 100.
///
/// Fails on a zero, negative or non-finite start price, on a negative or
/// non-finite end price, and when the ratio overflows (a subnormal start).
/// Never returns NaN or infinity.
pub fn percent_change(start: f64, end: f64) -> Result<f64, InvalidPrice> {
    if !start.is_finite() || start <= 0.0 {
        return Err(InvalidPrice::NonPositiveStart(start));
    }
    if !end.is_finite() || end < 0.0 {
        return Err(InvalidPrice::BadEnd(end));
    }
    let pct = (end - start) / start * 100.0;
    if !pct.is_finite() {
        return Err(InvalidPrice::NotFinite { start, end });
    }
    Ok(pct)
}

/// Round to two decimal places for display.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
