//! Domain types for the drop scanner

pub mod bar;
pub mod record;
pub mod series;

pub use bar::PriceBar;
pub use record::{Classification, PerformanceRecord};
pub use series::{PriceSeries, SeriesError};

/// Exchange-qualified ticker symbol (e.g. `RELIANCE.NS`).
pub type Ticker = String;
