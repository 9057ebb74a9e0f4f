//! Market-data boundary: where price series enter the scanner.

pub mod csv_source;
pub mod provider;
pub mod universe;

pub use csv_source::CsvDirSource;
pub use provider::{load_market_data, DataError, InMemorySource, MarketData, PriceSource};
pub use universe::Universe;
