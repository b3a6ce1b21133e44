pub mod date;
pub mod series;
pub mod symbol;

pub use date::TradingDate;
pub use series::{PriceObservation, PriceSeries};
pub use symbol::Symbol;
