//! Domain types: bars, the validated series, trades, and equity samples.

pub mod bar;
pub mod equity;
pub mod series;
pub mod trade;

pub use bar::Bar;
pub use equity::EquitySample;
pub use series::{BarSeries, InputError};
pub use trade::{ExitReason, OpenTrade, Side, TradeRecord, POINT_VALUE};
