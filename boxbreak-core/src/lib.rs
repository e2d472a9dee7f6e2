//! Boxbreak Core — the consolidation-breakout replay engine.
//!
//! This crate contains the heart of the backtester:
//! - Domain types (bars, the validated series, trades, equity samples)
//! - Windowed indicators (SMA, ATR, RSI)
//! - Consolidation detection and raw breakout signals
//! - The filter pipeline (8 filter kinds behind one trait)
//! - Stop/target calculation (box-range or ATR)
//! - The single-position trade lifecycle and the bar-by-bar replay loop
//!
//! A replay is strictly sequential and deterministic: identical input
//! and parameters always produce identical trades and equity. The only
//! forward-looking read in the whole crate is the false-breakout
//! confirmation filter's bounded scan.

pub mod config;
pub mod detector;
pub mod domain;
pub mod engine;
pub mod filters;
pub mod indicators;
pub mod signal;
pub mod stops;

pub use config::{ConfigError, IntrabarPolicy, ParameterSet, StopMode};
pub use detector::{ConsolidationBox, ConsolidationDetector};
pub use domain::{Bar, BarSeries, EquitySample, ExitReason, InputError, Side, TradeRecord};
pub use engine::{run, RunReport};

#[cfg(test)]
mod tests {
    use super::*;

    /// Compile-time check: the types crossing the sweep's thread
    /// boundary are Send + Sync, so parallel runs need no synchronization.
    #[allow(dead_code)]
    fn assert_send_sync() {
        fn require_send<T: Send>() {}
        fn require_sync<T: Sync>() {}

        require_send::<domain::Bar>();
        require_sync::<domain::Bar>();
        require_send::<domain::BarSeries>();
        require_sync::<domain::BarSeries>();
        require_send::<domain::TradeRecord>();
        require_sync::<domain::TradeRecord>();
        require_send::<domain::EquitySample>();
        require_sync::<domain::EquitySample>();

        require_send::<config::ParameterSet>();
        require_sync::<config::ParameterSet>();

        require_send::<detector::ConsolidationBox>();
        require_sync::<detector::ConsolidationBox>();

        require_send::<engine::RunReport>();
        require_sync::<engine::RunReport>();

        require_send::<filters::FilterDecision>();
        require_sync::<filters::FilterDecision>();
        require_send::<filters::FilterPipeline>();
        require_sync::<filters::FilterPipeline>();
    }

    /// Architecture contract: filters see market data only.
    ///
    /// The `SignalFilter` trait signature takes a `FilterContext` of
    /// bars, index, side, and box — no balance, no position, no other
    /// filters' verdicts. If the trait ever grows state access, this
    /// documents what broke.
    #[test]
    fn filter_trait_sees_market_data_only() {
        fn _check_trait_object_builds(
            filter: &dyn filters::SignalFilter,
            ctx: &filters::FilterContext<'_>,
        ) -> bool {
            filter.evaluate(ctx)
        }
    }
}
