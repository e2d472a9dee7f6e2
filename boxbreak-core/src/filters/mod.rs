//! Filter pipeline — an ordered chain of independent vetoes over raw
//! breakout signals.
//!
//! Every filter is a pure predicate over the bar history, the signal
//! bar, and the box. Evaluation order is fixed; each veto increments the
//! filter's rejection counter and short-circuits the chain, so filters
//! later in the order are not charged for signals an earlier filter
//! already killed. The final boolean outcome is order-independent.

pub mod confirmation;
pub mod mtf;
pub mod quality;
pub mod rsi;
pub mod strength;
pub mod time_of_day;
pub mod trend;
pub mod volume;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::ParameterSet;
use crate::detector::ConsolidationBox;
use crate::domain::{Bar, Side};

pub use confirmation::ConfirmationFilter;
pub use mtf::MtfFilter;
pub use quality::QualityFilter;
pub use rsi::RsiFilter;
pub use strength::StrengthFilter;
pub use time_of_day::TimeOfDayFilter;
pub use trend::TrendFilter;
pub use volume::VolumeFilter;

/// Everything a filter may look at when judging a candidate signal.
#[derive(Debug, Clone, Copy)]
pub struct FilterContext<'a> {
    pub bars: &'a [Bar],
    /// Index of the signal bar.
    pub index: usize,
    pub side: Side,
    pub boxed: &'a ConsolidationBox,
}

/// One filter's verdict on one candidate signal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterDecision {
    pub filter_name: String,
    pub passed: bool,
}

/// Trait for breakout signal filters.
///
/// Filters evaluate market conditions only — they never see balance,
/// position state, or each other's verdicts.
pub trait SignalFilter: Send + Sync {
    /// Stable identifier used for rejection accounting.
    fn name(&self) -> &'static str;

    /// True to let the signal through, false to veto it.
    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool;
}

/// The ordered chain of enabled filters for one run, owning the
/// per-filter rejection tally and the full decision trail.
pub struct FilterPipeline {
    filters: Vec<Box<dyn SignalFilter>>,
    rejections: BTreeMap<String, u64>,
    decisions: Vec<FilterDecision>,
}

impl FilterPipeline {
    /// Build the pipeline from a parameter set. Only enabled filters are
    /// instantiated, in the fixed evaluation order: volume, trend,
    /// strength, rsi, quality, time, false_breakout, mtf. Rejection
    /// counters start at zero for every enabled filter.
    pub fn from_params(params: &ParameterSet) -> Self {
        let mut filters: Vec<Box<dyn SignalFilter>> = Vec::new();
        if params.use_volume_filter {
            filters.push(Box::new(VolumeFilter::new(params.volume_multiplier)));
        }
        if params.use_trend_filter {
            filters.push(Box::new(TrendFilter::new(params.trend_period)));
        }
        if params.use_breakout_strength {
            filters.push(Box::new(StrengthFilter::new(params.min_breakout_strength)));
        }
        if params.use_rsi_filter {
            filters.push(Box::new(RsiFilter::new(
                params.rsi_period,
                params.rsi_overbought,
                params.rsi_oversold,
            )));
        }
        if params.use_consolidation_quality {
            filters.push(Box::new(QualityFilter::new(
                params.consolidation_periods,
                params.min_touches,
            )));
        }
        if params.use_time_filter {
            filters.push(Box::new(TimeOfDayFilter::new(
                params.trading_start_hour,
                params.trading_end_hour,
            )));
        }
        if params.use_false_breakout_filter {
            filters.push(Box::new(ConfirmationFilter::new(params.confirmation_bars)));
        }
        if params.use_mtf_confirmation {
            filters.push(Box::new(MtfFilter::new(params.higher_tf_period)));
        }

        let rejections = filters.iter().map(|f| (f.name().to_string(), 0)).collect();
        Self {
            filters,
            rejections,
            decisions: Vec::new(),
        }
    }

    /// Run the candidate through every enabled filter in order. A veto
    /// short-circuits; the vetoing filter's counter is incremented and
    /// the remaining filters are not consulted.
    pub fn accept(&mut self, ctx: &FilterContext<'_>) -> bool {
        for filter in &self.filters {
            let passed = filter.evaluate(ctx);
            self.decisions.push(FilterDecision {
                filter_name: filter.name().to_string(),
                passed,
            });
            if !passed {
                if let Some(count) = self.rejections.get_mut(filter.name()) {
                    *count += 1;
                }
                return false;
            }
        }
        true
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    pub fn rejections(&self) -> &BTreeMap<String, u64> {
        &self.rejections
    }

    /// Consume the pipeline, yielding the rejection tally and the
    /// decision trail for the run report.
    pub fn into_diagnostics(self) -> (BTreeMap<String, u64>, Vec<FilterDecision>) {
        (self.rejections, self.decisions)
    }
}
