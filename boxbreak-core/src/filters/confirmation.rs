//! False-breakout confirmation — the only forward-looking filter.
//!
//! Every other filter reads strictly backward from the signal bar. This
//! one inspects a bounded number of *future* bars and demands they hold
//! beyond the broken boundary. The end-of-series guard vetoes rather
//! than reading past the end.

use crate::domain::Side;

use super::{FilterContext, SignalFilter};

/// Requires the next `bars_required` closes to stay beyond the boundary
/// in the signal direction. A signal too close to the end of the series
/// to be confirmed is vetoed.
#[derive(Debug, Clone)]
pub struct ConfirmationFilter {
    bars_required: usize,
}

impl ConfirmationFilter {
    pub fn new(bars_required: usize) -> Self {
        Self { bars_required }
    }
}

impl SignalFilter for ConfirmationFilter {
    fn name(&self) -> &'static str {
        "false_breakout"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        if ctx.index + self.bars_required >= ctx.bars.len() {
            return false;
        }
        for offset in 1..=self.bars_required {
            let close = ctx.bars[ctx.index + offset].close;
            let holds = match ctx.side {
                Side::Buy => close >= ctx.boxed.high_level,
                Side::Sell => close <= ctx.boxed.low_level,
            };
            if !holds {
                return false;
            }
        }
        true
    }
}
