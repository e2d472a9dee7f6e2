//! Breakout strength — the close must clear the boundary by a fraction
//! of the box range, not merely graze it.

use crate::domain::Side;

use super::{FilterContext, SignalFilter};

/// Requires the excursion beyond the broken boundary to be at least
/// `min_strength * box_range`.
#[derive(Debug, Clone)]
pub struct StrengthFilter {
    min_strength: f64,
}

impl StrengthFilter {
    pub fn new(min_strength: f64) -> Self {
        Self { min_strength }
    }
}

impl SignalFilter for StrengthFilter {
    fn name(&self) -> &'static str {
        "strength"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let close = ctx.bars[ctx.index].close;
        let excursion = match ctx.side {
            Side::Buy => close - ctx.boxed.high_level,
            Side::Sell => ctx.boxed.low_level - close,
        };
        excursion >= ctx.boxed.range * self.min_strength
    }
}
