//! Trend alignment — only trade breakouts in the direction of the
//! prevailing trend.

use crate::domain::Side;
use crate::indicators::sma;

use super::{FilterContext, SignalFilter};

/// Fast moving-average period; the slow period is configurable.
pub const FAST_PERIOD: usize = 20;

/// Requires the close and SMA(20) to agree with the slow SMA for the
/// signal direction: BUY wants price and the fast MA above the slow MA,
/// SELL the mirror. Missing MA data vetoes.
#[derive(Debug, Clone)]
pub struct TrendFilter {
    slow_period: usize,
}

impl TrendFilter {
    pub fn new(slow_period: usize) -> Self {
        Self { slow_period }
    }
}

impl SignalFilter for TrendFilter {
    fn name(&self) -> &'static str {
        "trend"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let (Some(fast), Some(slow)) = (
            sma(ctx.bars, FAST_PERIOD, ctx.index),
            sma(ctx.bars, self.slow_period, ctx.index),
        ) else {
            return false;
        };
        let close = ctx.bars[ctx.index].close;
        match ctx.side {
            Side::Buy => close > slow && fast > slow,
            Side::Sell => close < slow && fast < slow,
        }
    }
}
