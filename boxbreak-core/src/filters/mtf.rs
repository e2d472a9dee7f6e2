//! Multi-timeframe confirmation — a long-period moving average stands in
//! for the higher-timeframe trend.

use crate::domain::Side;
use crate::indicators::sma;

use super::{FilterContext, SignalFilter};

/// Requires the close to sit on the correct side of SMA(`period`): above
/// it for BUY, below it for SELL. Missing data vetoes, same as the trend
/// filter.
#[derive(Debug, Clone)]
pub struct MtfFilter {
    period: usize,
}

impl MtfFilter {
    pub fn new(period: usize) -> Self {
        Self { period }
    }
}

impl SignalFilter for MtfFilter {
    fn name(&self) -> &'static str {
        "mtf"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let Some(htf_ma) = sma(ctx.bars, self.period, ctx.index) else {
            return false;
        };
        let close = ctx.bars[ctx.index].close;
        match ctx.side {
            Side::Buy => close > htf_ma,
            Side::Sell => close < htf_ma,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::ConsolidationBox;
    use crate::indicators::make_bars;

    fn dummy_box() -> ConsolidationBox {
        ConsolidationBox {
            high_level: 101.0,
            low_level: 99.0,
            range: 2.0,
            is_consolidating: true,
        }
    }

    fn ctx_at<'a>(
        bars: &'a [crate::domain::Bar],
        boxed: &'a ConsolidationBox,
        index: usize,
        side: Side,
    ) -> FilterContext<'a> {
        FilterContext {
            bars,
            index,
            side,
            boxed,
        }
    }

    #[test]
    fn vetoes_without_enough_history() {
        let bars = make_bars(&[100.0; 50]);
        let boxed = dummy_box();
        let filter = MtfFilter::new(200);
        assert!(!filter.evaluate(&ctx_at(&bars, &boxed, 49, Side::Buy)));
    }

    #[test]
    fn buy_needs_price_above_long_ma() {
        let mut closes = vec![100.0; 31];
        closes[30] = 105.0;
        let bars = make_bars(&closes);
        let boxed = dummy_box();
        let filter = MtfFilter::new(30);
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 30, Side::Buy)));
        assert!(!filter.evaluate(&ctx_at(&bars, &boxed, 30, Side::Sell)));
    }

    #[test]
    fn sell_needs_price_below_long_ma() {
        let mut closes = vec![100.0; 31];
        closes[30] = 95.0;
        let bars = make_bars(&closes);
        let boxed = dummy_box();
        let filter = MtfFilter::new(30);
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 30, Side::Sell)));
        assert!(!filter.evaluate(&ctx_at(&bars, &boxed, 30, Side::Buy)));
    }
}
