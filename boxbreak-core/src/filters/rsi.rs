//! RSI exhaustion guard — don't buy into an overbought market or sell
//! into an oversold one.

use crate::domain::Side;
use crate::indicators::rsi;

use super::{FilterContext, SignalFilter};

/// Vetoes BUY when RSI exceeds `overbought`, SELL when RSI is below
/// `oversold`. When RSI cannot be computed yet the signal passes; this
/// filter only blocks confirmed extremes.
#[derive(Debug, Clone)]
pub struct RsiFilter {
    period: usize,
    overbought: f64,
    oversold: f64,
}

impl RsiFilter {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Self {
        Self {
            period,
            overbought,
            oversold,
        }
    }
}

impl SignalFilter for RsiFilter {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let Some(value) = rsi(ctx.bars, self.period, ctx.index) else {
            return true;
        };
        match ctx.side {
            Side::Buy => value <= self.overbought,
            Side::Sell => value >= self.oversold,
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
    fn passes_without_enough_history() {
        let bars = make_bars(&[100.0; 5]);
        let boxed = dummy_box();
        let filter = RsiFilter::new(14, 70.0, 30.0);
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 4, Side::Buy)));
    }

    #[test]
    fn vetoes_overbought_buy() {
        // Monotonic rally → RSI 100.
        let closes: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let bars = make_bars(&closes);
        let boxed = dummy_box();
        let filter = RsiFilter::new(14, 70.0, 30.0);
        assert!(!filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Buy)));
        // Selling into strength is fine for this filter.
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Sell)));
    }

    #[test]
    fn vetoes_oversold_sell() {
        let closes: Vec<f64> = (0..20).map(|i| 200.0 - i as f64).collect();
        let bars = make_bars(&closes);
        let boxed = dummy_box();
        let filter = RsiFilter::new(14, 70.0, 30.0);
        assert!(!filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Sell)));
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Buy)));
    }

    #[test]
    fn neutral_rsi_passes_both_sides() {
        // Alternating moves keep RSI near 50.
        let closes: Vec<f64> = (0..20)
            .map(|i| if i % 2 == 0 { 100.0 } else { 101.0 })
            .collect();
        let bars = make_bars(&closes);
        let boxed = dummy_box();
        let filter = RsiFilter::new(14, 70.0, 30.0);
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Buy)));
        assert!(filter.evaluate(&ctx_at(&bars, &boxed, 18, Side::Sell)));
    }
}
