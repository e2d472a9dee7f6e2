//! Consolidation quality — a box that price tested repeatedly is more
//! meaningful than one it drifted through.

use super::{FilterContext, SignalFilter};

/// A bar "touches" a boundary when its extreme lands within this
/// fraction of the box range from the level.
const TOUCH_FRACTION: f64 = 0.1;

/// Counts highs near the box top and lows near the box bottom over the
/// lookback window and requires at least `min_touches` in total.
#[derive(Debug, Clone)]
pub struct QualityFilter {
    lookback: usize,
    min_touches: usize,
}

impl QualityFilter {
    pub fn new(lookback: usize, min_touches: usize) -> Self {
        Self {
            lookback,
            min_touches,
        }
    }
}

impl SignalFilter for QualityFilter {
    fn name(&self) -> &'static str {
        "quality"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let start = ctx.index.saturating_sub(self.lookback);
        let window = &ctx.bars[start..ctx.index];
        let touch_threshold = ctx.boxed.range * TOUCH_FRACTION;

        let mut touches = 0usize;
        for bar in window {
            if (bar.high - ctx.boxed.high_level).abs() < touch_threshold {
                touches += 1;
            }
            if (bar.low - ctx.boxed.low_level).abs() < touch_threshold {
                touches += 1;
            }
        }
        touches >= self.min_touches
    }
}
