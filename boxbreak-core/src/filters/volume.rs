//! Volume confirmation — a breakout on thin volume is suspect.

use super::{FilterContext, SignalFilter};

/// Bars in the trailing mean-volume window.
pub const VOLUME_LOOKBACK: usize = 20;

/// Requires the signal bar's volume to exceed `multiplier` times the
/// trailing 20-bar mean volume. Passes through before enough history
/// exists.
#[derive(Debug, Clone)]
pub struct VolumeFilter {
    multiplier: f64,
}

impl VolumeFilter {
    pub fn new(multiplier: f64) -> Self {
        Self { multiplier }
    }
}

impl SignalFilter for VolumeFilter {
    fn name(&self) -> &'static str {
        "volume"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        if ctx.index < VOLUME_LOOKBACK {
            return true;
        }
        let window = &ctx.bars[ctx.index - VOLUME_LOOKBACK..ctx.index];
        let avg: f64 =
            window.iter().map(|bar| bar.volume).sum::<f64>() / VOLUME_LOOKBACK as f64;
        ctx.bars[ctx.index].volume > avg * self.multiplier
    }
}
