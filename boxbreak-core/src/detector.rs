//! Consolidation detection — classifies the trailing window as a tight
//! trading range ("box") or not.

use serde::{Deserialize, Serialize};

use crate::domain::Bar;

/// The trailing price box derived from a full-length lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConsolidationBox {
    /// Highest high over the window.
    pub high_level: f64,
    /// Lowest low over the window.
    pub low_level: f64,
    /// `high_level - low_level`.
    pub range: f64,
    /// Whether the range is tight relative to the window's mean close.
    pub is_consolidating: bool,
}

/// Classifies the `lookback` bars before an index as consolidating when
/// `(max(high) - min(low)) / mean(close) < threshold`.
#[derive(Debug, Clone, Copy)]
pub struct ConsolidationDetector {
    pub lookback: usize,
    pub threshold: f64,
}

impl ConsolidationDetector {
    pub fn new(lookback: usize, threshold: f64) -> Self {
        Self { lookback, threshold }
    }

    /// Evaluate the window `bars[index - lookback .. index]`. The bar at
    /// `index` is excluded: the box must be known before the bar that
    /// might break out of it.
    ///
    /// Returns `None` when fewer than `lookback` bars precede `index`;
    /// that is a normal boundary case, not an error.
    pub fn detect(&self, bars: &[Bar], index: usize) -> Option<ConsolidationBox> {
        if index < self.lookback || index > bars.len() {
            return None;
        }
        let window = &bars[index - self.lookback..index];

        let mut high_level = f64::MIN;
        let mut low_level = f64::MAX;
        let mut close_sum = 0.0;
        for bar in window {
            high_level = high_level.max(bar.high);
            low_level = low_level.min(bar.low);
            close_sum += bar.close;
        }
        let range = high_level - low_level;
        let avg_close = close_sum / self.lookback as f64;
        let range_ratio = range / avg_close;

        Some(ConsolidationBox {
            high_level,
            low_level,
            range,
            is_consolidating: range_ratio < self.threshold,
        })
    }
}
