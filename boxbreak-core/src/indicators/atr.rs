//! Average True Range (ATR).
//!
//! True range: max(high-low, |high-prev_close|, |low-prev_close|).
//! ATR here is the plain mean of true range over the window ending
//! before `index`; the window's first bar has no previous close inside
//! the window and contributes high-low only.

use crate::domain::Bar;

/// ATR over `bars[index - period .. index]`.
///
/// Requires at least `period + 1` bars of history before `index` can be
/// evaluated; returns `None` otherwise.
pub fn atr(bars: &[Bar], period: usize, index: usize) -> Option<f64> {
    if period == 0 || index < period + 1 || index > bars.len() {
        return None;
    }
    let window = &bars[index - period..index];
    let mut sum = 0.0;
    for (i, bar) in window.iter().enumerate() {
        let range = bar.high - bar.low;
        let tr = if i == 0 {
            range
        } else {
            let prev_close = window[i - 1].close;
            range
                .max((bar.high - prev_close).abs())
                .max((bar.low - prev_close).abs())
        };
        sum += tr;
    }
    Some(sum / period as f64)
}
