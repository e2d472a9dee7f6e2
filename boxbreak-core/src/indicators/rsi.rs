//! Relative Strength Index (RSI).
//!
//! Computed from the close-to-close deltas inside the window ending
//! before `index`. Zero mean loss clamps the result to 100.

use crate::domain::Bar;

/// RSI over the `period` closes in `bars[index - period .. index]`.
///
/// Requires at least `period + 1` bars of history before `index`;
/// returns `None` otherwise. Result is in `[0, 100]`.
pub fn rsi(bars: &[Bar], period: usize, index: usize) -> Option<f64> {
    if period < 2 || index < period + 1 || index > bars.len() {
        return None;
    }
    let window = &bars[index - period..index];
    let mut gain_sum = 0.0;
    let mut loss_sum = 0.0;
    for pair in window.windows(2) {
        let delta = pair[1].close - pair[0].close;
        if delta > 0.0 {
            gain_sum += delta;
        } else {
            loss_sum += -delta;
        }
    }
    if loss_sum == 0.0 {
        return Some(100.0);
    }
    let rs = gain_sum / loss_sum;
    Some(100.0 - 100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, DEFAULT_EPSILON};

    #[test]
    fn rsi_balanced_moves_is_50() {
        // Alternating +1/-1 deltas: equal gains and losses.
        let bars = make_bars(&[100.0, 101.0, 100.0, 101.0, 100.0, 101.0]);
        assert_approx(rsi(&bars, 4, 5).unwrap(), 50.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0]);
        assert_approx(rsi(&bars, 4, 5).unwrap(), 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let bars = make_bars(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0]);
        assert_approx(rsi(&bars, 4, 5).unwrap(), 0.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_known_value() {
        // Window closes at index 5, period 4: [101, 103, 102, 104]
        // deltas: +2, -1, +2 → gains 4, losses 1, rs = 4, rsi = 80.
        let bars = make_bars(&[100.0, 101.0, 103.0, 102.0, 104.0, 105.0]);
        assert_approx(rsi(&bars, 4, 5).unwrap(), 80.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_flat_series_clamps_to_100() {
        // No movement at all: zero loss clamps to 100.
        let bars = make_bars(&[100.0; 8]);
        assert_approx(rsi(&bars, 4, 6).unwrap(), 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn rsi_insufficient_history() {
        let bars = make_bars(&[100.0, 101.0, 102.0, 103.0]);
        // Needs period + 1 bars before evaluation.
        assert_eq!(rsi(&bars, 4, 4), None);
        assert!(rsi(&bars, 3, 4).is_some());
    }
}
