//! Raw breakout detection — a close-price crossing of the box boundary.

use crate::detector::ConsolidationBox;
use crate::domain::{Bar, Side};

/// A breakout candidate: the direction, the close that triggered it, and
/// the box it broke from. Ephemeral: acted upon, never stored.
#[derive(Debug, Clone, Copy)]
pub struct Signal {
    pub side: Side,
    pub price: f64,
    pub boxed: ConsolidationBox,
}

/// Detect a boundary crossing at `index`: the previous close was still
/// inside (or on) the boundary and the current close is beyond it.
///
/// Never fires before index 1; there is no previous close to cross from.
pub fn detect_breakout(bars: &[Bar], index: usize, boxed: &ConsolidationBox) -> Option<Signal> {
    if index < 1 || index >= bars.len() {
        return None;
    }
    let current = bars[index].close;
    let previous = bars[index - 1].close;

    if previous <= boxed.high_level && current > boxed.high_level {
        return Some(Signal {
            side: Side::Buy,
            price: current,
            boxed: *boxed,
        });
    }
    if previous >= boxed.low_level && current < boxed.low_level {
        return Some(Signal {
            side: Side::Sell,
            price: current,
            boxed: *boxed,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_bars;

    fn test_box() -> ConsolidationBox {
        ConsolidationBox {
            high_level: 100.5,
            low_level: 100.0,
            range: 0.5,
            is_consolidating: true,
        }
    }

    #[test]
    fn buy_on_upward_cross() {
        let bars = make_bars(&[100.4, 101.0]);
        let signal = detect_breakout(&bars, 1, &test_box()).unwrap();
        assert_eq!(signal.side, Side::Buy);
        assert_eq!(signal.price, 101.0);
    }

    #[test]
    fn sell_on_downward_cross() {
        let bars = make_bars(&[100.1, 99.5]);
        let signal = detect_breakout(&bars, 1, &test_box()).unwrap();
        assert_eq!(signal.side, Side::Sell);
        assert_eq!(signal.price, 99.5);
    }

    #[test]
    fn no_signal_when_already_beyond() {
        // Previous close already above the boundary: no fresh cross.
        let bars = make_bars(&[101.0, 101.5]);
        assert!(detect_breakout(&bars, 1, &test_box()).is_none());
    }

    #[test]
    fn no_signal_inside_box() {
        let bars = make_bars(&[100.2, 100.3]);
        assert!(detect_breakout(&bars, 1, &test_box()).is_none());
    }

    #[test]
    fn no_signal_on_exact_boundary_close() {
        // Close equal to the boundary is not beyond it.
        let bars = make_bars(&[100.2, 100.5]);
        assert!(detect_breakout(&bars, 1, &test_box()).is_none());
    }

    #[test]
    fn no_signal_at_index_zero() {
        let bars = make_bars(&[101.0]);
        assert!(detect_breakout(&bars, 0, &test_box()).is_none());
    }
}
