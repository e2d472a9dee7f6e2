//! Stop/target computation — derives take-profit and stop-loss levels
//! from either the box range or ATR, scaled by the risk:reward ratio.

use crate::config::{ParameterSet, StopMode};
use crate::domain::{Bar, Side};
use crate::indicators::atr;

/// Priced exit levels for a new position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StopLevels {
    pub take_profit: f64,
    pub stop_loss: f64,
}

/// Compute exit levels for an entry at `entry_price` on the bar at
/// `index`.
///
/// ATR mode falls back to box-range stops when ATR cannot be computed
/// from the available history.
pub fn compute_stops(
    bars: &[Bar],
    index: usize,
    entry_price: f64,
    side: Side,
    box_range: f64,
    params: &ParameterSet,
) -> StopLevels {
    let stop_distance = match params.stop_mode {
        StopMode::Atr => atr(bars, params.atr_period, index)
            .map(|value| value * params.atr_multiplier)
            .unwrap_or(box_range * params.sl_multiplier),
        StopMode::BoxRange => box_range * params.sl_multiplier,
    };
    from_distance(entry_price, side, stop_distance, params.risk_reward_ratio)
}

fn from_distance(entry_price: f64, side: Side, stop_distance: f64, risk_reward: f64) -> StopLevels {
    match side {
        Side::Buy => StopLevels {
            stop_loss: entry_price - stop_distance,
            take_profit: entry_price + stop_distance * risk_reward,
        },
        Side::Sell => StopLevels {
            stop_loss: entry_price + stop_distance,
            take_profit: entry_price - stop_distance * risk_reward,
        },
    }
}
