//! Trade lifecycle types: open position state and closed-trade records.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Contract multiplier for profit conversion: one point of favorable
/// movement at 1.0 lots is worth 100 currency units.
pub const POINT_VALUE: f64 = 100.0;

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Side {
    Buy,
    Sell,
}

/// Why a trade was closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitReason {
    #[serde(rename = "TP")]
    TakeProfit,
    #[serde(rename = "SL")]
    StopLoss,
    #[serde(rename = "TSL")]
    TrailingStop,
    #[serde(rename = "END_OF_DATA")]
    EndOfData,
}

/// The single open position owned by the lifecycle manager.
///
/// `trailing_stop` is `Some` only when trailing is enabled for the run;
/// it starts at the initial stop-loss and only ever tightens. The
/// favorable extremes are tracked to anchor the ratchet.
#[derive(Debug, Clone)]
pub struct OpenTrade {
    pub side: Side,
    pub entry_price: f64,
    pub entry_time: NaiveDateTime,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub trailing_stop: Option<f64>,
    pub highest_price: f64,
    pub lowest_price: f64,
}

impl OpenTrade {
    pub fn new(
        side: Side,
        entry_price: f64,
        entry_time: NaiveDateTime,
        take_profit: f64,
        stop_loss: f64,
        use_trailing: bool,
    ) -> Self {
        Self {
            side,
            entry_price,
            entry_time,
            take_profit,
            stop_loss,
            trailing_stop: use_trailing.then_some(stop_loss),
            highest_price: entry_price,
            lowest_price: entry_price,
        }
    }

    /// Ratchet the trailing stop toward price. The stop only ever moves
    /// in the trade's favor: up for BUY as new highs print, down for
    /// SELL as new lows print.
    pub fn update_trailing_stop(&mut self, bar_high: f64, bar_low: f64, trail_distance: f64) {
        let Some(current) = self.trailing_stop else {
            return;
        };
        match self.side {
            Side::Buy => {
                if bar_high > self.highest_price {
                    self.highest_price = bar_high;
                    let new_stop = self.highest_price - trail_distance;
                    if new_stop > current {
                        self.trailing_stop = Some(new_stop);
                    }
                }
            }
            Side::Sell => {
                if bar_low < self.lowest_price {
                    self.lowest_price = bar_low;
                    let new_stop = self.lowest_price + trail_distance;
                    if new_stop < current {
                        self.trailing_stop = Some(new_stop);
                    }
                }
            }
        }
    }

    /// The stop level in effect: the trailing stop when enabled,
    /// otherwise the fixed stop-loss.
    pub fn effective_stop(&self) -> f64 {
        self.trailing_stop.unwrap_or(self.stop_loss)
    }

    /// Convert to a closed record at the given exit, crediting profit
    /// onto `balance_before`.
    pub fn close(
        &self,
        exit_price: f64,
        exit_time: NaiveDateTime,
        exit_reason: ExitReason,
        lot_size: f64,
        balance_before: f64,
    ) -> TradeRecord {
        let points = match self.side {
            Side::Buy => exit_price - self.entry_price,
            Side::Sell => self.entry_price - exit_price,
        };
        let profit = points * lot_size * POINT_VALUE;
        TradeRecord {
            side: self.side,
            entry_time: self.entry_time,
            entry_price: self.entry_price,
            exit_time,
            exit_price,
            take_profit: self.take_profit,
            stop_loss: self.stop_loss,
            points,
            profit,
            balance_after: balance_before + profit,
            exit_reason,
        }
    }
}

/// A complete round-trip trade record: entry → exit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    pub side: Side,
    pub entry_time: NaiveDateTime,
    pub entry_price: f64,
    pub exit_time: NaiveDateTime,
    pub exit_price: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub points: f64,
    pub profit: f64,
    pub balance_after: f64,
    pub exit_reason: ExitReason,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}
