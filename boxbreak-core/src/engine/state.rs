//! Per-run mutable state, threaded through the replay loop.

use std::collections::HashMap;

use chrono::NaiveDate;

use crate::domain::{EquitySample, OpenTrade, TradeRecord};

/// Everything that evolves bar-by-bar during one replay: realized
/// balance, the (at most one) open position, closed trades, the equity
/// curve, and the per-date entry tally for the daily cap.
#[derive(Debug)]
pub struct RunState {
    pub balance: f64,
    pub open_trade: Option<OpenTrade>,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquitySample>,
    daily_entries: HashMap<NaiveDate, u32>,
}

impl RunState {
    pub fn new(initial_balance: f64) -> Self {
        Self {
            balance: initial_balance,
            open_trade: None,
            trades: Vec::new(),
            equity_curve: Vec::new(),
            daily_entries: HashMap::new(),
        }
    }

    pub fn in_position(&self) -> bool {
        self.open_trade.is_some()
    }

    /// Whether the daily cap still allows an entry on `date`. Counters
    /// are independent per calendar date and never reset mid-run.
    pub fn can_trade_on(&self, date: NaiveDate, max_daily_trades: u32) -> bool {
        self.daily_entries.get(&date).copied().unwrap_or(0) < max_daily_trades
    }

    pub fn record_entry(&mut self, date: NaiveDate) {
        *self.daily_entries.entry(date).or_insert(0) += 1;
    }
}
