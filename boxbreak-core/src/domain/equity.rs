//! Equity curve sample.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One point of the equity curve, appended once per bar in bar order.
///
/// `balance` is realized balance only (no mark-to-market of the open
/// position); `in_position` reflects the position state after the bar's
/// exit check and before its entry evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EquitySample {
    pub time: NaiveDateTime,
    pub balance: f64,
    pub in_position: bool,
}
