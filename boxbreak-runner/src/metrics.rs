//! Performance metrics — pure functions that compute run statistics.
//!
//! Every metric is a pure function of the trade list, the equity curve,
//! and the initial balance. No dependency on the engine: feeding a
//! recorded trade list and equity curve back through `compute` yields
//! exactly the summary the live run produced.

use serde::{Deserialize, Serialize};

use boxbreak_core::domain::{EquitySample, TradeRecord};

/// Aggregate statistics for a single backtest run.
///
/// Percentages are expressed on the 0..=100 scale. Drawdowns are
/// non-negative magnitudes. With zero trades every derived metric is
/// zero rather than an error; `profit_factor` is `f64::INFINITY` when
/// there are trades but no gross loss.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestSummary {
    pub total_trades: usize,
    pub winning_trades: usize,
    pub losing_trades: usize,
    pub win_rate: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub net_profit: f64,
    pub return_pct: f64,
    pub max_drawdown: f64,
    pub max_drawdown_pct: f64,
    pub avg_win: f64,
    pub avg_loss: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
    pub profit_factor: f64,
    pub initial_balance: f64,
    pub final_balance: f64,
}

impl BacktestSummary {
    /// Compute all metrics from a closed-trade list and equity curve.
    pub fn compute(
        trades: &[TradeRecord],
        equity_curve: &[EquitySample],
        initial_balance: f64,
    ) -> Self {
        if trades.is_empty() {
            return Self::zeroed(initial_balance);
        }

        let winners: Vec<f64> = trades
            .iter()
            .filter(|t| t.is_winner())
            .map(|t| t.profit)
            .collect();
        let losers: Vec<f64> = trades
            .iter()
            .filter(|t| !t.is_winner())
            .map(|t| t.profit)
            .collect();

        let gross_profit: f64 = winners.iter().sum();
        let gross_loss: f64 = losers.iter().sum::<f64>().abs();
        let net_profit = gross_profit - gross_loss;
        let final_balance = initial_balance + trades.iter().map(|t| t.profit).sum::<f64>();

        let (max_drawdown, max_drawdown_pct) = drawdown(equity_curve);

        Self {
            total_trades: trades.len(),
            winning_trades: winners.len(),
            losing_trades: losers.len(),
            win_rate: winners.len() as f64 / trades.len() as f64 * 100.0,
            gross_profit,
            gross_loss,
            net_profit,
            return_pct: (final_balance - initial_balance) / initial_balance * 100.0,
            max_drawdown,
            max_drawdown_pct,
            avg_win: mean(&winners),
            avg_loss: mean(&losers),
            largest_win: winners.iter().copied().fold(0.0, f64::max),
            largest_loss: losers.iter().copied().fold(0.0, f64::min),
            profit_factor: if gross_loss > 0.0 {
                gross_profit / gross_loss
            } else {
                f64::INFINITY
            },
            initial_balance,
            final_balance,
        }
    }

    fn zeroed(initial_balance: f64) -> Self {
        Self {
            total_trades: 0,
            winning_trades: 0,
            losing_trades: 0,
            win_rate: 0.0,
            gross_profit: 0.0,
            gross_loss: 0.0,
            net_profit: 0.0,
            return_pct: 0.0,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            largest_win: 0.0,
            largest_loss: 0.0,
            profit_factor: 0.0,
            initial_balance,
            final_balance: initial_balance,
        }
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Running peak-to-trough drawdown over the balance curve: the peak is
/// the cumulative maximum of balance, the drawdown its shortfall, in
/// currency and as a percentage of the peak.
fn drawdown(equity_curve: &[EquitySample]) -> (f64, f64) {
    let mut peak = f64::MIN;
    let mut max_dd = 0.0_f64;
    let mut max_dd_pct = 0.0_f64;
    for sample in equity_curve {
        peak = peak.max(sample.balance);
        let dd = peak - sample.balance;
        if dd > max_dd {
            max_dd = dd;
        }
        if peak > 0.0 {
            let dd_pct = dd / peak * 100.0;
            if dd_pct > max_dd_pct {
                max_dd_pct = dd_pct;
            }
        }
    }
    (max_dd, max_dd_pct)
}
