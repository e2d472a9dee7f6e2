//! The bar-by-bar replay loop.
//!
//! Each bar is fully processed before the next: exit check (with the
//! trailing ratchet), then the equity sample, then entry evaluation.
//! Entry evaluation is skipped while a position is open and while the
//! daily cap is reached. A position still open after the last bar is
//! force-closed at the final close.

use std::collections::BTreeMap;

use crate::config::{IntrabarPolicy, ParameterSet};
use crate::detector::ConsolidationDetector;
use crate::domain::{Bar, BarSeries, EquitySample, ExitReason, OpenTrade, Side, TradeRecord};
use crate::filters::{FilterContext, FilterDecision, FilterPipeline};
use crate::signal::detect_breakout;
use crate::stops::compute_stops;

use super::state::RunState;

/// Everything one replay produces, before metric aggregation.
#[derive(Debug)]
pub struct RunReport {
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquitySample>,
    pub final_balance: f64,
    /// Total bars processed; equals the equity curve length.
    pub bar_count: usize,
    /// Raw breakout candidates seen, before filtering.
    pub candidate_signals: usize,
    /// Veto count per enabled filter name.
    pub rejections: BTreeMap<String, u64>,
    /// Per-filter verdicts for every candidate, in evaluation order.
    pub decisions: Vec<FilterDecision>,
}

/// Replay the whole series under one parameter set.
///
/// The series and parameters are assumed validated; every outcome of the
/// replay itself is a deterministic state transition, not an error.
pub fn run(series: &BarSeries, params: &ParameterSet) -> RunReport {
    let bars = series.bars();
    let detector =
        ConsolidationDetector::new(params.consolidation_periods, params.breakout_threshold);
    let mut pipeline = FilterPipeline::from_params(params);
    let mut state = RunState::new(params.initial_balance);
    let mut candidate_signals = 0usize;

    for index in 0..bars.len() {
        let bar = &bars[index];

        // Exit check. Ratchet first: the same bar's range both moves the
        // trailing stop and can trigger it.
        if let Some(mut trade) = state.open_trade.take() {
            if params.use_trailing_stop {
                let trail_distance = trade.entry_price * params.trailing_stop_pct / 100.0;
                trade.update_trailing_stop(bar.high, bar.low, trail_distance);
            }
            match check_exit(&trade, bar, params) {
                Some((exit_price, reason)) => {
                    let closed =
                        trade.close(exit_price, bar.time, reason, params.lot_size, state.balance);
                    state.balance = closed.balance_after;
                    state.trades.push(closed);
                }
                None => state.open_trade = Some(trade),
            }
        }

        // Equity sample: after the exit check, before entry evaluation.
        state.equity_curve.push(EquitySample {
            time: bar.time,
            balance: state.balance,
            in_position: state.in_position(),
        });

        if state.in_position() {
            continue;
        }
        if !state.can_trade_on(bar.time.date(), params.max_daily_trades) {
            continue;
        }

        let Some(boxed) = detector.detect(bars, index) else {
            continue;
        };
        if !boxed.is_consolidating {
            continue;
        }
        let Some(signal) = detect_breakout(bars, index, &boxed) else {
            continue;
        };
        candidate_signals += 1;

        let ctx = FilterContext {
            bars,
            index,
            side: signal.side,
            boxed: &boxed,
        };
        if !pipeline.accept(&ctx) {
            continue;
        }

        let levels = compute_stops(bars, index, signal.price, signal.side, boxed.range, params);
        state.open_trade = Some(OpenTrade::new(
            signal.side,
            signal.price,
            bar.time,
            levels.take_profit,
            levels.stop_loss,
            params.use_trailing_stop,
        ));
        state.record_entry(bar.time.date());
    }

    // Force-close a position that outlived the data.
    if let Some(trade) = state.open_trade.take() {
        let last = &bars[bars.len() - 1];
        let closed = trade.close(
            last.close,
            last.time,
            ExitReason::EndOfData,
            params.lot_size,
            state.balance,
        );
        state.balance = closed.balance_after;
        state.trades.push(closed);
    }

    let (rejections, decisions) = pipeline.into_diagnostics();
    RunReport {
        trades: state.trades,
        equity_curve: state.equity_curve,
        final_balance: state.balance,
        bar_count: bars.len(),
        candidate_signals,
        rejections,
        decisions,
    }
}

/// Test the bar against the trade's exit levels. Returns the fill price
/// and reason, or `None` to stay open.
///
/// When the bar's range touches both levels, `intrabar_policy` decides
/// which fill wins. A stop exit reports `TSL` whenever trailing is
/// enabled for the run.
fn check_exit(trade: &OpenTrade, bar: &Bar, params: &ParameterSet) -> Option<(f64, ExitReason)> {
    let tp = trade.take_profit;
    let stop = trade.effective_stop();
    let stop_reason = if params.use_trailing_stop {
        ExitReason::TrailingStop
    } else {
        ExitReason::StopLoss
    };

    let (tp_hit, stop_hit) = match trade.side {
        Side::Buy => (bar.high >= tp, bar.low <= stop),
        Side::Sell => (bar.low <= tp, bar.high >= stop),
    };

    match params.intrabar_policy {
        IntrabarPolicy::TpFirst => {
            if tp_hit {
                Some((tp, ExitReason::TakeProfit))
            } else if stop_hit {
                Some((stop, stop_reason))
            } else {
                None
            }
        }
        IntrabarPolicy::SlFirst => {
            if stop_hit {
                Some((stop, stop_reason))
            } else if tp_hit {
                Some((tp, ExitReason::TakeProfit))
            } else {
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn bar(high: f64, low: f64, close: f64) -> Bar {
        Bar {
            time: NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            open: close,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    fn open_buy() -> OpenTrade {
        OpenTrade::new(
            Side::Buy,
            100.0,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            110.0,
            95.0,
            false,
        )
    }

    #[test]
    fn buy_exit_at_take_profit() {
        let params = ParameterSet::unfiltered();
        let exit = check_exit(&open_buy(), &bar(111.0, 105.0, 108.0), &params);
        assert_eq!(exit, Some((110.0, ExitReason::TakeProfit)));
    }

    #[test]
    fn buy_exit_at_stop_loss() {
        let params = ParameterSet::unfiltered();
        let exit = check_exit(&open_buy(), &bar(101.0, 94.0, 96.0), &params);
        assert_eq!(exit, Some((95.0, ExitReason::StopLoss)));
    }

    #[test]
    fn no_exit_inside_levels() {
        let params = ParameterSet::unfiltered();
        assert_eq!(check_exit(&open_buy(), &bar(105.0, 98.0, 102.0), &params), None);
    }

    #[test]
    fn tp_wins_ambiguous_bar_by_default() {
        // Range touches both levels: the optimistic policy fills the target.
        let params = ParameterSet::unfiltered();
        let exit = check_exit(&open_buy(), &bar(112.0, 94.0, 100.0), &params);
        assert_eq!(exit, Some((110.0, ExitReason::TakeProfit)));
    }

    #[test]
    fn sl_first_policy_flips_ambiguous_bar() {
        let params = ParameterSet {
            intrabar_policy: IntrabarPolicy::SlFirst,
            ..ParameterSet::unfiltered()
        };
        let exit = check_exit(&open_buy(), &bar(112.0, 94.0, 100.0), &params);
        assert_eq!(exit, Some((95.0, ExitReason::StopLoss)));
    }

    #[test]
    fn trailing_run_reports_tsl() {
        let params = ParameterSet {
            use_trailing_stop: true,
            ..ParameterSet::unfiltered()
        };
        let trade = OpenTrade::new(
            Side::Buy,
            100.0,
            NaiveDate::from_ymd_opt(2024, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            110.0,
            95.0,
            true,
        );
        let exit = check_exit(&trade, &bar(101.0, 94.0, 96.0), &params);
        assert_eq!(exit, Some((95.0, ExitReason::TrailingStop)));
    }
}
