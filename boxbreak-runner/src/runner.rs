//! Backtest runner — wires together validation, the replay engine, and
//! metric aggregation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use boxbreak_core::config::{ConfigError, ParameterSet};
use boxbreak_core::domain::{Bar, BarSeries, EquitySample, InputError, TradeRecord};
use boxbreak_core::engine;
use boxbreak_core::filters::FilterDecision;

use crate::metrics::BacktestSummary;

/// Errors from the runner.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("input error: {0}")]
    Input(#[from] InputError),
}

/// Complete result of a single backtest run: summary statistics plus the
/// full ordered trade list, equity curve, and filter diagnostics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestResult {
    /// Content hash of the parameter set.
    pub run_id: String,
    pub params: ParameterSet,
    pub summary: BacktestSummary,
    pub trades: Vec<TradeRecord>,
    pub equity_curve: Vec<EquitySample>,
    pub bar_count: usize,
    /// Raw breakout candidates seen, before filtering.
    pub candidate_signals: usize,
    /// Veto count per enabled filter name.
    pub rejections: BTreeMap<String, u64>,
    /// Per-filter verdicts for every candidate, in evaluation order.
    pub decisions: Vec<FilterDecision>,
}

/// Validate the parameters and replay the series once.
pub fn run_backtest(
    params: &ParameterSet,
    series: &BarSeries,
) -> Result<BacktestResult, RunError> {
    params.validate()?;
    let report = engine::run(series, params);
    let summary =
        BacktestSummary::compute(&report.trades, &report.equity_curve, params.initial_balance);
    Ok(BacktestResult {
        run_id: params.run_id(),
        params: params.clone(),
        summary,
        trades: report.trades,
        equity_curve: report.equity_curve,
        bar_count: report.bar_count,
        candidate_signals: report.candidate_signals,
        rejections: report.rejections,
        decisions: report.decisions,
    })
}

/// Convenience entry point for callers holding a raw bar vector: the
/// series is validated first, then replayed.
pub fn run_backtest_on_bars(
    params: &ParameterSet,
    bars: Vec<Bar>,
) -> Result<BacktestResult, RunError> {
    let series = BarSeries::new(bars)?;
    run_backtest(params, &series)
}
