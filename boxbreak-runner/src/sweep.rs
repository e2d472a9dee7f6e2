//! Parameter sweep — grid enumeration and parallel execution of
//! independent engine runs.

use std::cmp::Ordering;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use boxbreak_core::config::ParameterSet;
use boxbreak_core::domain::BarSeries;

use crate::runner::{run_backtest, BacktestResult, RunError};
use crate::score::{RankingMetric, ScoreWeights};

/// Candidate values per swept dimension.
///
/// An empty dimension keeps the base value; the grid is the cartesian
/// product of the non-empty ones. Combinations are generated lazily by
/// index decomposition, so defining a huge grid costs nothing until it
/// is dispatched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParamGrid {
    pub risk_reward_ratios: Vec<f64>,
    pub consolidation_periods: Vec<usize>,
    pub breakout_thresholds: Vec<f64>,
    pub trend_periods: Vec<usize>,
    pub min_breakout_strengths: Vec<f64>,
    pub volume_multipliers: Vec<f64>,
    /// (oversold, overbought) pairs.
    pub rsi_bounds: Vec<(f64, f64)>,
    pub min_touches: Vec<usize>,
    /// (start_hour, end_hour) pairs.
    pub trading_hours: Vec<(u32, u32)>,
    pub confirmation_bars: Vec<usize>,
}

/// Pick the value for one dimension out of a flattened index, consuming
/// that dimension's digits. Empty dimensions are skipped.
fn pick<T: Copy>(values: &[T], index: &mut usize) -> Option<T> {
    if values.is_empty() {
        return None;
    }
    let value = values[*index % values.len()];
    *index /= values.len();
    Some(value)
}

impl ParamGrid {
    /// The reference search ranges for the strategy's tunables.
    pub fn default_ranges() -> Self {
        Self {
            risk_reward_ratios: vec![2.0, 2.5, 3.0],
            consolidation_periods: vec![20, 25, 30],
            breakout_thresholds: vec![0.003, 0.004, 0.005],
            trend_periods: vec![30, 50],
            min_breakout_strengths: vec![0.15, 0.20, 0.25],
            volume_multipliers: vec![1.1, 1.2],
            rsi_bounds: vec![(25.0, 75.0), (30.0, 70.0)],
            min_touches: vec![2, 3],
            trading_hours: vec![(2, 20), (4, 18)],
            confirmation_bars: vec![1, 2],
        }
    }

    /// Total number of combinations.
    pub fn size(&self) -> usize {
        [
            self.risk_reward_ratios.len(),
            self.consolidation_periods.len(),
            self.breakout_thresholds.len(),
            self.trend_periods.len(),
            self.min_breakout_strengths.len(),
            self.volume_multipliers.len(),
            self.rsi_bounds.len(),
            self.min_touches.len(),
            self.trading_hours.len(),
            self.confirmation_bars.len(),
        ]
        .iter()
        .map(|&len| len.max(1))
        .product()
    }

    /// Materialize the combination at `index` (row-major over the
    /// non-empty dimensions) on top of `base`.
    pub fn config_at(&self, base: &ParameterSet, index: usize) -> ParameterSet {
        let mut params = base.clone();
        let mut i = index;
        if let Some(v) = pick(&self.risk_reward_ratios, &mut i) {
            params.risk_reward_ratio = v;
        }
        if let Some(v) = pick(&self.consolidation_periods, &mut i) {
            params.consolidation_periods = v;
        }
        if let Some(v) = pick(&self.breakout_thresholds, &mut i) {
            params.breakout_threshold = v;
        }
        if let Some(v) = pick(&self.trend_periods, &mut i) {
            params.trend_period = v;
        }
        if let Some(v) = pick(&self.min_breakout_strengths, &mut i) {
            params.min_breakout_strength = v;
        }
        if let Some(v) = pick(&self.volume_multipliers, &mut i) {
            params.volume_multiplier = v;
        }
        if let Some((oversold, overbought)) = pick(&self.rsi_bounds, &mut i) {
            params.rsi_oversold = oversold;
            params.rsi_overbought = overbought;
        }
        if let Some(v) = pick(&self.min_touches, &mut i) {
            params.min_touches = v;
        }
        if let Some((start, end)) = pick(&self.trading_hours, &mut i) {
            params.trading_start_hour = start;
            params.trading_end_hour = end;
        }
        if let Some(v) = pick(&self.confirmation_bars, &mut i) {
            params.confirmation_bars = v;
        }
        params
    }

    /// Lazily enumerate every combination. Combinations that fail
    /// validation are skipped.
    pub fn configs<'a>(
        &'a self,
        base: &'a ParameterSet,
    ) -> impl Iterator<Item = ParameterSet> + 'a {
        (0..self.size())
            .map(|index| self.config_at(base, index))
            .filter(|params| params.validate().is_ok())
    }

    /// Draw `n` random combinations (with replacement) for randomized
    /// search over grids too large to exhaust. Deterministic per seed.
    pub fn sample(&self, base: &ParameterSet, n: usize, seed: u64) -> Vec<ParameterSet> {
        let mut rng = StdRng::seed_from_u64(seed);
        let size = self.size();
        (0..n)
            .map(|_| self.config_at(base, rng.gen_range(0..size)))
            .filter(|params| params.validate().is_ok())
            .collect()
    }
}

/// Parameter sweep executor.
///
/// Runs one isolated backtest per combination, in parallel by default.
/// Runs share nothing but the read-only bar series; results are merged
/// only at the ranking step.
pub struct ParamSweep {
    parallel: bool,
    min_trades: usize,
    weights: ScoreWeights,
}

/// Runs with fewer closed trades than this are excluded from ranking.
pub const DEFAULT_MIN_TRADES: usize = 20;

impl Default for ParamSweep {
    fn default() -> Self {
        Self::new()
    }
}

impl ParamSweep {
    pub fn new() -> Self {
        Self {
            parallel: true,
            min_trades: DEFAULT_MIN_TRADES,
            weights: ScoreWeights::default(),
        }
    }

    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_min_trades(mut self, min_trades: usize) -> Self {
        self.min_trades = min_trades;
        self
    }

    pub fn with_weights(mut self, weights: ScoreWeights) -> Self {
        self.weights = weights;
        self
    }

    /// Execute the full grid against one series.
    pub fn sweep(
        &self,
        grid: &ParamGrid,
        base: &ParameterSet,
        series: &BarSeries,
    ) -> Result<SweepResults, RunError> {
        self.run_configs(grid.configs(base).collect(), series, None, |_, _, _| {})
    }

    /// Execute the grid with cooperative cancellation and a progress
    /// callback.
    ///
    /// Setting the flag stops dispatching further combinations;
    /// combinations already running complete normally and their results
    /// are kept.
    pub fn sweep_with_progress<F>(
        &self,
        grid: &ParamGrid,
        base: &ParameterSet,
        series: &BarSeries,
        cancel: Option<&AtomicBool>,
        progress: F,
    ) -> Result<SweepResults, RunError>
    where
        F: Fn(usize, usize, &BacktestResult) + Send + Sync,
    {
        self.run_configs(grid.configs(base).collect(), series, cancel, progress)
    }

    /// Execute an explicit list of configurations (e.g. a random sample).
    pub fn run_configs<F>(
        &self,
        configs: Vec<ParameterSet>,
        series: &BarSeries,
        cancel: Option<&AtomicBool>,
        progress: F,
    ) -> Result<SweepResults, RunError>
    where
        F: Fn(usize, usize, &BacktestResult) + Send + Sync,
    {
        let total = configs.len();
        let run_one = |(index, params): (usize, &ParameterSet)| {
            if cancel.is_some_and(|flag| flag.load(AtomicOrdering::Relaxed)) {
                return Ok(None);
            }
            let result = run_backtest(params, series)?;
            progress(index, total, &result);
            Ok(Some(result))
        };

        let results: Vec<Option<BacktestResult>> = if self.parallel {
            configs
                .par_iter()
                .enumerate()
                .map(run_one)
                .collect::<Result<_, RunError>>()?
        } else {
            configs
                .iter()
                .enumerate()
                .map(run_one)
                .collect::<Result<_, RunError>>()?
        };

        Ok(SweepResults::new(
            results.into_iter().flatten().collect(),
            self.min_trades,
            self.weights,
        ))
    }
}

/// Results from a parameter sweep.
///
/// All completed runs are retained; ranking views exclude runs below
/// the minimum trade count.
#[derive(Debug)]
pub struct SweepResults {
    results: Vec<BacktestResult>,
    min_trades: usize,
    weights: ScoreWeights,
}

impl SweepResults {
    fn new(results: Vec<BacktestResult>, min_trades: usize, weights: ScoreWeights) -> Self {
        Self {
            results,
            min_trades,
            weights,
        }
    }

    pub fn all(&self) -> &[BacktestResult] {
        &self.results
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn get(&self, run_id: &str) -> Option<&BacktestResult> {
        self.results.iter().find(|r| r.run_id == run_id)
    }

    /// Composite score of one result under this sweep's weights.
    pub fn score(&self, result: &BacktestResult) -> f64 {
        self.weights.score(&result.summary)
    }

    /// Eligible results sorted descending by the composite score.
    pub fn ranked(&self) -> Vec<&BacktestResult> {
        self.ranked_by(RankingMetric::Composite)
    }

    /// Eligible results sorted descending by the chosen metric, with its
    /// tie-breakers.
    pub fn ranked_by(&self, metric: RankingMetric) -> Vec<&BacktestResult> {
        let mut eligible: Vec<&BacktestResult> = self
            .results
            .iter()
            .filter(|r| r.summary.total_trades >= self.min_trades)
            .collect();
        eligible.sort_by(|a, b| {
            cmp_key_desc(
                metric.key(&a.summary, &self.weights),
                metric.key(&b.summary, &self.weights),
            )
        });
        eligible
    }

    pub fn top_n(&self, n: usize) -> Vec<&BacktestResult> {
        self.ranked().into_iter().take(n).collect()
    }

    pub fn best(&self) -> Option<&BacktestResult> {
        self.ranked().into_iter().next()
    }
}

fn cmp_key_desc(a: (f64, f64, f64), b: (f64, f64, f64)) -> Ordering {
    b.0.partial_cmp(&a.0)
        .unwrap_or(Ordering::Equal)
        .then(b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal))
        .then(b.2.partial_cmp(&a.2).unwrap_or(Ordering::Equal))
}
