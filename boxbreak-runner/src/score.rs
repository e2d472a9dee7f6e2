//! Scoring and ranking — how sweep results are ordered.

use serde::{Deserialize, Serialize};

use crate::metrics::BacktestSummary;

/// Weights of the composite score:
/// `win_rate * w1 + profit_factor * w2 + return_pct * w3`.
///
/// The defaults balance hit rate against payoff and realized return. A
/// run with zero gross loss scores infinite and ranks first; gate such
/// runs out with a higher minimum trade count if that is unwanted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    pub win_rate: f64,
    pub profit_factor: f64,
    pub return_pct: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            win_rate: 0.4,
            profit_factor: 15.0,
            return_pct: 0.3,
        }
    }
}

impl ScoreWeights {
    pub fn score(&self, summary: &BacktestSummary) -> f64 {
        summary.win_rate * self.win_rate
            + summary.profit_factor * self.profit_factor
            + summary.return_pct * self.return_pct
    }
}

/// Which ordering to rank sweep results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RankingMetric {
    /// Weighted composite of win rate, profit factor, and return.
    #[default]
    Composite,
    WinRate,
    ProfitFactor,
    ReturnPct,
}

impl RankingMetric {
    /// Sort key with tie-breakers, descending on each component.
    pub fn key(&self, summary: &BacktestSummary, weights: &ScoreWeights) -> (f64, f64, f64) {
        match self {
            Self::Composite => (
                weights.score(summary),
                summary.win_rate,
                summary.profit_factor,
            ),
            Self::WinRate => (
                summary.win_rate,
                summary.profit_factor,
                summary.return_pct,
            ),
            Self::ProfitFactor => (
                summary.profit_factor,
                summary.win_rate,
                summary.return_pct,
            ),
            Self::ReturnPct => (
                summary.return_pct,
                summary.win_rate,
                summary.profit_factor,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(win_rate: f64, profit_factor: f64, return_pct: f64) -> BacktestSummary {
        BacktestSummary {
            total_trades: 25,
            winning_trades: 0,
            losing_trades: 0,
            win_rate,
            gross_profit: 0.0,
            gross_loss: 0.0,
            net_profit: 0.0,
            return_pct,
            max_drawdown: 0.0,
            max_drawdown_pct: 0.0,
            avg_win: 0.0,
            avg_loss: 0.0,
            largest_win: 0.0,
            largest_loss: 0.0,
            profit_factor,
            initial_balance: 10_000.0,
            final_balance: 10_000.0,
        }
    }

    #[test]
    fn composite_score_weights() {
        let weights = ScoreWeights::default();
        let s = summary(50.0, 2.0, 10.0);
        // 50*0.4 + 2*15 + 10*0.3 = 20 + 30 + 3
        assert!((weights.score(&s) - 53.0).abs() < 1e-10);
    }

    #[test]
    fn infinite_profit_factor_scores_infinite() {
        let weights = ScoreWeights::default();
        let s = summary(100.0, f64::INFINITY, 5.0);
        assert!(weights.score(&s).is_infinite());
    }

    #[test]
    fn win_rate_key_breaks_ties_on_profit_factor() {
        let weights = ScoreWeights::default();
        let a = RankingMetric::WinRate.key(&summary(50.0, 2.0, 10.0), &weights);
        let b = RankingMetric::WinRate.key(&summary(50.0, 3.0, 5.0), &weights);
        assert_eq!(a.0, b.0);
        assert!(b.1 > a.1);
    }

    #[test]
    fn default_is_composite() {
        assert_eq!(RankingMetric::default(), RankingMetric::Composite);
    }
}
