//! ParameterSet — the immutable configuration bundle for one engine run.
//!
//! Every tunable of the engine lives here: account settings, the
//! consolidation detector, the stop calculator, and one enable flag plus
//! thresholds per filter. Validation happens once, up front; a validated
//! set fully determines a run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How stop distance is derived at entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StopMode {
    /// `stop_distance = box_range * sl_multiplier`.
    BoxRange,
    /// `stop_distance = ATR(atr_period) * atr_multiplier`, falling back
    /// to box-range stops when ATR cannot be computed.
    #[default]
    Atr,
}

/// Which exit level wins when a single bar's range touches both the
/// take-profit and the stop.
///
/// OHLC data does not reveal the intrabar path, so this is a policy, not
/// a fact. `TpFirst` is the optimistic reading; `SlFirst` the
/// conservative one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IntrabarPolicy {
    #[default]
    TpFirst,
    SlFirst,
}

/// Configuration validation failure, raised before a run starts.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be positive and finite, got {value}")]
    NonPositive { field: &'static str, value: f64 },
    #[error("{field} must be non-negative and finite, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("{field} must be at least {min}")]
    PeriodTooShort { field: &'static str, min: usize },
    #[error("rsi bounds must satisfy 0 <= oversold < overbought <= 100, got {oversold}..{overbought}")]
    RsiBounds { oversold: f64, overbought: f64 },
    #[error("{field} must be an hour in 0..=23, got {value}")]
    HourOutOfRange { field: &'static str, value: u32 },
}

/// All parameters of a single backtest run.
///
/// Defaults mirror the strategy's reference settings. Deserializes from
/// partial TOML/JSON: omitted fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParameterSet {
    // ── Account ──
    pub initial_balance: f64,
    pub lot_size: f64,
    pub risk_reward_ratio: f64,
    pub max_daily_trades: u32,

    // ── Consolidation detection ──
    pub consolidation_periods: usize,
    pub breakout_threshold: f64,

    // ── Stop/target calculation ──
    pub stop_mode: StopMode,
    pub sl_multiplier: f64,
    pub atr_period: usize,
    pub atr_multiplier: f64,
    pub intrabar_policy: IntrabarPolicy,

    // ── Filters ──
    pub use_volume_filter: bool,
    pub volume_multiplier: f64,

    pub use_trend_filter: bool,
    pub trend_period: usize,

    pub use_breakout_strength: bool,
    pub min_breakout_strength: f64,

    pub use_rsi_filter: bool,
    pub rsi_period: usize,
    pub rsi_overbought: f64,
    pub rsi_oversold: f64,

    pub use_consolidation_quality: bool,
    pub min_touches: usize,

    pub use_time_filter: bool,
    pub trading_start_hour: u32,
    pub trading_end_hour: u32,

    pub use_false_breakout_filter: bool,
    pub confirmation_bars: usize,

    pub use_mtf_confirmation: bool,
    pub higher_tf_period: usize,

    // ── Trailing stop ──
    pub use_trailing_stop: bool,
    /// Trailing distance as a percentage of the entry price.
    pub trailing_stop_pct: f64,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            initial_balance: 10_000.0,
            lot_size: 0.01,
            risk_reward_ratio: 2.0,
            max_daily_trades: 5,
            consolidation_periods: 20,
            breakout_threshold: 0.0015,
            stop_mode: StopMode::Atr,
            sl_multiplier: 1.2,
            atr_period: 14,
            atr_multiplier: 2.0,
            intrabar_policy: IntrabarPolicy::TpFirst,
            use_volume_filter: true,
            volume_multiplier: 1.1,
            use_trend_filter: true,
            trend_period: 50,
            use_breakout_strength: true,
            min_breakout_strength: 0.15,
            use_rsi_filter: true,
            rsi_period: 14,
            rsi_overbought: 70.0,
            rsi_oversold: 30.0,
            use_consolidation_quality: true,
            min_touches: 3,
            use_time_filter: true,
            trading_start_hour: 2,
            trading_end_hour: 20,
            use_false_breakout_filter: true,
            confirmation_bars: 1,
            use_mtf_confirmation: true,
            higher_tf_period: 200,
            use_trailing_stop: false,
            trailing_stop_pct: 0.5,
        }
    }
}

impl ParameterSet {
    /// The unfiltered baseline: every filter off, box-range stops, no
    /// trailing. The raw breakout rule is the only entry condition.
    pub fn unfiltered() -> Self {
        Self {
            stop_mode: StopMode::BoxRange,
            use_volume_filter: false,
            use_trend_filter: false,
            use_breakout_strength: false,
            use_rsi_filter: false,
            use_consolidation_quality: false,
            use_time_filter: false,
            use_false_breakout_filter: false,
            use_mtf_confirmation: false,
            use_trailing_stop: false,
            ..Self::default()
        }
    }

    /// Check every field for range errors, independent of which filters
    /// are enabled. A set that validates once stays valid for the run.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("initial_balance", self.initial_balance),
            ("lot_size", self.lot_size),
            ("risk_reward_ratio", self.risk_reward_ratio),
            ("breakout_threshold", self.breakout_threshold),
            ("sl_multiplier", self.sl_multiplier),
            ("atr_multiplier", self.atr_multiplier),
            ("volume_multiplier", self.volume_multiplier),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        if !self.min_breakout_strength.is_finite() || self.min_breakout_strength < 0.0 {
            return Err(ConfigError::Negative {
                field: "min_breakout_strength",
                value: self.min_breakout_strength,
            });
        }
        if self.use_trailing_stop
            && (!self.trailing_stop_pct.is_finite() || self.trailing_stop_pct <= 0.0)
        {
            return Err(ConfigError::NonPositive {
                field: "trailing_stop_pct",
                value: self.trailing_stop_pct,
            });
        }

        if self.consolidation_periods < 2 {
            return Err(ConfigError::PeriodTooShort {
                field: "consolidation_periods",
                min: 2,
            });
        }
        if self.rsi_period < 2 {
            return Err(ConfigError::PeriodTooShort {
                field: "rsi_period",
                min: 2,
            });
        }
        let at_least_one = [
            ("max_daily_trades", self.max_daily_trades as usize),
            ("trend_period", self.trend_period),
            ("atr_period", self.atr_period),
            ("min_touches", self.min_touches),
            ("confirmation_bars", self.confirmation_bars),
            ("higher_tf_period", self.higher_tf_period),
        ];
        for (field, value) in at_least_one {
            if value < 1 {
                return Err(ConfigError::PeriodTooShort { field, min: 1 });
            }
        }

        if !(0.0..=100.0).contains(&self.rsi_oversold)
            || !(0.0..=100.0).contains(&self.rsi_overbought)
            || self.rsi_oversold >= self.rsi_overbought
        {
            return Err(ConfigError::RsiBounds {
                oversold: self.rsi_oversold,
                overbought: self.rsi_overbought,
            });
        }

        if self.trading_start_hour > 23 {
            return Err(ConfigError::HourOutOfRange {
                field: "trading_start_hour",
                value: self.trading_start_hour,
            });
        }
        if self.trading_end_hour > 23 {
            return Err(ConfigError::HourOutOfRange {
                field: "trading_end_hour",
                value: self.trading_end_hour,
            });
        }

        Ok(())
    }

    /// Deterministic content-addressed identifier for this configuration.
    ///
    /// Two runs with identical parameters share a run id, which makes
    /// sweep results deduplicable and reports reproducible.
    pub fn run_id(&self) -> String {
        let json = serde_json::to_string(self).expect("ParameterSet serialization failed");
        blake3::hash(json.as_bytes()).to_hex().to_string()
    }
}
