//! Serializable sweep configuration, loadable from TOML.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use boxbreak_core::config::{ConfigError, ParameterSet};

use crate::score::ScoreWeights;
use crate::sweep::{ParamGrid, DEFAULT_MIN_TRADES};

/// Errors from loading a sweep configuration.
#[derive(Debug, Error)]
pub enum SweepConfigError {
    #[error("toml parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
}

/// Options controlling sweep execution and reporting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepOptions {
    /// Runs with fewer closed trades are excluded from ranking.
    pub min_trades: usize,
    /// How many ranked results to report.
    pub top_n: usize,
    pub parallel: bool,
    /// When set, draw this many random combinations instead of
    /// exhausting the grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub samples: Option<usize>,
    /// Seed for randomized search.
    pub seed: u64,
    pub weights: ScoreWeights,
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self {
            min_trades: DEFAULT_MIN_TRADES,
            top_n: 5,
            parallel: true,
            samples: None,
            seed: 7,
            weights: ScoreWeights::default(),
        }
    }
}

/// A full sweep description: the base parameter set, the grid of
/// candidate values, and execution options. Every section is optional
/// in the TOML source; omitted fields take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepConfig {
    pub base: ParameterSet,
    pub grid: ParamGrid,
    pub options: SweepOptions,
}

impl SweepConfig {
    /// Parse from TOML and validate the base parameter set. Grid
    /// combinations are validated individually at enumeration time.
    pub fn from_toml(source: &str) -> Result<Self, SweepConfigError> {
        let config: Self = toml::from_str(source)?;
        config.base.validate()?;
        Ok(config)
    }
}
