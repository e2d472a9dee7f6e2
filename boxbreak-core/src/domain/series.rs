//! BarSeries — validated, ordered, immutable price history.
//!
//! All malformed-input checks happen here, once, at construction. The
//! replay loop and every indicator assume a clean series and never
//! re-validate or skip bars.

use thiserror::Error;

use super::bar::Bar;

/// Input validation failure. Raised before any simulation starts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("bar series is empty")]
    Empty,
    #[error("bar {index}: timestamp does not increase over previous bar")]
    NonMonotonicTime { index: usize },
    #[error("bar {index}: NaN in OHLC fields")]
    NanPrice { index: usize },
    #[error("bar {index}: inconsistent OHLCV (high/low do not bracket open/close, or bad volume)")]
    MalformedBar { index: usize },
}

/// An ordered sequence of OHLCV bars with strictly increasing timestamps.
///
/// Irregular intervals and gaps are fine; only ordering and field sanity
/// are enforced. Once constructed the series is read-only.
#[derive(Debug, Clone)]
pub struct BarSeries {
    bars: Vec<Bar>,
}

impl BarSeries {
    /// Validate and wrap a bar vector.
    pub fn new(bars: Vec<Bar>) -> Result<Self, InputError> {
        if bars.is_empty() {
            return Err(InputError::Empty);
        }
        for (index, bar) in bars.iter().enumerate() {
            if bar.is_void() {
                return Err(InputError::NanPrice { index });
            }
            if !bar.is_sane() {
                return Err(InputError::MalformedBar { index });
            }
            if index > 0 && bar.time <= bars[index - 1].time {
                return Err(InputError::NonMonotonicTime { index });
            }
        }
        Ok(Self { bars })
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

impl std::ops::Index<usize> for BarSeries {
    type Output = Bar;

    fn index(&self, index: usize) -> &Bar {
        &self.bars[index]
    }
}
