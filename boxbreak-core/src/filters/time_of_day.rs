//! Time-of-day gating — trade only inside the configured session.

use chrono::Timelike;

use super::{FilterContext, SignalFilter};

/// Passes when the signal bar's hour falls within `[start_hour,
/// end_hour]`, inclusive. When `start_hour > end_hour` the session wraps
/// midnight (e.g. 22..=4 covers 22,23,0,1,2,3,4).
#[derive(Debug, Clone)]
pub struct TimeOfDayFilter {
    start_hour: u32,
    end_hour: u32,
}

impl TimeOfDayFilter {
    pub fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
        }
    }
}

impl SignalFilter for TimeOfDayFilter {
    fn name(&self) -> &'static str {
        "time"
    }

    fn evaluate(&self, ctx: &FilterContext<'_>) -> bool {
        let hour = ctx.bars[ctx.index].time.hour();
        if self.start_hour > self.end_hour {
            hour >= self.start_hour || hour <= self.end_hour
        } else {
            hour >= self.start_hour && hour <= self.end_hour
        }
    }
}
