//! Look-ahead contamination tests.
//!
//! Invariant: no indicator, detector, or filter value at bar t may
//! depend on price data from bar t+1 or later. The false-breakout
//! confirmation filter is the single, deliberate exception; everything
//! else must produce identical verdicts whether the future exists or not.

use boxbreak_core::detector::ConsolidationDetector;
use boxbreak_core::domain::{Bar, Side};
use boxbreak_core::filters::{
    FilterContext, MtfFilter, QualityFilter, RsiFilter, SignalFilter, StrengthFilter,
    TimeOfDayFilter, TrendFilter, VolumeFilter,
};
use boxbreak_core::indicators::{atr, rsi, sma};
use chrono::NaiveDate;

/// Generate N bars of synthetic OHLCV data with deterministic variation.
fn make_test_bars(n: usize) -> Vec<Bar> {
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut bars = Vec::with_capacity(n);
    let mut price = 100.0_f64;

    for i in 0..n {
        // Deterministic pseudo-random walk using a simple LCG
        let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
        let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
        price += change;
        price = price.max(10.0);

        let open = price - 0.5;
        let close = price + 0.3;
        let high = open.max(close) + 2.0;
        let low = open.min(close) - 2.0;

        bars.push(Bar {
            time: base + chrono::Duration::minutes(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0 + (seed % 900) as f64,
        });
    }

    bars
}

#[test]
fn indicators_ignore_the_future() {
    let full = make_test_bars(200);
    let truncated = &full[..100];

    for index in 0..=100 {
        assert_eq!(sma(&full, 20, index), sma(truncated, 20, index));
        assert_eq!(atr(&full, 14, index), atr(truncated, 14, index));
        assert_eq!(rsi(&full, 14, index), rsi(truncated, 14, index));
    }
}

#[test]
fn detector_ignores_the_future() {
    let full = make_test_bars(200);
    let truncated = &full[..100];
    let detector = ConsolidationDetector::new(20, 0.05);

    for index in 0..=100 {
        assert_eq!(detector.detect(&full, index), detector.detect(truncated, index));
    }
}

#[test]
fn backward_filters_ignore_the_future() {
    let original = make_test_bars(120);

    // Same history, wildly different future after the signal bar.
    let mut mutated = original.clone();
    for bar in mutated.iter_mut().skip(61) {
        bar.open *= 3.0;
        bar.high *= 3.0;
        bar.low *= 3.0;
        bar.close *= 3.0;
        bar.volume *= 7.0;
    }

    let boxed = ConsolidationDetector::new(20, 1.0)
        .detect(&original, 60)
        .unwrap();

    let filters: Vec<Box<dyn SignalFilter>> = vec![
        Box::new(VolumeFilter::new(1.1)),
        Box::new(TrendFilter::new(50)),
        Box::new(StrengthFilter::new(0.15)),
        Box::new(RsiFilter::new(14, 70.0, 30.0)),
        Box::new(QualityFilter::new(20, 1)),
        Box::new(TimeOfDayFilter::new(0, 23)),
        Box::new(MtfFilter::new(50)),
    ];

    for side in [Side::Buy, Side::Sell] {
        for filter in &filters {
            let verdict_original = filter.evaluate(&FilterContext {
                bars: &original,
                index: 60,
                side,
                boxed: &boxed,
            });
            let verdict_mutated = filter.evaluate(&FilterContext {
                bars: &mutated,
                index: 60,
                side,
                boxed: &boxed,
            });
            assert_eq!(
                verdict_original,
                verdict_mutated,
                "{} leaked future data into its verdict",
                filter.name()
            );
        }
    }
}

#[test]
fn confirmation_filter_reads_a_bounded_future_window() {
    use boxbreak_core::filters::ConfirmationFilter;

    let original = make_test_bars(120);

    // Changing bars beyond the confirmation window must not matter.
    let mut beyond_window = original.clone();
    for bar in beyond_window.iter_mut().skip(64) {
        bar.close *= 3.0;
        bar.high *= 3.0;
        bar.open = bar.close;
        bar.low = bar.close - 1.0;
    }

    let boxed = ConsolidationDetector::new(20, 1.0)
        .detect(&original, 60)
        .unwrap();
    let filter = ConfirmationFilter::new(3);

    for side in [Side::Buy, Side::Sell] {
        let a = filter.evaluate(&FilterContext {
            bars: &original,
            index: 60,
            side,
            boxed: &boxed,
        });
        let b = filter.evaluate(&FilterContext {
            bars: &beyond_window,
            index: 60,
            side,
            boxed: &boxed,
        });
        assert_eq!(a, b, "confirmation read past its bounded window");
    }
}
