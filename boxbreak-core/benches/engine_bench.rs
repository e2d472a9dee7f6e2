//! Replay loop benchmark on a synthetic random walk.

use boxbreak_core::config::ParameterSet;
use boxbreak_core::domain::{Bar, BarSeries};
use boxbreak_core::engine::run;
use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_series(n: usize, seed: u64) -> BarSeries {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut close = 15_000.0_f64;
    let bars: Vec<Bar> = (0..n)
        .map(|i| {
            let open = close;
            close = (close + rng.gen_range(-12.0..12.0)).max(1_000.0);
            let high = open.max(close) + rng.gen_range(0.0..5.0);
            let low = open.min(close) - rng.gen_range(0.0..5.0);
            Bar {
                time: base + chrono::Duration::minutes(i as i64),
                open,
                high,
                low,
                close,
                volume: rng.gen_range(500.0..5_000.0),
            }
        })
        .collect();
    BarSeries::new(bars).expect("synthetic series is valid")
}

fn bench_replay(c: &mut Criterion) {
    let series = make_series(10_000, 42);
    let full = ParameterSet {
        breakout_threshold: 0.005,
        ..ParameterSet::default()
    };
    let bare = ParameterSet {
        breakout_threshold: 0.005,
        ..ParameterSet::unfiltered()
    };

    c.bench_function("replay_10k_bars_all_filters", |b| {
        b.iter(|| run(black_box(&series), black_box(&full)))
    });
    c.bench_function("replay_10k_bars_unfiltered", |b| {
        b.iter(|| run(black_box(&series), black_box(&bare)))
    });
}

criterion_group!(benches, bench_replay);
criterion_main!(benches);
