//! Criterion benchmarks for the hot paths.
//!
//! Benchmarks:
//! 1. Indicator batch (MA, RSI, MACD, bollinger, ADX) over a year of bars
//! 2. Pattern scan (crosses, divergence, trend, chart shapes)
//! 3. Full backtest replay per strategy

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use signallab_core::backtest::{BacktestRequest, BacktestSimulator, Strategy};
use signallab_core::config::EngineSettings;
use signallab_core::data::{MemoryCache, StaticHistory};
use signallab_core::domain::Bar;
use signallab_core::engine::IndicatorEngine;
use signallab_core::indicators;
use signallab_core::patterns;

// ── Helpers ──────────────────────────────────────────────────────────

fn make_bars(n: usize) -> Vec<Bar> {
    let base_date = chrono::NaiveDate::from_ymd_opt(2020, 1, 2).unwrap();
    let mut rng = StdRng::seed_from_u64(7);
    let mut close = 100.0_f64;
    (0..n)
        .map(|i| {
            let open = close;
            close *= 1.0 + rng.gen_range(-0.02..0.02);
            Bar {
                date: base_date + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) * (1.0 + rng.gen_range(0.0..0.01)),
                low: open.min(close) * (1.0 - rng.gen_range(0.0..0.01)),
                close,
                volume: 1_000_000 + (i as u64 % 500_000),
            }
        })
        .collect()
}

fn engine_for(bars: Vec<Bar>) -> IndicatorEngine {
    IndicatorEngine::new(
        Arc::new(StaticHistory::new().with_symbol("BENCH", bars)),
        Arc::new(MemoryCache::new()),
        EngineSettings::default(),
    )
}

// ── 1. Indicator batch ───────────────────────────────────────────────

fn bench_indicators(c: &mut Criterion) {
    let mut group = c.benchmark_group("indicators");
    for n in [252, 1260] {
        let bars = make_bars(n);
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();

        group.bench_with_input(BenchmarkId::new("rolling_mean_200", n), &closes, |b, c| {
            b.iter(|| indicators::rolling_mean(black_box(c), 200))
        });
        group.bench_with_input(BenchmarkId::new("rsi_14", n), &closes, |b, c| {
            b.iter(|| indicators::rsi(black_box(c), 14))
        });
        group.bench_with_input(BenchmarkId::new("macd", n), &closes, |b, c| {
            b.iter(|| indicators::macd(black_box(c), 12, 26, 9))
        });
        group.bench_with_input(BenchmarkId::new("bollinger", n), &closes, |b, c| {
            b.iter(|| indicators::bollinger(black_box(c), 20, 2.0))
        });
        group.bench_with_input(BenchmarkId::new("adx_14", n), &bars, |b, bars| {
            b.iter(|| indicators::adx(black_box(bars), 14))
        });
    }
    group.finish();
}

// ── 2. Pattern scan ──────────────────────────────────────────────────

fn bench_patterns(c: &mut Criterion) {
    let bars = make_bars(504);
    let mut group = c.benchmark_group("patterns");
    group.bench_function("crosses_extended", |b| {
        b.iter(|| patterns::detect_crosses_extended(black_box(&bars)))
    });
    group.bench_function("divergence_60", |b| {
        b.iter(|| patterns::detect_divergence(black_box(&bars), 60))
    });
    group.bench_function("trend", |b| {
        b.iter(|| patterns::analyze_trend(black_box(&bars)))
    });
    group.bench_function("chart_shapes", |b| {
        b.iter(|| patterns::detect_chart_patterns(black_box(&bars)))
    });
    group.finish();
}

// ── 3. Backtest replay ───────────────────────────────────────────────

fn bench_backtest(c: &mut Criterion) {
    let sim = BacktestSimulator::new(engine_for(make_bars(1260)));
    let mut group = c.benchmark_group("backtest");
    for strategy in [Strategy::BuyAndHold, Strategy::Signal, Strategy::MaCross] {
        group.bench_function(strategy.as_str(), |b| {
            let request = BacktestRequest::new("BENCH", strategy);
            b.iter(|| sim.run(black_box(&request)).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_indicators, bench_patterns, bench_backtest);
criterion_main!(benches);
