//! Benchmarks for indicator implementations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use scalper_core::traits::{Indicator, OhlcIndicator};
use scalper_core::Bar;
use scalper_indicators::{Adx, IndicatorEngine, Rsi};

fn generate_bars(size: usize) -> Vec<Bar> {
    (0..size)
        .map(|i| {
            let close = 2300.0 + (i as f64 * 0.1).sin() * 10.0;
            Bar::new(i as i64 * 60_000, close, close + 0.8, close - 0.8, close, 50.0)
        })
        .collect()
}

fn benchmark_rsi(c: &mut Criterion) {
    let mut group = c.benchmark_group("RSI");

    for size in [1000, 10000].iter() {
        let close: Vec<f64> = generate_bars(*size).iter().map(|b| b.close).collect();

        group.bench_with_input(BenchmarkId::new("wilder", size), &close, |b, data| {
            let rsi = Rsi::new(14);
            b.iter(|| rsi.calculate(black_box(data)))
        });
    }

    group.finish();
}

fn benchmark_adx(c: &mut Criterion) {
    let mut group = c.benchmark_group("ADX");

    for size in [1000, 10000].iter() {
        let bars = generate_bars(*size);
        let high: Vec<f64> = bars.iter().map(|b| b.high).collect();
        let low: Vec<f64> = bars.iter().map(|b| b.low).collect();
        let close: Vec<f64> = bars.iter().map(|b| b.close).collect();

        group.bench_function(BenchmarkId::new("wilder", size), |b| {
            let adx = Adx::new(14);
            b.iter(|| adx.calculate_ohlc(black_box(&high), black_box(&low), black_box(&close)))
        });
    }

    group.finish();
}

fn benchmark_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("IndicatorEngine");
    let engine = IndicatorEngine::default();

    // 1000 is the live history size; 100000 approximates a sweep over a year of M1.
    for size in [1000, 100000].iter() {
        let bars = generate_bars(*size);

        group.bench_with_input(BenchmarkId::new("compute", size), &bars, |b, bars| {
            b.iter(|| engine.compute(black_box(bars)))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_rsi, benchmark_adx, benchmark_engine);
criterion_main!(benches);
