//! Criterion benchmarks for the recompute path.
//!
//! Benchmarks:
//! 1. Filter alone over datasets of increasing size
//! 2. Backtest over the default stop sizes
//! 3. Full query (filter + backtest + stats), as run on every input change

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fadefinder_core::backtest::{compute_backtest, BacktestParams};
use fadefinder_core::filter::{filter, FilterCriteria};
use fadefinder_core::{run_query, synthetic, Dataset, QueryParams};

const SIZES: [usize; 3] = [1_000, 10_000, 50_000];

fn bench_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter");
    let criteria = FilterCriteria::default();
    for n in SIZES {
        let events = synthetic::generate(n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| filter(black_box(events), black_box(&criteria)))
        });
    }
    group.finish();
}

fn bench_backtest(c: &mut Criterion) {
    let mut group = c.benchmark_group("backtest");
    let params = BacktestParams::default();
    for n in SIZES {
        let events = synthetic::generate(n, 42);
        group.bench_with_input(BenchmarkId::from_parameter(n), &events, |b, events| {
            b.iter(|| compute_backtest(black_box(events), black_box(&params)))
        });
    }
    group.finish();
}

fn bench_query(c: &mut Criterion) {
    let dataset = Dataset::new(synthetic::generate(50_000, 42)).expect("synthetic rows are valid");
    let params = QueryParams::default();
    c.bench_function("query_50k", |b| {
        b.iter(|| run_query(black_box(&dataset), black_box(&params)))
    });
}

criterion_group!(benches, bench_filter, bench_backtest, bench_query);
criterion_main!(benches);
