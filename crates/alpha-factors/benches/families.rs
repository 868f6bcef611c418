//! Per-family computation cost over growing histories.
//!
//! Run with: cargo bench -p alpha-factors

use alpha_factors::{
    Alpha101Calculator, Alpha158Calculator, Alpha360Calculator, AlphaCalculator, Bar,
};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn bars(count: usize) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(42);
    let mut close: f64 = 100.0;
    (0..count)
        .map(|i| {
            let open = close;
            close = open * (1.0 + rng.gen_range(-0.02..0.02));
            let high = open.max(close) * 1.004;
            let low = open.min(close) * 0.996;
            Bar::new("BENCH", i as i64 * 60, open, high, low, close, rng.gen_range(1e4..1e5))
        })
        .collect()
}

fn benchmark_families(c: &mut Criterion) {
    let calculators: Vec<(&str, Box<dyn AlphaCalculator>)> = vec![
        ("alpha101", Box::new(Alpha101Calculator::new())),
        ("alpha158", Box::new(Alpha158Calculator::new())),
        ("alpha360", Box::new(Alpha360Calculator::new())),
    ];
    let mut group = c.benchmark_group("families");

    for count in [250, 1_000] {
        let history = bars(count);
        for (name, calc) in &calculators {
            group.bench_with_input(BenchmarkId::new(*name, count), &history, |b, history| {
                b.iter(|| calc.compute(black_box(history)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_families);
criterion_main!(benches);
