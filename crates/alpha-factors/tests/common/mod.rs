use alpha_factors::Bar;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded geometric random walk with consistent OHLC ranges.
pub fn random_walk(symbol: &str, count: usize, seed: u64) -> Vec<Bar> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut close: f64 = 100.0;
    (0..count)
        .map(|i| {
            let open = close * (1.0 + rng.gen_range(-0.005..0.005));
            close = open * (1.0 + rng.gen_range(-0.02..0.02));
            let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
            let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
            let volume = rng.gen_range(5_000.0..50_000.0);
            Bar::new(symbol, 1_600_000_000 + 60 * i as i64, open, high, low, close, volume)
                .with_turnover(volume * (high + low + close) / 3.0)
        })
        .collect()
}
