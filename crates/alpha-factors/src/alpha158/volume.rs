//! Lagged volume relative to the latest volume.

use crate::BaseSeries;
use crate::ops::EPS;

/// `volume[t - lag] / (volume[t] + ε)`, or NaN when `lag` reaches past the history.
pub(super) fn compute(data: &BaseSeries, lag: usize) -> f64 {
    let volume = &data.volume;
    match (
        volume.latest(),
        volume.len().checked_sub(lag + 1).and_then(|i| volume.get(i)),
    ) {
        (Some(now), Some(&then)) => then / (now + EPS),
        _ => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Bar;
    use approx::assert_relative_eq;

    #[test]
    fn test_volume_ratio() {
        let bars = vec![
            Bar::new("X", 1, 1.0, 1.0, 1.0, 1.0, 50.0),
            Bar::new("X", 2, 1.0, 1.0, 1.0, 1.0, 100.0),
        ];
        let data = BaseSeries::from_bars(&bars);
        assert_relative_eq!(compute(&data, 0), 1.0, epsilon = 1e-9);
        assert_relative_eq!(compute(&data, 1), 0.5, epsilon = 1e-9);
        assert!(compute(&data, 5).is_nan());
    }
}
