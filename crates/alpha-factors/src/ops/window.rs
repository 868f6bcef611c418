//! Trailing-window aggregations.
//!
//! Each operator maps a series of length `n` to one of length `n - w + 1`
//! whose sample `i` summarizes input samples `i ..= i + w - 1`.

use super::{mean, rolling};
use crate::Series;

/// Trailing sum.
pub fn ts_sum(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| win.iter().sum())
}

/// Trailing arithmetic mean.
pub fn ts_mean(x: &[f64], w: usize) -> Series {
    rolling(x, w, mean)
}

/// Simple moving average, an alias of [`ts_mean`].
pub fn sma(x: &[f64], w: usize) -> Series {
    ts_mean(x, w)
}

/// Trailing minimum.
pub fn ts_min(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| win.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Trailing maximum.
pub fn ts_max(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| win.iter().copied().fold(f64::NEG_INFINITY, f64::max))
}

/// Offset of the window maximum, 0 = oldest sample; first occurrence wins ties.
pub fn ts_argmax(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| arg_extreme(win, |candidate, best| candidate > best))
}

/// Offset of the window minimum, 0 = oldest sample; first occurrence wins ties.
pub fn ts_argmin(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| arg_extreme(win, |candidate, best| candidate < best))
}

fn arg_extreme(win: &[f64], better: impl Fn(f64, f64) -> bool) -> f64 {
    let mut best = 0;
    for (i, &v) in win.iter().enumerate().skip(1) {
        if better(v, win[best]) || win[best].is_nan() {
            best = i;
        }
    }
    best as f64
}

/// Time-series rank of the latest sample in each window.
///
/// Counts window values strictly below the window's last value and divides by
/// `w - 1`; ties do not count as below. A one-sample window ranks 0.5.
pub fn ts_rank(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| {
        if win.len() == 1 {
            return 0.5;
        }
        let last = win[win.len() - 1];
        let below = win.iter().filter(|&&v| v < last).count();
        below as f64 / (win.len() - 1) as f64
    })
}

/// Trailing product.
pub fn product(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| win.iter().product())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_ts_sum() {
        assert_eq!(ts_sum(&[1.0, 2.0, 3.0, 4.0, 5.0], 3), vec![6.0, 9.0, 12.0]);
    }

    #[test]
    fn test_ts_min_max_mean() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(ts_min(&x, 2), vec![1.0, 1.0, 1.0, 1.0]);
        assert_eq!(ts_max(&x, 3), vec![4.0, 4.0, 5.0]);
        assert_eq!(sma(&x, 5), vec![2.8]);
    }

    #[test]
    fn test_argmax_argmin_offsets() {
        let x = [3.0, 1.0, 4.0, 1.0, 5.0];
        assert_eq!(ts_argmax(&x, 3), vec![2.0, 1.0, 2.0]);
        // first occurrence of the tied minimum
        assert_eq!(ts_argmin(&x, 4), vec![1.0, 0.0]);
    }

    #[test]
    fn test_ts_rank_ignores_ties() {
        assert_eq!(ts_rank(&[1.0, 2.0, 3.0], 3), vec![1.0]);
        assert_eq!(ts_rank(&[3.0, 2.0, 1.0], 3), vec![0.0]);
        assert_eq!(ts_rank(&[2.0, 1.0, 2.0], 3), vec![0.5]);
    }

    #[test]
    fn test_product() {
        assert_eq!(product(&[1.0, 2.0, 3.0, 4.0], 2), vec![2.0, 6.0, 12.0]);
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn test_invalid_window_is_empty(#[case] w: usize) {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(ts_sum(&x, w).is_empty());
        assert!(ts_rank(&x, w).is_empty());
        assert!(ts_argmax(&x, w).is_empty());
    }
}
