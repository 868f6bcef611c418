//! Rolling population statistics and weighted averages.

use super::{EPS, mean, rolling, rolling_pair};
use crate::Series;

/// Trailing population standard deviation (divides by `w`).
pub fn stddev(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| {
        let m = mean(win);
        (win.iter().map(|v| (v - m).powi(2)).sum::<f64>() / win.len() as f64).sqrt()
    })
}

/// Trailing population covariance of two series.
pub fn covariance(x: &[f64], y: &[f64], w: usize) -> Series {
    rolling_pair(x, y, w, |a, b| {
        let (ma, mb) = (mean(a), mean(b));
        a.iter().zip(b).map(|(p, q)| (p - ma) * (q - mb)).sum::<f64>() / a.len() as f64
    })
}

/// Trailing Pearson correlation; 0 when either window is flat.
pub fn correlation(x: &[f64], y: &[f64], w: usize) -> Series {
    rolling_pair(x, y, w, |a, b| {
        let (ma, mb) = (mean(a), mean(b));
        let (mut sab, mut saa, mut sbb) = (0.0, 0.0, 0.0);
        for (p, q) in a.iter().zip(b) {
            let (da, db) = (p - ma, q - mb);
            sab += da * db;
            saa += da * da;
            sbb += db * db;
        }
        let n = a.len() as f64;
        let den = (saa / n).sqrt() * (sbb / n).sqrt();
        if den < EPS { 0.0 } else { (sab / n) / den }
    })
}

/// Linearly decaying weighted average: weights `1..=d`, the latest sample weighs `d`.
pub fn decay_linear(x: &[f64], d: usize) -> Series {
    let norm = (d * (d + 1)) as f64 / 2.0;
    rolling(x, d, |win| {
        win.iter().enumerate().map(|(i, v)| v * (i + 1) as f64).sum::<f64>() / norm
    })
}

/// Linearly interpolated `q`-quantile of each trailing window.
pub fn ts_quantile(x: &[f64], w: usize, q: f64) -> Series {
    let q = q.clamp(0.0, 1.0);
    rolling(x, w, |win| {
        let mut sorted = win.to_vec();
        sorted.sort_by(f64::total_cmp);
        let pos = q * (sorted.len() - 1) as f64;
        let (lo, hi) = (pos.floor() as usize, pos.ceil() as usize);
        sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
    })
}
