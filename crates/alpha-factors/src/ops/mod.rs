//! Operator library - pure numeric primitives over ordered series.
//!
//! Every operator is causal: output sample `t` reads only input samples up to
//! and including `t`. Windowed operators drop the first `w - 1` samples, so
//! their output ends on the same bar as their input (see [`crate::Series`]).
//!
//! Operators never panic. A window of zero, or one longer than the input,
//! yields an empty series; the family calculators decide what an empty
//! intermediate means for a factor.

pub mod elementwise;
pub mod regression;
pub mod stats;
pub mod window;

pub use elementwise::{abs, delay, delta, log, rank, scale, sign, signed_power, signed_power_scalar};
pub use regression::{ts_residual, ts_rsquare, ts_slope};
pub use stats::{correlation, covariance, decay_linear, stddev, ts_quantile};
pub use window::{product, sma, ts_argmax, ts_argmin, ts_max, ts_mean, ts_min, ts_rank, ts_sum};

use crate::Series;

/// Epsilon guarding every division in the engine.
pub const EPS: f64 = 1e-12;

/// `num / den`, or 0.0 when `|den| < EPS`.
#[inline]
pub fn safe_div(num: f64, den: f64) -> f64 {
    if den.abs() < EPS { 0.0 } else { num / den }
}

/// Apply `f` to every trailing window of length `w`.
pub(crate) fn rolling(x: &[f64], w: usize, f: impl Fn(&[f64]) -> f64) -> Series {
    if w == 0 || w > x.len() {
        return Series::empty();
    }
    x.windows(w).map(f).collect()
}

/// Apply `f` to every pair of trailing windows of `x` and `y`, aligned on the latest sample.
pub(crate) fn rolling_pair(x: &[f64], y: &[f64], w: usize, f: impl Fn(&[f64], &[f64]) -> f64) -> Series {
    let n = x.len().min(y.len());
    if w == 0 || w > n {
        return Series::empty();
    }
    let (x, y) = (&x[x.len() - n..], &y[y.len() - n..]);
    x.windows(w).zip(y.windows(w)).map(|(a, b)| f(a, b)).collect()
}

/// Population mean of a window.
#[inline]
pub(crate) fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}
