//! Lag, difference, element-wise transforms and whole-series normalizers.

use super::EPS;
use crate::Series;
use crate::series::Operand;

/// Value `d` samples ago.
///
/// The output ends on the sample `d` steps before the input's latest, so it
/// has length `len - d` and lines up with the input under tail alignment.
pub fn delay(x: &[f64], d: usize) -> Series {
    if d >= x.len() {
        return Series::empty();
    }
    Series::from(&x[..x.len() - d])
}

/// `x[t] - x[t - d]`.
pub fn delta(x: &[f64], d: usize) -> Series {
    if d >= x.len() {
        return Series::empty();
    }
    x.iter().skip(d).zip(x).map(|(now, then)| now - then).collect()
}

/// Element-wise sign: -1, 0 or 1 (NaN stays NaN).
pub fn sign(x: &[f64]) -> Series {
    x.iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if v > 0.0 {
                1.0
            } else if v < 0.0 {
                -1.0
            } else {
                0.0
            }
        })
        .collect()
}

/// Element-wise absolute value.
pub fn abs(x: &[f64]) -> Series {
    x.iter().map(|v| v.abs()).collect()
}

/// Element-wise natural logarithm; non-positive input gives NaN.
pub fn log(x: &[f64]) -> Series {
    x.iter().map(|&v| if v > 0.0 { v.ln() } else { f64::NAN }).collect()
}

/// `sign(x) * |x|^a` for a single value.
#[inline]
pub fn signed_power_scalar(x: f64, a: f64) -> f64 {
    if x == 0.0 { 0.0 } else { x.signum() * x.abs().powf(a) }
}

/// `sign(x) * |x|^a` element-wise, with a scalar or per-element exponent.
pub fn signed_power<'a>(x: &[f64], exponent: impl Into<Operand<'a>>) -> Series {
    Series::from(x).zip_with(exponent, signed_power_scalar)
}

/// Percentile rank of every sample within the supplied series.
///
/// This ranks a value against the other samples of the *same* series, not
/// against other instruments at the same timestamp. Downstream models are
/// trained on exactly this narrowing, so it must not be swapped for a true
/// cross-sectional rank: each output is the number of valid samples strictly
/// below the value divided by `valid - 1` (0.5 for a single valid sample).
/// NaN samples are skipped when counting and rank as NaN.
pub fn rank(x: &[f64]) -> Series {
    let mut sorted: Vec<f64> = x.iter().copied().filter(|v| !v.is_nan()).collect();
    sorted.sort_by(f64::total_cmp);
    let valid = sorted.len();

    x.iter()
        .map(|&v| {
            if v.is_nan() {
                f64::NAN
            } else if valid == 1 {
                0.5
            } else {
                sorted.partition_point(|&s| s < v) as f64 / (valid - 1) as f64
            }
        })
        .collect()
}

/// Rescale so that `Σ|x| == a`; all zeros when `Σ|x| < EPS`.
///
/// Non-finite samples are left out of `Σ|x|` and map to NaN.
pub fn scale(x: &[f64], a: f64) -> Series {
    let total: f64 = x.iter().filter(|v| v.is_finite()).map(|v| v.abs()).sum();
    if total < EPS {
        return Series::constant(0.0, x.len());
    }
    x.iter()
        .map(|&v| if v.is_finite() { a * v / total } else { f64::NAN })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_delay_and_delta() {
        assert_eq!(delay(&[10.0, 12.0, 15.0], 1), vec![10.0, 12.0]);
        assert_eq!(delta(&[10.0, 12.0, 15.0], 1), vec![2.0, 3.0]);
        assert_eq!(delta(&[10.0, 12.0, 15.0], 2), vec![5.0]);
        assert_eq!(delay(&[10.0, 12.0], 0), vec![10.0, 12.0]);
    }

    #[rstest]
    #[case(3)]
    #[case(4)]
    fn test_lag_exhausted(#[case] d: usize) {
        assert!(delay(&[1.0, 2.0, 3.0], d).is_empty());
        assert!(delta(&[1.0, 2.0, 3.0], d).is_empty());
    }

    #[test]
    fn test_rank_within_series() {
        let r = rank(&[3.0, 1.0, 2.0, 2.0]);
        assert_eq!(r, vec![1.0, 0.0, 1.0 / 3.0, 1.0 / 3.0]);
        assert_eq!(rank(&[7.0]), vec![0.5]);
        assert!(rank(&[]).is_empty());
    }

    #[test]
    fn test_rank_skips_nan() {
        let r = rank(&[f64::NAN, 1.0, 2.0]);
        assert!(r[0].is_nan());
        assert_eq!(r[1], 0.0);
        assert_eq!(r[2], 1.0);
    }

    #[test]
    fn test_scale() {
        let s = scale(&[1.0, -3.0], 2.0);
        assert_relative_eq!(s[0], 0.5);
        assert_relative_eq!(s[1], -1.5);
        assert_eq!(scale(&[0.0, 0.0], 1.0), vec![0.0, 0.0]);

        let s = scale(&[2.0, f64::NAN, -2.0], 1.0);
        assert_eq!(s[0], 0.5);
        assert!(s[1].is_nan());
    }

    #[test]
    fn test_signed_power() {
        assert_eq!(signed_power_scalar(-2.0, 2.0), -4.0);
        assert_eq!(signed_power_scalar(0.0, 0.5), 0.0);
        assert_eq!(signed_power(&[-3.0, 2.0], 2.0), vec![-9.0, 4.0]);

        let exponents = Series::new(vec![1.0, 3.0]);
        assert_eq!(signed_power(&[-3.0, 2.0], &exponents), vec![-3.0, 8.0]);
    }

    #[test]
    fn test_sign_and_log() {
        assert_eq!(sign(&[-2.0, 0.0, 5.0]), vec![-1.0, 0.0, 1.0]);
        let l = log(&[1.0, 0.0]);
        assert_eq!(l[0], 0.0);
        assert!(l[1].is_nan());
    }
}
