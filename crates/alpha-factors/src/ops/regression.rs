//! Rolling ordinary-least-squares fits of a window against its time index.
//!
//! Within each window of length `w` the regressor is `t = 0, 1, .., w - 1`
//! (oldest sample at 0).

use super::{EPS, mean, rolling};
use crate::Series;

#[derive(Debug, Clone, Copy)]
struct Fit {
    slope: f64,
    intercept: f64,
    rsquare: f64,
}

fn fit(win: &[f64]) -> Fit {
    let n = win.len();
    let t_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(win);

    let (mut sxy, mut sxx) = (0.0, 0.0);
    for (t, y) in win.iter().enumerate() {
        let dt = t as f64 - t_mean;
        sxy += dt * (y - y_mean);
        sxx += dt * dt;
    }
    let slope = if sxx < EPS { 0.0 } else { sxy / sxx };
    let intercept = y_mean - slope * t_mean;

    let (mut ss_res, mut ss_tot) = (0.0, 0.0);
    for (t, y) in win.iter().enumerate() {
        let fitted = intercept + slope * t as f64;
        ss_res += (y - fitted).powi(2);
        ss_tot += (y - y_mean).powi(2);
    }
    let rsquare = if ss_tot < EPS { 0.0 } else { 1.0 - ss_res / ss_tot };

    Fit {
        slope,
        intercept,
        rsquare,
    }
}

/// Slope of the trailing linear trend.
pub fn ts_slope(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| fit(win).slope)
}

/// Coefficient of determination of the trailing linear trend; 0 for a flat window.
pub fn ts_rsquare(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| fit(win).rsquare)
}

/// Residual of the latest sample against the trailing linear trend.
pub fn ts_residual(x: &[f64], w: usize) -> Series {
    rolling(x, w, |win| {
        let f = fit(win);
        let last = win.len() - 1;
        win[last] - (f.intercept + f.slope * last as f64)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_perfect_line() {
        let x = [1.0, 3.0, 5.0, 7.0, 9.0];
        assert_relative_eq!(ts_slope(&x, 5)[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(ts_rsquare(&x, 5)[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(ts_residual(&x, 5)[0], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_residual_of_latest_sample() {
        // fit of [0, 0, 3] is y = -0.5 + 1.5 t, so the last residual is 3 - 2.5
        let r = ts_residual(&[0.0, 0.0, 3.0], 3);
        assert_relative_eq!(r[0], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_flat_window() {
        let x = [4.0, 4.0, 4.0];
        assert_eq!(ts_slope(&x, 3), vec![0.0]);
        assert_eq!(ts_rsquare(&x, 3), vec![0.0]);
    }
}
