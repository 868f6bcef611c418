//! Alphas 41-60.

use super::Formula;
use crate::ops::*;
use crate::{BaseSeries, Series};

pub(super) fn lookup(index: usize) -> Option<Formula> {
    let formula: Formula = match index {
        41 => alpha041,
        42 => alpha042,
        43 => alpha043,
        44 => alpha044,
        45 => alpha045,
        46 => alpha046,
        47 => alpha047,
        49 => alpha049,
        50 => alpha050,
        51 => alpha051,
        52 => alpha052,
        53 => alpha053,
        54 => alpha054,
        55 => alpha055,
        57 => alpha057,
        60 => alpha060,
        _ => return None,
    };
    Some(formula)
}

fn alpha041(d: &BaseSeries) -> Series {
    (&d.high * &d.low).pow(0.5) - &d.vwap
}

fn alpha042(d: &BaseSeries) -> Series {
    rank(&(&d.vwap - &d.close)) / rank(&(&d.vwap + &d.close))
}

fn alpha043(d: &BaseSeries) -> Series {
    ts_rank(&(&d.volume / d.adv(20)), 20) * ts_rank(&-delta(&d.close, 7), 8)
}

fn alpha044(d: &BaseSeries) -> Series {
    -correlation(&d.high, &rank(&d.volume), 5)
}

fn alpha045(d: &BaseSeries) -> Series {
    let lagged_level = rank(&ts_mean(&delay(&d.close, 5), 20));
    let short_corr = correlation(&d.close, &d.volume, 2);
    let sum_corr = rank(&correlation(&ts_sum(&d.close, 5), &ts_sum(&d.close, 20), 2));
    -(lagged_level * short_corr * sum_corr)
}

/// Change of the ten-bar slope across the last twenty bars.
fn curvature(d: &BaseSeries) -> Series {
    let c = &d.close;
    (delay(c, 20) - delay(c, 10)) / 10.0 - (delay(c, 10) - c) / 10.0
}

/// `1` when the curvature is below `threshold`, otherwise fade the last move.
fn curvature_reversal(d: &BaseSeries, threshold: f64) -> Series {
    let fallback = -(&d.close - delay(&d.close, 1));
    curvature(d).less(threshold).select(1.0, &fallback)
}

fn alpha046(d: &BaseSeries) -> Series {
    let slope = curvature(d);
    let fallback = -(&d.close - delay(&d.close, 1));
    slope
        .greater(0.25)
        .select(-1.0, &slope.less(0.0).select(1.0, &fallback))
}

fn alpha047(d: &BaseSeries) -> Series {
    let left = rank(&(1.0 / &d.close)) * &d.volume / d.adv(20);
    let right = &d.high * rank(&(&d.high - &d.close)) / ts_mean(&d.high, 5);
    left * right - rank(&(&d.vwap - delay(&d.vwap, 5)))
}

fn alpha049(d: &BaseSeries) -> Series {
    curvature_reversal(d, -0.1)
}

fn alpha050(d: &BaseSeries) -> Series {
    -ts_max(&rank(&correlation(&rank(&d.volume), &rank(&d.vwap), 5)), 5)
}

fn alpha051(d: &BaseSeries) -> Series {
    curvature_reversal(d, -0.05)
}

fn alpha052(d: &BaseSeries) -> Series {
    let low_min = ts_min(&d.low, 5);
    let long_run = (ts_sum(&d.returns, 240) - ts_sum(&d.returns, 20)) / 220.0;
    (-&low_min + delay(&low_min, 5)) * rank(&long_run) * ts_rank(&d.volume, 5)
}

fn alpha053(d: &BaseSeries) -> Series {
    let clv = ((&d.close - &d.low) - (&d.high - &d.close)) / (&d.close - &d.low);
    -delta(&clv, 9)
}

fn alpha054(d: &BaseSeries) -> Series {
    -((&d.low - &d.close) * d.open.pow(5.0)) / ((&d.low - &d.high) * d.close.pow(5.0))
}

fn alpha055(d: &BaseSeries) -> Series {
    let low12 = ts_min(&d.low, 12);
    let stochastic = (&d.close - &low12) / (ts_max(&d.high, 12) - &low12);
    -correlation(&rank(&stochastic), &rank(&d.volume), 6)
}

fn alpha057(d: &BaseSeries) -> Series {
    -((&d.close - &d.vwap) / decay_linear(&rank(&ts_argmax(&d.close, 30)), 2))
}

fn alpha060(d: &BaseSeries) -> Series {
    let clv = ((&d.close - &d.low) - (&d.high - &d.close)) / (&d.high - &d.low) * &d.volume;
    -(2.0 * scale(&rank(&clv), 1.0) - scale(&rank(&ts_argmax(&d.close, 10)), 1.0))
}
