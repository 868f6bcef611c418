//! Alphas 21-40.

use super::Formula;
use crate::ops::*;
use crate::{BaseSeries, Series};

pub(super) fn lookup(index: usize) -> Option<Formula> {
    let formula: Formula = match index {
        21 => alpha021,
        22 => alpha022,
        23 => alpha023,
        24 => alpha024,
        25 => alpha025,
        26 => alpha026,
        27 => alpha027,
        28 => alpha028,
        29 => alpha029,
        30 => alpha030,
        31 => alpha031,
        32 => alpha032,
        33 => alpha033,
        34 => alpha034,
        35 => alpha035,
        36 => alpha036,
        37 => alpha037,
        38 => alpha038,
        39 => alpha039,
        40 => alpha040,
        _ => return None,
    };
    Some(formula)
}

fn alpha021(d: &BaseSeries) -> Series {
    let ma8 = ts_mean(&d.close, 8);
    let sd8 = stddev(&d.close, 8);
    let ma2 = ts_mean(&d.close, 2);
    let volume_ratio = &d.volume / d.adv(20);
    let by_volume = volume_ratio
        .greater(1.0)
        .or(&volume_ratio.equals(1.0))
        .select(1.0, -1.0);
    let below_band = ma2.less(&(&ma8 - &sd8)).select(1.0, &by_volume);
    (&ma8 + &sd8).less(&ma2).select(-1.0, &below_band)
}

fn alpha022(d: &BaseSeries) -> Series {
    -(delta(&correlation(&d.high, &d.volume, 5), 5) * rank(&stddev(&d.close, 20)))
}

fn alpha023(d: &BaseSeries) -> Series {
    ts_mean(&d.high, 20)
        .less(&d.high)
        .select(&-delta(&d.high, 2), 0.0)
}

fn alpha024(d: &BaseSeries) -> Series {
    let drift = delta(&ts_mean(&d.close, 100), 100) / delay(&d.close, 100);
    let off_low = -(&d.close - ts_min(&d.close, 100));
    drift.less_eq(0.05).select(&off_low, &-delta(&d.close, 3))
}

fn alpha025(d: &BaseSeries) -> Series {
    rank(&(-&d.returns * d.adv(20) * &d.vwap * (&d.high - &d.close)))
}

fn alpha026(d: &BaseSeries) -> Series {
    -ts_max(&correlation(&ts_rank(&d.volume, 5), &ts_rank(&d.high, 5), 5), 3)
}

fn alpha027(d: &BaseSeries) -> Series {
    let agreement = ts_mean(&correlation(&rank(&d.volume), &rank(&d.vwap), 6), 2);
    rank(&agreement).greater(0.5).select(-1.0, 1.0)
}

fn alpha028(d: &BaseSeries) -> Series {
    let x = correlation(&d.adv(20), &d.low, 5) + (&d.high + &d.low) / 2.0 - &d.close;
    scale(&x, 1.0)
}

fn alpha029(d: &BaseSeries) -> Series {
    let inner = rank(&rank(&-rank(&delta(&(&d.close - 1.0), 5))));
    let stage = rank(&rank(&scale(&log(&ts_min(&inner, 2)), 1.0)));
    ts_min(&stage, 5) + ts_rank(&delay(&-&d.returns, 6), 5)
}

fn alpha030(d: &BaseSeries) -> Series {
    let c = &d.close;
    let streak = sign(&(c - delay(c, 1)))
        + sign(&(delay(c, 1) - delay(c, 2)))
        + sign(&(delay(c, 2) - delay(c, 3)));
    (1.0 - rank(&streak)) * ts_sum(&d.volume, 5) / ts_sum(&d.volume, 20)
}

fn alpha031(d: &BaseSeries) -> Series {
    let decayed = decay_linear(&-rank(&rank(&delta(&d.close, 10))), 10);
    rank(&rank(&rank(&decayed)))
        + rank(&-delta(&d.close, 3))
        + sign(&scale(&correlation(&d.adv(20), &d.low, 12), 1.0))
}

fn alpha032(d: &BaseSeries) -> Series {
    scale(&(ts_mean(&d.close, 7) - &d.close), 1.0)
        + 20.0 * scale(&correlation(&d.vwap, &delay(&d.close, 5), 230), 1.0)
}

fn alpha033(d: &BaseSeries) -> Series {
    rank(&-(1.0 - &d.open / &d.close))
}

fn alpha034(d: &BaseSeries) -> Series {
    let vol_ratio = rank(&(stddev(&d.returns, 2) / stddev(&d.returns, 5)));
    rank(&((1.0 - vol_ratio) + (1.0 - rank(&delta(&d.close, 1)))))
}

fn alpha035(d: &BaseSeries) -> Series {
    ts_rank(&d.volume, 32)
        * (1.0 - ts_rank(&(&d.close + &d.high - &d.low), 16))
        * (1.0 - ts_rank(&d.returns, 32))
}

fn alpha036(d: &BaseSeries) -> Series {
    let body = &d.close - &d.open;
    let a = 2.21 * rank(&correlation(&body, &delay(&d.volume, 1), 15));
    let b = 0.7 * rank(&(&d.open - &d.close));
    let c = 0.73 * rank(&ts_rank(&delay(&-&d.returns, 6), 5));
    let e = rank(&correlation(&d.vwap, &d.adv(20), 6).abs());
    let f = 0.6 * rank(&((ts_mean(&d.close, 200) - &d.open) * &body));
    a + b + c + e + f
}

fn alpha037(d: &BaseSeries) -> Series {
    let gap = &d.open - &d.close;
    rank(&correlation(&delay(&gap, 1), &d.close, 200)) + rank(&gap)
}

fn alpha038(d: &BaseSeries) -> Series {
    -rank(&ts_rank(&d.close, 10)) * rank(&(&d.close / &d.open))
}

fn alpha039(d: &BaseSeries) -> Series {
    let damping = 1.0 - rank(&decay_linear(&(&d.volume / d.adv(20)), 9));
    -rank(&(delta(&d.close, 7) * damping)) * (1.0 + rank(&ts_sum(&d.returns, 250)))
}

fn alpha040(d: &BaseSeries) -> Series {
    -rank(&stddev(&d.high, 10)) * correlation(&d.high, &d.volume, 10)
}
