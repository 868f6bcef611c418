//! Alphas 1-20.

use super::Formula;
use crate::ops::*;
use crate::{BaseSeries, Series};

pub(super) fn lookup(index: usize) -> Option<Formula> {
    let formula: Formula = match index {
        1 => alpha001,
        2 => alpha002,
        3 => alpha003,
        4 => alpha004,
        5 => alpha005,
        6 => alpha006,
        7 => alpha007,
        8 => alpha008,
        9 => alpha009,
        10 => alpha010,
        11 => alpha011,
        12 => alpha012,
        13 => alpha013,
        14 => alpha014,
        15 => alpha015,
        16 => alpha016,
        17 => alpha017,
        18 => alpha018,
        19 => alpha019,
        20 => alpha020,
        _ => return None,
    };
    Some(formula)
}

fn alpha001(d: &BaseSeries) -> Series {
    let r = &d.returns;
    let base = r.less(0.0).select(&stddev(r, 20), &d.close);
    rank(&ts_argmax(&signed_power(&base, 2.0), 5)) - 0.5
}

fn alpha002(d: &BaseSeries) -> Series {
    let volume_change = rank(&delta(&log(&d.volume), 2));
    let body = rank(&((&d.close - &d.open) / &d.open));
    -correlation(&volume_change, &body, 6)
}

fn alpha003(d: &BaseSeries) -> Series {
    -correlation(&rank(&d.open), &rank(&d.volume), 10)
}

fn alpha004(d: &BaseSeries) -> Series {
    -ts_rank(&rank(&d.low), 9)
}

fn alpha005(d: &BaseSeries) -> Series {
    rank(&(&d.open - ts_sum(&d.vwap, 10) / 10.0)) * -abs(&rank(&(&d.close - &d.vwap)))
}

fn alpha006(d: &BaseSeries) -> Series {
    -correlation(&d.open, &d.volume, 10)
}

fn alpha007(d: &BaseSeries) -> Series {
    let change = delta(&d.close, 7);
    let signal = -ts_rank(&abs(&change), 60) * sign(&change);
    d.adv(20).less(&d.volume).select(&signal, -1.0)
}

fn alpha008(d: &BaseSeries) -> Series {
    let x = ts_sum(&d.open, 5) * ts_sum(&d.returns, 5);
    -rank(&(&x - delay(&x, 10)))
}

/// Follow a one-bar move when the last `w` moves agree, fade it otherwise.
fn trend_follow(d: &BaseSeries, w: usize) -> Series {
    let change = delta(&d.close, 1);
    let rising = ts_min(&change, w).greater(0.0);
    let falling = ts_max(&change, w).less(0.0);
    rising.select(&change, &falling.select(&change, &-&change))
}

fn alpha009(d: &BaseSeries) -> Series {
    trend_follow(d, 5)
}

fn alpha010(d: &BaseSeries) -> Series {
    rank(&trend_follow(d, 4))
}

fn alpha011(d: &BaseSeries) -> Series {
    let gap = &d.vwap - &d.close;
    (rank(&ts_max(&gap, 3)) + rank(&ts_min(&gap, 3))) * rank(&delta(&d.volume, 3))
}

fn alpha012(d: &BaseSeries) -> Series {
    sign(&delta(&d.volume, 1)) * -delta(&d.close, 1)
}

fn alpha013(d: &BaseSeries) -> Series {
    -rank(&covariance(&rank(&d.close), &rank(&d.volume), 5))
}

fn alpha014(d: &BaseSeries) -> Series {
    -rank(&delta(&d.returns, 3)) * correlation(&d.open, &d.volume, 10)
}

fn alpha015(d: &BaseSeries) -> Series {
    -ts_sum(&rank(&correlation(&rank(&d.high), &rank(&d.volume), 3)), 3)
}

fn alpha016(d: &BaseSeries) -> Series {
    -rank(&covariance(&rank(&d.high), &rank(&d.volume), 5))
}

fn alpha017(d: &BaseSeries) -> Series {
    let level = -rank(&ts_rank(&d.close, 10));
    let acceleration = rank(&delta(&delta(&d.close, 1), 1));
    let relative_volume = rank(&ts_rank(&(&d.volume / d.adv(20)), 5));
    level * acceleration * relative_volume
}

fn alpha018(d: &BaseSeries) -> Series {
    let body = &d.close - &d.open;
    -rank(&(stddev(&body.abs(), 5) + &body + correlation(&d.close, &d.open, 10)))
}

fn alpha019(d: &BaseSeries) -> Series {
    let change = (&d.close - delay(&d.close, 7)) + delta(&d.close, 7);
    -sign(&change) * (1.0 + rank(&(1.0 + ts_sum(&d.returns, 250))))
}

fn alpha020(d: &BaseSeries) -> Series {
    -rank(&(&d.open - delay(&d.high, 1)))
        * rank(&(&d.open - delay(&d.close, 1)))
        * rank(&(&d.open - delay(&d.low, 1)))
}
