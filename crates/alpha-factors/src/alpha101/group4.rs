//! Alphas 61-80.
//!
//! Most of this group compares two ranked legs and emits the boolean outcome,
//! negated where the original formula multiplies by `-1`.

use super::Formula;
use crate::ops::*;
use crate::{BaseSeries, Series};

pub(super) fn lookup(index: usize) -> Option<Formula> {
    let formula: Formula = match index {
        61 => alpha061,
        62 => alpha062,
        64 => alpha064,
        65 => alpha065,
        66 => alpha066,
        68 => alpha068,
        71 => alpha071,
        72 => alpha072,
        73 => alpha073,
        74 => alpha074,
        75 => alpha075,
        77 => alpha077,
        78 => alpha078,
        _ => return None,
    };
    Some(formula)
}

/// `a * w + b * (1 - w)`.
fn blend(a: &Series, b: &Series, w: f64) -> Series {
    a * w + b * (1.0 - w)
}

fn midpoint(d: &BaseSeries) -> Series {
    (&d.high + &d.low) / 2.0
}

fn alpha061(d: &BaseSeries) -> Series {
    let stretch = rank(&(&d.vwap - ts_min(&d.vwap, 16)));
    stretch.less(&rank(&correlation(&d.vwap, &d.adv(180), 17)))
}

fn alpha062(d: &BaseSeries) -> Series {
    let left = rank(&correlation(&d.vwap, &ts_sum(&d.adv(20), 22), 9));
    let open_rank = rank(&d.open);
    let range_rank = rank(&midpoint(d)) + rank(&d.high);
    let right = rank(&(&open_rank + &open_rank).less(&range_rank));
    left.less(&right) * -1.0
}

fn alpha064(d: &BaseSeries) -> Series {
    const W: f64 = 0.178404;
    let weighted = ts_sum(&blend(&d.open, &d.low, W), 12);
    let left = rank(&correlation(&weighted, &ts_sum(&d.adv(120), 12), 16));
    let right = rank(&delta(&blend(&midpoint(d), &d.vwap, W), 3));
    left.less(&right) * -1.0
}

fn alpha065(d: &BaseSeries) -> Series {
    let weighted = blend(&d.open, &d.vwap, 0.008_172_05);
    let left = rank(&correlation(&weighted, &ts_sum(&d.adv(60), 8), 6));
    left.less(&rank(&(&d.open - ts_min(&d.open, 13)))) * -1.0
}

fn alpha066(d: &BaseSeries) -> Series {
    let low = blend(&d.low, &d.low, 0.96633);
    let stretch = (low - &d.vwap) / (&d.open - midpoint(d));
    (rank(&decay_linear(&delta(&d.vwap, 3), 7)) + ts_rank(&decay_linear(&stretch, 11), 6)) * -1.0
}

fn alpha068(d: &BaseSeries) -> Series {
    let left = ts_rank(&correlation(&rank(&d.high), &rank(&d.adv(15)), 8), 13);
    let right = rank(&delta(&blend(&d.close, &d.low, 0.518371), 1));
    left.less(&right) * -1.0
}

fn alpha071(d: &BaseSeries) -> Series {
    let trend = correlation(&ts_rank(&d.close, 3), &ts_rank(&d.adv(180), 12), 18);
    let a = ts_rank(&decay_linear(&trend, 4), 15);
    let gap = rank(&(&d.low + &d.open - (&d.vwap + &d.vwap))).pow(2.0);
    let b = ts_rank(&decay_linear(&gap, 16), 4);
    a.max_with(&b)
}

fn alpha072(d: &BaseSeries) -> Series {
    let num = rank(&decay_linear(&correlation(&midpoint(d), &d.adv(40), 8), 10));
    let den_corr = correlation(&ts_rank(&d.vwap, 3), &ts_rank(&d.volume, 18), 6);
    num / rank(&decay_linear(&den_corr, 2))
}

fn alpha073(d: &BaseSeries) -> Series {
    let weighted = blend(&d.open, &d.low, 0.147155);
    let a = rank(&decay_linear(&delta(&d.vwap, 4), 2));
    let b = ts_rank(&decay_linear(&(delta(&weighted, 2) / &weighted * -1.0), 3), 16);
    a.max_with(&b) * -1.0
}

fn alpha074(d: &BaseSeries) -> Series {
    let left = rank(&correlation(&d.close, &ts_sum(&d.adv(30), 37), 15));
    let weighted = rank(&blend(&d.high, &d.vwap, 0.026_166_1));
    let right = rank(&correlation(&weighted, &rank(&d.volume), 11));
    left.less(&right) * -1.0
}

fn alpha075(d: &BaseSeries) -> Series {
    let left = rank(&correlation(&d.vwap, &d.volume, 4));
    left.less(&rank(&correlation(&rank(&d.low), &rank(&d.adv(50)), 12)))
}

fn alpha077(d: &BaseSeries) -> Series {
    let a = rank(&decay_linear(&(midpoint(d) + &d.high - (&d.vwap + &d.high)), 20));
    let b = rank(&decay_linear(&correlation(&midpoint(d), &d.adv(40), 3), 5));
    a.min_with(&b)
}

fn alpha078(d: &BaseSeries) -> Series {
    let weighted = ts_sum(&blend(&d.low, &d.vwap, 0.352233), 19);
    let base = rank(&correlation(&weighted, &ts_sum(&d.adv(40), 19), 6));
    base.pow(&rank(&correlation(&rank(&d.vwap), &rank(&d.volume), 5)))
}
