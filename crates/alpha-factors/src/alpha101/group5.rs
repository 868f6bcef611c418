//! Alphas 81-101.

use super::Formula;
use crate::ops::*;
use crate::{BaseSeries, Series};

pub(super) fn lookup(index: usize) -> Option<Formula> {
    let formula: Formula = match index {
        81 => alpha081,
        83 => alpha083,
        84 => alpha084,
        85 => alpha085,
        86 => alpha086,
        88 => alpha088,
        92 => alpha092,
        94 => alpha094,
        95 => alpha095,
        96 => alpha096,
        98 => alpha098,
        99 => alpha099,
        101 => alpha101,
        _ => return None,
    };
    Some(formula)
}

fn midpoint(d: &BaseSeries) -> Series {
    (&d.high + &d.low) / 2.0
}

fn alpha081(d: &BaseSeries) -> Series {
    let corr = rank(&correlation(&d.vwap, &ts_sum(&d.adv(10), 49), 8)).pow(4.0);
    let left = rank(&log(&product(&rank(&corr), 14)));
    left.less(&rank(&correlation(&rank(&d.vwap), &rank(&d.volume), 5))) * -1.0
}

fn alpha083(d: &BaseSeries) -> Series {
    let spread = (&d.high - &d.low) / ts_mean(&d.close, 5);
    rank(&delay(&spread, 2)) * rank(&rank(&d.volume)) / (&spread / (&d.vwap - &d.close))
}

fn alpha084(d: &BaseSeries) -> Series {
    let stretch = ts_rank(&(&d.vwap - ts_max(&d.vwap, 15)), 20);
    signed_power(&stretch, &delta(&d.close, 4))
}

fn alpha085(d: &BaseSeries) -> Series {
    let weighted = &d.high * 0.876703 + &d.close * (1.0 - 0.876703);
    let base = rank(&correlation(&weighted, &d.adv(30), 9));
    let exponent = rank(&correlation(&ts_rank(&midpoint(d), 3), &ts_rank(&d.volume, 10), 7));
    base.pow(&exponent)
}

fn alpha086(d: &BaseSeries) -> Series {
    let left = ts_rank(&correlation(&d.close, &ts_sum(&d.adv(20), 14), 6), 20);
    let right = rank(&(&d.open + &d.close - (&d.vwap + &d.open)));
    left.less(&right) * -1.0
}

fn alpha088(d: &BaseSeries) -> Series {
    let spread = rank(&d.open) + rank(&d.low) - (rank(&d.high) + rank(&d.close));
    let a = rank(&decay_linear(&spread, 8));
    let trend = correlation(&ts_rank(&d.close, 8), &ts_rank(&d.adv(60), 20), 8);
    let b = ts_rank(&decay_linear(&trend, 6), 2);
    a.min_with(&b)
}

fn alpha092(d: &BaseSeries) -> Series {
    let below = (midpoint(d) + &d.close).less(&(&d.low + &d.open));
    let a = ts_rank(&decay_linear(&below, 14), 18);
    let b = ts_rank(&decay_linear(&correlation(&rank(&d.low), &rank(&d.adv(30)), 7), 6), 6);
    a.min_with(&b)
}

fn alpha094(d: &BaseSeries) -> Series {
    let base = rank(&(&d.vwap - ts_min(&d.vwap, 11)));
    let trend = correlation(&ts_rank(&d.vwap, 19), &ts_rank(&d.adv(60), 4), 18);
    base.pow(&ts_rank(&trend, 2)) * -1.0
}

fn alpha095(d: &BaseSeries) -> Series {
    let left = rank(&(&d.open - ts_min(&d.open, 12)));
    let corr = correlation(&ts_sum(&midpoint(d), 19), &ts_sum(&d.adv(40), 19), 12);
    left.less(&ts_rank(&rank(&corr).pow(5.0), 11))
}

fn alpha096(d: &BaseSeries) -> Series {
    let agreement = correlation(&rank(&d.vwap), &rank(&d.volume), 3);
    let a = ts_rank(&decay_linear(&agreement, 4), 8);
    let trend = correlation(&ts_rank(&d.close, 7), &ts_rank(&d.adv(60), 4), 3);
    let b = ts_rank(&decay_linear(&ts_argmax(&trend, 12), 14), 13);
    a.max_with(&b) * -1.0
}

fn alpha098(d: &BaseSeries) -> Series {
    let a = rank(&decay_linear(&correlation(&d.vwap, &ts_sum(&d.adv(5), 26), 4), 7));
    let trough = ts_argmin(&correlation(&rank(&d.open), &rank(&d.adv(15)), 20), 8);
    let b = rank(&decay_linear(&ts_rank(&trough, 6), 8));
    a - b
}

fn alpha099(d: &BaseSeries) -> Series {
    let left = rank(&correlation(&ts_sum(&midpoint(d), 19), &ts_sum(&d.adv(60), 19), 8));
    left.less(&rank(&correlation(&d.low, &d.volume, 6))) * -1.0
}

fn alpha101(d: &BaseSeries) -> Series {
    (&d.close - &d.open) / (&d.high - &d.low + 0.001)
}
