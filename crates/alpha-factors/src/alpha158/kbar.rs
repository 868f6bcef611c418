//! Candlestick shape ratios of the latest bar.

use crate::Bar;
use crate::ops::{EPS, safe_div};

/// The nine K-bar ratios in [`KBAR_NAMES`](crate::order::KBAR_NAMES) order.
///
/// Ratios over the open are 0.0 when the open is zero.
pub(super) fn compute(bar: &Bar) -> [f64; 9] {
    let Bar {
        open: o,
        high: h,
        low: l,
        close: c,
        ..
    } = *bar;
    let range = h - l + EPS;
    let upper = h - o.max(c);
    let lower = o.min(c) - l;
    let shift = 2.0 * c - h - l;

    [
        safe_div(c - o, o),
        safe_div(h - l, o),
        (c - o) / range,
        safe_div(upper, o),
        upper / range,
        safe_div(lower, o),
        lower / range,
        safe_div(shift, o),
        shift / range,
    ]
}
