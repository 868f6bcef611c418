//! Lagged prices relative to the latest close.

use crate::ops::safe_div;
use crate::{BaseSeries, Field};

/// `field[t - lag] / close[t]`, or NaN when `lag` reaches past the history.
pub(super) fn compute(data: &BaseSeries, field: Field, lag: usize) -> f64 {
    let series = field.series(data);
    let (Some(close), Some(&lagged)) = (
        data.close.latest(),
        series.len().checked_sub(lag + 1).and_then(|i| series.get(i)),
    ) else {
        return f64::NAN;
    };
    safe_div(lagged, close)
}
