//! Rolling-window statistics, each normalized to be scale free.

use crate::ops::{
    EPS, correlation, delay, delta, log, safe_div, stddev, ts_argmax, ts_argmin, ts_max, ts_min,
    ts_quantile, ts_rank, ts_residual, ts_rsquare, ts_slope,
};
use crate::{BaseSeries, RollingOperator, Series};

/// Derived series shared by every rolling operator of one calculation.
pub(super) struct RollingInputs<'a> {
    data: &'a BaseSeries,
    close_change: Series,
    close_ratio: Series,
    log_volume: Series,
    log_volume_ratio: Series,
    volume_change: Series,
    weighted_move: Series,
}

impl<'a> RollingInputs<'a> {
    pub(super) fn new(data: &'a BaseSeries) -> Self {
        let close_ratio = &data.close / delay(&data.close, 1);
        let volume_ratio = &data.volume / delay(&data.volume, 1);
        let weighted_move = (&close_ratio - 1.0).abs() * &data.volume;
        Self {
            close_change: delta(&data.close, 1),
            log_volume: log(&(&data.volume + 1.0)),
            log_volume_ratio: log(&(volume_ratio + 1.0)),
            volume_change: delta(&data.volume, 1),
            close_ratio,
            weighted_move,
            data,
        }
    }

    /// Latest value of `op` over a window of `d` bars, NaN without `d + 1` bars.
    pub(super) fn value(&self, op: RollingOperator, d: usize) -> f64 {
        use RollingOperator::*;

        let data = self.data;
        let (Some(close), true) = (data.close.latest(), d > 0 && data.len() > d) else {
            return f64::NAN;
        };
        let volume = data.volume.latest().unwrap_or(f64::NAN);

        match op {
            Roc => safe_div(data.close[data.len() - 1 - d], close),
            Ma => safe_div(mean(data.close.tail(d)), close),
            Std => safe_div(last_of(stddev(data.close.tail(d), d)), close),
            Beta => safe_div(last_of(ts_slope(data.close.tail(d), d)), close),
            Rsqr => last_of(ts_rsquare(data.close.tail(d), d)),
            Resi => safe_div(last_of(ts_residual(data.close.tail(d), d)), close),
            Max => safe_div(last_of(ts_max(data.high.tail(d), d)), close),
            Min => safe_div(last_of(ts_min(data.low.tail(d), d)), close),
            Qtlu => safe_div(last_of(ts_quantile(data.close.tail(d), d, 0.8)), close),
            Qtld => safe_div(last_of(ts_quantile(data.close.tail(d), d, 0.2)), close),
            Rank => last_of(ts_rank(data.close.tail(d), d)),
            Rsv => {
                let low = last_of(ts_min(data.low.tail(d), d));
                let high = last_of(ts_max(data.high.tail(d), d));
                (close - low) / (high - low + EPS)
            }
            Imax => (last_of(ts_argmax(data.high.tail(d), d)) + 1.0) / d as f64,
            Imin => (last_of(ts_argmin(data.low.tail(d), d)) + 1.0) / d as f64,
            Imxd => {
                let argmax = last_of(ts_argmax(data.high.tail(d), d));
                let argmin = last_of(ts_argmin(data.low.tail(d), d));
                (argmax - argmin) / d as f64
            }
            Corr => last_of(correlation(
                data.close.tail(d),
                self.log_volume.tail(d),
                d,
            )),
            Cord => last_of(correlation(
                self.close_ratio.tail(d),
                self.log_volume_ratio.tail(d),
                d,
            )),
            Cntp => share(self.close_change.tail(d), |v| v > 0.0),
            Cntn => share(self.close_change.tail(d), |v| v < 0.0),
            Cntd => {
                share(self.close_change.tail(d), |v| v > 0.0)
                    - share(self.close_change.tail(d), |v| v < 0.0)
            }
            Sump => moves(self.close_change.tail(d)).gain_share(),
            Sumn => moves(self.close_change.tail(d)).loss_share(),
            Sumd => moves(self.close_change.tail(d)).net_share(),
            Vma => mean(data.volume.tail(d)) / (volume + EPS),
            Vstd => last_of(stddev(data.volume.tail(d), d)) / (volume + EPS),
            Wvma => {
                let window = self.weighted_move.tail(d);
                last_of(stddev(window, d)) / (mean(window) + EPS)
            }
            Vsump => moves(self.volume_change.tail(d)).gain_share(),
            Vsumn => moves(self.volume_change.tail(d)).loss_share(),
            Vsumd => moves(self.volume_change.tail(d)).net_share(),
        }
    }
}

fn last_of(series: Series) -> f64 {
    series.latest().unwrap_or(f64::NAN)
}

fn mean(window: &[f64]) -> f64 {
    if window.is_empty() {
        return f64::NAN;
    }
    crate::ops::mean(window)
}

/// Fraction of `window` satisfying `pred`.
fn share(window: &[f64], pred: impl Fn(f64) -> bool) -> f64 {
    if window.is_empty() {
        return f64::NAN;
    }
    window.iter().filter(|&&v| pred(v)).count() as f64 / window.len() as f64
}

struct Moves {
    gains: f64,
    losses: f64,
    total: f64,
}

impl Moves {
    fn gain_share(&self) -> f64 {
        self.gains / (self.total + EPS)
    }

    fn loss_share(&self) -> f64 {
        self.losses / (self.total + EPS)
    }

    fn net_share(&self) -> f64 {
        (self.gains - self.losses) / (self.total + EPS)
    }
}

fn moves(changes: &[f64]) -> Moves {
    changes.iter().fold(
        Moves {
            gains: 0.0,
            losses: 0.0,
            total: 0.0,
        },
        |mut acc, &v| {
            acc.gains += v.max(0.0);
            acc.losses += (-v).max(0.0);
            acc.total += v.abs();
            acc
        },
    )
}
