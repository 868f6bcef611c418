//! Canonical factor orders.
//!
//! These functions are the single source of truth for column layout: every
//! calculator emits exactly `*_names(config)` in this order, and training and
//! serving vectors are validated against it. They perform no computation and
//! return the same list every time they are called with the same config.

use crate::config::alpha101::ALPHA101_COUNT;
use crate::{Alpha101Config, Alpha158Config, Alpha360Config, Field, RollingOperator};

/// The nine K-bar shape ratios, in emission order.
pub const KBAR_NAMES: [&str; 9] = [
    "KMID", "KLEN", "KMID2", "KUP", "KUP2", "KLOW", "KLOW2", "KSFT", "KSFT2",
];

/// Name of Alpha-101 member `index` (`alpha001` ..= `alpha101`).
pub fn alpha101_name(index: usize) -> String {
    format!("alpha{index:03}")
}

/// Enabled Alpha-101 members in index order.
pub fn alpha101_names(config: &Alpha101Config) -> Vec<String> {
    (1..=ALPHA101_COUNT)
        .filter(|&i| config.is_enabled(i))
        .map(alpha101_name)
        .collect()
}

/// Name of a lagged field feature, e.g. `VWAP0` or `CLOSE59`.
pub fn field_name(field: Field, lag: usize) -> String {
    format!("{field}{lag}")
}

/// Name of a rolling feature, e.g. `ROC5`.
pub fn rolling_name(op: RollingOperator, window: usize) -> String {
    format!("{op}{window}")
}

/// Alpha-158 names: K-bar, price, volume, rolling, then the extended price block.
///
/// Rolling names are emitted for every operator regardless of exclusions, so
/// excluding an operator never changes the vector's shape.
pub fn alpha158_names(config: &Alpha158Config) -> Vec<String> {
    let mut names = Vec::new();

    if config.kbar() {
        names.extend(KBAR_NAMES.iter().map(|n| n.to_string()));
    }
    if config.price() {
        for &field in config.price_features() {
            names.extend(config.price_windows().iter().map(|&w| field_name(field, w)));
        }
    }
    if config.volume() {
        names.extend(config.volume_windows().iter().map(|&w| field_name(Field::Volume, w)));
    }
    for op in RollingOperator::ALL {
        names.extend(config.rolling_windows().iter().map(|&w| rolling_name(op, w)));
    }
    for &field in config.price_features() {
        names.extend(config.extended_price_windows().iter().map(|&w| field_name(field, w)));
    }

    names
}

/// Alpha-360 names: per field, lags counting down from `lookback - 1` to 0.
pub fn alpha360_names(config: &Alpha360Config) -> Vec<String> {
    config
        .fields()
        .into_iter()
        .flat_map(|field| (0..config.lookback()).rev().map(move |lag| field_name(field, lag)))
        .collect()
}
