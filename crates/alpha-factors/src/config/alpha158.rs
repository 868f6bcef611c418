//! Alpha-158 feature blocks and windows.

use super::validate_windows;
use crate::{AlphaError, Field, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Extra bars required beyond the longest configured window.
///
/// Lagged features read `max_window + 1` bars, so the buffer must cover that
/// extra bar.
pub const HISTORY_BUFFER: usize = 10;

const _: () = assert!(HISTORY_BUFFER >= 1);

/// The 29 rolling statistical operators, in canonical emission order.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RollingOperator {
    /// Rate of change: `close[t-d] / close`
    #[display("ROC")]
    Roc,
    /// Moving average over close
    #[display("MA")]
    Ma,
    /// Standard deviation over close
    #[display("STD")]
    Std,
    /// Slope of the linear trend
    #[display("BETA")]
    Beta,
    /// R-squared of the linear trend
    #[display("RSQR")]
    Rsqr,
    /// Residual of the linear trend
    #[display("RESI")]
    Resi,
    /// Highest high
    #[display("MAX")]
    Max,
    /// Lowest low
    #[display("MIN")]
    Min,
    /// 80% quantile of close
    #[display("QTLU")]
    Qtlu,
    /// 20% quantile of close
    #[display("QTLD")]
    Qtld,
    /// Time-series percentile of close
    #[display("RANK")]
    Rank,
    /// Position of close in the high-low range
    #[display("RSV")]
    Rsv,
    /// Days since the highest high, relative
    #[display("IMAX")]
    Imax,
    /// Days since the lowest low, relative
    #[display("IMIN")]
    Imin,
    /// Distance between high and low arg positions
    #[display("IMXD")]
    Imxd,
    /// Correlation of close and log volume
    #[display("CORR")]
    Corr,
    /// Correlation of price and log volume changes
    #[display("CORD")]
    Cord,
    /// Share of up days
    #[display("CNTP")]
    Cntp,
    /// Share of down days
    #[display("CNTN")]
    Cntn,
    /// Up share minus down share
    #[display("CNTD")]
    Cntd,
    /// Gains over total absolute change
    #[display("SUMP")]
    Sump,
    /// Losses over total absolute change
    #[display("SUMN")]
    Sumn,
    /// Gain share minus loss share
    #[display("SUMD")]
    Sumd,
    /// Moving average of volume
    #[display("VMA")]
    Vma,
    /// Standard deviation of volume
    #[display("VSTD")]
    Vstd,
    /// Volume-weighted return volatility
    #[display("WVMA")]
    Wvma,
    /// Volume increases over total absolute volume change
    #[display("VSUMP")]
    Vsump,
    /// Volume decreases over total absolute volume change
    #[display("VSUMN")]
    Vsumn,
    /// Increase share minus decrease share
    #[display("VSUMD")]
    Vsumd,
}

impl RollingOperator {
    /// All operators in emission order.
    pub const ALL: [Self; 29] = [
        Self::Roc,
        Self::Ma,
        Self::Std,
        Self::Beta,
        Self::Rsqr,
        Self::Resi,
        Self::Max,
        Self::Min,
        Self::Qtlu,
        Self::Qtld,
        Self::Rank,
        Self::Rsv,
        Self::Imax,
        Self::Imin,
        Self::Imxd,
        Self::Corr,
        Self::Cord,
        Self::Cntp,
        Self::Cntn,
        Self::Cntd,
        Self::Sump,
        Self::Sumn,
        Self::Sumd,
        Self::Vma,
        Self::Vstd,
        Self::Wvma,
        Self::Vsump,
        Self::Vsumn,
        Self::Vsumd,
    ];
}

impl std::str::FromStr for RollingOperator {
    type Err = AlphaError;

    fn from_str(s: &str) -> Result<Self> {
        let upper = s.to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|op| op.to_string() == upper)
            .ok_or_else(|| AlphaError::InvalidConfig(format!("unknown rolling operator: {s}")))
    }
}

/// Alpha-158 configuration.
///
/// The default reproduces the canonical 158 features: nine K-bar ratios,
/// `OPEN0 HIGH0 LOW0 VWAP0`, no volume block, and 29 rolling operators over
/// windows 5, 10, 20, 30 and 60.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Alpha158ConfigBuilder", into = "Alpha158ConfigBuilder")]
pub struct Alpha158Config {
    kbar: bool,
    price: bool,
    price_features: Vec<Field>,
    price_windows: Vec<usize>,
    volume: bool,
    volume_windows: Vec<usize>,
    rolling_windows: Vec<usize>,
    rolling_include: Option<BTreeSet<RollingOperator>>,
    rolling_exclude: BTreeSet<RollingOperator>,
    extended_price_windows: Vec<usize>,
}

impl Default for Alpha158Config {
    fn default() -> Self {
        Self {
            kbar: true,
            price: true,
            price_features: vec![Field::Open, Field::High, Field::Low, Field::Vwap],
            price_windows: vec![0],
            volume: false,
            volume_windows: vec![0],
            rolling_windows: vec![5, 10, 20, 30, 60],
            rolling_include: None,
            rolling_exclude: BTreeSet::new(),
            extended_price_windows: Vec::new(),
        }
    }
}

impl Alpha158Config {
    /// Start a builder seeded with the defaults.
    pub fn builder() -> Alpha158ConfigBuilder {
        Self::default().into()
    }

    /// Short-window variant for intraday or quick experiments (windows 5, 10, 20).
    pub fn fast() -> Self {
        Self {
            rolling_windows: vec![5, 10, 20],
            ..Self::default()
        }
    }

    /// Whether the K-bar block is emitted.
    pub const fn kbar(&self) -> bool {
        self.kbar
    }

    /// Whether the price block is emitted.
    pub const fn price(&self) -> bool {
        self.price
    }

    /// Price features, in emission order.
    pub fn price_features(&self) -> &[Field] {
        &self.price_features
    }

    /// Price lags.
    pub fn price_windows(&self) -> &[usize] {
        &self.price_windows
    }

    /// Whether the volume block is emitted.
    pub const fn volume(&self) -> bool {
        self.volume
    }

    /// Volume lags.
    pub fn volume_windows(&self) -> &[usize] {
        &self.volume_windows
    }

    /// Rolling windows, in emission order.
    pub fn rolling_windows(&self) -> &[usize] {
        &self.rolling_windows
    }

    /// Price lags of the extended block, emitted after the rolling block.
    pub fn extended_price_windows(&self) -> &[usize] {
        &self.extended_price_windows
    }

    /// Excluded rolling operators.
    pub const fn rolling_exclude(&self) -> &BTreeSet<RollingOperator> {
        &self.rolling_exclude
    }

    /// Whether rolling operator `op` carries computed values (otherwise NaN).
    pub fn is_rolling_active(&self, op: RollingOperator) -> bool {
        !self.rolling_exclude.contains(&op)
            && self.rolling_include.as_ref().is_none_or(|inc| inc.contains(&op))
    }

    /// Longest lookback over every configured block.
    pub fn max_window(&self) -> usize {
        let price: &[usize] = if self.price { &self.price_windows } else { &[] };
        let volume: &[usize] = if self.volume { &self.volume_windows } else { &[] };
        self.rolling_windows
            .iter()
            .chain(&self.extended_price_windows)
            .chain(price)
            .chain(volume)
            .copied()
            .max()
            .unwrap_or(0)
    }

    /// Minimum bar count accepted by the calculator: the longest window plus
    /// [`HISTORY_BUFFER`], which already includes the lagged bar.
    pub fn min_bars(&self) -> usize {
        self.max_window() + HISTORY_BUFFER
    }
}

/// Builder for [`Alpha158Config`]; also its serialized form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Alpha158ConfigBuilder {
    /// Emit the nine K-bar ratios
    pub kbar: bool,
    /// Emit the price block
    pub price: bool,
    /// Price features (volume not allowed)
    pub price_features: Vec<Field>,
    /// Price lags
    pub price_windows: Vec<usize>,
    /// Emit the volume block
    pub volume: bool,
    /// Volume lags
    pub volume_windows: Vec<usize>,
    /// Rolling windows
    pub rolling_windows: Vec<usize>,
    /// Rolling operators to compute, all when absent
    pub rolling_include: Option<Vec<RollingOperator>>,
    /// Rolling operators whose columns are NaN-padded
    pub rolling_exclude: Vec<RollingOperator>,
    /// Extra price lags appended after the rolling block
    pub extended_price_windows: Vec<usize>,
}

impl Default for Alpha158ConfigBuilder {
    fn default() -> Self {
        Alpha158Config::default().into()
    }
}

impl Alpha158ConfigBuilder {
    /// Toggle the K-bar block.
    pub const fn kbar(mut self, enabled: bool) -> Self {
        self.kbar = enabled;
        self
    }

    /// Toggle the price block.
    pub const fn price(mut self, enabled: bool) -> Self {
        self.price = enabled;
        self
    }

    /// Set price features.
    pub fn price_features(mut self, features: impl IntoIterator<Item = Field>) -> Self {
        self.price_features = features.into_iter().collect();
        self
    }

    /// Set price lags.
    pub fn price_windows(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.price_windows = windows.into_iter().collect();
        self
    }

    /// Toggle the volume block.
    pub const fn volume(mut self, enabled: bool) -> Self {
        self.volume = enabled;
        self
    }

    /// Set volume lags.
    pub fn volume_windows(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.volume_windows = windows.into_iter().collect();
        self
    }

    /// Set rolling windows.
    pub fn rolling_windows(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.rolling_windows = windows.into_iter().collect();
        self
    }

    /// Compute only these rolling operators; the rest are NaN-padded.
    pub fn rolling_include(mut self, ops: impl IntoIterator<Item = RollingOperator>) -> Self {
        self.rolling_include = Some(ops.into_iter().collect());
        self
    }

    /// NaN-pad these rolling operators.
    pub fn rolling_exclude(mut self, ops: impl IntoIterator<Item = RollingOperator>) -> Self {
        self.rolling_exclude.extend(ops);
        self
    }

    /// Set the extended price lags.
    pub fn extended_price_windows(mut self, windows: impl IntoIterator<Item = usize>) -> Self {
        self.extended_price_windows = windows.into_iter().collect();
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Alpha158Config> {
        if self.rolling_windows.is_empty() {
            return Err(AlphaError::InvalidConfig(
                "alpha158 needs at least one rolling window".to_string(),
            ));
        }
        validate_windows("rolling_windows", &self.rolling_windows, false)?;
        validate_windows("price_windows", &self.price_windows, true)?;
        validate_windows("volume_windows", &self.volume_windows, true)?;
        validate_windows("extended_price_windows", &self.extended_price_windows, true)?;

        let mut seen = BTreeSet::new();
        for &field in &self.price_features {
            if !field.is_price() {
                return Err(AlphaError::InvalidConfig(format!(
                    "price_features: {field} is not a price field"
                )));
            }
            if !seen.insert(field) {
                return Err(AlphaError::InvalidConfig(format!(
                    "price_features: duplicate {field}"
                )));
            }
        }

        if self.price
            && let Some(w) = self
                .extended_price_windows
                .iter()
                .find(|w| self.price_windows.contains(w))
        {
            return Err(AlphaError::InvalidConfig(format!(
                "extended_price_windows: lag {w} already emitted by the price block"
            )));
        }

        Ok(Alpha158Config {
            kbar: self.kbar,
            price: self.price,
            price_features: self.price_features,
            price_windows: self.price_windows,
            volume: self.volume,
            volume_windows: self.volume_windows,
            rolling_windows: self.rolling_windows,
            rolling_include: self.rolling_include.map(|inc| inc.into_iter().collect()),
            rolling_exclude: self.rolling_exclude.into_iter().collect(),
            extended_price_windows: self.extended_price_windows,
        })
    }
}

impl TryFrom<Alpha158ConfigBuilder> for Alpha158Config {
    type Error = AlphaError;

    fn try_from(builder: Alpha158ConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<Alpha158Config> for Alpha158ConfigBuilder {
    fn from(config: Alpha158Config) -> Self {
        Self {
            kbar: config.kbar,
            price: config.price,
            price_features: config.price_features,
            price_windows: config.price_windows,
            volume: config.volume,
            volume_windows: config.volume_windows,
            rolling_windows: config.rolling_windows,
            rolling_include: config.rolling_include.map(|inc| inc.into_iter().collect()),
            rolling_exclude: config.rolling_exclude.into_iter().collect(),
            extended_price_windows: config.extended_price_windows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operator_order_and_names() {
        assert_eq!(RollingOperator::ALL.len(), 29);
        assert_eq!(RollingOperator::ALL[0].to_string(), "ROC");
        assert_eq!(RollingOperator::ALL[28].to_string(), "VSUMD");
        assert_eq!("wvma".parse::<RollingOperator>().unwrap(), RollingOperator::Wvma);
        assert!("EMA".parse::<RollingOperator>().is_err());
    }

    #[test]
    fn test_default_min_bars() {
        assert_eq!(Alpha158Config::default().min_bars(), 70);
        assert_eq!(Alpha158Config::fast().min_bars(), 30);
        for config in [Alpha158Config::default(), Alpha158Config::fast()] {
            assert!(config.min_bars() > config.max_window());
        }
    }

    #[test]
    fn test_exclusion_and_inclusion() {
        let config = Alpha158Config::builder()
            .rolling_include([RollingOperator::Ma, RollingOperator::Std])
            .rolling_exclude([RollingOperator::Std])
            .build()
            .unwrap();

        assert!(config.is_rolling_active(RollingOperator::Ma));
        assert!(!config.is_rolling_active(RollingOperator::Std));
        assert!(!config.is_rolling_active(RollingOperator::Roc));
    }

    #[test]
    fn test_invalid_configs() {
        assert!(Alpha158Config::builder().rolling_windows(Vec::new()).build().is_err());
        assert!(Alpha158Config::builder().rolling_windows([5, 0]).build().is_err());
        assert!(Alpha158Config::builder().price_features([Field::Volume]).build().is_err());
        assert!(
            Alpha158Config::builder()
                .extended_price_windows([0, 1])
                .build()
                .is_err()
        );
        assert!(
            Alpha158Config::builder()
                .extended_price_windows([1, 2])
                .build()
                .is_ok()
        );
    }

    #[test]
    fn test_deserialize_partial_json() {
        let config: Alpha158Config =
            serde_json::from_str(r#"{"rolling_windows": [5, 10], "rolling_exclude": ["CORD"]}"#)
                .unwrap();
        assert_eq!(config.rolling_windows(), &[5, 10]);
        assert!(!config.is_rolling_active(RollingOperator::Cord));
        assert!(config.kbar());
    }
}
