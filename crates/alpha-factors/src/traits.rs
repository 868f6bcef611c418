//! Core trait definitions for alpha calculators.
//!
//! Every factor family implements [`AlphaCalculator`], which provides a
//! unified interface for turning a bar history into an ordered factor result.

use crate::{AlphaFactorResult, Bar, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// Factor family tag carried by results and vectors.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FactorFamily {
    /// WorldQuant 101 formulaic alphas
    #[display("alpha101")]
    Alpha101,
    /// K-bar, price, volume and rolling-statistic features
    #[display("alpha158")]
    Alpha158,
    /// Raw normalized price and volume history
    #[display("alpha360")]
    Alpha360,
}

impl FactorFamily {
    /// All families in canonical order.
    pub const ALL: [Self; 3] = [Self::Alpha101, Self::Alpha158, Self::Alpha360];
}

impl std::str::FromStr for FactorFamily {
    type Err = crate::AlphaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "alpha101" | "101" => Ok(Self::Alpha101),
            "alpha158" | "158" => Ok(Self::Alpha158),
            "alpha360" | "360" => Ok(Self::Alpha360),
            other => Err(crate::AlphaError::InvalidInput(format!("unknown factor family: {other}"))),
        }
    }
}

/// A calculator that turns a bar history into one ordered factor sample.
///
/// Implementations are stateless per call: the same config and bars always
/// produce bit-identical values, and a calculator can be shared across threads.
pub trait AlphaCalculator: Send + Sync + std::fmt::Debug {
    /// Family this calculator belongs to.
    fn family(&self) -> FactorFamily;

    /// Canonical factor order for this calculator's config.
    ///
    /// The result of [`compute`](Self::compute) always lists exactly these names.
    fn factor_names(&self) -> Vec<String>;

    /// Minimum number of bars accepted by [`compute`](Self::compute).
    fn min_bars(&self) -> usize;

    /// Compute factors for the latest bar of `bars`.
    ///
    /// Rejects the whole history when it is empty, unordered or shorter than
    /// [`min_bars`](Self::min_bars).
    fn compute(&self, bars: &[Bar]) -> Result<AlphaFactorResult>;

    /// Number of factors produced per sample.
    fn factor_count(&self) -> usize {
        self.factor_names().len()
    }
}

/// A calculator that supports runtime configuration.
pub trait ConfigurableCalculator: AlphaCalculator {
    /// Configuration type for this calculator.
    type Config: Clone + Send + Sync + std::fmt::Debug;

    /// Create a calculator with the given configuration.
    fn with_config(config: Self::Config) -> Self;

    /// Returns the current configuration.
    fn config(&self) -> &Self::Config;
}
