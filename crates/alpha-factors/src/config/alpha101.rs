//! Alpha-101 factor selection.

use crate::{AlphaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Number of formulaic alphas in the family.
pub const ALPHA101_COUNT: usize = 101;

/// Alphas whose published definitions need industry classification or market
/// capitalization, neither of which a single bar history carries.
pub const UNSUPPORTED: [usize; 19] = [
    48, 56, 58, 59, 63, 67, 69, 70, 76, 79, 80, 82, 87, 89, 90, 91, 93, 97, 100,
];

/// Which of the 101 alphas to emit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Alpha101ConfigBuilder", into = "Alpha101ConfigBuilder")]
pub struct Alpha101Config {
    include: Option<BTreeSet<usize>>,
    exclude: BTreeSet<usize>,
}

impl Alpha101Config {
    /// Start a validated builder.
    pub fn builder() -> Alpha101ConfigBuilder {
        Alpha101ConfigBuilder::default()
    }

    /// Every alpha that can be computed from bars alone.
    pub fn computable() -> Self {
        Self {
            include: None,
            exclude: UNSUPPORTED.into_iter().collect(),
        }
    }

    /// Whether alpha `index` (1-based) is emitted.
    pub fn is_enabled(&self, index: usize) -> bool {
        (1..=ALPHA101_COUNT).contains(&index)
            && !self.exclude.contains(&index)
            && self.include.as_ref().is_none_or(|inc| inc.contains(&index))
    }

    /// Explicit include list, `None` meaning "all".
    pub const fn include(&self) -> Option<&BTreeSet<usize>> {
        self.include.as_ref()
    }

    /// Excluded indices.
    pub const fn exclude(&self) -> &BTreeSet<usize> {
        &self.exclude
    }
}

/// Builder for [`Alpha101Config`]; also its serialized form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alpha101ConfigBuilder {
    /// Indices to include, all when absent
    #[serde(default)]
    pub include: Option<Vec<usize>>,
    /// Indices to exclude; wins over `include`
    #[serde(default)]
    pub exclude: Vec<usize>,
}

impl Alpha101ConfigBuilder {
    /// Restrict output to these indices.
    pub fn include(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.include = Some(indices.into_iter().collect());
        self
    }

    /// Drop these indices.
    pub fn exclude(mut self, indices: impl IntoIterator<Item = usize>) -> Self {
        self.exclude.extend(indices);
        self
    }

    /// Validate and freeze.
    pub fn build(self) -> Result<Alpha101Config> {
        let check = |i: usize| {
            if (1..=ALPHA101_COUNT).contains(&i) {
                Ok(i)
            } else {
                Err(AlphaError::InvalidConfig(format!(
                    "alpha index {i} outside 1..={ALPHA101_COUNT}"
                )))
            }
        };
        let include = self
            .include
            .map(|inc| inc.into_iter().map(check).collect::<Result<BTreeSet<_>>>())
            .transpose()?;
        let exclude = self.exclude.into_iter().map(check).collect::<Result<BTreeSet<_>>>()?;

        let config = Alpha101Config { include, exclude };
        if !(1..=ALPHA101_COUNT).any(|i| config.is_enabled(i)) {
            return Err(AlphaError::InvalidConfig(
                "alpha101 selection enables no factors".to_string(),
            ));
        }
        Ok(config)
    }
}

impl TryFrom<Alpha101ConfigBuilder> for Alpha101Config {
    type Error = AlphaError;

    fn try_from(builder: Alpha101ConfigBuilder) -> Result<Self> {
        builder.build()
    }
}

impl From<Alpha101Config> for Alpha101ConfigBuilder {
    fn from(config: Alpha101Config) -> Self {
        Self {
            include: config.include.map(|inc| inc.into_iter().collect()),
            exclude: config.exclude.into_iter().collect(),
        }
    }
}
