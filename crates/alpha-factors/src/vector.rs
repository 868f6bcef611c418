//! Immutable feature vectors.

use crate::{AlphaError, FactorFamily, NanStrategy, Result};
use serde::{Deserialize, Serialize};

/// One frozen `(symbol, timestamp)` sample: ordered names and their values.
///
/// Construction copies the supplied names and values; accessors only hand out
/// shared borrows or fresh copies, so nothing outside the vector can change
/// what it holds. Deserialization goes through [`new`](Self::new).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawVector")]
pub struct AlphaFeatureVector {
    symbol: String,
    timestamp: i64,
    family: FactorFamily,
    names: Vec<String>,
    values: Vec<f64>,
}

impl AlphaFeatureVector {
    /// Build a vector from parallel name and value slices, rejecting misaligned inputs.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: i64,
        family: FactorFamily,
        names: &[String],
        values: &[f64],
    ) -> Result<Self> {
        if names.len() != values.len() {
            return Err(AlphaError::LengthMismatch {
                expected: names.len(),
                actual: values.len(),
            });
        }
        Ok(Self::from_aligned(symbol, timestamp, family, names, values))
    }

    /// Build a vector from slices already known to align.
    pub(crate) fn from_aligned(
        symbol: impl Into<String>,
        timestamp: i64,
        family: FactorFamily,
        names: &[String],
        values: &[f64],
    ) -> Self {
        debug_assert_eq!(names.len(), values.len());
        Self {
            symbol: symbol.into(),
            timestamp,
            family,
            names: names.to_vec(),
            values: values.to_vec(),
        }
    }

    /// Instrument of this sample.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Timestamp in seconds.
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Family tag.
    pub const fn family(&self) -> FactorFamily {
        self.family
    }

    /// Ordered factor names.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Values, aligned with [`names`](Self::names).
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Owned copy of the values.
    pub fn to_values(&self) -> Vec<f64> {
        self.values.clone()
    }

    /// Number of factors.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the vector holds no factors.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.names.iter().position(|n| n == name).map(|i| self.values[i])
    }

    /// A copy with non-finite values handled by `strategy`.
    pub fn with_nan_strategy(&self, strategy: NanStrategy) -> Result<Self> {
        let values = strategy.apply(&self.values, &self.symbol, self.timestamp, &self.names)?;
        Ok(Self {
            values,
            ..self.clone()
        })
    }
}

/// Unvalidated serialized form.
#[derive(Deserialize)]
struct RawVector {
    symbol: String,
    timestamp: i64,
    family: FactorFamily,
    names: Vec<String>,
    values: Vec<f64>,
}

impl TryFrom<RawVector> for AlphaFeatureVector {
    type Error = AlphaError;

    fn try_from(raw: RawVector) -> Result<Self> {
        Self::new(raw.symbol, raw.timestamp, raw.family, &raw.names, &raw.values)
    }
}
