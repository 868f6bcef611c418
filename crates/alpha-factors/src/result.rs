//! Ordered factor results.

use crate::{AlphaError, AlphaFeatureVector, FactorFamily, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Factor values for one `(symbol, timestamp)` sample, in emission order.
///
/// Append-only: re-adding a name overwrites its value but keeps its original
/// slot, so every ordered name appears in the value map exactly once.
/// Deserialized results are held to the same rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawResult")]
pub struct AlphaFactorResult {
    symbol: String,
    timestamp: i64,
    family: FactorFamily,
    names: Vec<String>,
    values: HashMap<String, f64>,
}

impl AlphaFactorResult {
    /// Create an empty result.
    pub fn new(symbol: impl Into<String>, timestamp: i64, family: FactorFamily) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            family,
            names: Vec::new(),
            values: HashMap::new(),
        }
    }

    /// Create an empty result with room for `capacity` factors.
    pub fn with_capacity(
        symbol: impl Into<String>,
        timestamp: i64,
        family: FactorFamily,
        capacity: usize,
    ) -> Self {
        Self {
            names: Vec::with_capacity(capacity),
            values: HashMap::with_capacity(capacity),
            ..Self::new(symbol, timestamp, family)
        }
    }

    /// Add or overwrite one factor.
    pub fn add(&mut self, name: impl Into<String>, value: f64) {
        let name = name.into();
        if self.values.insert(name.clone(), value).is_none() {
            self.names.push(name);
        }
    }

    /// Add factors in iteration order.
    pub fn add_all<N: Into<String>>(&mut self, factors: impl IntoIterator<Item = (N, f64)>) {
        for (name, value) in factors {
            self.add(name, value);
        }
    }

    /// Value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    /// Instrument of this sample.
    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Timestamp of this sample, in seconds.
    pub const fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Family that produced this sample.
    pub const fn family(&self) -> FactorFamily {
        self.family
    }

    /// Factor names in emission order.
    pub fn ordered_names(&self) -> &[String] {
        &self.names
    }

    /// Number of factors.
    pub fn factor_count(&self) -> usize {
        self.names.len()
    }

    /// Whether no factor has been added.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// `(name, value)` pairs in emission order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.names.iter().map(|n| (n.as_str(), self.values.get(n).copied().unwrap_or(0.0)))
    }

    /// Values in emission order; a name missing from the map reads as 0.0.
    pub fn ordered_values(&self) -> Vec<f64> {
        self.iter().map(|(_, v)| v).collect()
    }

    /// Freeze into an immutable feature vector.
    pub fn to_feature_vector(&self) -> AlphaFeatureVector {
        AlphaFeatureVector::from_aligned(
            self.symbol.clone(),
            self.timestamp,
            self.family,
            &self.names,
            &self.ordered_values(),
        )
    }
}

/// Unvalidated serialized form.
#[derive(Deserialize)]
struct RawResult {
    symbol: String,
    timestamp: i64,
    family: FactorFamily,
    names: Vec<String>,
    values: HashMap<String, f64>,
}

impl TryFrom<RawResult> for AlphaFactorResult {
    type Error = AlphaError;

    fn try_from(raw: RawResult) -> Result<Self> {
        let mut seen = HashSet::with_capacity(raw.names.len());
        if let Some(name) = raw.names.iter().find(|&name| !seen.insert(name)) {
            return Err(AlphaError::InvalidInput(format!("duplicate factor name {name}")));
        }
        if let Some(name) = raw.names.iter().find(|&name| !raw.values.contains_key(name)) {
            return Err(AlphaError::InvalidInput(format!("no value for factor {name}")));
        }
        if raw.values.len() != raw.names.len() {
            return Err(AlphaError::LengthMismatch {
                expected: raw.names.len(),
                actual: raw.values.len(),
            });
        }
        Ok(Self {
            symbol: raw.symbol,
            timestamp: raw.timestamp,
            family: raw.family,
            names: raw.names,
            values: raw.values,
        })
    }
}
