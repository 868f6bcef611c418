//! Immutable per-family factor configurations.
//!
//! Configs are validated once, at construction (or deserialization, which
//! goes through the same builder), and never mutated afterwards. Exclusion
//! always wins over inclusion.

pub mod alpha101;
pub mod alpha158;
pub mod alpha360;

pub use alpha101::{Alpha101Config, Alpha101ConfigBuilder};
pub use alpha158::{Alpha158Config, Alpha158ConfigBuilder, RollingOperator};
pub use alpha360::{Alpha360Config, Alpha360ConfigBuilder};

use crate::{AlphaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Configuration of all three families, as loaded from a JSON file.
///
/// Missing sections take their family's defaults; present sections are
/// validated by the family's builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AlphaConfig {
    /// Alpha-101 selection
    pub alpha101: Alpha101Config,
    /// Alpha-158 layout
    pub alpha158: Alpha158Config,
    /// Alpha-360 layout
    pub alpha360: Alpha360Config,
}

impl AlphaConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Reject empty, zero or duplicated window lists.
pub(crate) fn validate_windows(label: &str, windows: &[usize], allow_zero: bool) -> Result<()> {
    let mut seen = BTreeSet::new();
    for &w in windows {
        if w == 0 && !allow_zero {
            return Err(AlphaError::InvalidConfig(format!("{label}: window 0 is not allowed")));
        }
        if !seen.insert(w) {
            return Err(AlphaError::InvalidConfig(format!("{label}: duplicate window {w}")));
        }
    }
    Ok(())
}
