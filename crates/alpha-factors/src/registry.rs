//! Calculator registry for discovery and bulk computation.
//!
//! The registry holds at most one calculator per [`FactorFamily`] and
//! iterates them in family order.

use crate::{
    Alpha101Calculator, Alpha158Calculator, Alpha360Calculator, AlphaCalculator, AlphaConfig,
    AlphaFactorResult, Bar, ConfigurableCalculator, FactorFamily, Result,
};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Metadata for family introspection.
#[derive(Debug, Clone, Serialize)]
pub struct FamilyInfo {
    /// Family tag
    pub family: FactorFamily,
    /// Human-readable description
    pub description: String,
    /// Number of factors under the current config
    pub factor_count: usize,
    /// Hard minimum history
    pub min_bars: usize,
}

/// Registry of family calculators.
#[derive(Debug, Default, Clone)]
pub struct AlphaRegistry {
    calculators: BTreeMap<FactorFamily, Arc<dyn AlphaCalculator>>,
}

impl AlphaRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register all three families with their default configs.
    pub fn with_defaults() -> Self {
        Self::from_config(&AlphaConfig::default())
    }

    /// Register all three families with the given configs.
    pub fn from_config(config: &AlphaConfig) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(Alpha101Calculator::with_config(config.alpha101.clone())));
        registry.register(Arc::new(Alpha158Calculator::with_config(config.alpha158.clone())));
        registry.register(Arc::new(Alpha360Calculator::with_config(config.alpha360.clone())));
        registry
    }

    /// Register a calculator, replacing any previous one of the same family.
    pub fn register(&mut self, calculator: Arc<dyn AlphaCalculator>) {
        self.calculators.insert(calculator.family(), calculator);
    }

    /// Calculator for `family`.
    pub fn get(&self, family: FactorFamily) -> Option<&dyn AlphaCalculator> {
        self.calculators.get(&family).map(|c| c.as_ref())
    }

    /// Metadata for every registered family.
    pub fn all_info(&self) -> Vec<FamilyInfo> {
        self.calculators
            .values()
            .map(|c| FamilyInfo {
                family: c.family(),
                description: description(c.family()).to_string(),
                factor_count: c.factor_count(),
                min_bars: c.min_bars(),
            })
            .collect()
    }

    /// Registered families in order.
    pub fn families(&self) -> Vec<FactorFamily> {
        self.calculators.keys().copied().collect()
    }

    /// Compute every registered family for the latest bar of `bars`.
    ///
    /// Stops at the first family that rejects the history.
    pub fn compute_all(&self, bars: &[Bar]) -> Result<Vec<AlphaFactorResult>> {
        self.calculators.values().map(|c| c.compute(bars)).collect()
    }

    /// Number of registered families.
    pub fn len(&self) -> usize {
        self.calculators.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.calculators.is_empty()
    }
}

const fn description(family: FactorFamily) -> &'static str {
    match family {
        FactorFamily::Alpha101 => "WorldQuant 101 formulaic alphas over a single bar history",
        FactorFamily::Alpha158 => "K-bar, lagged price/volume and rolling-window statistics",
        FactorFamily::Alpha360 => "Normalized raw price and volume history",
    }
}
