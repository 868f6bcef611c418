//! Alpha-360: the raw recent history of each field, normalized by the latest
//! close (prices) or the latest volume (volume).

use crate::ops::{EPS, safe_div};
use crate::order::{alpha360_names, field_name};
use crate::{
    Alpha360Config, AlphaCalculator, AlphaError, AlphaFactorResult, Bar, BaseSeries,
    ConfigurableCalculator, FactorFamily, Field, Result, validate_history,
};
use tracing::debug;

/// Alpha-360 calculator.
#[derive(Debug, Clone, Default)]
pub struct Alpha360Calculator {
    config: Alpha360Config,
}

impl Alpha360Calculator {
    /// Calculator with the default 6 × 60 layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalized history for the latest bar.
    ///
    /// Returns `Ok(None)` when fewer than `lookback` bars are available.
    pub fn calculate(&self, bars: &[Bar]) -> Result<Option<AlphaFactorResult>> {
        validate_history(bars)?;
        let lookback = self.config.lookback();
        if bars.len() < lookback {
            debug!(bars = bars.len(), lookback, "Not enough history for alpha360");
            return Ok(None);
        }

        let recent = &bars[bars.len() - lookback..];
        let last = &recent[lookback - 1];
        let data = BaseSeries::from_bars(recent);
        let fields = self.config.fields();

        let mut result = AlphaFactorResult::with_capacity(
            last.symbol.as_str(),
            last.timestamp,
            FactorFamily::Alpha360,
            fields.len() * lookback,
        );
        for field in fields {
            let series = field.series(&data);
            let scale = match field {
                Field::Volume => last.volume + EPS,
                _ => last.close,
            };
            for lag in (0..lookback).rev() {
                result.add(field_name(field, lag), safe_div(series[lookback - 1 - lag], scale));
            }
        }
        Ok(Some(result))
    }
}

impl AlphaCalculator for Alpha360Calculator {
    fn family(&self) -> FactorFamily {
        FactorFamily::Alpha360
    }

    fn factor_names(&self) -> Vec<String> {
        alpha360_names(&self.config)
    }

    fn min_bars(&self) -> usize {
        self.config.lookback()
    }

    fn compute(&self, bars: &[Bar]) -> Result<AlphaFactorResult> {
        self.calculate(bars)?.ok_or(AlphaError::InsufficientData {
            family: FactorFamily::Alpha360,
            required: self.config.lookback(),
            available: bars.len(),
        })
    }
}

impl ConfigurableCalculator for Alpha360Calculator {
    type Config = Alpha360Config;

    fn with_config(config: Self::Config) -> Self {
        Self { config }
    }

    fn config(&self) -> &Self::Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bar::tests::synthetic_bars;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_layout() {
        let calc = Alpha360Calculator::new();
        let bars = synthetic_bars("AAPL", 75);
        let result = calc.calculate(&bars).unwrap().unwrap();

        assert_eq!(result.factor_count(), 360);
        assert_eq!(result.ordered_names(), calc.factor_names().as_slice());
        assert_eq!(result.ordered_names()[0], "CLOSE59");
        assert_eq!(result.ordered_names()[59], "CLOSE0");
        assert_eq!(result.get("CLOSE0"), Some(1.0));

        let last = bars.last().unwrap();
        let oldest = &bars[bars.len() - 60];
        assert_relative_eq!(result.get("OPEN59").unwrap(), oldest.open / last.close);
        assert_relative_eq!(result.get("VOLUME0").unwrap(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_short_history_has_no_result() {
        let calc = Alpha360Calculator::new();
        assert!(calc.calculate(&synthetic_bars("AAPL", 59)).unwrap().is_none());
        assert!(matches!(
            calc.compute(&synthetic_bars("AAPL", 59)),
            Err(AlphaError::InsufficientData { required: 60, .. })
        ));
        assert!(calc.calculate(&[]).is_err());
    }

    #[test]
    fn test_config_is_honored() {
        let config = Alpha360Config::builder()
            .lookback(5)
            .price_fields([Field::Vwap, Field::Close])
            .include_volume(false)
            .build()
            .unwrap();
        let calc = Alpha360Calculator::with_config(config);
        let result = calc.calculate(&synthetic_bars("AAPL", 5)).unwrap().unwrap();

        assert_eq!(result.factor_count(), 10);
        assert_eq!(result.ordered_names()[0], "CLOSE4");
        assert_eq!(result.ordered_names()[5], "VWAP4");
        assert_eq!(result.ordered_names(), calc.factor_names().as_slice());
    }
}
