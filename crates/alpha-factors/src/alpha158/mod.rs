//! Alpha-158: K-bar shape, lagged price and volume ratios, and rolling
//! statistics over a set of windows.
//!
//! The driver runs four sub-calculators in emission order. Rolling operators
//! are always computed for every window; operators the config excludes are
//! then overwritten with NaN so the vector's shape never depends on the
//! selection.

mod kbar;
mod price;
mod rolling;
mod volume;

use crate::order::{KBAR_NAMES, alpha158_names, field_name, rolling_name};
use crate::{
    Alpha158Config, AlphaCalculator, AlphaError, AlphaFactorResult, Bar, BaseSeries,
    ConfigurableCalculator, FactorFamily, Field, Result, RollingOperator, validate_history,
};
use rolling::RollingInputs;
use tracing::trace;

/// Alpha-158 calculator.
#[derive(Debug, Clone, Default)]
pub struct Alpha158Calculator {
    config: Alpha158Config,
}

impl Alpha158Calculator {
    /// Calculator with the default 158-feature configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute all configured features for the latest bar.
    pub fn calculate(&self, bars: &[Bar]) -> Result<AlphaFactorResult> {
        validate_history(bars)?;
        let required = self.config.min_bars();
        if bars.len() < required {
            return Err(AlphaError::InsufficientData {
                family: FactorFamily::Alpha158,
                required,
                available: bars.len(),
            });
        }

        // Every feature reads at most `max_window` bars behind the latest one.
        let recent = &bars[bars.len() - (self.config.max_window() + 1)..];
        let last = &recent[recent.len() - 1];
        let data = BaseSeries::from_bars(recent);
        let config = &self.config;

        let mut result = AlphaFactorResult::with_capacity(
            last.symbol.as_str(),
            last.timestamp,
            FactorFamily::Alpha158,
            alpha158_names(config).len(),
        );

        if config.kbar() {
            result.add_all(KBAR_NAMES.into_iter().zip(kbar::compute(last)));
        }
        if config.price() {
            push_prices(&mut result, &data, config.price_features(), config.price_windows());
        }
        if config.volume() {
            for &w in config.volume_windows() {
                result.add(field_name(Field::Volume, w), volume::compute(&data, w));
            }
        }

        let inputs = RollingInputs::new(&data);
        for op in RollingOperator::ALL {
            for &w in config.rolling_windows() {
                result.add(rolling_name(op, w), inputs.value(op, w));
            }
        }
        for op in RollingOperator::ALL.into_iter().filter(|&op| !config.is_rolling_active(op)) {
            trace!(operator = %op, "Masking excluded rolling operator");
            for &w in config.rolling_windows() {
                result.add(rolling_name(op, w), f64::NAN);
            }
        }

        push_prices(
            &mut result,
            &data,
            config.price_features(),
            config.extended_price_windows(),
        );
        Ok(result)
    }
}

fn push_prices(result: &mut AlphaFactorResult, data: &BaseSeries, features: &[Field], windows: &[usize]) {
    for &field in features {
        for &w in windows {
            result.add(field_name(field, w), price::compute(data, field, w));
        }
    }
}

impl AlphaCalculator for Alpha158Calculator {
    fn family(&self) -> FactorFamily {
        FactorFamily::Alpha158
    }

    fn factor_names(&self) -> Vec<String> {
        alpha158_names(&self.config)
    }

    fn min_bars(&self) -> usize {
        self.config.min_bars()
    }

    fn compute(&self, bars: &[Bar]) -> Result<AlphaFactorResult> {
        self.calculate(bars)
    }
}

impl ConfigurableCalculator for Alpha158Calculator {
    type Config = Alpha158Config;

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
    fn test_default_emits_158() {
        let calc = Alpha158Calculator::new();
        let result = calc.calculate(&synthetic_bars("AAPL", 100)).unwrap();
        assert_eq!(result.factor_count(), 158);
        assert_eq!(result.ordered_names(), calc.factor_names().as_slice());
        assert!(result.ordered_values().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_min_bars_contract() {
        let calc = Alpha158Calculator::new();
        assert_eq!(calc.min_bars(), 70);
        assert!(calc.calculate(&synthetic_bars("AAPL", 70)).is_ok());
        assert!(matches!(
            calc.calculate(&synthetic_bars("AAPL", 69)),
            Err(AlphaError::InsufficientData {
                required: 70,
                available: 69,
                ..
            })
        ));
    }

    #[test]
    fn test_longest_lag_fits_minimum_history() {
        let config = Alpha158Config::builder().extended_price_windows([80]).build().unwrap();
        let calc = Alpha158Calculator::with_config(config);
        assert_eq!(calc.min_bars(), 90);

        let bars = synthetic_bars("AAPL", 90);
        let result = calc.calculate(&bars).unwrap();
        let last = bars.last().unwrap();
        assert_relative_eq!(result.get("OPEN80").unwrap(), bars[bars.len() - 81].open / last.close);
    }

    #[test]
    fn test_exclusion_keeps_shape() {
        let bars = synthetic_bars("AAPL", 100);
        let full = Alpha158Calculator::new().calculate(&bars).unwrap();
        let config = Alpha158Config::builder()
            .rolling_exclude([RollingOperator::Corr, RollingOperator::Vstd])
            .build()
            .unwrap();
        let masked = Alpha158Calculator::with_config(config).calculate(&bars).unwrap();

        assert_eq!(full.ordered_names(), masked.ordered_names());
        for name in full.ordered_names() {
            let (a, b) = (full.get(name).unwrap(), masked.get(name).unwrap());
            if name.starts_with("CORR") || name.starts_with("VSTD") {
                assert!(b.is_nan(), "{name}");
            } else {
                assert_eq!(a.to_bits(), b.to_bits(), "{name}");
            }
        }
    }

    #[test]
    fn test_history_beyond_window_is_ignored() {
        let bars = synthetic_bars("AAPL", 200);
        let calc = Alpha158Calculator::new();
        let long = calc.calculate(&bars).unwrap();
        let short = calc.calculate(&bars[bars.len() - 70..]).unwrap();
        assert_eq!(long.ordered_values(), short.ordered_values());
    }

    #[test]
    fn test_price_features_relative_to_close() {
        let bars = synthetic_bars("AAPL", 80);
        let result = Alpha158Calculator::new().calculate(&bars).unwrap();
        let last = bars.last().unwrap();
        assert_relative_eq!(result.get("OPEN0").unwrap(), last.open / last.close);
        assert_relative_eq!(
            result.get("ROC5").unwrap(),
            bars[bars.len() - 6].close / last.close
        );
    }
}
