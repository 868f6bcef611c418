//! WorldQuant 101 formulaic alphas.
//!
//! Each alpha is a scalar formula over [`BaseSeries`]; only the latest sample of
//! the formula's output series is kept. Formulas live twenty to a file and are
//! dispatched by index through [`evaluate`].
//!
//! Failures stay inside the alpha that caused them:
//! - alphas needing industry or market-cap data emit NaN and are reported once
//!   per call at `info` level
//! - a formula whose intermediate series run out of history emits NaN
//! - any other fault, including a panic, is logged and replaced by 0.0

mod group1;
mod group2;
mod group3;
mod group4;
mod group5;

use crate::config::alpha101::{ALPHA101_COUNT, UNSUPPORTED};
use crate::order::{alpha101_name, alpha101_names};
use crate::{
    AlphaCalculator, AlphaError, AlphaFactorResult, Alpha101Config, Bar, BaseSeries,
    ConfigurableCalculator, FactorFamily, Result, Series, validate_history,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Hard minimum history.
pub const MIN_BARS: usize = 60;

/// History below which long-lookback alphas lose accuracy.
pub const RECOMMENDED_BARS: usize = 250;

/// Alphas whose formulas read more than [`MIN_BARS`] bars of history.
pub const LONG_LOOKBACK: [usize; 21] = [
    7, 19, 24, 32, 36, 37, 39, 52, 61, 64, 65, 71, 74, 75, 78, 81, 88, 94, 95, 96, 99,
];

type Formula = fn(&BaseSeries) -> Series;

fn lookup(index: usize) -> Option<Formula> {
    match index {
        1..=20 => group1::lookup(index),
        21..=40 => group2::lookup(index),
        41..=60 => group3::lookup(index),
        61..=80 => group4::lookup(index),
        81..=101 => group5::lookup(index),
        _ => None,
    }
}

/// Evaluate alpha `index` (1-based) and return its latest value.
///
/// # Errors
///
/// - [`AlphaError::Unsupported`] for alphas needing cross-sectional data
/// - [`AlphaError::InsufficientWindow`] when the formula's output is empty
/// - [`AlphaError::Computation`] for an unknown index or a panicking formula
pub fn evaluate(index: usize, data: &BaseSeries) -> Result<f64> {
    evaluate_with(index, data, lookup)
}

fn evaluate_with(
    index: usize,
    data: &BaseSeries,
    lookup: fn(usize) -> Option<Formula>,
) -> Result<f64> {
    let name = alpha101_name(index);
    if UNSUPPORTED.contains(&index) {
        return Err(AlphaError::Unsupported(name));
    }
    let formula = lookup(index).ok_or_else(|| AlphaError::Computation {
        factor: name.clone(),
        reason: format!("no formula for index {index}"),
    })?;

    let series = panic::catch_unwind(AssertUnwindSafe(|| formula(data))).map_err(|payload| {
        AlphaError::Computation {
            factor: name.clone(),
            reason: panic_reason(payload.as_ref()),
        }
    })?;
    series
        .latest()
        .ok_or(AlphaError::InsufficientWindow { factor: name })
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "formula panicked".to_string())
}

/// Alpha-101 calculator.
///
/// # Example
///
/// ```ignore
/// use alpha_factors::{Alpha101Calculator, Alpha101Config, ConfigurableCalculator};
///
/// let calc = Alpha101Calculator::with_config(Alpha101Config::computable());
/// let result = calc.calculate(&bars)?;
/// assert_eq!(result.factor_count(), 82);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Alpha101Calculator {
    config: Alpha101Config,
}

impl Alpha101Calculator {
    /// Calculator emitting all 101 alphas.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute every enabled alpha for the latest bar.
    pub fn calculate(&self, bars: &[Bar]) -> Result<AlphaFactorResult> {
        self.calculate_with(bars, lookup)
    }

    fn calculate_with(
        &self,
        bars: &[Bar],
        lookup: fn(usize) -> Option<Formula>,
    ) -> Result<AlphaFactorResult> {
        validate_history(bars)?;
        if bars.len() < MIN_BARS {
            return Err(AlphaError::InsufficientData {
                family: FactorFamily::Alpha101,
                required: MIN_BARS,
                available: bars.len(),
            });
        }
        let last = &bars[bars.len() - 1];

        if bars.len() < RECOMMENDED_BARS {
            let affected: Vec<usize> = LONG_LOOKBACK
                .into_iter()
                .filter(|&i| self.config.is_enabled(i))
                .collect();
            if !affected.is_empty() {
                warn!(
                    symbol = %last.symbol,
                    bars = bars.len(),
                    recommended = RECOMMENDED_BARS,
                    alphas = ?affected,
                    "Short history; long-lookback alphas may be NaN or inaccurate"
                );
            }
        }

        let data = BaseSeries::from_bars(bars);
        let mut result = AlphaFactorResult::with_capacity(
            last.symbol.as_str(),
            last.timestamp,
            FactorFamily::Alpha101,
            ALPHA101_COUNT,
        );
        let mut unavailable = Vec::new();

        for index in (1..=ALPHA101_COUNT).filter(|&i| self.config.is_enabled(i)) {
            let value = match evaluate_with(index, &data, lookup) {
                Ok(value) => value,
                Err(AlphaError::Unsupported(_)) => {
                    unavailable.push(index);
                    f64::NAN
                }
                Err(AlphaError::InsufficientWindow { factor }) => {
                    debug!(symbol = %last.symbol, %factor, bars = bars.len(), "Window exceeds history");
                    f64::NAN
                }
                Err(e) => {
                    warn!(symbol = %last.symbol, alpha = index, error = %e, "Alpha failed; using 0.0");
                    0.0
                }
            };
            result.add(alpha101_name(index), value);
        }

        if !unavailable.is_empty() {
            info!(
                symbol = %last.symbol,
                alphas = ?unavailable,
                "Alphas need industry or market-cap data; emitted as NaN"
            );
        }
        Ok(result)
    }
}

impl AlphaCalculator for Alpha101Calculator {
    fn family(&self) -> FactorFamily {
        FactorFamily::Alpha101
    }

    fn factor_names(&self) -> Vec<String> {
        alpha101_names(&self.config)
    }

    fn min_bars(&self) -> usize {
        MIN_BARS
    }

    fn compute(&self, bars: &[Bar]) -> Result<AlphaFactorResult> {
        self.calculate(bars)
    }
}

impl ConfigurableCalculator for Alpha101Calculator {
    type Config = Alpha101Config;

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
    use rstest::rstest;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    fn exploding(_: &BaseSeries) -> Series {
        panic!("formula blew up")
    }

    fn third_alpha_explodes(index: usize) -> Option<Formula> {
        if index == 3 { Some(exploding as Formula) } else { lookup(index) }
    }

    fn missing_third_alpha(index: usize) -> Option<Formula> {
        if index == 3 { None } else { lookup(index) }
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    /// Run `calculate` under a subscriber and return the formatted log lines.
    fn logged(calc: &Alpha101Calculator, bars: &[Bar]) -> Vec<String> {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(Level::DEBUG)
            .with_ansi(false)
            .without_time()
            .finish();
        tracing::subscriber::with_default(subscriber, || calc.calculate(bars).unwrap());
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap().lines().map(str::to_string).collect()
    }

    #[test]
    fn test_every_supported_alpha_has_a_formula() {
        for index in 1..=ALPHA101_COUNT {
            assert_eq!(
                lookup(index).is_some(),
                !UNSUPPORTED.contains(&index),
                "alpha{index:03}"
            );
        }
        assert!(lookup(0).is_none());
        assert!(lookup(102).is_none());
    }

    #[test]
    fn test_rejects_short_history() {
        let calc = Alpha101Calculator::new();
        let err = calc.calculate(&synthetic_bars("AAPL", MIN_BARS - 1)).unwrap_err();
        assert!(matches!(
            err,
            AlphaError::InsufficientData {
                family: FactorFamily::Alpha101,
                required: MIN_BARS,
                available: 59
            }
        ));
        assert!(matches!(calc.calculate(&[]), Err(AlphaError::InvalidInput(_))));
    }

    #[test]
    fn test_minimum_history_gives_full_result() {
        let calc = Alpha101Calculator::new();
        let result = calc.calculate(&synthetic_bars("AAPL", MIN_BARS)).unwrap();

        assert_eq!(result.factor_count(), ALPHA101_COUNT);
        assert_eq!(result.ordered_names(), calc.factor_names().as_slice());
        for index in UNSUPPORTED {
            assert!(result.get(&alpha101_name(index)).unwrap().is_nan());
        }
        // needs 251 bars
        assert!(result.get("alpha019").unwrap().is_nan());
        assert!(result.get("alpha101").unwrap().is_finite());
    }

    #[test]
    fn test_alpha101_matches_closed_form() {
        let bars = synthetic_bars("AAPL", 80);
        let result = Alpha101Calculator::new().calculate(&bars).unwrap();
        let last = bars.last().unwrap();
        let expected = (last.close - last.open) / (last.high - last.low + 0.001);
        assert_relative_eq!(result.get("alpha101").unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_alpha012_matches_closed_form() {
        let bars = synthetic_bars("AAPL", 80);
        let data = BaseSeries::from_bars(&bars);
        let n = bars.len();
        let dv = bars[n - 1].volume - bars[n - 2].volume;
        let dc = bars[n - 1].close - bars[n - 2].close;
        assert_relative_eq!(evaluate(12, &data).unwrap(), dv.signum() * -dc, epsilon = 1e-12);
    }

    #[rstest]
    #[case(48)]
    #[case(100)]
    fn test_unsupported_alpha(#[case] index: usize) {
        let data = BaseSeries::from_bars(&synthetic_bars("AAPL", 80));
        assert!(matches!(evaluate(index, &data), Err(AlphaError::Unsupported(_))));
    }

    #[test]
    fn test_exhausted_window() {
        let data = BaseSeries::from_bars(&synthetic_bars("AAPL", 100));
        assert!(matches!(
            evaluate(19, &data),
            Err(AlphaError::InsufficientWindow { .. })
        ));
        assert!(evaluate(19, &BaseSeries::from_bars(&synthetic_bars("AAPL", 260))).is_ok());
    }

    #[test]
    fn test_computable_config_drops_unsupported() {
        let calc = Alpha101Calculator::with_config(Alpha101Config::computable());
        let result = calc.calculate(&synthetic_bars("AAPL", 120)).unwrap();
        assert_eq!(result.factor_count(), ALPHA101_COUNT - UNSUPPORTED.len());
        assert!(result.get("alpha048").is_none());
        assert_eq!(result.ordered_names(), calc.factor_names().as_slice());
    }

    #[test]
    fn test_deterministic() {
        let bars = synthetic_bars("AAPL", 300);
        let calc = Alpha101Calculator::new();
        let a = calc.calculate(&bars).unwrap().ordered_values();
        let b = calc.calculate(&bars).unwrap().ordered_values();
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.to_bits(), y.to_bits());
        }
    }

    #[rstest]
    #[case::panicking_formula(third_alpha_explodes)]
    #[case::missing_formula(missing_third_alpha)]
    fn test_failed_alpha_is_zero_and_batch_continues(#[case] table: fn(usize) -> Option<Formula>) {
        let bars = synthetic_bars("AAPL", 120);
        let calc = Alpha101Calculator::new();
        let healthy = calc.calculate(&bars).unwrap();
        let result = calc.calculate_with(&bars, table).unwrap();

        assert_eq!(result.factor_count(), ALPHA101_COUNT);
        assert_eq!(result.get("alpha003"), Some(0.0));
        for name in ["alpha002", "alpha004", "alpha101"] {
            let (got, want) = (result.get(name).unwrap(), healthy.get(name).unwrap());
            assert_eq!(got.to_bits(), want.to_bits(), "{name}");
        }
    }

    #[test]
    fn test_short_history_logs_accuracy_caveat() {
        let calc = Alpha101Calculator::new();
        let short = logged(&calc, &synthetic_bars("AAPL", 100));
        let caveat: Vec<&String> = short.iter().filter(|l| l.contains("Short history")).collect();
        assert_eq!(caveat.len(), 1);
        assert!(caveat[0].contains("WARN"), "{}", caveat[0]);
        assert!(caveat[0].contains("alphas=[7, 19, 24,"), "{}", caveat[0]);

        let long = logged(&calc, &synthetic_bars("AAPL", RECOMMENDED_BARS));
        assert!(long.iter().all(|l| !l.contains("Short history")));

        // no long-lookback alpha enabled, nothing to warn about
        let config = Alpha101Config::builder().include([1, 2, 3]).build().unwrap();
        let quiet = logged(&Alpha101Calculator::with_config(config), &synthetic_bars("AAPL", 100));
        assert!(quiet.iter().all(|l| !l.contains("Short history")));
    }

    #[test]
    fn test_unsupported_logged_apart_from_exhausted_windows() {
        let lines = logged(&Alpha101Calculator::new(), &synthetic_bars("AAPL", 100));

        let unsupported: Vec<&String> =
            lines.iter().filter(|l| l.contains("industry or market-cap")).collect();
        assert_eq!(unsupported.len(), 1);
        assert!(unsupported[0].contains("INFO"), "{}", unsupported[0]);
        assert!(unsupported[0].contains("alphas=[48, 56, 58,"), "{}", unsupported[0]);
        assert!(!unsupported[0].contains(" 19,"), "{}", unsupported[0]);

        let exhausted = lines
            .iter()
            .find(|l| l.contains("Window exceeds history") && l.contains("factor=alpha019"))
            .expect("alpha019 runs out of history at 100 bars");
        assert!(exhausted.contains("DEBUG"), "{exhausted}");
    }
}
