//! Handling of NaN and infinite factor values.

use crate::{AlphaError, Result};
use derive_more::Display;
use serde::{Deserialize, Serialize};

/// How non-finite values (NaN, ±∞) are treated before export.
///
/// Exactly one strategy applies per call, and it always works on a copy.
#[derive(Debug, Display, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", tag = "strategy")]
pub enum NanStrategy {
    /// Leave values untouched
    #[default]
    #[display("keep")]
    Keep,
    /// Replace with 0.0
    #[display("fill_zero")]
    FillZero,
    /// Replace with the mean of the finite values (0.0 if none)
    #[display("fill_mean")]
    FillMean,
    /// Replace with the median of the finite values (0.0 if none)
    #[display("fill_median")]
    FillMedian,
    /// Carry the previous finite value forward, starting from `seed`
    #[display("forward_fill")]
    ForwardFill {
        /// Value used before the first finite sample
        seed: f64,
    },
    /// Carry the next finite value backward, starting from `seed`
    #[display("backward_fill")]
    BackwardFill {
        /// Value used after the last finite sample
        seed: f64,
    },
    /// Reject any non-finite value
    #[display("fail_fast")]
    FailFast,
}

impl NanStrategy {
    /// Apply the strategy to one sample's values.
    ///
    /// `labels` names each value and is used in the fail-fast diagnostic.
    pub fn apply(
        &self,
        values: &[f64],
        symbol: &str,
        timestamp: i64,
        labels: &[String],
    ) -> Result<Vec<f64>> {
        if matches!(self, Self::FailFast) {
            check_finite(values, symbol, timestamp, labels)?;
        }
        Ok(self.fill(values))
    }

    /// Fill a copy of `values`; `Keep` and `FailFast` return it unchanged.
    pub fn fill(&self, values: &[f64]) -> Vec<f64> {
        let mut out = values.to_vec();
        match *self {
            Self::Keep | Self::FailFast => {}
            Self::FillZero => replace_invalid(&mut out, 0.0),
            Self::FillMean => {
                let valid: Vec<f64> = finite(values).collect();
                let mean = if valid.is_empty() {
                    0.0
                } else {
                    valid.iter().sum::<f64>() / valid.len() as f64
                };
                replace_invalid(&mut out, mean);
            }
            Self::FillMedian => {
                let median = median(finite(values).collect());
                replace_invalid(&mut out, median);
            }
            Self::ForwardFill { seed } => {
                let mut last = seed;
                for v in &mut out {
                    if v.is_finite() {
                        last = *v;
                    } else {
                        *v = last;
                    }
                }
            }
            Self::BackwardFill { seed } => {
                let mut next = seed;
                for v in out.iter_mut().rev() {
                    if v.is_finite() {
                        next = *v;
                    } else {
                        *v = next;
                    }
                }
            }
        }
        out
    }
}

impl std::str::FromStr for NanStrategy {
    type Err = AlphaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "keep" => Ok(Self::Keep),
            "zero" | "fill_zero" => Ok(Self::FillZero),
            "mean" | "fill_mean" => Ok(Self::FillMean),
            "median" | "fill_median" => Ok(Self::FillMedian),
            "ffill" | "forward_fill" => Ok(Self::ForwardFill { seed: 0.0 }),
            "bfill" | "backward_fill" => Ok(Self::BackwardFill { seed: 0.0 }),
            "fail" | "fail_fast" => Ok(Self::FailFast),
            other => Err(AlphaError::InvalidConfig(format!("unknown NaN strategy: {other}"))),
        }
    }
}

fn finite(values: &[f64]) -> impl Iterator<Item = f64> + '_ {
    values.iter().copied().filter(|v| v.is_finite())
}

fn replace_invalid(values: &mut [f64], with: f64) {
    for v in values.iter_mut().filter(|v| !v.is_finite()) {
        *v = with;
    }
}

fn median(mut valid: Vec<f64>) -> f64 {
    if valid.is_empty() {
        return 0.0;
    }
    valid.sort_by(f64::total_cmp);
    let mid = valid.len() / 2;
    if valid.len() % 2 == 0 {
        (valid[mid - 1] + valid[mid]) / 2.0
    } else {
        valid[mid]
    }
}

/// Error out on the first non-finite value, reporting counts for the whole sample.
pub(crate) fn check_finite(
    values: &[f64],
    symbol: &str,
    timestamp: i64,
    labels: &[String],
) -> Result<()> {
    let nan_count = values.iter().filter(|v| v.is_nan()).count();
    let inf_count = values.iter().filter(|v| v.is_infinite()).count();
    match values.iter().position(|v| !v.is_finite()) {
        None => Ok(()),
        Some(first) => Err(AlphaError::NonFinite {
            symbol: symbol.to_string(),
            timestamp,
            nan_count,
            inf_count,
            detail: format!(
                "first at {} (index {first}) of {} values",
                labels.get(first).map_or("<unnamed>", String::as_str),
                values.len()
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    const SAMPLE: [f64; 3] = [1.0, f64::NAN, 3.0];

    #[rstest]
    #[case(NanStrategy::FillMean, [1.0, 2.0, 3.0])]
    #[case(NanStrategy::FillZero, [1.0, 0.0, 3.0])]
    #[case(NanStrategy::FillMedian, [1.0, 2.0, 3.0])]
    #[case(NanStrategy::ForwardFill { seed: 0.0 }, [1.0, 1.0, 3.0])]
    #[case(NanStrategy::BackwardFill { seed: 0.0 }, [1.0, 3.0, 3.0])]
    fn test_fill_strategies(#[case] strategy: NanStrategy, #[case] expected: [f64; 3]) {
        assert_eq!(strategy.fill(&SAMPLE), expected);
    }

    #[test]
    fn test_seeds_apply_at_edges() {
        let values = [f64::NAN, 2.0, f64::INFINITY];
        assert_eq!(NanStrategy::ForwardFill { seed: -1.0 }.fill(&values), [-1.0, 2.0, 2.0]);
        assert_eq!(NanStrategy::BackwardFill { seed: 9.0 }.fill(&values), [2.0, 2.0, 9.0]);
    }

    #[test]
    fn test_all_invalid_mean_is_zero() {
        assert_eq!(NanStrategy::FillMean.fill(&[f64::NAN, f64::NAN]), [0.0, 0.0]);
        assert_eq!(NanStrategy::FillMedian.fill(&[f64::NEG_INFINITY]), [0.0]);
    }

    #[test]
    fn test_keep_returns_copy() {
        let kept = NanStrategy::Keep.fill(&SAMPLE);
        assert!(kept[1].is_nan());
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_fail_fast_reports_context() {
        let labels: Vec<String> = ["a", "b", "c"].iter().map(|s| s.to_string()).collect();
        let values = [1.0, f64::NAN, f64::INFINITY];
        let err = NanStrategy::FailFast.apply(&values, "AAPL", 42, &labels).unwrap_err();

        match err {
            AlphaError::NonFinite {
                symbol,
                timestamp,
                nan_count,
                inf_count,
                detail,
            } => {
                assert_eq!(symbol, "AAPL");
                assert_eq!(timestamp, 42);
                assert_eq!((nan_count, inf_count), (1, 1));
                assert!(detail.contains("b"));
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(NanStrategy::FailFast.apply(&[1.0], "AAPL", 42, &labels).is_ok());
    }

    #[test]
    fn test_parse() {
        assert_eq!("ffill".parse::<NanStrategy>().unwrap(), NanStrategy::ForwardFill { seed: 0.0 });
        assert_eq!("fill-mean".parse::<NanStrategy>().unwrap(), NanStrategy::FillMean);
        assert!("drop".parse::<NanStrategy>().is_err());
    }
}
