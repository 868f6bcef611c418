//! Batch computation over long histories and many symbols.

use crate::{
    AlphaCalculator, AlphaDataset, AlphaError, AlphaFactorResult, Bar, Result, validate_history,
};
use rayon::prelude::*;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{info, warn};

/// Cooperative cancellation flag shared between a batch and its caller.
///
/// Clones share the same flag. Work already in progress finishes; the flag is
/// checked before each new unit of work starts.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that has not been cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Recompute `calc` on every `step`-th prefix of `bars`, starting at the
/// calculator's minimum history.
///
/// Each sample sees only the bars up to and including its own. Samples the
/// calculator rejects are logged and skipped. On cancellation the samples
/// computed so far are returned.
pub fn rolling_results(
    calc: &dyn AlphaCalculator,
    bars: &[Bar],
    step: usize,
    token: &CancellationToken,
) -> Result<Vec<AlphaFactorResult>> {
    rolling_results_with_progress(calc, bars, step, token, |_, _| {})
}

/// [`rolling_results`], reporting `(done, total)` after every sample.
pub fn rolling_results_with_progress(
    calc: &dyn AlphaCalculator,
    bars: &[Bar],
    step: usize,
    token: &CancellationToken,
    mut progress: impl FnMut(usize, usize),
) -> Result<Vec<AlphaFactorResult>> {
    if step == 0 {
        return Err(AlphaError::InvalidInput("rolling step must be positive".to_string()));
    }
    validate_history(bars)?;

    let start = calc.min_bars().max(1);
    let ends: Vec<usize> = (start..=bars.len()).step_by(step).collect();
    let mut results = Vec::with_capacity(ends.len());

    for (done, &end) in ends.iter().enumerate() {
        let latest = &bars[end - 1];
        if token.is_cancelled() {
            info!(
                family = %calc.family(),
                completed = done,
                total = ends.len(),
                "Rolling computation cancelled"
            );
            break;
        }
        match calc.compute(&bars[..end]) {
            Ok(result) => results.push(result),
            Err(e) => warn!(
                family = %calc.family(),
                symbol = %latest.symbol,
                timestamp = latest.timestamp,
                error = %e,
                "Skipping sample"
            ),
        }
        progress(done + 1, ends.len());
    }
    Ok(results)
}

/// Compute the latest sample of every symbol's history in parallel.
///
/// Results come back in symbol order. Symbols not yet started when `token`
/// is cancelled report [`AlphaError::Cancelled`].
pub fn compute_symbols(
    calc: &dyn AlphaCalculator,
    histories: &BTreeMap<String, Vec<Bar>>,
    token: &CancellationToken,
) -> Vec<(String, Result<AlphaFactorResult>)> {
    histories
        .par_iter()
        .map(|(symbol, bars)| {
            let result = if token.is_cancelled() {
                Err(AlphaError::Cancelled(symbol.clone()))
            } else {
                calc.compute(bars)
            };
            (symbol.clone(), result)
        })
        .collect()
}

/// Gather results into a dataset whose columns must follow `expected`.
///
/// Fails on the first result whose order differs.
pub fn build_dataset<'a>(
    expected: Vec<String>,
    results: impl IntoIterator<Item = &'a AlphaFactorResult>,
) -> Result<AlphaDataset> {
    let mut dataset = AlphaDataset::new(expected);
    for result in results {
        dataset.push(result.to_feature_vector())?;
    }
    Ok(dataset)
}
