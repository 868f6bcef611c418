//! OHLCV bars and the base series derived from them.

use crate::{AlphaError, Result, Series};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single OHLCV bar supplied by the market-data collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Instrument identifier
    pub symbol: String,
    /// Bar timestamp in seconds since the Unix epoch
    pub timestamp: i64,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume
    pub volume: f64,
    /// Traded notional, when the venue reports it
    #[serde(default)]
    pub turnover: Option<f64>,
}

impl Bar {
    /// Create a bar without turnover.
    pub fn new(
        symbol: impl Into<String>,
        timestamp: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            turnover: None,
        }
    }

    /// Attach reported turnover.
    pub const fn with_turnover(mut self, turnover: f64) -> Self {
        self.turnover = Some(turnover);
        self
    }

    /// Volume-weighted average price.
    ///
    /// Uses `turnover / volume` when turnover is reported and volume is
    /// positive, otherwise the typical price `(high + low + close) / 3`.
    pub fn vwap(&self) -> f64 {
        match self.turnover {
            Some(turnover) if self.volume > crate::ops::EPS => turnover / self.volume,
            _ => (self.high + self.low + self.close) / 3.0,
        }
    }

    /// Bar timestamp as a UTC datetime.
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.timestamp, 0)
    }
}

/// Reject empty or non-ascending histories.
pub fn validate_history(bars: &[Bar]) -> Result<()> {
    if bars.is_empty() {
        return Err(AlphaError::InvalidInput("bar history is empty".to_string()));
    }
    if let Some(pos) = bars.windows(2).position(|w| w[1].timestamp <= w[0].timestamp) {
        return Err(AlphaError::InvalidInput(format!(
            "bars must be strictly ascending by timestamp: bar {} ({}) does not follow bar {} ({})",
            pos + 1,
            bars[pos + 1].timestamp,
            pos,
            bars[pos].timestamp
        )));
    }
    Ok(())
}

/// Base series derived from a bar history, oldest sample first.
#[derive(Debug, Clone)]
pub struct BaseSeries {
    /// Opening prices
    pub open: Series,
    /// Highest prices
    pub high: Series,
    /// Lowest prices
    pub low: Series,
    /// Closing prices
    pub close: Series,
    /// Volumes
    pub volume: Series,
    /// VWAP, see [`Bar::vwap`]
    pub vwap: Series,
    /// Simple close-to-close returns, one shorter than the bars
    pub returns: Series,
}

impl BaseSeries {
    /// Derive all base series from `bars`.
    pub fn from_bars(bars: &[Bar]) -> Self {
        let column = |f: fn(&Bar) -> f64| Series::new(bars.iter().map(f).collect());
        let close = column(|b| b.close);
        let returns = Series::new(
            close
                .windows(2)
                .map(|w| if w[0].abs() < crate::ops::EPS { 0.0 } else { w[1] / w[0] - 1.0 })
                .collect(),
        );

        Self {
            open: column(|b| b.open),
            high: column(|b| b.high),
            low: column(|b| b.low),
            volume: column(|b| b.volume),
            vwap: column(Bar::vwap),
            close,
            returns,
        }
    }

    /// Number of bars the series were derived from.
    pub fn len(&self) -> usize {
        self.close.len()
    }

    /// Whether the series are empty.
    pub fn is_empty(&self) -> bool {
        self.close.is_empty()
    }

    /// Average daily volume over `window` bars.
    pub fn adv(&self, window: usize) -> Series {
        crate::ops::sma(&self.volume, window)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;

    /// Deterministic synthetic history used across the crate's tests.
    pub(crate) fn synthetic_bars(symbol: &str, count: usize) -> Vec<Bar> {
        (0..count)
            .map(|i| {
                let t = i as f64;
                let close = 100.0 + 5.0 * (t * 0.21).sin() + 0.05 * t;
                let open = close - 0.8 * (t * 0.37).cos();
                let high = open.max(close) + 0.5 + 0.3 * (t * 0.11).sin().abs();
                let low = open.min(close) - 0.5 - 0.2 * (t * 0.17).cos().abs();
                let volume = 1_000_000.0 + 250_000.0 * (t * 0.29).sin() + 1_000.0 * t;
                Bar::new(symbol, 1_704_067_200 + 86_400 * i as i64, open, high, low, close, volume)
            })
            .collect()
    }

    #[test]
    fn test_vwap_prefers_turnover() {
        let bar = Bar::new("BTC", 0, 10.0, 12.0, 9.0, 11.0, 100.0);
        assert_relative_eq!(bar.vwap(), (12.0 + 9.0 + 11.0) / 3.0);

        let bar = bar.with_turnover(1_050.0);
        assert_relative_eq!(bar.vwap(), 10.5);
    }

    #[test]
    fn test_vwap_zero_volume_falls_back() {
        let bar = Bar::new("BTC", 0, 10.0, 12.0, 9.0, 11.0, 0.0).with_turnover(5.0);
        assert_relative_eq!(bar.vwap(), (12.0 + 9.0 + 11.0) / 3.0);
    }

    #[test]
    fn test_datetime() {
        let bar = Bar::new("BTC", 1_704_067_200, 1.0, 1.0, 1.0, 1.0, 1.0);
        assert_eq!(bar.datetime().unwrap().to_rfc3339(), "2024-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_validate_history() {
        assert!(matches!(validate_history(&[]), Err(AlphaError::InvalidInput(_))));

        let mut bars = synthetic_bars("ETH", 5);
        assert!(validate_history(&bars).is_ok());

        bars[3].timestamp = bars[2].timestamp;
        assert!(matches!(validate_history(&bars), Err(AlphaError::InvalidInput(_))));
    }

    #[test]
    fn test_base_series_lengths() {
        let bars = synthetic_bars("ETH", 30);
        let base = BaseSeries::from_bars(&bars);

        assert_eq!(base.len(), 30);
        assert_eq!(base.returns.len(), 29);
        assert_eq!(base.vwap.len(), 30);
        assert_relative_eq!(base.returns[0], bars[1].close / bars[0].close - 1.0);
    }
}
