//! Polars interop: bars in, datasets out.

use crate::{AlphaDataset, AlphaError, Bar, NanStrategy, Result};
use polars::prelude::*;
use std::collections::BTreeMap;

/// Columns every bar frame must carry.
pub const REQUIRED_COLUMNS: [&str; 7] =
    ["symbol", "timestamp", "open", "high", "low", "close", "volume"];

fn column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| AlphaError::MissingColumn(name.to_string()))
}

fn float_column(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let cast = column(df, name)?.cast(&DataType::Float64)?;
    Ok(cast.f64()?.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
}

/// Timestamps in seconds; datetime columns are converted from their unit.
fn timestamp_column(df: &DataFrame) -> Result<Vec<i64>> {
    let raw = column(df, "timestamp")?;
    let per_second = match raw.dtype() {
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 1_000_000_000,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1_000_000,
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1_000,
        _ => 1,
    };
    let cast = raw.cast(&DataType::Int64)?;
    cast.i64()?
        .into_iter()
        .enumerate()
        .map(|(row, v)| {
            v.map(|ts| ts.div_euclid(per_second))
                .ok_or_else(|| AlphaError::InvalidInput(format!("null timestamp in row {row}")))
        })
        .collect()
}

/// Read bars in frame order from `symbol, timestamp, open, high, low, close,
/// volume[, turnover]`.
///
/// Numeric nulls read as NaN; a null symbol or timestamp is rejected.
pub fn bars_from_frame(df: &DataFrame) -> Result<Vec<Bar>> {
    let missing = REQUIRED_COLUMNS.iter().find(|&&name| df.get_column_index(name).is_none());
    if let Some(missing) = missing {
        return Err(AlphaError::MissingColumn((*missing).to_string()));
    }
    let symbols = column(df, "symbol")?.str()?;
    let timestamps = timestamp_column(df)?;
    let [open, high, low, close, volume] =
        ["open", "high", "low", "close", "volume"].map(|name| float_column(df, name));
    let (open, high, low, close, volume) = (open?, high?, low?, close?, volume?);
    let turnover = df
        .get_column_index("turnover")
        .map(|_| float_column(df, "turnover"))
        .transpose()?;

    symbols
        .into_iter()
        .enumerate()
        .map(|(i, symbol)| {
            let symbol =
                symbol.ok_or_else(|| AlphaError::InvalidInput(format!("null symbol in row {i}")))?;
            let bar = Bar::new(symbol, timestamps[i], open[i], high[i], low[i], close[i], volume[i]);
            Ok(match turnover.as_ref().map(|t| t[i]) {
                Some(t) if t.is_finite() => bar.with_turnover(t),
                _ => bar,
            })
        })
        .collect()
}

/// Read bars and split them into per-symbol histories sorted by timestamp.
pub fn histories_from_frame(df: &DataFrame) -> Result<BTreeMap<String, Vec<Bar>>> {
    let mut histories: BTreeMap<String, Vec<Bar>> = BTreeMap::new();
    for bar in bars_from_frame(df)? {
        histories.entry(bar.symbol.clone()).or_default().push(bar);
    }
    for bars in histories.values_mut() {
        bars.sort_by_key(|b| b.timestamp);
    }
    Ok(histories)
}

impl AlphaDataset {
    /// Frame with `symbol`, `timestamp`, then one `f64` column per factor.
    pub fn to_frame(&self, strategy: NanStrategy) -> Result<DataFrame> {
        let matrix = self.to_matrix(strategy)?;
        let mut columns = Vec::with_capacity(self.factor_count() + 2);
        columns.push(Column::new(
            "symbol".into(),
            self.vectors().iter().map(|v| v.symbol()).collect::<Vec<_>>(),
        ));
        columns.push(Column::new(
            "timestamp".into(),
            self.vectors().iter().map(|v| v.timestamp()).collect::<Vec<i64>>(),
        ));
        for (name, values) in self.names().iter().zip(matrix.columns()) {
            columns.push(Column::new(name.as_str().into(), values.to_vec()));
        }
        Ok(DataFrame::new(columns)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlphaFeatureVector, FactorFamily};

    fn frame() -> DataFrame {
        df![
            "symbol" => ["B", "A", "A"],
            "timestamp" => [5i64, 20, 10],
            "open" => [1.0, 2.0, 3.0],
            "high" => [1.5, 2.5, 3.5],
            "low" => [0.5, 1.5, 2.5],
            "close" => [1.2, 2.2, 3.2],
            "volume" => [100.0, 200.0, 300.0],
        ]
        .unwrap()
    }

    #[test]
    fn test_bars_from_frame() {
        let bars = bars_from_frame(&frame()).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[0].symbol, "B");
        assert_eq!(bars[1].timestamp, 20);
        assert_eq!(bars[2].close, 3.2);
        assert!(bars[0].turnover.is_none());
    }

    #[test]
    fn test_histories_sorted_per_symbol() {
        let histories = histories_from_frame(&frame()).unwrap();
        let a: Vec<i64> = histories["A"].iter().map(|b| b.timestamp).collect();
        assert_eq!(a, vec![10, 20]);
        assert_eq!(histories["B"].len(), 1);
    }

    #[test]
    fn test_missing_column() {
        let df = frame().drop("volume").unwrap();
        assert!(matches!(bars_from_frame(&df), Err(AlphaError::MissingColumn(c)) if c == "volume"));
    }

    #[test]
    fn test_turnover_column() {
        let mut df = frame();
        df.with_column(Column::new("turnover".into(), vec![120.0, 440.0, 960.0]))
            .unwrap();
        let bars = bars_from_frame(&df).unwrap();
        assert_eq!(bars[0].turnover, Some(120.0));
        assert_eq!(bars[1].vwap(), 2.2);
    }

    #[test]
    fn test_dataset_to_frame() {
        let names: Vec<String> = vec!["KMID".to_string(), "ROC5".to_string()];
        let dataset = AlphaDataset::from_vectors([
            AlphaFeatureVector::new("BTC", 10, FactorFamily::Alpha158, &names, &[0.5, f64::NAN])
                .unwrap(),
            AlphaFeatureVector::new("BTC", 20, FactorFamily::Alpha158, &names, &[-0.25, 1.0])
                .unwrap(),
        ])
        .unwrap();

        let df = dataset.to_frame(NanStrategy::FillZero).unwrap();
        assert_eq!(df.shape(), (2, 4));
        let roc: Vec<Option<f64>> = df.column("ROC5").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(roc, vec![Some(0.0), Some(1.0)]);
    }
}
