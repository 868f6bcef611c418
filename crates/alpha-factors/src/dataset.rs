//! Order-validated datasets of feature vectors.

use crate::nan::check_finite;
use crate::{AlphaError, AlphaFeatureVector, NanStrategy, Result};
use ndarray::{Array1, Array2};
use std::io::Write;

/// Compare two name orders element by element.
///
/// Reports a length mismatch first, then the first differing position. This
/// is the only gate between a calculator and training data, so it never
/// tolerates reordering.
pub fn validate_order(expected: &[String], actual: &[String]) -> Result<()> {
    if expected.len() != actual.len() {
        return Err(AlphaError::LengthMismatch {
            expected: expected.len(),
            actual: actual.len(),
        });
    }
    match expected.iter().zip(actual).position(|(e, a)| e != a) {
        None => Ok(()),
        Some(index) => Err(AlphaError::OrderMismatch {
            index,
            expected: expected[index].clone(),
            actual: actual[index].clone(),
        }),
    }
}

/// Samples sharing one factor order, ready for batch ML consumption.
#[derive(Debug, Clone, Default)]
pub struct AlphaDataset {
    names: Vec<String>,
    vectors: Vec<AlphaFeatureVector>,
}

impl AlphaDataset {
    /// Empty dataset expecting `names` in this order.
    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            vectors: Vec::new(),
        }
    }

    /// Dataset whose order is taken from the first vector.
    ///
    /// Every later vector is validated against it.
    pub fn from_vectors(vectors: impl IntoIterator<Item = AlphaFeatureVector>) -> Result<Self> {
        let mut vectors = vectors.into_iter().peekable();
        let names = vectors.peek().map(|v| v.names().to_vec()).unwrap_or_default();
        let mut dataset = Self::new(names);
        for vector in vectors {
            dataset.push(vector)?;
        }
        Ok(dataset)
    }

    /// Append a sample after validating its order and width.
    pub fn push(&mut self, vector: AlphaFeatureVector) -> Result<()> {
        validate_order(&self.names, vector.names())?;
        if vector.len() != self.names.len() {
            return Err(AlphaError::LengthMismatch {
                expected: self.names.len(),
                actual: vector.len(),
            });
        }
        self.vectors.push(vector);
        Ok(())
    }

    /// Expected factor order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Samples in insertion order.
    pub fn vectors(&self) -> &[AlphaFeatureVector] {
        &self.vectors
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// Whether the dataset holds no samples.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Number of factor columns.
    pub fn factor_count(&self) -> usize {
        self.names.len()
    }

    /// Dense `samples × factors` matrix.
    ///
    /// Fill strategies run per column, across samples in insertion order;
    /// fail-fast reports the first offending sample.
    pub fn to_matrix(&self, strategy: NanStrategy) -> Result<Array2<f64>> {
        let mut matrix: Array2<f64> = Array2::zeros((self.len(), self.factor_count()));
        for (mut row, vector) in matrix.rows_mut().into_iter().zip(&self.vectors) {
            if matches!(strategy, NanStrategy::FailFast) {
                check_finite(vector.values(), vector.symbol(), vector.timestamp(), &self.names)?;
            }
            row.assign(&Array1::from(vector.to_values()));
        }

        if !matches!(strategy, NanStrategy::Keep | NanStrategy::FailFast) {
            for mut column in matrix.columns_mut() {
                let filled = strategy.fill(&column.to_vec());
                column.assign(&Array1::from(filled));
            }
        }
        Ok(matrix)
    }

    /// Write `symbol,timestamp,<names...>` CSV, one row per sample.
    ///
    /// Values use raw `f64` formatting (`NaN`, `inf`) and nothing is quoted.
    pub fn write_csv<W: Write>(&self, mut writer: W, strategy: NanStrategy) -> Result<()> {
        let matrix = self.to_matrix(strategy)?;

        write!(writer, "symbol,timestamp")?;
        for name in &self.names {
            write!(writer, ",{name}")?;
        }
        writeln!(writer)?;

        for (row, vector) in matrix.rows().into_iter().zip(&self.vectors) {
            write!(writer, "{},{}", vector.symbol(), vector.timestamp())?;
            for value in row {
                write!(writer, ",{value}")?;
            }
            writeln!(writer)?;
        }
        writer.flush()?;
        Ok(())
    }

    /// CSV export as a string.
    pub fn to_csv_string(&self, strategy: NanStrategy) -> Result<String> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf, strategy)?;
        String::from_utf8(buf).map_err(|e| AlphaError::Computation {
            factor: "csv".to_string(),
            reason: e.to_string(),
        })
    }
}
