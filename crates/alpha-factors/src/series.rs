//! Tail-aligned numeric series.
//!
//! A [`Series`] is an ordered run of `f64` samples, oldest first. Windowed
//! operators shorten a series from the front, so two series derived from the
//! same bars always share their most recent sample. Binary operations align on
//! that end: the result has the shorter length, and element `i` of the result
//! combines the `i`-th elements counted back from each operand's latest sample.

use std::ops::{Add, Deref, Div, Mul, Neg, Sub};

/// An ordered, tail-aligned sequence of samples.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series(Vec<f64>);

/// Right-hand side of an element-wise operation: a series or a broadcast scalar.
#[derive(Debug, Clone, Copy)]
pub enum Operand<'a> {
    /// Broadcast constant
    Scalar(f64),
    /// Tail-aligned values
    Values(&'a [f64]),
}

impl Operand<'_> {
    const fn len(&self) -> Option<usize> {
        match self {
            Self::Scalar(_) => None,
            Self::Values(v) => Some(v.len()),
        }
    }

    /// Value at position `i` of a tail-aligned view of length `n`.
    fn at(&self, n: usize, i: usize) -> f64 {
        match self {
            Self::Scalar(v) => *v,
            Self::Values(v) => v[v.len() - n + i],
        }
    }
}

impl From<f64> for Operand<'_> {
    fn from(value: f64) -> Self {
        Self::Scalar(value)
    }
}

impl<'a> From<&'a Series> for Operand<'a> {
    fn from(series: &'a Series) -> Self {
        Self::Values(&series.0)
    }
}

impl<'a> From<&'a [f64]> for Operand<'a> {
    fn from(values: &'a [f64]) -> Self {
        Self::Values(values)
    }
}

impl Series {
    /// Wrap samples, oldest first.
    pub const fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    /// An empty series, the result of any operator run on too little history.
    pub const fn empty() -> Self {
        Self(Vec::new())
    }

    /// `len` copies of `value`.
    pub fn constant(value: f64, len: usize) -> Self {
        Self(vec![value; len])
    }

    /// Most recent sample, if any.
    pub fn latest(&self) -> Option<f64> {
        self.0.last().copied()
    }

    /// Borrow the samples.
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The most recent `n` samples (all of them when `n` exceeds the length).
    pub fn tail(&self, n: usize) -> &[f64] {
        &self.0[self.0.len().saturating_sub(n)..]
    }

    /// Apply `f` to every sample.
    pub fn map(&self, f: impl Fn(f64) -> f64) -> Self {
        self.0.iter().map(|&v| f(v)).collect()
    }

    /// Combine with `other` element-wise, aligned on the latest sample.
    pub fn zip_with<'a>(&self, other: impl Into<Operand<'a>>, f: impl Fn(f64, f64) -> f64) -> Self {
        let other = other.into();
        let n = other.len().map_or(self.len(), |len| len.min(self.len()));
        let offset = self.len() - n;
        (0..n).map(|i| f(self.0[offset + i], other.at(n, i))).collect()
    }

    /// Element-wise conditional: where `self` is non-zero take `if_true`, else `if_false`.
    pub fn select<'a, 'b>(
        &self,
        if_true: impl Into<Operand<'a>>,
        if_false: impl Into<Operand<'b>>,
    ) -> Self {
        let (if_true, if_false) = (if_true.into(), if_false.into());
        let n = [Some(self.len()), if_true.len(), if_false.len()]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(0);
        let offset = self.len() - n;
        (0..n)
            .map(|i| {
                if self.0[offset + i] != 0.0 {
                    if_true.at(n, i)
                } else {
                    if_false.at(n, i)
                }
            })
            .collect()
    }

    /// 1.0 where `self < other`, else 0.0.
    pub fn less<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, |a, b| indicator(a < b))
    }

    /// 1.0 where `self > other`, else 0.0.
    pub fn greater<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, |a, b| indicator(a > b))
    }

    /// 1.0 where `self <= other`, else 0.0.
    pub fn less_eq<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, |a, b| indicator(a <= b))
    }

    /// 1.0 where `self == other`, else 0.0.
    pub fn equals<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, |a, b| indicator(a == b))
    }

    /// Logical or of two indicator series.
    pub fn or<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, |a, b| indicator(a != 0.0 || b != 0.0))
    }

    /// Element-wise minimum.
    pub fn min_with<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, f64::min)
    }

    /// Element-wise maximum.
    pub fn max_with<'a>(&self, other: impl Into<Operand<'a>>) -> Self {
        self.zip_with(other, f64::max)
    }

    /// Element-wise power with a series or scalar exponent.
    pub fn pow<'a>(&self, exponent: impl Into<Operand<'a>>) -> Self {
        self.zip_with(exponent, f64::powf)
    }

    /// Element-wise absolute value.
    pub fn abs(&self) -> Self {
        self.map(f64::abs)
    }
}

const fn indicator(flag: bool) -> f64 {
    if flag { 1.0 } else { 0.0 }
}

impl Deref for Series {
    type Target = [f64];

    fn deref(&self) -> &[f64] {
        &self.0
    }
}

impl AsRef<[f64]> for Series {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

impl From<Vec<f64>> for Series {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

impl From<&[f64]> for Series {
    fn from(values: &[f64]) -> Self {
        Self(values.to_vec())
    }
}

impl FromIterator<f64> for Series {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl PartialEq<Vec<f64>> for Series {
    fn eq(&self, other: &Vec<f64>) -> bool {
        self.0 == *other
    }
}

impl PartialEq<[f64]> for Series {
    fn eq(&self, other: &[f64]) -> bool {
        self.0 == other
    }
}

macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $op:expr) => {
        impl $trait<&Series> for &Series {
            type Output = Series;

            fn $method(self, rhs: &Series) -> Series {
                self.zip_with(rhs, $op)
            }
        }

        impl $trait<Series> for &Series {
            type Output = Series;

            fn $method(self, rhs: Series) -> Series {
                self.zip_with(&rhs, $op)
            }
        }

        impl $trait<&Series> for Series {
            type Output = Series;

            fn $method(self, rhs: &Series) -> Series {
                self.zip_with(rhs, $op)
            }
        }

        impl $trait<Series> for Series {
            type Output = Series;

            fn $method(self, rhs: Series) -> Series {
                self.zip_with(&rhs, $op)
            }
        }

        impl $trait<f64> for &Series {
            type Output = Series;

            fn $method(self, rhs: f64) -> Series {
                self.zip_with(rhs, $op)
            }
        }

        impl $trait<f64> for Series {
            type Output = Series;

            fn $method(self, rhs: f64) -> Series {
                self.zip_with(rhs, $op)
            }
        }

        impl $trait<&Series> for f64 {
            type Output = Series;

            fn $method(self, rhs: &Series) -> Series {
                rhs.map(|b| ($op)(self, b))
            }
        }

        impl $trait<Series> for f64 {
            type Output = Series;

            fn $method(self, rhs: Series) -> Series {
                rhs.map(|b| ($op)(self, b))
            }
        }
    };
}

impl_binary_op!(Add, add, |a: f64, b: f64| a + b);
impl_binary_op!(Sub, sub, |a: f64, b: f64| a - b);
impl_binary_op!(Mul, mul, |a: f64, b: f64| a * b);
impl_binary_op!(Div, div, crate::ops::safe_div);

impl Neg for Series {
    type Output = Self;

    fn neg(self) -> Self {
        self.map(|v| -v)
    }
}

impl Neg for &Series {
    type Output = Series;

    fn neg(self) -> Series {
        self.map(|v| -v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tail_alignment() {
        let long = Series::new(vec![1.0, 2.0, 3.0, 4.0]);
        let short = Series::new(vec![10.0, 20.0]);

        assert_eq!(&long + &short, vec![13.0, 24.0]);
        assert_eq!(&short - &long, vec![7.0, 16.0]);
    }

    #[test]
    fn test_scalar_broadcast() {
        let s = Series::new(vec![1.0, 2.0]);
        assert_eq!(&s * 3.0, vec![3.0, 6.0]);
        assert_eq!(1.0 - &s, vec![0.0, -1.0]);
        assert_eq!(-s, vec![-1.0, -2.0]);
    }

    #[test]
    fn test_guarded_division() {
        let num = Series::new(vec![1.0, 2.0]);
        let den = Series::new(vec![0.0, 4.0]);
        assert_eq!(num / den, vec![0.0, 0.5]);
    }

    #[test]
    fn test_select_aligns_branches() {
        let cond = Series::new(vec![1.0, 0.0, 1.0]);
        let a = Series::new(vec![5.0, 6.0, 7.0, 8.0]);
        assert_eq!(cond.select(&a, -1.0), vec![6.0, -1.0, 8.0]);
    }

    #[test]
    fn test_comparisons() {
        let a = Series::new(vec![1.0, 5.0, 3.0]);
        assert_eq!(a.less(3.0), vec![1.0, 0.0, 0.0]);
        assert_eq!(a.less_eq(3.0), vec![1.0, 0.0, 1.0]);
        assert_eq!(a.greater(&Series::new(vec![4.0, 4.0])), vec![1.0, 0.0]);
        assert_eq!(a.equals(5.0).or(&a.less(2.0)), vec![1.0, 1.0, 0.0]);
    }

    #[test]
    fn test_empty_operand_gives_empty_result() {
        let a = Series::new(vec![1.0, 2.0]);
        assert!((&a + &Series::empty()).is_empty());
        assert_eq!(a.latest(), Some(2.0));
        assert_eq!(Series::empty().latest(), None);
    }
}
