//! Interval specialization - period sequences with prefix sums

use crate::time::Period;
use crate::{Error, Result};

use super::FixedSeq;

/// Fixed-length sequence of [`Period`] values.
///
/// Comparison and performance arrays store the *cumulative* form: element `i`
/// holds total elapsed time through checkpoint `i`. [`sum_as_prefix`] answers
/// segment queries over that form in O(1); [`sum`] is the raw-segment
/// interpretation and must not be mixed with it.
///
/// [`sum`]: FixedSeq::sum
/// [`sum_as_prefix`]: FixedSeq::sum_as_prefix
pub type IntervalSeq = FixedSeq<Period>;

impl FixedSeq<Period> {
    /// Sequence of `len` zero periods.
    #[must_use]
    pub fn zeroed(len: usize) -> Self {
        Self::filled(len, Period::ZERO)
    }

    /// Sum of raw segment periods in `[start, end)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `start <= end <= len`.
    pub fn sum(&self, start: usize, end: usize) -> Result<Period> {
        if start > end || end > self.len() {
            return Err(Error::IndexOutOfRange {
                index: end.max(start) as i64,
                size: self.len(),
            });
        }
        Ok(self.as_slice()[start..end]
            .iter()
            .fold(Period::ZERO, |acc, period| acc + *period))
    }

    /// Sum of all raw segments.
    #[must_use]
    pub fn sum_all(&self) -> Period {
        self.iter().fold(Period::ZERO, |acc, period| acc + *period)
    }

    /// Treats the stored sequence as cumulative and returns
    /// `self[end] - self[start]` in O(1).
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `start <= end < len`.
    pub fn sum_as_prefix(&self, start: usize, end: usize) -> Result<Period> {
        if start > end {
            return Err(Error::IndexOutOfRange {
                index: start as i64,
                size: self.len(),
            });
        }
        Ok(*self.get(end)? - *self.get(start)?)
    }

    /// Cumulative span from the first to the last stored entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] on an empty sequence.
    pub fn total_as_prefix(&self) -> Result<Period> {
        self.sum_as_prefix(0, self.len().saturating_sub(1))
    }

    /// Time spent on one segment of a cumulative sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] unless `index + 1 < len`.
    pub fn segment(&self, index: usize) -> Result<Period> {
        self.sum_as_prefix(index, index + 1)
    }

    /// Length `len + 1` cumulative sequence built from raw segments; the
    /// first entry is [`Period::ZERO`].
    #[must_use]
    pub fn prefix_sum(&self) -> Self {
        let mut items = Vec::with_capacity(self.len() + 1);
        let mut acc = Period::ZERO;
        items.push(acc);
        for period in self {
            acc += *period;
            items.push(acc);
        }
        Self::from_vec(items)
    }

    /// Elementwise sum with a same-length sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ.
    pub fn add(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        Ok(Self::from_vec(
            self.iter().zip(other).map(|(a, b)| *a + *b).collect(),
        ))
    }

    /// Elementwise difference with a same-length sequence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ.
    pub fn sub(&self, other: &Self) -> Result<Self> {
        self.check_same_len(other)?;
        Ok(Self::from_vec(
            self.iter().zip(other).map(|(a, b)| *a - *b).collect(),
        ))
    }

    /// Every element multiplied by a scalar.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self::from_vec(self.iter().map(|period| *period * factor).collect())
    }

    /// Every element divided by a scalar.
    #[must_use]
    pub fn unscale(&self, divisor: f64) -> Self {
        Self::from_vec(self.iter().map(|period| *period / divisor).collect())
    }

    /// In-place elementwise sum.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ; nothing is
    /// written in that case.
    pub fn add_in_place(&mut self, other: &Self) -> Result<()> {
        self.check_same_len(other)?;
        for (index, period) in other.iter().enumerate() {
            self[index] += *period;
        }
        Ok(())
    }

    /// In-place elementwise difference.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ; nothing is
    /// written in that case.
    pub fn sub_in_place(&mut self, other: &Self) -> Result<()> {
        self.check_same_len(other)?;
        for (index, period) in other.iter().enumerate() {
            self[index] -= *period;
        }
        Ok(())
    }

    /// In-place scalar multiply.
    pub fn scale_in_place(&mut self, factor: f64) {
        for index in 0..self.len() {
            self[index] *= factor;
        }
    }

    /// In-place scalar divide.
    pub fn unscale_in_place(&mut self, divisor: f64) {
        for index in 0..self.len() {
            self[index] /= divisor;
        }
    }

    fn check_same_len(&self, other: &Self) -> Result<()> {
        if self.len() == other.len() {
            Ok(())
        } else {
            Err(Error::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(seconds: &[f64]) -> IntervalSeq {
        IntervalSeq::from_vec(seconds.iter().map(|s| Period::from_seconds(*s)).collect())
    }

    #[test]
    fn test_sum_raw_segments() {
        let raw = seq(&[10.0, 20.0, 30.0]);
        assert_eq!(raw.sum(0, 3).unwrap(), Period::from_seconds(60.0));
        assert_eq!(raw.sum(1, 2).unwrap(), Period::from_seconds(20.0));
        assert_eq!(raw.sum(2, 2).unwrap(), Period::ZERO);
        assert!(raw.sum(0, 4).is_err());
        assert!(raw.sum(2, 1).is_err());
    }

    #[test]
    fn test_sum_as_prefix_subtracts_endpoints() {
        // cumulative array: 90s, 195s, 300s
        let cumulative = seq(&[90.0, 195.0, 300.0]);
        assert_eq!(
            cumulative.sum_as_prefix(0, 2).unwrap(),
            Period::from_seconds(210.0)
        );
        assert_eq!(
            cumulative.segment(1).unwrap(),
            Period::from_seconds(105.0)
        );
        assert_eq!(
            cumulative.total_as_prefix().unwrap(),
            Period::from_seconds(210.0)
        );
        assert!(cumulative.sum_as_prefix(0, 3).is_err());
    }

    #[test]
    fn test_prefix_sum_relates_the_two_interpretations() {
        let raw = seq(&[10.0, 20.0, 30.0]);
        let prefix = raw.prefix_sum();
        assert_eq!(prefix.len(), 4);
        assert_eq!(*prefix.get(0).unwrap(), Period::ZERO);
        for start in 0..=3 {
            for end in start..=3 {
                assert_eq!(
                    prefix.sum_as_prefix(start, end).unwrap(),
                    raw.sum(start, end).unwrap()
                );
            }
        }
    }

    #[test]
    fn test_elementwise_arithmetic() {
        let a = seq(&[10.0, 20.0]);
        let b = seq(&[1.0, 2.0]);
        assert_eq!(a.add(&b).unwrap(), seq(&[11.0, 22.0]));
        assert_eq!(a.sub(&b).unwrap(), seq(&[9.0, 18.0]));
        assert_eq!(a.scale(2.0), seq(&[20.0, 40.0]));
        assert_eq!(a.unscale(2.0), seq(&[5.0, 10.0]));

        let mut c = a.clone();
        c.add_in_place(&b).unwrap();
        assert_eq!(c, seq(&[11.0, 22.0]));
        c.scale_in_place(0.5);
        assert_eq!(c, seq(&[5.5, 11.0]));

        let short = seq(&[1.0]);
        assert!(a.add(&short).is_err());
        assert!(c.sub_in_place(&short).is_err());
        assert_eq!(c, seq(&[5.5, 11.0]));
    }
}
