//! Label specialization - checkpoint name sequences with annotation

use crate::model::Name;
use crate::{Error, Result};

use super::FixedSeq;

/// Sentinel label filling a freshly created template.
pub const DEFAULT_LABEL: &str = "-";

/// Glyph joining labels in an annotate operation.
///
/// Annotation is a labeling convenience, not computation: combining two
/// label sequences produces marked-up labels (`Start`, `Mid` -> `Start+Mid`),
/// so the operations are named explicitly rather than overloading arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotateOp {
    /// Join with `+`
    Add,
    /// Join with `-`
    Subtract,
    /// Join with `*`
    Multiply,
    /// Join with `/`
    Divide,
}

impl AnnotateOp {
    /// The marker character for this operation.
    #[must_use]
    pub const fn glyph(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

/// Fixed-length sequence of checkpoint labels.
pub type LabelSeq = FixedSeq<Name>;

impl FixedSeq<Name> {
    /// Sequence of `len` sentinel labels.
    #[must_use]
    pub fn defaulted(len: usize) -> Self {
        Self::filled(len, Name::from_trusted(DEFAULT_LABEL.to_string()))
    }

    /// New sequence joining each label pair with the operation glyph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ.
    pub fn annotate(&self, op: AnnotateOp, other: &Self) -> Result<Self> {
        if self.len() != other.len() {
            return Err(Error::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        Ok(Self::from_vec(
            self.iter()
                .zip(other)
                .map(|(a, b)| Name::from_trusted(format!("{a}{}{b}", op.glyph())))
                .collect(),
        ))
    }

    /// New sequence suffixing every label with the glyph and a scalar.
    #[must_use]
    pub fn annotate_scalar(&self, op: AnnotateOp, factor: f64) -> Self {
        Self::from_vec(
            self.iter()
                .map(|label| Name::from_trusted(format!("{label}{}{factor}", op.glyph())))
                .collect(),
        )
    }

    /// In-place variant of [`annotate`](Self::annotate).
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ; nothing is
    /// written in that case.
    pub fn annotate_in_place(&mut self, op: AnnotateOp, other: &Self) -> Result<()> {
        let annotated = self.annotate(op, other)?;
        *self = annotated;
        Ok(())
    }

    /// In-place variant of [`annotate_scalar`](Self::annotate_scalar).
    pub fn annotate_scalar_in_place(&mut self, op: AnnotateOp, factor: f64) {
        *self = self.annotate_scalar(op, factor);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(raw: &[&str]) -> LabelSeq {
        LabelSeq::from_vec(raw.iter().map(|s| Name::new(s).unwrap()).collect())
    }

    #[test]
    fn test_defaulted_fills_sentinel() {
        let seq = LabelSeq::defaulted(3);
        assert_eq!(seq.len(), 3);
        assert!(seq.iter().all(|label| label.as_str() == DEFAULT_LABEL));
    }

    #[test]
    fn test_annotate_joins_with_glyph() {
        let a = labels(&["Start", "End"]);
        let b = labels(&["Mid", "Fin"]);
        let joined = a.annotate(AnnotateOp::Add, &b).unwrap();
        assert_eq!(joined[0].as_str(), "Start+Mid");
        assert_eq!(joined[1].as_str(), "End+Fin");

        let scaled = a.annotate_scalar(AnnotateOp::Multiply, 2.0);
        assert_eq!(scaled[0].as_str(), "Start*2");
    }

    #[test]
    fn test_annotate_requires_equal_len() {
        let a = labels(&["Start", "End"]);
        let b = labels(&["Mid"]);
        assert!(a.annotate(AnnotateOp::Subtract, &b).is_err());

        let mut c = a.clone();
        assert!(c.annotate_in_place(AnnotateOp::Subtract, &b).is_err());
        assert_eq!(c, a);
    }
}
