//! Fixed-length ordered value sequences.
//!
//! Every timed collection in the store is a [`FixedSeq`]: allocated once at a
//! declared length and never resized. Two specializations carry the domain
//! operations - `FixedSeq<Period>` ([`IntervalSeq`]) adds elementwise
//! arithmetic and the two prefix-sum interpretations, `FixedSeq<Name>`
//! ([`LabelSeq`]) adds label annotation.

mod interval;
mod label;

pub use interval::IntervalSeq;
pub use label::{AnnotateOp, LabelSeq, DEFAULT_LABEL};

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use crate::codec::{TokenReader, TokenWriter};
use crate::{Error, Result};

/// Fixed-length, index-addressable sequence of a homogeneous value type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedSeq<E> {
    items: Vec<E>,
}

impl<E> FixedSeq<E> {
    /// Sequence of `len` copies of `value`.
    #[must_use]
    pub fn filled(len: usize, value: E) -> Self
    where
        E: Clone,
    {
        Self {
            items: vec![value; len],
        }
    }

    /// Sequence taking ownership of `items`; the length is fixed from here on.
    #[must_use]
    pub fn from_vec(items: Vec<E>) -> Self {
        Self { items }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Checked read at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn get(&self, index: usize) -> Result<&E> {
        self.items.get(index).ok_or(Error::IndexOutOfRange {
            index: index as i64,
            size: self.items.len(),
        })
    }

    /// Checked write at `index`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] if `index >= len`.
    pub fn set(&mut self, index: usize, value: E) -> Result<()> {
        let size = self.items.len();
        let slot = self.items.get_mut(index).ok_or(Error::IndexOutOfRange {
            index: index as i64,
            size,
        })?;
        *slot = value;
        Ok(())
    }

    /// Overwrite every element from another sequence of the same length.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SizeMismatch`] if the lengths differ; nothing is
    /// written in that case.
    pub fn copy_from(&mut self, other: &Self) -> Result<()>
    where
        E: Clone,
    {
        if self.len() != other.len() {
            return Err(Error::SizeMismatch {
                expected: self.len(),
                actual: other.len(),
            });
        }
        self.items.clone_from_slice(&other.items);
        Ok(())
    }

    /// Iterator over the elements in index order.
    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.items.iter()
    }

    /// The elements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[E] {
        &self.items
    }

    /// Write all elements as whitespace-separated tokens in index order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure.
    pub fn write_content<W: Write>(&self, w: &mut TokenWriter<W>) -> Result<()>
    where
        E: Display,
    {
        for item in &self.items {
            w.token(item)?;
        }
        Ok(())
    }

    /// Read exactly `len` tokens in index order, replacing every element.
    ///
    /// Parses into scratch storage first, so a short or malformed stream
    /// leaves the sequence untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankInput`] if the stream runs out of tokens and
    /// [`Error::MalformedToken`] if a token does not parse.
    pub fn read_content<R: BufRead>(&mut self, r: &mut TokenReader<R>, context: &str) -> Result<()>
    where
        E: FromStr,
    {
        let mut scratch = Vec::with_capacity(self.len());
        for _ in 0..self.len() {
            scratch.push(r.next_parsed::<E>(context)?);
        }
        self.items = scratch;
        Ok(())
    }
}

impl<E> Index<usize> for FixedSeq<E> {
    type Output = E;

    fn index(&self, index: usize) -> &E {
        &self.items[index]
    }
}

impl<E> IndexMut<usize> for FixedSeq<E> {
    fn index_mut(&mut self, index: usize) -> &mut E {
        &mut self.items[index]
    }
}

impl<'a, E> IntoIterator for &'a FixedSeq<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
