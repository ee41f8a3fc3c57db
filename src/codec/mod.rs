//! Token-oriented stream layer for the persisted text format.
//!
//! The on-disk form is a flat run of whitespace-delimited tokens; newlines
//! are cosmetic. [`TokenReader`] pulls one token at a time off any `BufRead`
//! and parses it on demand, [`TokenWriter`] emits tokens with single-space
//! separation. Everything above this layer (entities, containers) speaks in
//! tokens, never raw bytes.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::str::FromStr;

use crate::{Error, Result};

/// Whitespace-delimited token reader over any buffered input.
#[derive(Debug)]
pub struct TokenReader<R> {
    inner: R,
}

impl<R: BufRead> TokenReader<R> {
    /// Wrap a buffered reader.
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    /// Next token, or `None` once the stream is exhausted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on read failure and [`Error::MalformedToken`]
    /// if the token is not valid UTF-8.
    pub fn try_next(&mut self) -> Result<Option<String>> {
        let mut raw: Vec<u8> = Vec::new();
        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                break;
            }
            let mut used = 0;
            let mut complete = false;
            for &byte in buf {
                used += 1;
                if byte.is_ascii_whitespace() {
                    if raw.is_empty() {
                        continue;
                    }
                    complete = true;
                    break;
                }
                raw.push(byte);
            }
            self.inner.consume(used);
            if complete {
                break;
            }
        }
        if raw.is_empty() {
            return Ok(None);
        }
        let token = String::from_utf8(raw).map_err(|source| Error::MalformedToken {
            context: "token".to_string(),
            token: String::from_utf8_lossy(source.as_bytes()).into_owned(),
        })?;
        Ok(Some(token))
    }

    /// Next token, with `context` naming what the token was for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankInput`] describing `context` if the stream is
    /// exhausted.
    pub fn next_token(&mut self, context: &str) -> Result<String> {
        self.try_next()?
            .ok_or_else(|| Error::BlankInput(context.to_string()))
    }

    /// Next token parsed as `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedToken`] if the token does not parse.
    pub fn next_parsed<T: FromStr>(&mut self, context: &str) -> Result<T> {
        let token = self.next_token(context)?;
        token.parse().map_err(|_| Error::MalformedToken {
            context: context.to_string(),
            token,
        })
    }

    /// Next token parsed as a strictly positive sequence size.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NonPositiveSize`] for zero or negative values.
    pub fn next_size(&mut self, context: &str) -> Result<usize> {
        let size: i64 = self.next_parsed(context)?;
        if size <= 0 {
            return Err(Error::NonPositiveSize {
                context: context.to_string(),
                size,
            });
        }
        usize::try_from(size).map_err(|_| Error::NonPositiveSize {
            context: context.to_string(),
            size,
        })
    }

    /// Next token parsed as a non-negative element count (zero allowed).
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedToken`] for negative or non-numeric counts.
    pub fn next_count(&mut self, context: &str) -> Result<usize> {
        let count: i64 = self.next_parsed(context)?;
        usize::try_from(count).map_err(|_| Error::MalformedToken {
            context: context.to_string(),
            token: count.to_string(),
        })
    }

    /// Next token parsed as an index into a sequence of length `size`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IndexOutOfRange`] for negative indices or indices at
    /// or beyond `size`.
    pub fn next_index(&mut self, size: usize, context: &str) -> Result<usize> {
        let index: i64 = self.next_parsed(context)?;
        if index < 0 || index >= size as i64 {
            return Err(Error::IndexOutOfRange { index, size });
        }
        Ok(index as usize)
    }
}

/// Token writer emitting single-space separation with optional line breaks.
#[derive(Debug)]
pub struct TokenWriter<W> {
    inner: W,
}

impl<W: Write> TokenWriter<W> {
    /// Wrap a writer.
    pub fn new(inner: W) -> Self {
        Self { inner }
    }

    /// Write one token followed by a separating space.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure.
    pub fn token(&mut self, value: impl Display) -> Result<()> {
        write!(self.inner, "{value} ")?;
        Ok(())
    }

    /// Write a cosmetic line break.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on write failure.
    pub fn end_line(&mut self) -> Result<()> {
        writeln!(self.inner)?;
        Ok(())
    }

    /// Flush the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] on flush failure.
    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
