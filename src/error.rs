//! Error types for splits-db
//!
//! One flat taxonomy: every failure is recoverable at the caller and no
//! operation leaves an entity or container partially modified.

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// Splits-db error types
#[derive(Error, Debug)]
pub enum Error {
    /// A required token was empty or missing from the input.
    #[error("blank {0}")]
    BlankInput(String),

    /// A declared sequence size was zero or negative.
    #[error("nonpositive {context}: {size}")]
    NonPositiveSize {
        /// What the size described (e.g. "template size")
        context: String,
        /// The offending value
        size: i64,
    },

    /// A checkpoint index fell outside the owning template's range.
    #[error("index {index} out of range for size {size}")]
    IndexOutOfRange {
        /// The offending index (may be negative when parsed from input)
        index: i64,
        /// The sequence size the index was checked against
        size: usize,
    },

    /// Two sequences being combined or copied have different lengths.
    #[error("size mismatch: expected {expected} elements, found {actual}")]
    SizeMismatch {
        /// Length of the destination or left-hand sequence
        expected: usize,
        /// Length of the source or right-hand sequence
        actual: usize,
    },

    /// Creation used a key already present in the target container.
    #[error("already defined: {0}")]
    KeyConflict(String),

    /// Lookup or removal used a key absent from the target container.
    #[error("not found: {0}")]
    KeyNotFound(String),

    /// A file could not be opened for import or export.
    #[error("cannot open {path}")]
    UnopenableFile {
        /// The path that failed to open
        path: String,
        /// The underlying IO failure
        source: std::io::Error,
    },

    /// A token was present but failed to parse as the expected value.
    #[error("malformed {context}: {token:?}")]
    MalformedToken {
        /// What the token was expected to be (e.g. "period")
        context: String,
        /// The raw token text
        token: String,
    },

    /// IO error below the token layer
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
