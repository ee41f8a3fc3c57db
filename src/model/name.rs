//! Name - trimmed, non-empty identifier token

use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Trimmed, non-empty identifier used as a map key.
///
/// A name is a single token on the wire, so internal whitespace is rejected
/// at construction. Equality is exact string equality.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Name(String);

impl Name {
    /// Validate and intern an identifier.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BlankInput`] if `raw` trims to nothing and
    /// [`Error::MalformedToken`] if it contains internal whitespace.
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(Error::BlankInput("name".to_string()));
        }
        if trimmed.contains(char::is_whitespace) {
            return Err(Error::MalformedToken {
                context: "name".to_string(),
                token: raw.to_string(),
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Wrap a string already known to be a valid single token.
    pub(crate) fn from_trusted(raw: String) -> Self {
        Self(raw)
    }

    /// The identifier text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Name {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
