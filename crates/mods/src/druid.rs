//! Druid: Stanford Digital Repository object identifiers.
//!
//! Every roll is addressed by its DRUID almost everywhere in the pipeline:
//! metadata URLs, input filenames, output filenames, and catalog entries.
//! Validating once at the edge means the rest of the code never has to
//! wonder whether an identifier is well-formed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A DRUID - two lowercase letters, three digits, two lowercase letters,
/// four digits (e.g. `zb497jz4405`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Druid(String);

/// Errors that can occur when parsing a DRUID.
#[derive(Debug, Error)]
pub enum DruidError {
    #[error("invalid DRUID length: expected 11 chars, got {0}")]
    InvalidLength(usize),

    #[error("invalid DRUID format: {0:?}")]
    InvalidFormat(String),
}

impl Druid {
    /// Parse a DRUID string (validates format).
    ///
    /// Surrounding whitespace and an optional `druid:` prefix, as it appears
    /// in some repository exports, are accepted and stripped.
    pub fn parse(s: &str) -> Result<Self, DruidError> {
        let s = s.trim();
        let s = s.strip_prefix("druid:").unwrap_or(s);
        if s.len() != 11 {
            return Err(DruidError::InvalidLength(s.len()));
        }
        let b = s.as_bytes();
        let shaped = b[0].is_ascii_lowercase()
            && b[1].is_ascii_lowercase()
            && b[2].is_ascii_digit()
            && b[3].is_ascii_digit()
            && b[4].is_ascii_digit()
            && b[5].is_ascii_lowercase()
            && b[6].is_ascii_lowercase()
            && b[7].is_ascii_digit()
            && b[8].is_ascii_digit()
            && b[9].is_ascii_digit()
            && b[10].is_ascii_digit();
        if !shaped {
            return Err(DruidError::InvalidFormat(s.to_string()));
        }
        Ok(Self(s.to_string()))
    }

    /// Get the DRUID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Druid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Druid {
    type Err = DruidError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Druid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
