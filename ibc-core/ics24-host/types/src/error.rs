//! Errors raised while building or parsing host identifiers.

use displaydoc::Display;
use ibc_primitives::prelude::*;
use ibc_primitives::DecodingError;

/// Errors that arise when parsing identifiers.
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[derive(Debug, Display, PartialEq, Eq)]
pub enum IdentifierError {
    /// identifier `{id}` has invalid length; must be between `{min}` and `{max}` characters
    InvalidLength { id: String, min: u64, max: u64 },
    /// identifier `{id}` must only contain alphanumeric characters or `.`, `_`, `+`, `-`, `#`, `[`, `]`, `<`, `>`
    InvalidCharacter { id: String },
    /// identifier prefix `{prefix}` is invalid
    InvalidPrefix { prefix: String },
    /// failed to parse `{value}` as a sequence: `{reason}`
    InvalidStringAsSequence { value: String, reason: String },
}

impl From<IdentifierError> for DecodingError {
    fn from(e: IdentifierError) -> Self {
        DecodingError::InvalidIdentifier(e.to_string())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for IdentifierError {}
