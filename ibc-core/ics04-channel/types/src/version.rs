//! The application version carried by a channel end.

use core::fmt::{Display, Error as FmtError, Formatter};

use ibc_primitives::prelude::*;

use super::error::ChannelError;

/// Opaque to the core handlers. The application bound to the port proposes
/// and accepts it through its handshake callbacks; an empty proposal lets the
/// application choose.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Version(String);

impl Version {
    pub fn new(v: impl Into<String>) -> Self {
        Self(v.into())
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Fails unless this version equals the one the application expects.
    pub fn verify_is_expected(&self, expected: &Version) -> Result<(), ChannelError> {
        if self != expected {
            return Err(ChannelError::VersionNotSupported {
                expected: expected.clone(),
                actual: self.clone(),
            });
        }
        Ok(())
    }
}

impl From<String> for Version {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Version {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for Version {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        f.write_str(&self.0)
    }
}
