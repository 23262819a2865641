//! Foundational error types that are applicable across the workspace.

use alloc::string::{String, ToString};

use displaydoc::Display;

use tendermint_proto::Error as ProtoError;

/// Causes of decoding failures
#[derive(Debug, Display)]
pub enum DecodingError {
    /// invalid identifier error: `{0}`
    InvalidIdentifier(String),
    /// invalid field: `{0}`
    InvalidField(String),
    /// invalid hash length: expected `{expected}`, actual `{actual}`
    InvalidHashLength { expected: usize, actual: usize },
    /// missing field: `{0}`
    MissingField(String),
    /// mismatched type URLs: expected `{expected}`, actual `{actual}`
    MismatchedTypeUrls { expected: String, actual: String },
    /// unknown type URL: `{0}`
    UnknownTypeUrl(String),
    /// failed to decode proto value: `{description}`
    FailedToDecodeProto { description: String },
}

impl DecodingError {
    pub fn missing_field(field: &str) -> Self {
        Self::MissingField(field.to_string())
    }
}

impl From<ProtoError> for DecodingError {
    fn from(e: ProtoError) -> Self {
        Self::FailedToDecodeProto {
            description: e.to_string(),
        }
    }
}

impl From<prost::DecodeError> for DecodingError {
    fn from(e: prost::DecodeError) -> Self {
        Self::FailedToDecodeProto {
            description: e.to_string(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for DecodingError {}
