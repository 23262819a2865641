//! Defines the IBFT2 light client's error type

use displaydoc::Display;
use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::Height;
use ibc_core_host_types::error::IdentifierError;
use ibc_primitives::prelude::*;
use ibc_primitives::DecodingError;

/// The main error type for the IBFT2 light client
#[derive(Debug, Display)]
pub enum Ibft2ClientError {
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// invalid IBC store address length: expected 20 bytes, actual `{0}`
    InvalidStoreAddress(usize),
    /// invalid validator address length: expected 20 bytes, actual `{0}`
    InvalidValidatorAddress(usize),
    /// invalid seal length: expected 65 bytes, actual `{0}`
    InvalidSealLength(usize),
    /// invalid seal: `{description}`
    InvalidSeal { description: String },
    /// failed to sign header: `{description}`
    FailedToSign { description: String },
    /// empty validator set
    EmptyValidatorSet,
    /// invalid commitment root length: expected 32 bytes, actual `{0}`
    InvalidRoot(usize),
    /// zero timestamp
    ZeroTimestamp,
    /// invalid `{field}` height: `{description}`
    InvalidHeight { field: String, description: String },
    /// trusted height `{trusted_height}` must be below header height `{header_height}`
    InvalidTrustedHeight {
        trusted_height: Height,
        header_height: Height,
    },
    /// header revision `{actual}` does not match chain revision `{expected}`
    MismatchedRevision { expected: u64, actual: u64 },
    /// duplicate validator `{0}` in validator set
    DuplicateValidator(String),
    /// duplicate seal from validator `{0}`
    DuplicateSeal(String),
    /// seal recovered to `{0}`, which is not a validator of the header
    UnknownSigner(String),
}

#[cfg(feature = "std")]
impl std::error::Error for Ibft2ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::InvalidIdentifier(e) => Some(e),
            Self::Decoding(e) => Some(e),
            _ => None,
        }
    }
}

impl From<Ibft2ClientError> for ClientError {
    fn from(e: Ibft2ClientError) -> Self {
        match e {
            Ibft2ClientError::InvalidSeal { description } => Self::InvalidSignature { description },
            Ibft2ClientError::DuplicateSeal(_) | Ibft2ClientError::UnknownSigner(_) => {
                Self::InvalidSignature {
                    description: e.to_string(),
                }
            }
            Ibft2ClientError::Decoding(e) => Self::Decoding(e),
            _ => Self::ClientSpecific {
                description: e.to_string(),
            },
        }
    }
}

impl From<IdentifierError> for Ibft2ClientError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

impl From<DecodingError> for Ibft2ClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}
