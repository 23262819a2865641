//! Defines the client error type

use core::convert::Infallible;

use displaydoc::Display;
use ibc_core_commitment_types::error::CommitmentError;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::ClientId;
use ibc_primitives::prelude::*;
use ibc_primitives::{DecodingError, Timestamp};

use crate::height::Height;
use crate::Status;

/// Encodes all the possible client errors
#[derive(Debug, Display)]
pub enum ClientError {
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// invalid identifier: `{0}`
    InvalidIdentifier(IdentifierError),
    /// client `{0}` not found
    ClientNotFound(ClientId),
    /// consensus state not found for client `{client_id}` at height `{height}`
    ConsensusStateNotFound { client_id: ClientId, height: Height },
    /// client state already exists: `{0}`
    DuplicateClientState(ClientId),
    /// consensus state already exists for client `{client_id}` at height `{height}`
    DuplicateHeight { client_id: ClientId, height: Height },
    /// client is not active; status: `{status}`
    ClientNotActive { status: Status },
    /// invalid client state type: `{0}`
    InvalidClientStateType(String),
    /// invalid consensus state type: `{0}`
    InvalidConsensusStateType(String),
    /// invalid header type: `{0}`
    InvalidHeaderType(String),
    /// missing client message
    MissingClientMessage,
    /// invalid height; cannot be zero or negative
    InvalidHeight,
    /// height cannot end up zero or negative
    InvalidHeightResult,
    /// invalid proof height; expected `{actual}` <= `{latest}`
    InvalidProofHeight { actual: Height, latest: Height },
    /// stale header at height `{header_height}`; the client is already at `{latest_height}`
    StaleHeader {
        header_height: Height,
        latest_height: Height,
    },
    /// stale header timestamp `{header_timestamp}`; the trusted state is at `{trusted_timestamp}`
    StaleTimestamp {
        header_timestamp: Timestamp,
        trusted_timestamp: Timestamp,
    },
    /// invalid signature: `{description}`
    InvalidSignature { description: String },
    /// insufficient voting power: `{signed}` of `{total}` validators signed
    InsufficientSignatures { signed: usize, total: usize },
    /// validator set continuity not met: `{overlap}` of `{trusted}` trusted validators signed
    InsufficientTrustedOverlap { overlap: usize, trusted: usize },
    /// proof verification failed: `{0}`
    FailedProofVerification(CommitmentError),
    /// mismatched commitment prefix; the client tracks store `{expected}`
    MismatchedCommitmentPrefix { expected: String },
    /// client-specific error: `{description}`
    ClientSpecific { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl From<&'static str> for ClientError {
    fn from(s: &'static str) -> Self {
        Self::Other {
            description: s.to_string(),
        }
    }
}

impl From<Infallible> for ClientError {
    fn from(value: Infallible) -> Self {
        match value {}
    }
}

impl From<CommitmentError> for ClientError {
    fn from(e: CommitmentError) -> Self {
        Self::FailedProofVerification(e)
    }
}

impl From<DecodingError> for ClientError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ClientError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::FailedProofVerification(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            _ => None,
        }
    }
}
