//! Defines the connection error type

use displaydoc::Display;
use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::Height;
use ibc_core_commitment_types::error::CommitmentError;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::{ClientId, ConnectionId};
use ibc_primitives::prelude::*;
use ibc_primitives::DecodingError;

use crate::version::Version;

#[derive(Debug, Display)]
pub enum ConnectionError {
    /// client error: `{0}`
    Client(ClientError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// invalid connection state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid commitment prefix: `{0}`
    InvalidPrefix(CommitmentError),
    /// empty supported versions
    EmptyVersions,
    /// single version must be negotiated on connection before opening channel
    InvalidVersionLength,
    /// version \"`{version}`\" not supported
    VersionNotSupported { version: Version },
    /// no compatible version between the supported and the proposed versions
    NoCompatibleVersion,
    /// empty supported features
    EmptyFeatures,
    /// feature \"`{feature}`\" not supported
    FeatureNotSupported { feature: String },
    /// missing proof height
    MissingProofHeight,
    /// invalid connection proof: `{0}`
    InvalidProof(CommitmentError),
    /// verifying the counterparty connection end failed: `{0}`
    VerifyConnectionState(ClientError),
    /// no connection was found for the connection id `{connection_id}`
    ConnectionNotFound { connection_id: ConnectionId },
    /// counterparty connection id must be empty on connection open init
    InvalidCounterparty,
    /// missing counterparty
    MissingCounterparty,
    /// client `{client_id}` is not associated with the connection
    MismatchedClient { client_id: ClientId },
    /// proof height `{proof_height}` is ahead of the latest client height `{latest_height}`
    InvalidProofHeight {
        proof_height: Height,
        latest_height: Height,
    },
    /// connection counter overflow error
    CounterOverflow,
    /// other error: `{description}`
    Other { description: String },
}

impl From<ClientError> for ConnectionError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<DecodingError> for ConnectionError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ConnectionError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ConnectionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Client(e) | Self::VerifyConnectionState(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::InvalidPrefix(e) | Self::InvalidProof(e) => Some(e),
            _ => None,
        }
    }
}
