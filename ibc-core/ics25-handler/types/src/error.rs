//! Defines the context error type and its error-kind taxonomy

use core::fmt::{Display, Error as FmtError, Formatter};

use derive_more::From;
use displaydoc::Display;
use ibc_core_channel_types::error::{ChannelError, PacketError};
use ibc_core_client_types::error::ClientError;
use ibc_core_connection_types::error::ConnectionError;
use ibc_core_router_types::error::RouterError;
use ibc_primitives::prelude::*;

/// Top-level error returned by the handlers and the host contexts
#[derive(Debug, Display, From)]
pub enum ContextError {
    /// ICS02 Client error: {0}
    ClientError(ClientError),
    /// ICS03 Connection error: {0}
    ConnectionError(ConnectionError),
    /// ICS04 Channel error: {0}
    ChannelError(ChannelError),
    /// ICS04 Packet error: {0}
    PacketError(PacketError),
    /// ICS26 Routing error: {0}
    RouterError(RouterError),
    /// host error: {description}
    #[from(ignore)]
    HostError { description: String },
}

/// The kind of failure behind a [`ContextError`], coarse enough for a caller
/// to decide between retrying later, aborting, or switching to the timeout
/// path.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidState,
    StaleHeader,
    InvalidSignature,
    ProofVerificationFailed,
    UnexpectedSequence,
    DuplicatePacket,
    AlreadyAcknowledged,
    PacketTimedOut,
    TimeoutElapsed,
    NoCompatibleVersion,
    DuplicateHeight,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotFound => "NotFound",
            Self::InvalidState => "InvalidState",
            Self::StaleHeader => "StaleHeader",
            Self::InvalidSignature => "InvalidSignature",
            Self::ProofVerificationFailed => "ProofVerificationFailed",
            Self::UnexpectedSequence => "UnexpectedSequence",
            Self::DuplicatePacket => "DuplicatePacket",
            Self::AlreadyAcknowledged => "AlreadyAcknowledged",
            Self::PacketTimedOut => "PacketTimedOut",
            Self::TimeoutElapsed => "TimeoutElapsed",
            Self::NoCompatibleVersion => "NoCompatibleVersion",
            Self::DuplicateHeight => "DuplicateHeight",
            Self::Other => "Other",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl ContextError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ClientError(e) => client_error_kind(e),
            Self::ConnectionError(e) => connection_error_kind(e),
            Self::ChannelError(e) => channel_error_kind(e),
            Self::PacketError(e) => packet_error_kind(e),
            Self::RouterError(RouterError::UnknownPort { .. } | RouterError::ModuleNotFound) => {
                ErrorKind::NotFound
            }
            Self::RouterError(_) | Self::HostError { .. } => ErrorKind::Other,
        }
    }
}

fn client_error_kind(e: &ClientError) -> ErrorKind {
    match e {
        ClientError::ClientNotFound(_) | ClientError::ConsensusStateNotFound { .. } => {
            ErrorKind::NotFound
        }
        ClientError::ClientNotActive { .. } => ErrorKind::InvalidState,
        ClientError::StaleHeader { .. } | ClientError::StaleTimestamp { .. } => {
            ErrorKind::StaleHeader
        }
        ClientError::InvalidSignature { .. }
        | ClientError::InsufficientSignatures { .. }
        | ClientError::InsufficientTrustedOverlap { .. } => ErrorKind::InvalidSignature,
        ClientError::FailedProofVerification(_)
        | ClientError::MismatchedCommitmentPrefix { .. } => ErrorKind::ProofVerificationFailed,
        ClientError::DuplicateHeight { .. } => ErrorKind::DuplicateHeight,
        _ => ErrorKind::Other,
    }
}

/// A light client rejecting a proof is a verification failure unless the
/// client error itself is more specific.
fn proof_error_kind(e: &ClientError) -> ErrorKind {
    match client_error_kind(e) {
        ErrorKind::Other => ErrorKind::ProofVerificationFailed,
        kind => kind,
    }
}

fn connection_error_kind(e: &ConnectionError) -> ErrorKind {
    match e {
        ConnectionError::Client(e) => client_error_kind(e),
        ConnectionError::ConnectionNotFound { .. } => ErrorKind::NotFound,
        ConnectionError::InvalidState { .. } => ErrorKind::InvalidState,
        ConnectionError::NoCompatibleVersion
        | ConnectionError::VersionNotSupported { .. }
        | ConnectionError::FeatureNotSupported { .. } => ErrorKind::NoCompatibleVersion,
        ConnectionError::InvalidProof(_) => ErrorKind::ProofVerificationFailed,
        ConnectionError::VerifyConnectionState(e) => proof_error_kind(e),
        _ => ErrorKind::Other,
    }
}

fn channel_error_kind(e: &ChannelError) -> ErrorKind {
    match e {
        ChannelError::Connection(e) => connection_error_kind(e),
        ChannelError::Client(e) => client_error_kind(e),
        ChannelError::ChannelNotFound { .. } => ErrorKind::NotFound,
        ChannelError::InvalidState { .. }
        | ChannelError::ChannelClosed
        | ChannelError::ConnectionNotOpen { .. }
        | ChannelError::MissingConnectionCounterparty { .. } => ErrorKind::InvalidState,
        ChannelError::InvalidProof(_) => ErrorKind::ProofVerificationFailed,
        ChannelError::VerifyChannelFailed(e) => proof_error_kind(e),
        ChannelError::ChannelFeatureNotSupportedByConnection { .. }
        | ChannelError::VersionNotSupported { .. } => ErrorKind::NoCompatibleVersion,
        _ => ErrorKind::Other,
    }
}

fn packet_error_kind(e: &PacketError) -> ErrorKind {
    match e {
        PacketError::Connection(e) => connection_error_kind(e),
        PacketError::Channel(e) => channel_error_kind(e),
        PacketError::Client(e) => client_error_kind(e),
        PacketError::ChannelNotOpen { .. } => ErrorKind::InvalidState,
        PacketError::UnexpectedSequence { .. } => ErrorKind::UnexpectedSequence,
        PacketError::DuplicatePacket { .. } | PacketError::AcknowledgementExists { .. } => {
            ErrorKind::DuplicatePacket
        }
        PacketError::AlreadyAcknowledged { .. } => ErrorKind::AlreadyAcknowledged,
        PacketError::PacketTimedOut { .. } => ErrorKind::PacketTimedOut,
        PacketError::TimeoutElapsed { .. } => ErrorKind::TimeoutElapsed,
        PacketError::InvalidProof(_) => ErrorKind::ProofVerificationFailed,
        PacketError::PacketVerificationFailed { client_error, .. } => {
            proof_error_kind(client_error)
        }
        _ => ErrorKind::Other,
    }
}

impl From<ContextError> for ClientError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::ClientError(e) => e,
            _ => ClientError::Other {
                description: context_error.to_string(),
            },
        }
    }
}

impl From<ContextError> for ConnectionError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::ConnectionError(e) => e,
            ContextError::ClientError(e) => ConnectionError::Client(e),
            _ => ConnectionError::Other {
                description: context_error.to_string(),
            },
        }
    }
}

impl From<ContextError> for ChannelError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::ChannelError(e) => e,
            ContextError::ConnectionError(e) => ChannelError::Connection(e),
            ContextError::ClientError(e) => ChannelError::Client(e),
            _ => ChannelError::Other {
                description: context_error.to_string(),
            },
        }
    }
}

impl From<ContextError> for PacketError {
    fn from(context_error: ContextError) -> Self {
        match context_error {
            ContextError::PacketError(e) => e,
            ContextError::ChannelError(e) => PacketError::Channel(e),
            ContextError::ConnectionError(e) => PacketError::Connection(e),
            ContextError::ClientError(e) => PacketError::Client(e),
            _ => PacketError::Other {
                description: context_error.to_string(),
            },
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ClientError(e) => Some(e),
            Self::ConnectionError(e) => Some(e),
            Self::ChannelError(e) => Some(e),
            Self::PacketError(e) => Some(e),
            Self::RouterError(e) => Some(e),
            Self::HostError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_core_client_types::Height;
    use ibc_core_commitment_types::error::CommitmentError;
    use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
    use rstest::rstest;

    use super::*;

    fn height(h: u64) -> Height {
        Height::new(0, h).unwrap()
    }

    #[rstest]
    #[case(
        ConnectionError::ConnectionNotFound { connection_id: ConnectionId::new(0) }.into(),
        ErrorKind::NotFound
    )]
    #[case(
        ChannelError::ChannelNotFound { port_id: PortId::transfer(), channel_id: ChannelId::new(0) }.into(),
        ErrorKind::NotFound
    )]
    #[case(
        ClientError::StaleHeader { header_height: height(1), latest_height: height(2) }.into(),
        ErrorKind::StaleHeader
    )]
    #[case(
        ClientError::InsufficientSignatures { signed: 1, total: 4 }.into(),
        ErrorKind::InvalidSignature
    )]
    #[case(ConnectionError::NoCompatibleVersion.into(), ErrorKind::NoCompatibleVersion)]
    #[case(
        PacketError::PacketVerificationFailed {
            sequence: Sequence::from(1),
            client_error: ClientError::FailedProofVerification(CommitmentError::EmptyMerkleProof),
        }.into(),
        ErrorKind::ProofVerificationFailed
    )]
    #[case(
        PacketError::Channel(ChannelError::ChannelClosed).into(),
        ErrorKind::InvalidState
    )]
    #[case(
        PacketError::AlreadyAcknowledged { sequence: Sequence::from(3) }.into(),
        ErrorKind::AlreadyAcknowledged
    )]
    #[case(
        ClientError::DuplicateHeight { client_id: "hb-ibft2-0".parse().unwrap(), height: height(5) }.into(),
        ErrorKind::DuplicateHeight
    )]
    #[case(
        ContextError::HostError { description: "disk full".to_string() },
        ErrorKind::Other
    )]
    fn error_kinds(#[case] error: ContextError, #[case] kind: ErrorKind) {
        assert_eq!(error.kind(), kind);
    }
}
