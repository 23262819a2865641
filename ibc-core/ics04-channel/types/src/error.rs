//! Defines the main channel and packet error types

use displaydoc::Display;
use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::Height;
use ibc_core_commitment_types::error::CommitmentError;
use ibc_core_connection_types::error::ConnectionError;
use ibc_core_host_types::error::IdentifierError;
use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_primitives::{DecodingError, Timestamp};

use super::channel::Counterparty;
use super::timeout::TimeoutHeight;
use crate::channel::State;
use crate::timeout::TimeoutTimestamp;
use crate::Version;

#[derive(Debug, Display)]
pub enum ChannelError {
    /// connection error: `{0}`
    Connection(ConnectionError),
    /// client error: `{0}`
    Client(ClientError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// invalid channel state: expected `{expected}`, actual `{actual}`
    InvalidState { expected: String, actual: String },
    /// channel `{channel_id}` on port `{port_id}` not found
    ChannelNotFound {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// channel is already closed
    ChannelClosed,
    /// connection `{connection_id}` is not open
    ConnectionNotOpen { connection_id: ConnectionId },
    /// connection `{connection_id}` does not know its counterparty connection yet
    MissingConnectionCounterparty { connection_id: ConnectionId },
    /// invalid connection hops length: expected `{expected}`; actual `{actual}`
    InvalidConnectionHopsLength { expected: usize, actual: usize },
    /// channel ordering `{ordering}` is not supported by the connection
    ChannelFeatureNotSupportedByConnection { ordering: String },
    /// invalid channel ordering `{0}`
    UnknownOrderType(String),
    /// invalid counterparty: expected `{expected}`, actual `{actual}`
    InvalidCounterparty {
        expected: Counterparty,
        actual: Counterparty,
    },
    /// missing counterparty
    MissingCounterparty,
    /// missing channel end
    MissingChannel,
    /// missing proof height
    MissingProofHeight,
    /// invalid proof: `{0}`
    InvalidProof(CommitmentError),
    /// verifying the counterparty channel end failed: `{0}`
    VerifyChannelFailed(ClientError),
    /// version mismatch: expected `{expected}`, actual `{actual}`
    VersionNotSupported { expected: Version, actual: Version },
    /// channel upgrades are not supported
    UnsupportedChannelUpgradeSequence,
    /// channel counter overflow error
    CounterOverflow,
    /// application module error: `{description}`
    AppModule { description: String },
    /// other error: `{description}`
    Other { description: String },
}

#[derive(Debug, Display)]
pub enum PacketError {
    /// connection error: `{0}`
    Connection(ConnectionError),
    /// channel error: `{0}`
    Channel(ChannelError),
    /// client error: `{0}`
    Client(ClientError),
    /// decoding error: `{0}`
    Decoding(DecodingError),
    /// identifier error: `{0}`
    InvalidIdentifier(IdentifierError),
    /// channel `{channel_id}` is in state `{state}`, packets need it OPEN
    ChannelNotOpen { channel_id: ChannelId, state: State },
    /// packet sequence `{given_sequence}` does not match the next expected sequence `{next_sequence}`
    UnexpectedSequence {
        given_sequence: Sequence,
        next_sequence: Sequence,
    },
    /// packet with sequence `{sequence}` was already received
    DuplicatePacket { sequence: Sequence },
    /// packet with sequence `{sequence}` has no commitment; it was already acknowledged or timed out
    AlreadyAcknowledged { sequence: Sequence },
    /// acknowledgement for the packet with sequence `{sequence}` was already written
    AcknowledgementExists { sequence: Sequence },
    /// packet timed out at height `{timeout_height}` or time `{timeout_timestamp}`; the receiving chain is at height `{chain_height}` and time `{chain_timestamp}`
    PacketTimedOut {
        timeout_height: TimeoutHeight,
        timeout_timestamp: TimeoutTimestamp,
        chain_height: Height,
        chain_timestamp: Timestamp,
    },
    /// packet timeout already elapsed on the destination: height `{timeout_height}`, time `{timeout_timestamp}`; destination at height `{chain_height}`, time `{chain_timestamp}`
    TimeoutElapsed {
        timeout_height: TimeoutHeight,
        timeout_timestamp: TimeoutTimestamp,
        chain_height: Height,
        chain_timestamp: Timestamp,
    },
    /// packet timeout has not been reached; the proof was taken at height `{proof_height}`, time `{proof_timestamp}`
    TimeoutNotReached {
        proof_height: Height,
        proof_timestamp: Timestamp,
    },
    /// packet with sequence `{sequence}` was received by the counterparty (next receive sequence `{next_seq_recv}`)
    PacketReceived {
        sequence: Sequence,
        next_seq_recv: Sequence,
    },
    /// the stored commitment does not match the packet with sequence `{sequence}`
    IncorrectPacketCommitment { sequence: Sequence },
    /// packet destination `{port_id}/{channel_id}` does not match the channel counterparty
    InvalidPacketCounterparty {
        port_id: PortId,
        channel_id: ChannelId,
    },
    /// packet sequence cannot be 0
    ZeroPacketSequence,
    /// packet data bytes cannot be empty
    ZeroPacketData,
    /// packet timeout height and timestamp cannot both be unset
    MissingTimeout,
    /// invalid timeout height for the packet
    InvalidTimeoutHeight,
    /// acknowledgement cannot be empty
    InvalidAcknowledgement,
    /// missing packet
    MissingPacket,
    /// missing proof height
    MissingProofHeight,
    /// invalid proof: `{0}`
    InvalidProof(CommitmentError),
    /// packet verification failed for the packet with sequence `{sequence}`: `{client_error}`
    PacketVerificationFailed {
        sequence: Sequence,
        client_error: ClientError,
    },
    /// application module error: `{description}`
    AppModule { description: String },
    /// other error: `{description}`
    Other { description: String },
}

impl From<ConnectionError> for ChannelError {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

impl From<ClientError> for ChannelError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<DecodingError> for ChannelError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for ChannelError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

impl From<ChannelError> for PacketError {
    fn from(e: ChannelError) -> Self {
        Self::Channel(e)
    }
}

impl From<ConnectionError> for PacketError {
    fn from(e: ConnectionError) -> Self {
        Self::Connection(e)
    }
}

impl From<ClientError> for PacketError {
    fn from(e: ClientError) -> Self {
        Self::Client(e)
    }
}

impl From<DecodingError> for PacketError {
    fn from(e: DecodingError) -> Self {
        Self::Decoding(e)
    }
}

impl From<IdentifierError> for PacketError {
    fn from(e: IdentifierError) -> Self {
        Self::InvalidIdentifier(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for PacketError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Connection(e) => Some(e),
            Self::Channel(e) => Some(e),
            Self::Client(e)
            | Self::PacketVerificationFailed {
                client_error: e, ..
            } => Some(e),
            Self::Decoding(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::InvalidProof(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ChannelError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::Connection(e) => Some(e),
            Self::Client(e) | Self::VerifyChannelFailed(e) => Some(e),
            Self::Decoding(e) => Some(e),
            Self::InvalidIdentifier(e) => Some(e),
            Self::InvalidProof(e) => Some(e),
            _ => None,
        }
    }
}
