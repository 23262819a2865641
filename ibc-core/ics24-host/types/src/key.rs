//! Deterministic derivation of commitment keys and storage slots.
//!
//! Every provable object lives under a typed [`Path`]. Its commitment key is
//! the Keccak-256 hash of the path, which starts with the object kind tag
//! followed by the identifier fields. Its storage slot is derived from the
//! commitment key and the mapping slot owned by the object kind, the way an
//! EVM mapping lays out `mapping(bytes32 => bytes32)` entries.

use core::fmt::{Debug, Display, Error as FmtError, Formatter};

use ibc_primitives::prelude::*;
use sha3::{Digest, Keccak256};

use crate::identifiers::{ChannelId, ClientId, ConnectionId, PortId, Sequence};
use crate::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, ClientStatePath, CommitmentPath,
    ConnectionPath, Path, ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath, CHANNEL_END_PREFIX,
    CLIENT_PREFIX, CONNECTION_PREFIX, CONSENSUS_STATE_PREFIX, NEXT_SEQ_ACK_PREFIX,
    NEXT_SEQ_RECV_PREFIX, NEXT_SEQ_SEND_PREFIX, PACKET_ACK_PREFIX, PACKET_COMMITMENT_PREFIX,
    PACKET_RECEIPT_PREFIX,
};

pub const HASH_LENGTH: usize = 32;

pub fn keccak256(bytes: &[u8]) -> [u8; HASH_LENGTH] {
    Keccak256::digest(bytes).into()
}

fn fmt_hex(bytes: &[u8], f: &mut Formatter<'_>) -> Result<(), FmtError> {
    let hex = subtle_encoding::hex::encode(bytes);
    match core::str::from_utf8(&hex) {
        Ok(s) => write!(f, "0x{s}"),
        Err(_) => Err(FmtError),
    }
}

/// Kinds of objects committed by the provable store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ObjectKind {
    ClientState,
    ConsensusState,
    Connection,
    Channel,
    NextSequenceSend,
    NextSequenceRecv,
    NextSequenceAck,
    PacketCommitment,
    PacketReceipt,
    PacketAcknowledgement,
}

impl ObjectKind {
    pub const ALL: [ObjectKind; 10] = [
        ObjectKind::ClientState,
        ObjectKind::ConsensusState,
        ObjectKind::Connection,
        ObjectKind::Channel,
        ObjectKind::NextSequenceSend,
        ObjectKind::NextSequenceRecv,
        ObjectKind::NextSequenceAck,
        ObjectKind::PacketCommitment,
        ObjectKind::PacketReceipt,
        ObjectKind::PacketAcknowledgement,
    ];

    /// The leading path segment of every object of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::ClientState => CLIENT_PREFIX,
            Self::ConsensusState => CONSENSUS_STATE_PREFIX,
            Self::Connection => CONNECTION_PREFIX,
            Self::Channel => CHANNEL_END_PREFIX,
            Self::NextSequenceSend => NEXT_SEQ_SEND_PREFIX,
            Self::NextSequenceRecv => NEXT_SEQ_RECV_PREFIX,
            Self::NextSequenceAck => NEXT_SEQ_ACK_PREFIX,
            Self::PacketCommitment => PACKET_COMMITMENT_PREFIX,
            Self::PacketReceipt => PACKET_RECEIPT_PREFIX,
            Self::PacketAcknowledgement => PACKET_ACK_PREFIX,
        }
    }

    /// Position of the per-kind mapping in the host contract storage layout.
    pub fn mapping_slot(&self) -> u64 {
        match self {
            Self::ClientState => 0,
            Self::ConsensusState => 1,
            Self::Connection => 2,
            Self::Channel => 3,
            Self::NextSequenceSend => 4,
            Self::NextSequenceRecv => 5,
            Self::NextSequenceAck => 6,
            Self::PacketCommitment => 7,
            Self::PacketReceipt => 8,
            Self::PacketAcknowledgement => 9,
        }
    }
}

/// Opaque lookup handle of a committed object.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitmentKey([u8; HASH_LENGTH]);

impl CommitmentKey {
    pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Derives the storage slot of this key within the mapping of `kind`.
    pub fn slot(&self, kind: ObjectKind) -> StorageSlot {
        let mut preimage = [0u8; 2 * HASH_LENGTH];
        preimage[..HASH_LENGTH].copy_from_slice(&self.0);
        preimage[2 * HASH_LENGTH - 8..].copy_from_slice(&kind.mapping_slot().to_be_bytes());
        StorageSlot(keccak256(&preimage))
    }
}

impl Debug for CommitmentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        fmt_hex(&self.0, f)
    }
}

impl Display for CommitmentKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        fmt_hex(&self.0, f)
    }
}

/// Location of a committed object in the state tree of its chain.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StorageSlot([u8; HASH_LENGTH]);

impl StorageSlot {
    pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    /// Returns the `index`-th bit, counting from the most significant bit.
    pub fn bit(&self, index: usize) -> bool {
        let byte = self.0[index / 8];
        (byte >> (7 - index % 8)) & 1 == 1
    }
}

impl Debug for StorageSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        fmt_hex(&self.0, f)
    }
}

impl Display for StorageSlot {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        fmt_hex(&self.0, f)
    }
}

impl Path {
    pub fn commitment_key(&self) -> CommitmentKey {
        CommitmentKey(keccak256(self.to_string().as_bytes()))
    }

    pub fn storage_slot(&self) -> StorageSlot {
        self.commitment_key().slot(self.kind())
    }
}

pub fn client_commitment_key(client_id: &ClientId) -> CommitmentKey {
    Path::ClientState(ClientStatePath::new(client_id.clone())).commitment_key()
}

pub fn client_state_commitment_slot(client_id: &ClientId) -> StorageSlot {
    Path::ClientState(ClientStatePath::new(client_id.clone())).storage_slot()
}

pub fn consensus_commitment_key(
    client_id: &ClientId,
    revision_number: u64,
    revision_height: u64,
) -> CommitmentKey {
    Path::ClientConsensusState(ClientConsensusStatePath::new(
        client_id.clone(),
        revision_number,
        revision_height,
    ))
    .commitment_key()
}

pub fn consensus_state_commitment_slot(
    client_id: &ClientId,
    revision_number: u64,
    revision_height: u64,
) -> StorageSlot {
    Path::ClientConsensusState(ClientConsensusStatePath::new(
        client_id.clone(),
        revision_number,
        revision_height,
    ))
    .storage_slot()
}

pub fn connection_commitment_key(connection_id: &ConnectionId) -> CommitmentKey {
    Path::Connection(ConnectionPath::new(connection_id)).commitment_key()
}

pub fn connection_commitment_slot(connection_id: &ConnectionId) -> StorageSlot {
    Path::Connection(ConnectionPath::new(connection_id)).storage_slot()
}

pub fn channel_commitment_key(port_id: &PortId, channel_id: &ChannelId) -> CommitmentKey {
    Path::ChannelEnd(ChannelEndPath::new(port_id, channel_id)).commitment_key()
}

pub fn channel_commitment_slot(port_id: &PortId, channel_id: &ChannelId) -> StorageSlot {
    Path::ChannelEnd(ChannelEndPath::new(port_id, channel_id)).storage_slot()
}

pub fn next_sequence_send_commitment_key(port_id: &PortId, channel_id: &ChannelId) -> CommitmentKey {
    Path::SeqSend(SeqSendPath::new(port_id, channel_id)).commitment_key()
}

pub fn next_sequence_recv_commitment_key(port_id: &PortId, channel_id: &ChannelId) -> CommitmentKey {
    Path::SeqRecv(SeqRecvPath::new(port_id, channel_id)).commitment_key()
}

pub fn next_sequence_ack_commitment_key(port_id: &PortId, channel_id: &ChannelId) -> CommitmentKey {
    Path::SeqAck(SeqAckPath::new(port_id, channel_id)).commitment_key()
}

pub fn packet_commitment_key(
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: Sequence,
) -> CommitmentKey {
    Path::Commitment(CommitmentPath::new(port_id, channel_id, sequence)).commitment_key()
}

pub fn packet_receipt_commitment_key(
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: Sequence,
) -> CommitmentKey {
    Path::Receipt(ReceiptPath::new(port_id, channel_id, sequence)).commitment_key()
}

pub fn packet_acknowledgement_commitment_key(
    port_id: &PortId,
    channel_id: &ChannelId,
    sequence: Sequence,
) -> CommitmentKey {
    Path::Ack(AckPath::new(port_id, channel_id, sequence)).commitment_key()
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;

    use core::str::FromStr;

    use super::*;

    fn corpus() -> Vec<Path> {
        let client_a = ClientId::from_str("hb-ibft2-0").unwrap();
        let client_b = ClientId::from_str("hb-ibft2-1").unwrap();
        let port = PortId::transfer();
        let other_port = PortId::from_str("oracle").unwrap();
        let mut paths = vec![
            ClientStatePath::new(client_a.clone()).into(),
            ClientStatePath::new(client_b.clone()).into(),
            ConnectionPath::new(&ConnectionId::new(0)).into(),
            ConnectionPath::new(&ConnectionId::new(1)).into(),
        ];
        for height in 1u64..4 {
            paths.push(ClientConsensusStatePath::new(client_a.clone(), 0, height).into());
            paths.push(ClientConsensusStatePath::new(client_a.clone(), 1, height).into());
            paths.push(ClientConsensusStatePath::new(client_b.clone(), 0, height).into());
        }
        for port_id in [&port, &other_port] {
            for channel in 0u64..2 {
                let channel_id = ChannelId::new(channel);
                paths.push(ChannelEndPath::new(port_id, &channel_id).into());
                paths.push(SeqSendPath::new(port_id, &channel_id).into());
                paths.push(SeqRecvPath::new(port_id, &channel_id).into());
                paths.push(SeqAckPath::new(port_id, &channel_id).into());
                for seq in 1u64..4 {
                    paths.push(CommitmentPath::new(port_id, &channel_id, Sequence::from(seq)).into());
                    paths.push(ReceiptPath::new(port_id, &channel_id, Sequence::from(seq)).into());
                    paths.push(AckPath::new(port_id, &channel_id, Sequence::from(seq)).into());
                }
            }
        }
        paths
    }

    #[test]
    fn key_derivation_is_deterministic() {
        for path in corpus() {
            assert_eq!(path.commitment_key(), path.clone().commitment_key());
            assert_eq!(path.storage_slot(), path.clone().storage_slot());
        }
    }

    #[test]
    fn key_derivation_is_injective_over_corpus() {
        let paths = corpus();
        let keys: BTreeSet<_> = paths.iter().map(Path::commitment_key).collect();
        let slots: BTreeSet<_> = paths.iter().map(Path::storage_slot).collect();
        assert_eq!(keys.len(), paths.len());
        assert_eq!(slots.len(), paths.len());
    }

    #[test]
    fn named_helpers_match_paths() {
        let client_id = ClientId::from_str("hb-ibft2-0").unwrap();
        assert_eq!(
            client_commitment_key(&client_id),
            Path::ClientState(ClientStatePath::new(client_id.clone())).commitment_key()
        );
        assert_eq!(
            consensus_state_commitment_slot(&client_id, 0, 5),
            consensus_commitment_key(&client_id, 0, 5).slot(ObjectKind::ConsensusState)
        );
        assert_ne!(
            consensus_state_commitment_slot(&client_id, 0, 5),
            consensus_state_commitment_slot(&client_id, 0, 6)
        );
    }

    #[test]
    fn same_key_lands_in_distinct_slots_per_kind() {
        let key = client_commitment_key(&ClientId::from_str("hb-ibft2-0").unwrap());
        let slots: BTreeSet<_> = ObjectKind::ALL.iter().map(|kind| key.slot(*kind)).collect();
        assert_eq!(slots.len(), ObjectKind::ALL.len());
    }

    #[test]
    fn commitment_key_is_keccak_of_path() {
        let path = Path::Connection(ConnectionPath::new(&ConnectionId::new(0)));
        assert_eq!(
            path.commitment_key().as_bytes(),
            &keccak256(b"connections/connection-0")
        );
    }
}
