use std::collections::BTreeMap;
use std::fmt::Display;

use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_core::channel::types::packet::Receipt;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::{CommitmentHash, CommitmentPrefix};
use ibc_core::commitment_types::merkle::{Hash, SparseMerkleProof};
use ibc_core::connection::types::ConnectionEnd;
use ibc_core::host::types::identifiers::{ClientId, ConnectionId, Sequence};
use ibc_core::host::types::key::CommitmentKey;
use ibc_core::host::types::path::{
    AckPath, ChannelEndPath, ClientConsensusStatePath, ClientStatePath, CommitmentPath,
    ConnectionPath, Path, ReceiptPath, SeqAckPath, SeqRecvPath, SeqSendPath,
};
use ibc_primitives::proto::{Any, Protobuf};
use tracing::trace;

use crate::config::ProvableStoreConfig;
use crate::context::Store;
use crate::error::StoreError;
use crate::types::{RawHeight, StoreHeight};

/// The per-chain store of IBC objects.
///
/// Every object is written under its typed path. The Merkle leaf of an
/// object sits at the storage slot of the path and commits to the
/// Keccak-256 hash of the stored bytes, which is also what `get_commitment`
/// publishes for the path's commitment key. Reads observe the pending block,
/// proofs are served from committed heights.
#[derive(Clone, Debug)]
pub struct ProvableStore<S> {
    store: S,
    prefix: CommitmentPrefix,
    retained_heights: Option<u64>,
    /// live paths, by commitment key
    paths: BTreeMap<CommitmentKey, Path>,
}

fn decoded<T, E: Display>(path: &Path, result: Result<T, E>) -> Result<T, StoreError> {
    result.map_err(|e| StoreError::Decoding {
        path: path.clone(),
        description: e.to_string(),
    })
}

impl<S: Store> ProvableStore<S> {
    pub fn new(store: S, config: ProvableStoreConfig) -> Result<Self, StoreError> {
        let prefix = CommitmentPrefix::try_from(config.ibc_host_address)
            .map_err(|_| StoreError::EmptyHostAddress)?;

        Ok(Self {
            store,
            prefix,
            retained_heights: config.retained_heights,
            paths: BTreeMap::new(),
        })
    }

    /// The prefix counterparties verify this store's proofs under.
    pub fn commitment_prefix(&self) -> CommitmentPrefix {
        self.prefix.clone()
    }

    pub fn current_height(&self) -> RawHeight {
        self.store.current_height()
    }

    /// Seals the pending writes into a new height and returns its root.
    pub fn commit(&mut self) -> Result<Hash, StoreError> {
        let root = self.store.commit()?;
        let height = self.store.current_height();

        if let Some(retained) = self.retained_heights {
            if height > retained {
                self.store.prune(height - retained)?;
            }
        }

        Ok(root)
    }

    pub fn root_hash(&self, height: RawHeight) -> Result<Hash, StoreError> {
        self.store
            .root_hash(StoreHeight::Stable(height))
            .ok_or_else(|| self.missing_height(height))
    }

    /// Proves the value stored at `path`, or its absence, at a committed
    /// height.
    pub fn get_proof(&self, height: RawHeight, path: &Path) -> Result<SparseMerkleProof, StoreError> {
        self.store
            .get_proof(StoreHeight::Stable(height), path)
            .ok_or_else(|| self.missing_height(height))
    }

    /// The value stored at `path` as of the committed `height`.
    pub fn get_committed(&self, height: RawHeight, path: &Path) -> Result<Option<Vec<u8>>, StoreError> {
        self.root_hash(height)?;
        Ok(self.store.get(StoreHeight::Stable(height), path))
    }

    /// Pending paths whose string form starts with `prefix`.
    pub fn paths_with_prefix(&self, prefix: &str) -> Vec<Path> {
        self.store.get_keys(prefix)
    }

    /// Returns the hash currently committed under `key`, or the zero hash if
    /// nothing is stored there.
    pub fn get_commitment(&self, key: &CommitmentKey) -> CommitmentHash {
        self.paths
            .get(key)
            .and_then(|path| self.read(path))
            .map(|bytes| CommitmentHash::of(&bytes))
            .unwrap_or(CommitmentHash::ZERO)
    }

    fn missing_height(&self, height: RawHeight) -> StoreError {
        StoreError::MissingHeight {
            height,
            latest: self.store.current_height(),
        }
    }

    fn write(&mut self, path: Path, value: Vec<u8>) {
        trace!(%path, commitment = ?CommitmentHash::of(&value), "write");
        self.paths.insert(path.commitment_key(), path.clone());
        self.store.set(path, value);
    }

    fn read(&self, path: &Path) -> Option<Vec<u8>> {
        self.store.get(StoreHeight::Pending, path)
    }

    fn remove(&mut self, path: &Path) -> bool {
        trace!(%path, "delete");
        self.paths.remove(&path.commitment_key());
        self.store.delete(path).is_some()
    }

    pub fn set_client_state<C>(&mut self, client_id: &ClientId, client_state: C)
    where
        C: Protobuf<Any> + TryFrom<Any>,
        <C as TryFrom<Any>>::Error: Display,
        Any: From<C>,
    {
        let path = ClientStatePath::new(client_id.clone()).into();
        self.write(path, client_state.encode_vec());
    }

    pub fn get_client_state<C>(&self, client_id: &ClientId) -> Result<Option<C>, StoreError>
    where
        C: Protobuf<Any> + TryFrom<Any>,
        <C as TryFrom<Any>>::Error: Display,
        Any: From<C>,
    {
        let path = ClientStatePath::new(client_id.clone()).into();
        self.read(&path)
            .map(|bytes| decoded(&path, C::decode_vec(&bytes)))
            .transpose()
    }

    pub fn has_client_state(&self, client_id: &ClientId) -> bool {
        self.get_client_state_bytes(client_id).is_some()
    }

    pub fn get_client_state_bytes(&self, client_id: &ClientId) -> Option<Vec<u8>> {
        self.read(&ClientStatePath::new(client_id.clone()).into())
    }

    /// Stores a consensus state. A height is written once: storing again at
    /// the same height fails until the entry is deleted.
    pub fn set_consensus_state<C>(
        &mut self,
        client_id: &ClientId,
        height: Height,
        consensus_state: C,
    ) -> Result<(), StoreError>
    where
        C: Protobuf<Any> + TryFrom<Any>,
        <C as TryFrom<Any>>::Error: Display,
        Any: From<C>,
    {
        let path = consensus_state_path(client_id, height);
        if self.read(&path).is_some() {
            return Err(StoreError::DuplicateHeight {
                client_id: client_id.clone(),
                height,
            });
        }
        self.write(path, consensus_state.encode_vec());
        Ok(())
    }

    pub fn get_consensus_state<C>(
        &self,
        client_id: &ClientId,
        height: Height,
    ) -> Result<Option<C>, StoreError>
    where
        C: Protobuf<Any> + TryFrom<Any>,
        <C as TryFrom<Any>>::Error: Display,
        Any: From<C>,
    {
        let path = consensus_state_path(client_id, height);
        self.read(&path)
            .map(|bytes| decoded(&path, C::decode_vec(&bytes)))
            .transpose()
    }

    pub fn has_consensus_state(&self, client_id: &ClientId, height: Height) -> bool {
        self.get_consensus_state_bytes(client_id, height).is_some()
    }

    pub fn get_consensus_state_bytes(&self, client_id: &ClientId, height: Height) -> Option<Vec<u8>> {
        self.read(&consensus_state_path(client_id, height))
    }

    /// Prunes the consensus state at `height`. Returns whether one was stored.
    pub fn delete_consensus_state(&mut self, client_id: &ClientId, height: Height) -> bool {
        self.remove(&consensus_state_path(client_id, height))
    }

    /// Heights of every consensus state stored for the client, in ascending
    /// order.
    pub fn consensus_state_heights(&self, client_id: &ClientId) -> Vec<Height> {
        let parent = ClientConsensusStatePath::new(client_id.clone(), 0, 0).parent();
        let mut heights: Vec<_> = self
            .store
            .get_keys(&parent)
            .into_iter()
            .filter_map(|path| match path {
                Path::ClientConsensusState(p) if p.client_id == *client_id => {
                    Height::new(p.revision_number, p.revision_height).ok()
                }
                _ => None,
            })
            .collect();
        heights.sort();
        heights
    }

    pub fn set_connection(&mut self, connection_id: &ConnectionId, connection_end: ConnectionEnd) {
        self.write(
            ConnectionPath::new(connection_id).into(),
            connection_end.encode_vec(),
        );
    }

    pub fn get_connection(
        &self,
        connection_id: &ConnectionId,
    ) -> Result<Option<ConnectionEnd>, StoreError> {
        let path = ConnectionPath::new(connection_id).into();
        self.read(&path)
            .map(|bytes| Self::parse_connection_bytes(&path, &bytes))
            .transpose()
    }

    pub fn has_connection(&self, connection_id: &ConnectionId) -> bool {
        self.get_connection_bytes(connection_id).is_some()
    }

    pub fn get_connection_bytes(&self, connection_id: &ConnectionId) -> Option<Vec<u8>> {
        self.read(&ConnectionPath::new(connection_id).into())
    }

    /// Decodes connection bytes obtained elsewhere, e.g. next to a proof.
    pub fn parse_connection_bytes(path: &Path, bytes: &[u8]) -> Result<ConnectionEnd, StoreError> {
        decoded(path, ConnectionEnd::decode_vec(bytes))
    }

    pub fn set_channel(&mut self, channel_end_path: &ChannelEndPath, channel_end: ChannelEnd) {
        self.write(channel_end_path.clone().into(), channel_end.encode_vec());
    }

    pub fn get_channel(
        &self,
        channel_end_path: &ChannelEndPath,
    ) -> Result<Option<ChannelEnd>, StoreError> {
        let path = channel_end_path.clone().into();
        self.read(&path)
            .map(|bytes| Self::parse_channel_bytes(&path, &bytes))
            .transpose()
    }

    pub fn has_channel(&self, channel_end_path: &ChannelEndPath) -> bool {
        self.get_channel_bytes(channel_end_path).is_some()
    }

    pub fn get_channel_bytes(&self, channel_end_path: &ChannelEndPath) -> Option<Vec<u8>> {
        self.read(&channel_end_path.clone().into())
    }

    pub fn parse_channel_bytes(path: &Path, bytes: &[u8]) -> Result<ChannelEnd, StoreError> {
        decoded(path, ChannelEnd::decode_vec(bytes))
    }

    fn set_sequence(&mut self, path: Path, seq: Sequence) -> Result<(), StoreError> {
        let current = self.get_sequence(&path)?.unwrap_or_default();
        if seq <= current {
            return Err(StoreError::NonMonotonicSequence {
                path,
                given: seq,
                current,
            });
        }
        self.write(path, seq.to_vec());
        Ok(())
    }

    fn get_sequence(&self, path: &Path) -> Result<Option<Sequence>, StoreError> {
        self.read(path)
            .map(|bytes| {
                let bytes: [u8; 8] = decoded(
                    path,
                    bytes
                        .as_slice()
                        .try_into()
                        .map_err(|_| "sequence must be 8 bytes"),
                )?;
                Ok(Sequence::from(u64::from_be_bytes(bytes)))
            })
            .transpose()
    }

    /// Fails unless `seq` is greater than the stored value. An absent
    /// counter reads as zero.
    pub fn set_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), StoreError> {
        self.set_sequence(seq_send_path.clone().into(), seq)
    }

    pub fn get_next_sequence_send(
        &self,
        seq_send_path: &SeqSendPath,
    ) -> Result<Option<Sequence>, StoreError> {
        self.get_sequence(&seq_send_path.clone().into())
    }

    pub fn set_next_sequence_recv(
        &mut self,
        seq_recv_path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), StoreError> {
        self.set_sequence(seq_recv_path.clone().into(), seq)
    }

    pub fn get_next_sequence_recv(
        &self,
        seq_recv_path: &SeqRecvPath,
    ) -> Result<Option<Sequence>, StoreError> {
        self.get_sequence(&seq_recv_path.clone().into())
    }

    pub fn set_next_sequence_ack(
        &mut self,
        seq_ack_path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), StoreError> {
        self.set_sequence(seq_ack_path.clone().into(), seq)
    }

    pub fn get_next_sequence_ack(
        &self,
        seq_ack_path: &SeqAckPath,
    ) -> Result<Option<Sequence>, StoreError> {
        self.get_sequence(&seq_ack_path.clone().into())
    }

    pub fn set_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) {
        self.write(commitment_path.clone().into(), commitment.into_vec());
    }

    pub fn get_packet_commitment(&self, commitment_path: &CommitmentPath) -> Option<PacketCommitment> {
        self.read(&commitment_path.clone().into())
            .map(PacketCommitment::from)
    }

    /// Returns whether a commitment was stored.
    pub fn delete_packet_commitment(&mut self, commitment_path: &CommitmentPath) -> bool {
        self.remove(&commitment_path.clone().into())
    }

    pub fn set_packet_receipt(&mut self, receipt_path: &ReceiptPath, receipt: Receipt) {
        self.write(receipt_path.clone().into(), receipt.as_bytes());
    }

    pub fn get_packet_receipt(&self, receipt_path: &ReceiptPath) -> Result<Option<Receipt>, StoreError> {
        let path = receipt_path.clone().into();
        self.read(&path)
            .map(|bytes| match bytes.as_slice() {
                [Receipt::OK_BYTE] => Ok(Receipt::Ok),
                _ => decoded(&path, Err("unknown receipt")),
            })
            .transpose()
    }

    pub fn set_packet_acknowledgement(
        &mut self,
        ack_path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) {
        self.write(ack_path.clone().into(), ack_commitment.into_vec());
    }

    pub fn get_packet_acknowledgement(&self, ack_path: &AckPath) -> Option<AcknowledgementCommitment> {
        self.read(&ack_path.clone().into())
            .map(AcknowledgementCommitment::from)
    }

    pub fn delete_packet_acknowledgement(&mut self, ack_path: &AckPath) -> bool {
        self.remove(&ack_path.clone().into())
    }
}

fn consensus_state_path(client_id: &ClientId, height: Height) -> Path {
    ClientConsensusStatePath::new(
        client_id.clone(),
        height.revision_number(),
        height.revision_height(),
    )
    .into()
}

#[cfg(test)]
mod tests {
    use ibc_core::channel::types::channel::{Counterparty, Order, State};
    use ibc_core::channel::types::Version as ChannelVersion;
    use ibc_core::commitment_types::commitment::CommitmentRoot;
    use ibc_core::commitment_types::merkle::{verify_membership, verify_non_membership};
    use ibc_core::connection::types::version::Version as ConnectionVersion;
    use ibc_core::connection::types::{
        Counterparty as ConnectionCounterparty, State as ConnectionState,
    };
    use ibc_core::host::types::identifiers::{ChannelId, PortId};
    use ibc_core::host::types::key::{keccak256, packet_commitment_key};
    use rstest::rstest;
    use std::time::Duration;

    use super::*;
    use crate::impls::InMemoryStore;

    #[derive(Clone, Debug, PartialEq)]
    struct TaggedState(u8);

    impl Protobuf<Any> for TaggedState {}

    impl TryFrom<Any> for TaggedState {
        type Error = String;

        fn try_from(any: Any) -> Result<Self, Self::Error> {
            match any.value.as_slice() {
                [tag] => Ok(Self(*tag)),
                _ => Err("expected a single byte".to_string()),
            }
        }
    }

    impl From<TaggedState> for Any {
        fn from(state: TaggedState) -> Self {
            Any {
                type_url: "/test.TaggedState".to_string(),
                value: vec![state.0],
            }
        }
    }

    const HOST: [u8; 20] = [0xaa; 20];

    fn store() -> ProvableStore<InMemoryStore> {
        let config = ProvableStoreConfig::builder()
            .ibc_host_address(HOST.to_vec())
            .build();
        ProvableStore::new(InMemoryStore::default(), config).unwrap()
    }

    fn connection_end() -> ConnectionEnd {
        ConnectionEnd::new(
            ConnectionState::Init,
            ClientId::new("hb-ibft2", 0).unwrap(),
            ConnectionCounterparty::new(
                ClientId::new("hb-ibft2", 0).unwrap(),
                None,
                CommitmentPrefix::try_from(HOST.to_vec()).unwrap(),
            ),
            ConnectionVersion::compatibles(),
            Duration::ZERO,
        )
        .unwrap()
    }

    fn channel_end() -> ChannelEnd {
        ChannelEnd::new(
            State::Init,
            Order::Unordered,
            Counterparty::new(PortId::transfer(), None),
            vec![ConnectionId::new(0)],
            ChannelVersion::new("ics20-1".to_string()),
        )
        .unwrap()
    }

    fn height(h: u64) -> Height {
        Height::new(0, h).unwrap()
    }

    #[test]
    fn an_empty_host_address_is_rejected() {
        let config = ProvableStoreConfig::builder()
            .ibc_host_address(Vec::new())
            .build();
        assert_eq!(
            ProvableStore::new(InMemoryStore::default(), config).err(),
            Some(StoreError::EmptyHostAddress)
        );
    }

    #[test]
    fn objects_read_back_with_a_found_flag() {
        let mut store = store();
        let conn_id = ConnectionId::new(0);
        let chan_path = ChannelEndPath::new(&PortId::transfer(), &ChannelId::new(0));

        assert_eq!(store.get_connection(&conn_id), Ok(None));
        assert!(!store.has_channel(&chan_path));

        store.set_connection(&conn_id, connection_end());
        store.set_channel(&chan_path, channel_end());

        assert_eq!(store.get_connection(&conn_id), Ok(Some(connection_end())));
        assert_eq!(store.get_channel(&chan_path), Ok(Some(channel_end())));
        assert!(store.has_connection(&conn_id));
    }

    #[test]
    fn connection_bytes_parse_without_a_store_lookup() {
        let mut store = store();
        let conn_id = ConnectionId::new(0);
        store.set_connection(&conn_id, connection_end());

        let bytes = store.get_connection_bytes(&conn_id).unwrap();
        let path = ConnectionPath::new(&conn_id).into();
        assert_eq!(
            ProvableStore::<InMemoryStore>::parse_connection_bytes(&path, &bytes),
            Ok(connection_end())
        );
        assert!(matches!(
            ProvableStore::<InMemoryStore>::parse_connection_bytes(&path, &[0xff, 0x01]),
            Err(StoreError::Decoding { .. })
        ));
    }

    #[test]
    fn commitment_tracks_the_stored_bytes() {
        let mut store = store();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let seq = Sequence::from(1);
        let path = CommitmentPath::new(&port_id, &chan_id, seq);
        let key = packet_commitment_key(&port_id, &chan_id, seq);

        assert_eq!(store.get_commitment(&key), CommitmentHash::ZERO);

        store.set_packet_commitment(&path, PacketCommitment::from(vec![7u8; 32]));
        assert_eq!(store.get_commitment(&key), CommitmentHash::of(&[7u8; 32]));

        assert!(store.delete_packet_commitment(&path));
        assert_eq!(store.get_commitment(&key), CommitmentHash::ZERO);
        assert!(!store.delete_packet_commitment(&path));
    }

    #[test]
    fn deleted_packets_leave_no_trace() {
        let mut store = store();
        let port_id = PortId::transfer();
        let chan_id = ChannelId::new(0);
        let paths: Vec<_> = (1..=3)
            .map(|seq| CommitmentPath::new(&port_id, &chan_id, Sequence::from(seq)))
            .collect();
        for path in &paths {
            store.set_packet_commitment(path, PacketCommitment::from(vec![1u8; 32]));
        }

        for path in &paths {
            assert!(store.delete_packet_commitment(path));
        }

        assert!(store.paths.is_empty());
        assert!(store
            .paths_with_prefix("commitments/ports/transfer/channels/channel-0")
            .is_empty());
    }

    #[test]
    fn client_states_are_overwritten_in_place() {
        let mut store = store();
        let client_id = ClientId::new("hb-ibft2", 0).unwrap();

        assert_eq!(store.get_client_state::<TaggedState>(&client_id), Ok(None));
        assert!(!store.has_client_state(&client_id));

        store.set_client_state(&client_id, TaggedState(1));
        store.set_client_state(&client_id, TaggedState(2));

        assert_eq!(
            store.get_client_state::<TaggedState>(&client_id),
            Ok(Some(TaggedState(2)))
        );
        assert_eq!(
            store.get_client_state_bytes(&client_id),
            Some(TaggedState(2).encode_vec())
        );
    }

    #[test]
    fn consensus_heights_are_written_once() {
        let mut store = store();
        let client_id = ClientId::new("hb-ibft2", 0).unwrap();

        store
            .set_consensus_state(&client_id, height(1), TaggedState(1))
            .unwrap();
        assert_eq!(
            store.set_consensus_state(&client_id, height(1), TaggedState(2)),
            Err(StoreError::DuplicateHeight {
                client_id: client_id.clone(),
                height: height(1),
            })
        );
        assert_eq!(
            store.get_consensus_state::<TaggedState>(&client_id, height(1)),
            Ok(Some(TaggedState(1)))
        );

        assert!(store.delete_consensus_state(&client_id, height(1)));
        store
            .set_consensus_state(&client_id, height(1), TaggedState(2))
            .unwrap();
        store
            .set_consensus_state(&client_id, height(3), TaggedState(3))
            .unwrap();
        assert_eq!(
            store.consensus_state_heights(&client_id),
            vec![height(1), height(3)]
        );
    }

    #[rstest]
    #[case(&[1, 2, 3], None)]
    #[case(&[1, 1], Some(1))]
    #[case(&[2, 1], Some(1))]
    #[case(&[0], Some(0))]
    fn sequences_only_move_forward(#[case] writes: &[u64], #[case] rejected: Option<usize>) {
        let mut store = store();
        let path = SeqSendPath::new(&PortId::transfer(), &ChannelId::new(0));

        let failed = writes
            .iter()
            .position(|seq| store.set_next_sequence_send(&path, (*seq).into()).is_err());
        assert_eq!(failed, rejected);
    }

    #[test]
    fn absent_sequences_have_no_value() {
        let store = store();
        let path = SeqRecvPath::new(&PortId::transfer(), &ChannelId::new(0));
        assert_eq!(store.get_next_sequence_recv(&path), Ok(None));
    }

    #[test]
    fn proofs_are_served_at_committed_heights() {
        let mut store = store();
        let chan_path = ChannelEndPath::new(&PortId::transfer(), &ChannelId::new(0));
        store.set_channel(&chan_path, channel_end());
        let root = CommitmentRoot::from(store.commit().unwrap());

        let value = store.get_channel_bytes(&chan_path).unwrap();
        let path: Path = chan_path.into();
        let proof = store.get_proof(1, &path).unwrap();
        assert!(
            verify_membership(&root, &path.storage_slot(), &keccak256(&value), &proof).is_ok()
        );

        let absent: Path =
            ReceiptPath::new(&PortId::transfer(), &ChannelId::new(0), 1.into()).into();
        let proof = store.get_proof(1, &absent).unwrap();
        assert!(verify_non_membership(&root, &absent.storage_slot(), &proof).is_ok());

        assert_eq!(
            store.get_proof(2, &path),
            Err(StoreError::MissingHeight {
                height: 2,
                latest: 1
            })
        );
    }

    #[test]
    fn committed_values_are_read_per_height() {
        let mut store = store();
        let conn_id = ConnectionId::new(0);
        let path: Path = ConnectionPath::new(&conn_id).into();
        store.commit().unwrap();
        store.set_connection(&conn_id, connection_end());
        store.commit().unwrap();

        assert_eq!(store.get_committed(1, &path), Ok(None));
        assert_eq!(
            store.get_committed(2, &path),
            Ok(store.get_connection_bytes(&conn_id))
        );
        assert!(store.get_committed(3, &path).is_err());
        assert_eq!(store.paths_with_prefix("connections/"), vec![path]);
    }

    #[test]
    fn old_heights_are_pruned_past_the_retention_window() {
        let config = ProvableStoreConfig::builder()
            .ibc_host_address(HOST.to_vec())
            .retained_heights(2)
            .build();
        let mut store = ProvableStore::new(InMemoryStore::default(), config).unwrap();
        for _ in 0..4 {
            store.commit().unwrap();
        }

        assert!(store.root_hash(2).is_err());
        assert!(store.root_hash(3).is_ok());
        assert!(store.root_hash(4).is_ok());
    }
}
