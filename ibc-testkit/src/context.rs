use std::collections::BTreeMap;

use ibc_core::channel::handler::send_packet;
use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::error::{ChannelError, PacketError};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_core::client::context::client_state::ClientStateCommon;
use ibc_core::client::context::ClientValidationContext;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_core::entrypoint::dispatch;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::types::identifiers::{ChainId, ChannelId, ClientId, PortId, Sequence};
use ibc_clients::AnyClientState;
use ibc_core::host::types::path::{
    AckPath, ChannelEndPath, ClientStatePath, CommitmentPath, Path, SeqSendPath, CLIENT_PREFIX,
};
use ibc_core::host::ValidationContext;
use ibc_primitives::proto::Any;
use ibc_primitives::{Signer, Timestamp};
use ibc_store::StoreError;
use tracing::{debug, trace};

use crate::hosts::{HostBlock, HostError, Ibft2Host};
use crate::testapp::ibc::applications::token::{TokenError, TokenPacketData};
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockIbcStore;

/// A single IBFT2 chain running the IBC handlers over an in-memory provable
/// store.
///
/// Every accepted transaction seals one block. Rejected transactions leave
/// neither state nor a block behind.
#[derive(Clone, Debug)]
pub struct MockContext {
    /// The validator set and the blocks it sealed.
    pub host: Ibft2Host,

    /// An object that stores all IBC related data.
    pub ibc_store: MockIbcStore,

    /// A router that can route messages to the appropriate IBC application.
    pub ibc_router: MockRouter,

    eth_chain_id: u64,
    ibc_host_address: Vec<u8>,

    /// Packets sent from this chain, including already cleared ones
    sent_packets: BTreeMap<CommitmentPath, Packet>,

    /// Acknowledgements this chain wrote on receive
    written_acks: BTreeMap<AckPath, Acknowledgement>,
}

/// The block an accepted transaction landed in and the events it emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeliveredTx {
    pub height: Height,
    pub events: Vec<IbcEvent>,
}

/// A token transfer to send over an open channel.
#[derive(Clone, Debug)]
pub struct TokenTransfer {
    pub port_id: PortId,
    pub channel_id: ChannelId,
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
    pub timeout_height: TimeoutHeight,
    pub timeout_timestamp: TimeoutTimestamp,
}

impl MockContext {
    pub(crate) fn new(
        host: Ibft2Host,
        ibc_store: MockIbcStore,
        ibc_router: MockRouter,
        eth_chain_id: u64,
        ibc_host_address: Vec<u8>,
    ) -> Self {
        Self {
            host,
            ibc_store,
            ibc_router,
            eth_chain_id,
            ibc_host_address,
            sent_packets: BTreeMap::new(),
            written_acks: BTreeMap::new(),
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        self.host.chain_id()
    }

    pub fn eth_chain_id(&self) -> u64 {
        self.eth_chain_id
    }

    pub fn ibc_host_address(&self) -> &[u8] {
        &self.ibc_host_address
    }

    /// Commits the pending state and seals it in a new block. The next block
    /// is opened right away.
    pub fn advance_block(&mut self) {
        let root = self.ibc_store.store.commit().expect("no error");
        let block = self.host.push_block(root);
        debug_assert_eq!(
            self.ibc_store.store.current_height(),
            block.height.revision_height(),
            "the store and the host chain must have the same height"
        );

        self.ibc_store.host_height = self.host.next_height();
        self.ibc_store.host_timestamp = self.host.next_timestamp();

        trace!(chain_id = %self.chain_id(), height = %block.height, "sealed block");
    }

    pub fn advance_blocks(&mut self, count: u64) {
        for _ in 0..count {
            self.advance_block();
        }
    }

    pub fn latest_block(&self) -> &HostBlock {
        self.host
            .latest_block()
            .expect("genesis block is sealed on build")
    }

    pub fn latest_height(&self) -> Height {
        self.latest_block().height
    }

    pub fn latest_timestamp(&self) -> Timestamp {
        self.latest_block().timestamp
    }

    pub fn timestamp_at(&self, height: Height) -> Option<Timestamp> {
        self.host.block(height).map(|block| block.timestamp)
    }

    /// Delivers the messages of one transaction signed by `signer`. Messages
    /// run in order and each sees the state left by the previous one; if any
    /// fails, the whole transaction is discarded.
    pub fn deliver_tx(
        &mut self,
        signer: Signer,
        messages: Vec<Any>,
    ) -> Result<DeliveredTx, ContextError> {
        let ((), height, events) = self.in_block(|ctx| {
            ctx.ibc_store.tx_signer = Some(signer);
            let result = messages.into_iter().try_for_each(|message| {
                let envelope = MsgEnvelope::try_from(message)?;
                dispatch(&mut ctx.ibc_store, &mut ctx.ibc_router, envelope)
            });
            ctx.ibc_store.tx_signer = None;
            result
        })?;

        Ok(DeliveredTx { height, events })
    }

    /// Delivers a single message without a transaction signer.
    pub fn deliver(&mut self, msg: MsgEnvelope) -> Result<(), ContextError> {
        self.in_block(|ctx| dispatch(&mut ctx.ibc_store, &mut ctx.ibc_router, msg))?;
        Ok(())
    }

    /// Escrows the tokens of `transfer.sender` and sends a packet carrying
    /// them over the channel.
    pub fn send_tokens(&mut self, transfer: TokenTransfer) -> Result<Packet, ContextError> {
        let (packet, _, _) = self.in_block(|ctx| ctx.send_tokens_inner(transfer))?;
        Ok(packet)
    }

    /// Runs `execute` against the block under construction and seals the
    /// block if it succeeds. On failure the IBC state and the applications
    /// are restored and no block is sealed.
    fn in_block<T>(
        &mut self,
        execute: impl FnOnce(&mut Self) -> Result<T, ContextError>,
    ) -> Result<(T, Height, Vec<IbcEvent>), ContextError> {
        let snapshot = (self.ibc_store.clone(), self.ibc_router.clone());
        let first_event = self.ibc_store.events.len();

        let output = match execute(self) {
            Ok(output) => output,
            Err(e) => {
                debug!(chain_id = %self.chain_id(), error = %e, "transaction rejected");
                (self.ibc_store, self.ibc_router) = snapshot;
                return Err(e);
            }
        };

        let height = self.ibc_store.host_height;
        let events = self.ibc_store.events[first_event..].to_vec();
        self.record_packets(&events);
        self.advance_block();

        Ok((output, height, events))
    }

    fn send_tokens_inner(&mut self, transfer: TokenTransfer) -> Result<Packet, ContextError> {
        let chan_end_path = ChannelEndPath::new(&transfer.port_id, &transfer.channel_id);
        let chan_end = self.ibc_store.channel_end(&chan_end_path)?;
        let counterparty = chan_end.counterparty();
        let chan_id_on_b = counterparty
            .channel_id()
            .cloned()
            .ok_or(ChannelError::MissingCounterparty)?;

        let seq_send_path = SeqSendPath::new(&transfer.port_id, &transfer.channel_id);
        let seq_on_a = self.ibc_store.get_next_sequence_send(&seq_send_path)?;

        let data = TokenPacketData {
            sender: transfer.sender.clone(),
            receiver: transfer.receiver,
            amount: transfer.amount,
        }
        .encode()
        .map_err(token_error)?;

        self.ibc_router
            .token
            .debit(&transfer.sender, transfer.amount)
            .map_err(token_error)?;

        let packet = Packet {
            seq_on_a,
            port_id_on_a: transfer.port_id,
            chan_id_on_a: transfer.channel_id,
            port_id_on_b: counterparty.port_id().clone(),
            chan_id_on_b,
            data,
            timeout_height_on_b: transfer.timeout_height,
            timeout_timestamp_on_b: transfer.timeout_timestamp,
        };

        send_packet(&mut self.ibc_store, packet.clone())?;
        Ok(packet)
    }

    fn record_packets(&mut self, events: &[IbcEvent]) {
        for event in events {
            match event {
                IbcEvent::SendPacket(e) => {
                    let packet = e.packet();
                    let path = CommitmentPath::new(
                        &packet.port_id_on_a,
                        &packet.chan_id_on_a,
                        packet.seq_on_a,
                    );
                    self.sent_packets.insert(path, packet.clone());
                }
                IbcEvent::WriteAcknowledgement(e) => {
                    let packet = e.packet();
                    let path =
                        AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);
                    self.written_acks.insert(path, e.acknowledgement().clone());
                }
                _ => {}
            }
        }
    }

    pub fn balance_of(&self, account: &str) -> u64 {
        self.ibc_router.token.balance_of(account)
    }

    /// The latest height the given client on this chain has verified.
    pub fn client_latest_height(&self, client_id: &ClientId) -> Result<Height, ContextError> {
        Ok(self.ibc_store.client_state(client_id)?.latest_height())
    }

    /// Clients on this chain that track the chain `chain_id`.
    pub fn clients_tracking(&self, chain_id: &ChainId) -> Vec<ClientId> {
        self.ibc_store
            .store
            .paths_with_prefix(CLIENT_PREFIX)
            .into_iter()
            .filter_map(|path| match path {
                Path::ClientState(ClientStatePath(client_id)) => Some(client_id),
                _ => None,
            })
            .filter(|client_id| {
                matches!(
                    self.ibc_store.client_state(client_id),
                    Ok(AnyClientState::Ibft2(cs)) if cs.inner().chain_id() == chain_id
                )
            })
            .collect()
    }

    /// Client and consensus states a counterparty needs to track this chain
    /// from its latest block on.
    pub fn client_init(&self) -> Result<(Any, Any, Height), HostError> {
        let height = self.latest_height();
        let client_state = self
            .host
            .client_state(self.ibc_host_address.clone(), height)?;
        let consensus_state = self.host.consensus_state(height)?;
        Ok((client_state.into(), consensus_state.into(), height))
    }

    pub fn header(&self, trusted_height: Height, target_height: Height) -> Result<Any, HostError> {
        Ok(self.host.header(trusted_height, target_height)?.into())
    }

    /// The value committed at `path` as of `height`, with its proof against
    /// the state root of that block.
    pub fn proven(
        &self,
        path: &Path,
        height: Height,
    ) -> Result<(Option<Vec<u8>>, CommitmentProofBytes), StoreError> {
        let store = &self.ibc_store.store;
        let value = store.get_committed(height.revision_height(), path)?;
        let proof = store.get_proof(height.revision_height(), path)?;
        Ok((value, proof.into()))
    }

    /// Packets sent on the channel whose commitments are still stored, in
    /// sequence order.
    pub fn pending_packets(&self, port_id: &PortId, channel_id: &ChannelId) -> Vec<Packet> {
        self.sent_packets
            .iter()
            .filter(|(path, _)| &path.port_id == port_id && &path.channel_id == channel_id)
            .filter(|(path, _)| self.ibc_store.store.get_packet_commitment(path).is_some())
            .map(|(_, packet)| packet.clone())
            .collect()
    }

    pub fn written_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Option<Acknowledgement> {
        self.written_acks
            .get(&AckPath::new(port_id, channel_id, sequence))
            .cloned()
    }

    pub fn get_events(&self) -> Vec<IbcEvent> {
        self.ibc_store.events.clone()
    }

    pub fn get_logs(&self) -> Vec<String> {
        self.ibc_store.logs.clone()
    }
}

fn token_error(e: TokenError) -> ContextError {
    PacketError::from(e).into()
}

#[cfg(test)]
mod tests {
    use ibc_core::commitment_types::merkle::SparseMerkleProof;
    use ibc_core::host::types::path::ClientStatePath;
    use ibc_core::host::TimeoutPolicy;

    use super::*;
    use crate::fixtures::{dummy_account_signer, MockContextConfig};

    fn context() -> MockContext {
        MockContextConfig::builder()
            .timeout_policy(TimeoutPolicy::CloseOrderedChannel)
            .balances(vec![("alice".to_string(), 500)])
            .build()
    }

    #[test]
    fn blocks_follow_store_commits() {
        let mut ctx = context();
        ctx.advance_blocks(3);

        let latest = ctx.latest_height();
        assert_eq!(latest, Height::new(0, 4).unwrap());
        assert_eq!(ctx.ibc_store.store.current_height(), 4);
        assert_eq!(
            ctx.latest_block().root.as_bytes(),
            ctx.ibc_store.store.root_hash(4).unwrap().as_slice()
        );
        let genesis = Height::new(0, 1).unwrap();
        assert!(ctx.timestamp_at(latest).unwrap() > ctx.timestamp_at(genesis).unwrap());
    }

    #[test]
    fn undecodable_messages_reject_the_transaction() {
        let mut ctx = context();
        let before = ctx.latest_height();

        let message = Any {
            type_url: "/unknown.Msg".to_string(),
            value: vec![],
        };

        assert!(ctx.deliver_tx(dummy_account_signer(), vec![message]).is_err());
        assert_eq!(ctx.latest_height(), before);
        assert!(ctx.get_events().is_empty());
    }

    #[test]
    fn client_init_describes_the_latest_block() {
        let ctx = context();
        let (_, _, height) = ctx.client_init().unwrap();

        assert_eq!(height, ctx.latest_height());
    }

    #[test]
    fn absent_values_come_with_a_proof() {
        let ctx = context();
        let path = Path::ClientState(ClientStatePath::new(ClientId::new("hb-ibft2", 0).unwrap()));

        let (value, proof) = ctx.proven(&path, ctx.latest_height()).unwrap();
        assert!(value.is_none());
        assert!(SparseMerkleProof::try_from(&proof).is_ok());
    }

    #[test]
    fn sending_over_a_missing_channel_keeps_the_balance() {
        let mut ctx = context();
        let transfer = TokenTransfer {
            port_id: PortId::transfer(),
            channel_id: ChannelId::new(0),
            sender: "alice".to_string(),
            receiver: "bob".to_string(),
            amount: 100,
            timeout_height: TimeoutHeight::no_timeout(),
            timeout_timestamp: TimeoutTimestamp::from_nanoseconds(u64::MAX),
        };

        assert!(ctx.send_tokens(transfer).is_err());
        assert_eq!(ctx.balance_of("alice"), 500);
    }
}
