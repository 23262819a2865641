//! The capabilities the relayer needs from a chain.

use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::{CommitmentPrefix, CommitmentProofBytes};
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::{ChainId, ChannelId, ClientId, PortId, Sequence};
use ibc_core::host::types::path::Path;
use ibc_primitives::proto::Any;
use ibc_primitives::Timestamp;

use crate::error::RelayerError;
use crate::signer::SigningContext;

/// Latest committed block of a chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainStatus {
    pub height: Height,
    pub timestamp: Timestamp,
}

/// What a counterparty needs to create a light client of a chain.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientInit {
    pub client_state: Any,
    pub consensus_state: Any,
    pub height: Height,
}

/// A stored value, or its absence, with a proof against the state root of
/// `height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProvenValue {
    pub value: Option<Vec<u8>>,
    pub proof: CommitmentProofBytes,
    pub height: Height,
}

/// The block a transaction landed in and the events it emitted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TxResponse {
    pub height: Height,
    pub events: Vec<IbcEvent>,
}

/// Query and submission access to one chain.
///
/// Queries may run concurrently. Submissions are issued one at a time by the
/// chain's runtime, so implementations can assume a single writer.
#[async_trait::async_trait]
pub trait Chain: Send + Sync + 'static {
    fn id(&self) -> ChainId;

    async fn query_status(&self) -> Result<ChainStatus, RelayerError>;

    /// The prefix under which the chain commits its IBC objects.
    async fn query_commitment_prefix(&self) -> Result<CommitmentPrefix, RelayerError>;

    /// The latest height the given client on this chain has verified.
    async fn query_client_latest_height(&self, client_id: &ClientId)
        -> Result<Height, RelayerError>;

    /// Clients on this chain that track the chain `chain_id`.
    async fn query_clients_tracking(&self, chain_id: &ChainId)
        -> Result<Vec<ClientId>, RelayerError>;

    /// Client and consensus states describing this chain at its latest
    /// committed height.
    async fn query_client_init(&self) -> Result<ClientInit, RelayerError>;

    /// A header of this chain at `target_height`, verifiable from the
    /// consensus state at `trusted_height`.
    async fn query_header(
        &self,
        trusted_height: Height,
        target_height: Height,
    ) -> Result<Any, RelayerError>;

    /// The value stored at `path` as of `height`, proven against that
    /// height's state root.
    async fn query_proven(&self, path: Path, height: Height) -> Result<ProvenValue, RelayerError>;

    /// Packets sent on the given channel whose commitments are still stored.
    async fn query_pending_packets(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<Packet>, RelayerError>;

    /// The acknowledgement this chain wrote when it received a packet.
    async fn query_written_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<Acknowledgement>, RelayerError>;

    /// Signs the messages with `signer` and waits for their inclusion.
    async fn submit(
        &self,
        signer: &SigningContext,
        messages: Vec<Any>,
    ) -> Result<TxResponse, RelayerError>;
}
