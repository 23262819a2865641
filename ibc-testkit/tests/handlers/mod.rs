use core::time::Duration;

use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::channel::Order;
use ibc_core::channel::types::msgs::{
    ChannelMsg, MsgAcknowledgement, MsgChannelCloseConfirm, MsgChannelCloseInit,
    MsgChannelOpenAck, MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry,
    MsgRecvPacket, MsgTimeout, PacketMsg,
};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_core::channel::types::Version as ChannelVersion;
use ibc_core::client::types::msgs::{ClientMsg, MsgCreateClient, MsgUpdateClient};
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentProofBytes;
use ibc_core::connection::types::msgs::{
    ConnectionMsg, MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit,
    MsgConnectionOpenTry,
};
use ibc_core::connection::types::version::Version as ConnectionVersion;
use ibc_core::connection::types::Counterparty as ConnectionCounterparty;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::types::identifiers::{ChainId, ChannelId, ClientId, ConnectionId, PortId};
use ibc_core::host::types::path::{
    AckPath, ChannelEndPath, CommitmentPath, ConnectionPath, Path, ReceiptPath, SeqRecvPath,
};
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use ibc_testkit::context::{MockContext, TokenTransfer};
use ibc_testkit::fixtures::{dummy_account_signer, MockContextConfig, DEFAULT_ETH_CHAIN_ID};

pub mod channel;
pub mod client;
pub mod connection;
pub mod packet;

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const INITIAL_BALANCE: u64 = 1_000;

/// Two chains tracking each other through a client on each side. Messages
/// are built and delivered by hand, the way a relayer would.
pub struct Chains {
    pub a: MockContext,
    pub b: MockContext,

    /// Client on A tracking B
    pub client_on_a: ClientId,

    /// Client on B tracking A
    pub client_on_b: ClientId,
}

/// A context named `chain_id` funding [`ALICE`].
pub fn chain(
    chain_id: &str,
    eth_chain_id: u64,
    validator_seed: u8,
    timeout_policy: TimeoutPolicy,
) -> MockContext {
    MockContextConfig::builder()
        .chain_id(ChainId::new(chain_id).expect("valid chain id"))
        .eth_chain_id(eth_chain_id)
        .validator_seed(validator_seed)
        .timeout_policy(timeout_policy)
        .balances(vec![(ALICE.to_string(), INITIAL_BALANCE)])
        .build()
}

/// The latest event of `ctx` that `select` picks.
pub fn last_event<T>(ctx: &MockContext, select: impl Fn(IbcEvent) -> Option<T>) -> T {
    ctx.get_events()
        .into_iter()
        .rev()
        .find_map(select)
        .expect("event was emitted")
}

/// Creates on `host` a client tracking `counterparty` from its latest block.
pub fn create_client(host: &mut MockContext, counterparty: &MockContext) -> ClientId {
    let (client_state, consensus_state, _) = counterparty.client_init().expect("sealed block");
    let msg = MsgCreateClient {
        client_state,
        consensus_state,
        signer: dummy_account_signer(),
    };
    host.deliver(MsgEnvelope::Client(ClientMsg::CreateClient(msg)))
        .expect("success");

    last_event(host, |e| match e {
        IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
        _ => None,
    })
}

/// Updates `client_id` on `host` to the latest block of `counterparty`.
pub fn update_client(
    host: &mut MockContext,
    client_id: &ClientId,
    counterparty: &MockContext,
) -> Result<Height, ContextError> {
    let trusted_height = host.client_latest_height(client_id)?;
    let target_height = counterparty.latest_height();
    let client_message = counterparty
        .header(trusted_height, target_height)
        .expect("sealed blocks");

    let msg = MsgUpdateClient {
        client_id: client_id.clone(),
        client_message,
        signer: dummy_account_signer(),
    };
    host.deliver(MsgEnvelope::Client(ClientMsg::UpdateClient(msg)))?;
    Ok(target_height)
}

impl Chains {
    pub fn new(timeout_policy: TimeoutPolicy) -> Self {
        let mut a = chain("ibc0", DEFAULT_ETH_CHAIN_ID, 1, timeout_policy);
        let mut b = chain("ibc1", DEFAULT_ETH_CHAIN_ID + 1, 11, timeout_policy);

        let client_on_a = create_client(&mut a, &b);
        let client_on_b = create_client(&mut b, &a);

        Self {
            a,
            b,
            client_on_a,
            client_on_b,
        }
    }

    /// Brings the client on B up to the latest block of A.
    pub fn sync_client_on_b(&mut self) -> Height {
        let latest = self.a.latest_height();
        let tracked = self
            .b
            .client_latest_height(&self.client_on_b)
            .expect("client exists");
        if tracked < latest {
            update_client(&mut self.b, &self.client_on_b, &self.a).expect("update succeeds");
        }
        latest
    }

    /// Brings the client on A up to the latest block of B.
    pub fn sync_client_on_a(&mut self) -> Height {
        let latest = self.b.latest_height();
        let tracked = self
            .a
            .client_latest_height(&self.client_on_a)
            .expect("client exists");
        if tracked < latest {
            update_client(&mut self.a, &self.client_on_a, &self.b).expect("update succeeds");
        }
        latest
    }

    /// Proof of `path` at the latest block of A, verifiable on B.
    pub fn prove_on_a(&mut self, path: impl Into<Path>) -> (CommitmentProofBytes, Height) {
        let height = self.sync_client_on_b();
        let (_, proof) = self.a.proven(&path.into(), height).expect("sealed height");
        (proof, height)
    }

    /// Proof of `path` at the latest block of B, verifiable on A.
    pub fn prove_on_b(&mut self, path: impl Into<Path>) -> (CommitmentProofBytes, Height) {
        let height = self.sync_client_on_a();
        let (_, proof) = self.b.proven(&path.into(), height).expect("sealed height");
        (proof, height)
    }

    pub fn conn_open_init(&mut self) -> ConnectionId {
        let msg = MsgConnectionOpenInit {
            client_id_on_a: self.client_on_a.clone(),
            counterparty: ConnectionCounterparty::new(
                self.client_on_b.clone(),
                None,
                self.b.ibc_store.commitment_prefix(),
            ),
            version: None,
            delay_period: Duration::ZERO,
            signer: dummy_account_signer(),
        };
        self.a
            .deliver(MsgEnvelope::Connection(ConnectionMsg::OpenInit(msg)))
            .expect("success");

        last_event(&self.a, |e| match e {
            IbcEvent::OpenInitConnection(e) => Some(e.conn_id().clone()),
            _ => None,
        })
    }

    pub fn conn_open_try(
        &mut self,
        conn_id_on_a: &ConnectionId,
    ) -> Result<ConnectionId, ContextError> {
        let (proof_conn_end_on_a, proofs_height_on_a) =
            self.prove_on_a(ConnectionPath::new(conn_id_on_a));
        let msg = MsgConnectionOpenTry {
            client_id_on_b: self.client_on_b.clone(),
            counterparty: ConnectionCounterparty::new(
                self.client_on_a.clone(),
                Some(conn_id_on_a.clone()),
                self.a.ibc_store.commitment_prefix(),
            ),
            versions_on_a: ConnectionVersion::compatibles(),
            proof_conn_end_on_a,
            proofs_height_on_a,
            delay_period: Duration::ZERO,
            signer: dummy_account_signer(),
        };
        self.b
            .deliver(MsgEnvelope::Connection(ConnectionMsg::OpenTry(msg)))?;

        Ok(last_event(&self.b, |e| match e {
            IbcEvent::OpenTryConnection(e) => Some(e.conn_id().clone()),
            _ => None,
        }))
    }

    pub fn conn_open_ack(
        &mut self,
        conn_id_on_a: &ConnectionId,
        conn_id_on_b: &ConnectionId,
    ) -> Result<(), ContextError> {
        let version = self
            .b
            .ibc_store
            .connection_end(conn_id_on_b)?
            .versions()
            .first()
            .cloned()
            .unwrap_or_default();
        let (proof_conn_end_on_b, proofs_height_on_b) =
            self.prove_on_b(ConnectionPath::new(conn_id_on_b));
        let msg = MsgConnectionOpenAck {
            conn_id_on_a: conn_id_on_a.clone(),
            conn_id_on_b: conn_id_on_b.clone(),
            proof_conn_end_on_b,
            proofs_height_on_b,
            version,
            signer: dummy_account_signer(),
        };
        self.a
            .deliver(MsgEnvelope::Connection(ConnectionMsg::OpenAck(msg)))
    }

    pub fn conn_open_confirm(
        &mut self,
        conn_id_on_a: &ConnectionId,
        conn_id_on_b: &ConnectionId,
    ) -> Result<(), ContextError> {
        let (proof_conn_end_on_a, proof_height_on_a) =
            self.prove_on_a(ConnectionPath::new(conn_id_on_a));
        let msg = MsgConnectionOpenConfirm {
            conn_id_on_b: conn_id_on_b.clone(),
            proof_conn_end_on_a,
            proof_height_on_a,
            signer: dummy_account_signer(),
        };
        self.b
            .deliver(MsgEnvelope::Connection(ConnectionMsg::OpenConfirm(msg)))
    }

    /// Runs the four connection handshake steps.
    pub fn open_connection(&mut self) -> (ConnectionId, ConnectionId) {
        let conn_id_on_a = self.conn_open_init();
        let conn_id_on_b = self.conn_open_try(&conn_id_on_a).expect("success");
        self.conn_open_ack(&conn_id_on_a, &conn_id_on_b)
            .expect("success");
        self.conn_open_confirm(&conn_id_on_a, &conn_id_on_b)
            .expect("success");
        (conn_id_on_a, conn_id_on_b)
    }

    pub fn chan_open_init(&mut self, conn_id_on_a: &ConnectionId, ordering: Order) -> ChannelId {
        let msg = MsgChannelOpenInit {
            port_id_on_a: PortId::transfer(),
            connection_hops_on_a: vec![conn_id_on_a.clone()],
            port_id_on_b: PortId::transfer(),
            ordering,
            signer: dummy_account_signer(),
            version_proposal: ChannelVersion::empty(),
        };
        self.a
            .deliver(MsgEnvelope::Channel(ChannelMsg::OpenInit(msg)))
            .expect("success");

        last_event(&self.a, |e| match e {
            IbcEvent::OpenInitChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        })
    }

    pub fn chan_open_try(
        &mut self,
        conn_id_on_b: &ConnectionId,
        chan_id_on_a: &ChannelId,
        ordering: Order,
    ) -> Result<ChannelId, ContextError> {
        let chan_end_path_on_a = ChannelEndPath::new(&PortId::transfer(), chan_id_on_a);
        let version_supported_on_a = self
            .a
            .ibc_store
            .channel_end(&chan_end_path_on_a)?
            .version()
            .clone();
        let (proof_chan_end_on_a, proof_height_on_a) = self.prove_on_a(chan_end_path_on_a);
        let msg = MsgChannelOpenTry {
            port_id_on_b: PortId::transfer(),
            connection_hops_on_b: vec![conn_id_on_b.clone()],
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: chan_id_on_a.clone(),
            version_supported_on_a,
            proof_chan_end_on_a,
            proof_height_on_a,
            ordering,
            signer: dummy_account_signer(),
        };
        self.b
            .deliver(MsgEnvelope::Channel(ChannelMsg::OpenTry(msg)))?;

        Ok(last_event(&self.b, |e| match e {
            IbcEvent::OpenTryChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        }))
    }

    pub fn chan_open_ack(
        &mut self,
        chan_id_on_a: &ChannelId,
        chan_id_on_b: &ChannelId,
    ) -> Result<(), ContextError> {
        let chan_end_path_on_b = ChannelEndPath::new(&PortId::transfer(), chan_id_on_b);
        let version_on_b = self
            .b
            .ibc_store
            .channel_end(&chan_end_path_on_b)?
            .version()
            .clone();
        let (proof_chan_end_on_b, proof_height_on_b) = self.prove_on_b(chan_end_path_on_b);
        let msg = MsgChannelOpenAck {
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: chan_id_on_a.clone(),
            chan_id_on_b: chan_id_on_b.clone(),
            version_on_b,
            proof_chan_end_on_b,
            proof_height_on_b,
            signer: dummy_account_signer(),
        };
        self.a
            .deliver(MsgEnvelope::Channel(ChannelMsg::OpenAck(msg)))
    }

    pub fn chan_open_confirm(
        &mut self,
        chan_id_on_a: &ChannelId,
        chan_id_on_b: &ChannelId,
    ) -> Result<(), ContextError> {
        let (proof_chan_end_on_a, proof_height_on_a) =
            self.prove_on_a(ChannelEndPath::new(&PortId::transfer(), chan_id_on_a));
        let msg = MsgChannelOpenConfirm {
            port_id_on_b: PortId::transfer(),
            chan_id_on_b: chan_id_on_b.clone(),
            proof_chan_end_on_a,
            proof_height_on_a,
            signer: dummy_account_signer(),
        };
        self.b
            .deliver(MsgEnvelope::Channel(ChannelMsg::OpenConfirm(msg)))
    }

    pub fn chan_close_init(&mut self, chan_id_on_a: &ChannelId) -> Result<(), ContextError> {
        let msg = MsgChannelCloseInit {
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: chan_id_on_a.clone(),
            signer: dummy_account_signer(),
        };
        self.a
            .deliver(MsgEnvelope::Channel(ChannelMsg::CloseInit(msg)))
    }

    pub fn chan_close_confirm(
        &mut self,
        chan_id_on_a: &ChannelId,
        chan_id_on_b: &ChannelId,
    ) -> Result<(), ContextError> {
        let (proof_chan_end_on_a, proof_height_on_a) =
            self.prove_on_a(ChannelEndPath::new(&PortId::transfer(), chan_id_on_a));
        let msg = MsgChannelCloseConfirm {
            port_id_on_b: PortId::transfer(),
            chan_id_on_b: chan_id_on_b.clone(),
            proof_chan_end_on_a,
            proof_height_on_a,
            signer: dummy_account_signer(),
        };
        self.b
            .deliver(MsgEnvelope::Channel(ChannelMsg::CloseConfirm(msg)))
    }

    /// Opens a connection and a channel over it between the transfer ports.
    pub fn open_channel(&mut self, ordering: Order) -> (ChannelId, ChannelId) {
        let (conn_id_on_a, conn_id_on_b) = self.open_connection();
        let chan_id_on_a = self.chan_open_init(&conn_id_on_a, ordering);
        let chan_id_on_b = self
            .chan_open_try(&conn_id_on_b, &chan_id_on_a, ordering)
            .expect("success");
        self.chan_open_ack(&chan_id_on_a, &chan_id_on_b)
            .expect("success");
        self.chan_open_confirm(&chan_id_on_a, &chan_id_on_b)
            .expect("success");
        (chan_id_on_a, chan_id_on_b)
    }

    /// Sends `amount` from [`ALICE`] on A to [`BOB`] on B.
    pub fn send(
        &mut self,
        chan_id_on_a: &ChannelId,
        amount: u64,
        timeout_height: TimeoutHeight,
    ) -> Result<Packet, ContextError> {
        let timeout_timestamp = if timeout_height.is_set() {
            TimeoutTimestamp::Never
        } else {
            TimeoutTimestamp::from_nanoseconds(u64::MAX)
        };
        self.a.send_tokens(TokenTransfer {
            port_id: PortId::transfer(),
            channel_id: chan_id_on_a.clone(),
            sender: ALICE.to_string(),
            receiver: BOB.to_string(),
            amount,
            timeout_height,
            timeout_timestamp,
        })
    }

    /// Delivers `packet` to B and returns the acknowledgement B wrote.
    pub fn recv_on_b(&mut self, packet: &Packet) -> Result<Acknowledgement, ContextError> {
        let (proof_commitment_on_a, proof_height_on_a) = self.prove_on_a(CommitmentPath::new(
            &packet.port_id_on_a,
            &packet.chan_id_on_a,
            packet.seq_on_a,
        ));
        let msg = MsgRecvPacket {
            packet: packet.clone(),
            proof_commitment_on_a,
            proof_height_on_a,
            signer: dummy_account_signer(),
        };
        self.b.deliver(MsgEnvelope::Packet(PacketMsg::Recv(msg)))?;

        Ok(self
            .b
            .written_ack(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a)
            .expect("acknowledgement written on receive"))
    }

    pub fn ack_on_a(
        &mut self,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<(), ContextError> {
        let (proof_acked_on_b, proof_height_on_b) = self.prove_on_b(AckPath::new(
            &packet.port_id_on_b,
            &packet.chan_id_on_b,
            packet.seq_on_a,
        ));
        let msg = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement,
            proof_acked_on_b,
            proof_height_on_b,
            signer: dummy_account_signer(),
        };
        self.a.deliver(MsgEnvelope::Packet(PacketMsg::Ack(msg)))
    }

    /// Proves on A that B never received `packet`.
    pub fn timeout_on_a(&mut self, packet: &Packet) -> Result<(), ContextError> {
        let ordering = *self
            .a
            .ibc_store
            .channel_end(&ChannelEndPath::new(
                &packet.port_id_on_a,
                &packet.chan_id_on_a,
            ))?
            .ordering();

        let seq_recv_path_on_b = SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);
        let next_seq_recv_on_b = self.b.ibc_store.get_next_sequence_recv(&seq_recv_path_on_b)?;

        let unreceived_path: Path = match ordering {
            Order::Ordered => seq_recv_path_on_b.into(),
            _ => ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a)
                .into(),
        };
        let (proof_unreceived_on_b, proof_height_on_b) = self.prove_on_b(unreceived_path);

        let msg = MsgTimeout {
            packet: packet.clone(),
            next_seq_recv_on_b,
            proof_unreceived_on_b,
            proof_height_on_b,
            signer: dummy_account_signer(),
        };
        self.a.deliver(MsgEnvelope::Packet(PacketMsg::Timeout(msg)))
    }
}
