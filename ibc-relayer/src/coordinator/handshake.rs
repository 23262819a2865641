//! Connection and channel handshakes, initiated from chain A.

use ibc_core::channel::types::channel::{ChannelEnd, Order};
use ibc_core::channel::types::msgs::{
    MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck, MsgChannelOpenConfirm,
    MsgChannelOpenInit, MsgChannelOpenTry,
};
use ibc_core::channel::types::Version as ChannelVersion;
use ibc_core::connection::types::msgs::{
    MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit, MsgConnectionOpenTry,
};
use ibc_core::connection::types::{ConnectionEnd, Counterparty as ConnectionCounterparty};
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::ToAny;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::host::types::path::{ChannelEndPath, ConnectionPath};
use ibc_primitives::proto::Protobuf;
use tracing::info;

use super::{
    decode_proven, expect_event, require_value, ChannelPair, ClientPair, ConnectionPair,
    RelayCoordinator,
};
use crate::error::RelayerError;
use crate::handle::ChainHandle;

impl RelayCoordinator {
    /// Opens a connection between the two clients, A moving first.
    pub async fn create_connection(
        &self,
        clients: &ClientPair,
    ) -> Result<ConnectionPair, RelayerError> {
        let (a, b) = (&self.chain_a, &self.chain_b);

        let conn_on_a = self
            .step("conn_open_init", || self.conn_open_init(a, b, clients))
            .await?;
        let conn_on_b = self
            .step("conn_open_try", || {
                self.conn_open_try(b, a, clients, &conn_on_a)
            })
            .await?;

        let connection = ConnectionPair {
            clients: clients.clone(),
            conn_on_a,
            conn_on_b,
        };
        self.step("conn_open_ack", || self.conn_open_ack(a, b, &connection))
            .await?;
        self.step("conn_open_confirm", || {
            self.conn_open_confirm(b, a, &connection)
        })
        .await?;

        info!(
            chain_a = %a.id(),
            conn_on_a = %connection.conn_on_a,
            chain_b = %b.id(),
            conn_on_b = %connection.conn_on_b,
            "connection open"
        );
        Ok(connection)
    }

    async fn conn_open_init(
        &self,
        chain_a: &ChainHandle,
        chain_b: &ChainHandle,
        clients: &ClientPair,
    ) -> Result<ConnectionId, RelayerError> {
        let prefix_on_b = chain_b.query_commitment_prefix().await?;
        let msg = MsgConnectionOpenInit {
            client_id_on_a: clients.client_on_a.clone(),
            counterparty: ConnectionCounterparty::new(
                clients.client_on_b.clone(),
                None,
                prefix_on_b,
            ),
            version: None,
            delay_period: self.config.connection_delay(),
            signer: chain_a.signer(),
        };

        let response = chain_a.submit(vec![msg.to_any()]).await?;
        expect_event(chain_a, &response, "connection_open_init", |event| {
            match event {
                IbcEvent::OpenInitConnection(e) => Some(e.conn_id().clone()),
                _ => None,
            }
        })
    }

    async fn conn_open_try(
        &self,
        chain_b: &ChainHandle,
        chain_a: &ChainHandle,
        clients: &ClientPair,
        conn_on_a: &ConnectionId,
    ) -> Result<ConnectionId, RelayerError> {
        let proof_height = self
            .update_client_on(chain_b, chain_a, &clients.client_on_b)
            .await?;
        let proven = chain_a
            .query_proven(ConnectionPath::new(conn_on_a), proof_height)
            .await?;
        let conn_end_on_a =
            decode_proven(chain_a, "connection end", &proven, ConnectionEnd::decode_vec)?;
        let prefix_on_a = chain_a.query_commitment_prefix().await?;

        let msg = MsgConnectionOpenTry {
            client_id_on_b: clients.client_on_b.clone(),
            counterparty: ConnectionCounterparty::new(
                clients.client_on_a.clone(),
                Some(conn_on_a.clone()),
                prefix_on_a,
            ),
            versions_on_a: conn_end_on_a.versions().to_vec(),
            proof_conn_end_on_a: proven.proof,
            proofs_height_on_a: proof_height,
            delay_period: conn_end_on_a.delay_period(),
            signer: chain_b.signer(),
        };

        let response = chain_b.submit(vec![msg.to_any()]).await?;
        expect_event(chain_b, &response, "connection_open_try", |event| {
            match event {
                IbcEvent::OpenTryConnection(e) => Some(e.conn_id().clone()),
                _ => None,
            }
        })
    }

    async fn conn_open_ack(
        &self,
        chain_a: &ChainHandle,
        chain_b: &ChainHandle,
        connection: &ConnectionPair,
    ) -> Result<(), RelayerError> {
        let proof_height = self
            .update_client_on(chain_a, chain_b, &connection.clients.client_on_a)
            .await?;
        let proven = chain_b
            .query_proven(ConnectionPath::new(&connection.conn_on_b), proof_height)
            .await?;
        let conn_end_on_b =
            decode_proven(chain_b, "connection end", &proven, ConnectionEnd::decode_vec)?;
        let version = conn_end_on_b
            .versions()
            .first()
            .cloned()
            .ok_or_else(|| RelayerError::InvalidValue {
                chain_id: chain_b.id().clone(),
                what: "connection end".to_string(),
                description: "no negotiated version".to_string(),
            })?;

        let msg = MsgConnectionOpenAck {
            conn_id_on_a: connection.conn_on_a.clone(),
            conn_id_on_b: connection.conn_on_b.clone(),
            proof_conn_end_on_b: proven.proof,
            proofs_height_on_b: proof_height,
            version,
            signer: chain_a.signer(),
        };

        let response = chain_a.submit(vec![msg.to_any()]).await?;
        expect_event(chain_a, &response, "connection_open_ack", |event| {
            matches!(event, IbcEvent::OpenAckConnection(_)).then_some(())
        })
    }

    async fn conn_open_confirm(
        &self,
        chain_b: &ChainHandle,
        chain_a: &ChainHandle,
        connection: &ConnectionPair,
    ) -> Result<(), RelayerError> {
        let proof_height = self
            .update_client_on(chain_b, chain_a, &connection.clients.client_on_b)
            .await?;
        let proven = chain_a
            .query_proven(ConnectionPath::new(&connection.conn_on_a), proof_height)
            .await?;
        require_value(chain_a, "connection end", &proven)?;

        let msg = MsgConnectionOpenConfirm {
            conn_id_on_b: connection.conn_on_b.clone(),
            proof_conn_end_on_a: proven.proof,
            proof_height_on_a: proof_height,
            signer: chain_b.signer(),
        };

        let response = chain_b.submit(vec![msg.to_any()]).await?;
        expect_event(chain_b, &response, "connection_open_confirm", |event| {
            matches!(event, IbcEvent::OpenConfirmConnection(_)).then_some(())
        })
    }

    /// Opens a channel over an open connection, A moving first. The
    /// application on A picks the version when `version` is empty.
    pub async fn create_channel(
        &self,
        connection: &ConnectionPair,
        port_on_a: PortId,
        port_on_b: PortId,
        ordering: Order,
        version: ChannelVersion,
    ) -> Result<ChannelPair, RelayerError> {
        let (a, b) = (&self.chain_a, &self.chain_b);

        let chan_on_a = self
            .step("chan_open_init", || {
                self.chan_open_init(a, connection, &port_on_a, &port_on_b, ordering, &version)
            })
            .await?;
        let chan_on_b = self
            .step("chan_open_try", || {
                self.chan_open_try(b, a, connection, &port_on_a, &chan_on_a, &port_on_b)
            })
            .await?;

        let channel = ChannelPair {
            connection: connection.clone(),
            port_on_a,
            chan_on_a,
            port_on_b,
            chan_on_b,
            ordering,
        };
        self.step("chan_open_ack", || self.chan_open_ack(a, b, &channel))
            .await?;
        self.step("chan_open_confirm", || {
            self.chan_open_confirm(b, a, &channel)
        })
        .await?;

        info!(
            chain_a = %a.id(),
            chan_on_a = %channel.chan_on_a,
            chain_b = %b.id(),
            chan_on_b = %channel.chan_on_b,
            ordering = %channel.ordering,
            "channel open"
        );
        Ok(channel)
    }

    async fn chan_open_init(
        &self,
        chain_a: &ChainHandle,
        connection: &ConnectionPair,
        port_on_a: &PortId,
        port_on_b: &PortId,
        ordering: Order,
        version: &ChannelVersion,
    ) -> Result<ChannelId, RelayerError> {
        let msg = MsgChannelOpenInit {
            port_id_on_a: port_on_a.clone(),
            connection_hops_on_a: vec![connection.conn_on_a.clone()],
            port_id_on_b: port_on_b.clone(),
            ordering,
            signer: chain_a.signer(),
            version_proposal: version.clone(),
        };

        let response = chain_a.submit(vec![msg.to_any()]).await?;
        expect_event(chain_a, &response, "channel_open_init", |event| match event {
            IbcEvent::OpenInitChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        })
    }

    async fn chan_open_try(
        &self,
        chain_b: &ChainHandle,
        chain_a: &ChainHandle,
        connection: &ConnectionPair,
        port_on_a: &PortId,
        chan_on_a: &ChannelId,
        port_on_b: &PortId,
    ) -> Result<ChannelId, RelayerError> {
        let proof_height = self
            .update_client_on(chain_b, chain_a, &connection.clients.client_on_b)
            .await?;
        let proven = chain_a
            .query_proven(ChannelEndPath::new(port_on_a, chan_on_a), proof_height)
            .await?;
        let chan_end_on_a =
            decode_proven(chain_a, "channel end", &proven, ChannelEnd::decode_vec)?;

        let msg = MsgChannelOpenTry {
            port_id_on_b: port_on_b.clone(),
            connection_hops_on_b: vec![connection.conn_on_b.clone()],
            port_id_on_a: port_on_a.clone(),
            chan_id_on_a: chan_on_a.clone(),
            version_supported_on_a: chan_end_on_a.version().clone(),
            proof_chan_end_on_a: proven.proof,
            proof_height_on_a: proof_height,
            ordering: *chan_end_on_a.ordering(),
            signer: chain_b.signer(),
        };

        let response = chain_b.submit(vec![msg.to_any()]).await?;
        expect_event(chain_b, &response, "channel_open_try", |event| match event {
            IbcEvent::OpenTryChannel(e) => Some(e.chan_id().clone()),
            _ => None,
        })
    }

    async fn chan_open_ack(
        &self,
        chain_a: &ChainHandle,
        chain_b: &ChainHandle,
        channel: &ChannelPair,
    ) -> Result<(), RelayerError> {
        let proof_height = self
            .update_client_on(chain_a, chain_b, &channel.connection.clients.client_on_a)
            .await?;
        let proven = chain_b
            .query_proven(
                ChannelEndPath::new(&channel.port_on_b, &channel.chan_on_b),
                proof_height,
            )
            .await?;
        let chan_end_on_b =
            decode_proven(chain_b, "channel end", &proven, ChannelEnd::decode_vec)?;

        let msg = MsgChannelOpenAck {
            port_id_on_a: channel.port_on_a.clone(),
            chan_id_on_a: channel.chan_on_a.clone(),
            chan_id_on_b: channel.chan_on_b.clone(),
            version_on_b: chan_end_on_b.version().clone(),
            proof_chan_end_on_b: proven.proof,
            proof_height_on_b: proof_height,
            signer: chain_a.signer(),
        };

        let response = chain_a.submit(vec![msg.to_any()]).await?;
        expect_event(chain_a, &response, "channel_open_ack", |event| {
            matches!(event, IbcEvent::OpenAckChannel(_)).then_some(())
        })
    }

    async fn chan_open_confirm(
        &self,
        chain_b: &ChainHandle,
        chain_a: &ChainHandle,
        channel: &ChannelPair,
    ) -> Result<(), RelayerError> {
        let proof_height = self
            .update_client_on(chain_b, chain_a, &channel.connection.clients.client_on_b)
            .await?;
        let proven = chain_a
            .query_proven(
                ChannelEndPath::new(&channel.port_on_a, &channel.chan_on_a),
                proof_height,
            )
            .await?;
        require_value(chain_a, "channel end", &proven)?;

        let msg = MsgChannelOpenConfirm {
            port_id_on_b: channel.port_on_b.clone(),
            chan_id_on_b: channel.chan_on_b.clone(),
            proof_chan_end_on_a: proven.proof,
            proof_height_on_a: proof_height,
            signer: chain_b.signer(),
        };

        let response = chain_b.submit(vec![msg.to_any()]).await?;
        expect_event(chain_b, &response, "channel_open_confirm", |event| {
            matches!(event, IbcEvent::OpenConfirmChannel(_)).then_some(())
        })
    }

    /// Closes the channel on A, then confirms the closure on B.
    pub async fn close_channel(&self, channel: &ChannelPair) -> Result<(), RelayerError> {
        let (a, b) = (&self.chain_a, &self.chain_b);

        self.step("chan_close_init", || self.chan_close_init(a, channel))
            .await?;
        self.step("chan_close_confirm", || {
            self.chan_close_confirm(b, a, channel)
        })
        .await?;

        info!(
            chain_a = %a.id(),
            chan_on_a = %channel.chan_on_a,
            chain_b = %b.id(),
            chan_on_b = %channel.chan_on_b,
            "channel closed"
        );
        Ok(())
    }

    async fn chan_close_init(
        &self,
        chain_a: &ChainHandle,
        channel: &ChannelPair,
    ) -> Result<(), RelayerError> {
        let msg = MsgChannelCloseInit {
            port_id_on_a: channel.port_on_a.clone(),
            chan_id_on_a: channel.chan_on_a.clone(),
            signer: chain_a.signer(),
        };

        let response = chain_a.submit(vec![msg.to_any()]).await?;
        expect_event(chain_a, &response, "channel_close_init", |event| {
            matches!(event, IbcEvent::CloseInitChannel(_)).then_some(())
        })
    }

    async fn chan_close_confirm(
        &self,
        chain_b: &ChainHandle,
        chain_a: &ChainHandle,
        channel: &ChannelPair,
    ) -> Result<(), RelayerError> {
        let proof_height = self
            .update_client_on(chain_b, chain_a, &channel.connection.clients.client_on_b)
            .await?;
        let proven = chain_a
            .query_proven(
                ChannelEndPath::new(&channel.port_on_a, &channel.chan_on_a),
                proof_height,
            )
            .await?;
        require_value(chain_a, "channel end", &proven)?;

        let msg = MsgChannelCloseConfirm {
            port_id_on_b: channel.port_on_b.clone(),
            chan_id_on_b: channel.chan_on_b.clone(),
            proof_chan_end_on_a: proven.proof,
            proof_height_on_a: proof_height,
            signer: chain_b.signer(),
        };

        let response = chain_b.submit(vec![msg.to_any()]).await?;
        expect_event(chain_b, &response, "channel_close_confirm", |event| {
            matches!(event, IbcEvent::CloseConfirmChannel(_)).then_some(())
        })
    }
}
