//! The relay coordinator and the identifiers of what it has set up.

mod handshake;
mod packet;

use core::fmt::Display;

use ibc_core::channel::types::channel::Order;
use ibc_core::client::types::msgs::{MsgCreateClient, MsgUpdateClient};
use ibc_core::client::types::Height;
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::ToAny;
use ibc_core::host::types::identifiers::{ChannelId, ClientId, ConnectionId, PortId};
use tracing::{debug, info, info_span, warn, Instrument};

pub use self::packet::{Delivery, PacketOutcome, RelayTask};
use crate::chain::{ProvenValue, TxResponse};
use crate::config::RelayerConfig;
use crate::error::RelayerError;
use crate::handle::ChainHandle;
use crate::retry::{retry_with_backoff, RetryPolicy};

/// One of the two chains of a coordinator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

/// The light client of each chain on the other.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientPair {
    /// Client of chain B, hosted on chain A.
    pub client_on_a: ClientId,
    /// Client of chain A, hosted on chain B.
    pub client_on_b: ClientId,
}

impl ClientPair {
    pub fn flipped(&self) -> Self {
        Self {
            client_on_a: self.client_on_b.clone(),
            client_on_b: self.client_on_a.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionPair {
    pub clients: ClientPair,
    pub conn_on_a: ConnectionId,
    pub conn_on_b: ConnectionId,
}

impl ConnectionPair {
    pub fn flipped(&self) -> Self {
        Self {
            clients: self.clients.flipped(),
            conn_on_a: self.conn_on_b.clone(),
            conn_on_b: self.conn_on_a.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelPair {
    pub connection: ConnectionPair,
    pub port_on_a: PortId,
    pub chan_on_a: ChannelId,
    pub port_on_b: PortId,
    pub chan_on_b: ChannelId,
    pub ordering: Order,
}

impl ChannelPair {
    pub fn flipped(&self) -> Self {
        Self {
            connection: self.connection.flipped(),
            port_on_a: self.port_on_b.clone(),
            chan_on_a: self.chan_on_b.clone(),
            port_on_b: self.port_on_a.clone(),
            chan_on_b: self.chan_on_a.clone(),
            ordering: self.ordering,
        }
    }
}

/// Drives two chains towards each other.
///
/// The coordinator keeps no protocol state: every step reads the source
/// chain, fetches a proof at a height the destination's client has already
/// verified, and submits the matching message. Clones share the same chain
/// runtimes.
#[derive(Clone, Debug)]
pub struct RelayCoordinator {
    chain_a: ChainHandle,
    chain_b: ChainHandle,
    config: RelayerConfig,
    retry: RetryPolicy,
}

impl RelayCoordinator {
    pub fn new(chain_a: ChainHandle, chain_b: ChainHandle, config: RelayerConfig) -> Self {
        let retry = config.retry_policy();
        Self {
            chain_a,
            chain_b,
            config,
            retry,
        }
    }

    pub fn chain_a(&self) -> &ChainHandle {
        &self.chain_a
    }

    pub fn chain_b(&self) -> &ChainHandle {
        &self.chain_b
    }

    pub fn config(&self) -> &RelayerConfig {
        &self.config
    }

    /// The chain `side` names and its counterparty.
    fn chains(&self, side: Side) -> (&ChainHandle, &ChainHandle) {
        match side {
            Side::A => (&self.chain_a, &self.chain_b),
            Side::B => (&self.chain_b, &self.chain_a),
        }
    }

    /// Creates a light client of each chain on the other, both at once.
    pub async fn create_clients(&self) -> Result<ClientPair, RelayerError> {
        let (client_on_a, client_on_b) = tokio::try_join!(
            self.create_client(&self.chain_a, &self.chain_b),
            self.create_client(&self.chain_b, &self.chain_a),
        )?;

        Ok(ClientPair {
            client_on_a,
            client_on_b,
        })
    }

    async fn create_client(
        &self,
        host: &ChainHandle,
        subject: &ChainHandle,
    ) -> Result<ClientId, RelayerError> {
        let known = self
            .step("query_clients", || host.query_clients_tracking(subject.id()))
            .await?;
        self.step("create_client", || {
            self.try_create_client(host, subject, &known)
        })
        .await
    }

    /// A retry may follow an attempt that landed but lost its response, so
    /// a client of `subject` missing from `known` counts as created.
    async fn try_create_client(
        &self,
        host: &ChainHandle,
        subject: &ChainHandle,
        known: &[ClientId],
    ) -> Result<ClientId, RelayerError> {
        let tracking = host.query_clients_tracking(subject.id()).await?;
        if let Some(client_id) = tracking.into_iter().find(|id| !known.contains(id)) {
            info!(
                chain_id = %host.id(),
                %client_id,
                counterparty = %subject.id(),
                "client created by an earlier attempt"
            );
            return Ok(client_id);
        }

        let init = subject.query_client_init().await?;
        let msg = MsgCreateClient::new(init.client_state, init.consensus_state, host.signer());

        let response = host.submit(vec![msg.to_any()]).await?;
        let client_id = expect_event(host, &response, "create_client", |event| match event {
            IbcEvent::CreateClient(e) => Some(e.client_id().clone()),
            _ => None,
        })?;

        info!(
            chain_id = %host.id(),
            %client_id,
            counterparty = %subject.id(),
            height = %init.height,
            "created client"
        );
        Ok(client_id)
    }

    /// Brings the client of the counterparty on `side` up to the
    /// counterparty's latest height and returns the height it then trusts.
    pub async fn update_client(
        &self,
        side: Side,
        client_id: &ClientId,
    ) -> Result<Height, RelayerError> {
        let (host, subject) = self.chains(side);
        self.step("update_client", || {
            self.update_client_on(host, subject, client_id)
        })
        .await
    }

    /// Updates `client_id` on `host` to the latest committed height of
    /// `subject`. Proofs from `subject` are fetched at the returned height.
    pub(crate) async fn update_client_on(
        &self,
        host: &ChainHandle,
        subject: &ChainHandle,
        client_id: &ClientId,
    ) -> Result<Height, RelayerError> {
        let (trusted_height, status) = tokio::try_join!(
            host.query_client_latest_height(client_id),
            subject.query_status()
        )?;

        if status.height < trusted_height {
            return Err(RelayerError::ClientAhead {
                chain_id: host.id().clone(),
                client_id: client_id.clone(),
                client_height: trusted_height,
                counterparty_height: status.height,
            });
        }
        if status.height == trusted_height {
            return Ok(trusted_height);
        }

        let header = subject.query_header(trusted_height, status.height).await?;
        let msg = MsgUpdateClient {
            client_id: client_id.clone(),
            client_message: header,
            signer: host.signer(),
        };

        match host.submit(vec![msg.to_any()]).await {
            Ok(_) => {
                debug!(
                    chain_id = %host.id(),
                    %client_id,
                    from = %trusted_height,
                    to = %status.height,
                    "updated client"
                );
                Ok(status.height)
            }
            // another work item updated the client in the meantime
            Err(e)
                if matches!(
                    e.kind(),
                    Some(ErrorKind::StaleHeader | ErrorKind::DuplicateHeight)
                ) =>
            {
                let latest = host.query_client_latest_height(client_id).await?;
                if latest >= status.height {
                    Ok(latest)
                } else {
                    Err(e)
                }
            }
            Err(e) => Err(e),
        }
    }

    /// Runs one unit of work with retries, logging a terminal failure.
    async fn step<T, F, Fut>(&self, name: &'static str, operation: F) -> Result<T, RelayerError>
    where
        F: FnMut() -> Fut,
        Fut: core::future::Future<Output = Result<T, RelayerError>>,
    {
        let span = info_span!("step", step = name);
        async {
            let result = retry_with_backoff(&self.retry, name, operation).await;
            if let Err(e) = &result {
                warn!(error = %e, kind = ?e.kind(), "{name} failed");
            }
            result
        }
        .instrument(span)
        .await
    }
}

/// Picks the first event of the response `pick` accepts.
fn expect_event<T>(
    chain: &ChainHandle,
    response: &TxResponse,
    expected: &str,
    pick: impl Fn(&IbcEvent) -> Option<T>,
) -> Result<T, RelayerError> {
    response
        .events
        .iter()
        .find_map(pick)
        .ok_or_else(|| RelayerError::MissingEvent {
            chain_id: chain.id().clone(),
            expected: expected.to_string(),
        })
}

/// The bytes of a proven value that must be present.
fn require_value<'a>(
    chain: &ChainHandle,
    what: &str,
    proven: &'a ProvenValue,
) -> Result<&'a [u8], RelayerError> {
    proven
        .value
        .as_deref()
        .ok_or_else(|| RelayerError::NotFound {
            chain_id: chain.id().clone(),
            what: format!("{what} at height {}", proven.height),
        })
}

fn decode_proven<T, E: Display>(
    chain: &ChainHandle,
    what: &str,
    proven: &ProvenValue,
    decode: impl FnOnce(&[u8]) -> Result<T, E>,
) -> Result<T, RelayerError> {
    let bytes = require_value(chain, what, proven)?;
    decode(bytes).map_err(|e| RelayerError::InvalidValue {
        chain_id: chain.id().clone(),
        what: what.to_string(),
        description: e.to_string(),
    })
}
