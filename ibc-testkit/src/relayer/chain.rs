use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::host::types::identifiers::{ChainId, ChannelId, ClientId, PortId, Sequence};
use ibc_core::host::types::path::Path;
use ibc_core::host::ValidationContext;
use ibc_primitives::proto::Any;
use ibc_primitives::Signer;
use ibc_relayer::{
    Chain, ChainStatus, ClientInit, ProvenValue, RelayerError, SigningContext, TxResponse,
};
use ibc_store::StoreError;
use parking_lot::{Mutex, MutexGuard};
use tracing::debug;

use crate::context::MockContext;
use crate::hosts::HostError;

/// A [`MockContext`] served to the relayer as a [`Chain`].
///
/// Clones share the same context, so tests keep a clone to inspect and
/// drive the chain while the relayer runtime owns another.
#[derive(Clone, Debug)]
pub struct MockChain {
    chain_id: ChainId,
    ctx: Arc<Mutex<MockContext>>,
    /// Submissions to fail with a transport error before accepting any
    failing_submissions: Arc<AtomicU32>,
    /// Submissions to deliver whose responses are then lost
    lost_responses: Arc<AtomicU32>,
}

impl MockChain {
    pub fn new(ctx: MockContext) -> Self {
        Self {
            chain_id: ctx.chain_id().clone(),
            ctx: Arc::new(Mutex::new(ctx)),
            failing_submissions: Arc::new(AtomicU32::new(0)),
            lost_responses: Arc::new(AtomicU32::new(0)),
        }
    }

    pub fn ctx(&self) -> MutexGuard<'_, MockContext> {
        self.ctx.lock()
    }

    /// Makes the next `count` submissions fail as if the node were
    /// unreachable. The transactions are not delivered.
    pub fn fail_next_submissions(&self, count: u32) {
        self.failing_submissions.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` submissions land on chain but fail as if the
    /// connection dropped before the response arrived.
    pub fn lose_next_responses(&self, count: u32) {
        self.lost_responses.store(count, Ordering::SeqCst);
    }

    fn take_failure(&self) -> bool {
        take_one(&self.failing_submissions)
    }

    fn unreachable(&self) -> RelayerError {
        RelayerError::Transport {
            chain_id: self.chain_id.clone(),
            description: "node unreachable".to_string(),
        }
    }

    fn not_found(&self, what: impl ToString) -> RelayerError {
        RelayerError::NotFound {
            chain_id: self.chain_id.clone(),
            what: what.to_string(),
        }
    }

    fn host_error(&self, e: HostError) -> RelayerError {
        match e {
            HostError::UnknownBlock { .. } => self.not_found(e),
            HostError::LightClient { description } => RelayerError::InvalidValue {
                chain_id: self.chain_id.clone(),
                what: "light client state".to_string(),
                description,
            },
        }
    }

    fn store_error(&self, e: StoreError) -> RelayerError {
        match e {
            StoreError::MissingHeight { .. } => self.not_found(e),
            e => RelayerError::Transport {
                chain_id: self.chain_id.clone(),
                description: e.to_string(),
            },
        }
    }
}

#[async_trait::async_trait]
impl Chain for MockChain {
    fn id(&self) -> ChainId {
        self.chain_id.clone()
    }

    async fn query_status(&self) -> Result<ChainStatus, RelayerError> {
        let ctx = self.ctx();
        Ok(ChainStatus {
            height: ctx.latest_height(),
            timestamp: ctx.latest_timestamp(),
        })
    }

    async fn query_commitment_prefix(&self) -> Result<CommitmentPrefix, RelayerError> {
        Ok(self.ctx().ibc_store.commitment_prefix())
    }

    async fn query_client_latest_height(
        &self,
        client_id: &ClientId,
    ) -> Result<Height, RelayerError> {
        self.ctx()
            .client_latest_height(client_id)
            .map_err(|e| self.not_found(e))
    }

    async fn query_clients_tracking(
        &self,
        chain_id: &ChainId,
    ) -> Result<Vec<ClientId>, RelayerError> {
        Ok(self.ctx().clients_tracking(chain_id))
    }

    async fn query_client_init(&self) -> Result<ClientInit, RelayerError> {
        let (client_state, consensus_state, height) =
            self.ctx().client_init().map_err(|e| self.host_error(e))?;
        Ok(ClientInit {
            client_state,
            consensus_state,
            height,
        })
    }

    async fn query_header(
        &self,
        trusted_height: Height,
        target_height: Height,
    ) -> Result<Any, RelayerError> {
        self.ctx()
            .header(trusted_height, target_height)
            .map_err(|e| self.host_error(e))
    }

    async fn query_proven(&self, path: Path, height: Height) -> Result<ProvenValue, RelayerError> {
        let (value, proof) = self
            .ctx()
            .proven(&path, height)
            .map_err(|e| self.store_error(e))?;
        Ok(ProvenValue {
            value,
            proof,
            height,
        })
    }

    async fn query_pending_packets(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<Packet>, RelayerError> {
        Ok(self.ctx().pending_packets(port_id, channel_id))
    }

    async fn query_written_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<Acknowledgement>, RelayerError> {
        Ok(self.ctx().written_ack(port_id, channel_id, sequence))
    }

    async fn submit(
        &self,
        signer: &SigningContext,
        messages: Vec<Any>,
    ) -> Result<TxResponse, RelayerError> {
        if self.take_failure() {
            return Err(self.unreachable());
        }

        let tx = signer.sign(messages)?;
        let mut ctx = self.ctx();

        let sender = tx.recover_signer()?;
        tx.verify(ctx.eth_chain_id(), &sender)?;

        let delivered = ctx
            .deliver_tx(Signer::new(sender.to_string()), tx.messages)
            .map_err(|e| RelayerError::rejected(&self.chain_id, &e))?;
        debug!(
            chain_id = %self.chain_id,
            height = %delivered.height,
            events = delivered.events.len(),
            "transaction included"
        );

        if take_one(&self.lost_responses) {
            return Err(self.unreachable());
        }

        Ok(TxResponse {
            height: delivered.height,
            events: delivered.events,
        })
    }
}

fn take_one(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
        .is_ok()
}

#[cfg(test)]
mod tests {
    use ibc_core::host::TimeoutPolicy;

    use super::*;
    use crate::fixtures::{relayer_signing_context, MockContextConfig};

    fn chain(eth_chain_id: u64) -> MockChain {
        MockChain::new(
            MockContextConfig::builder()
                .eth_chain_id(eth_chain_id)
                .timeout_policy(TimeoutPolicy::KeepOpen)
                .build(),
        )
    }

    #[tokio::test]
    async fn status_reports_the_latest_block() {
        let chain = chain(2018);
        chain.ctx().advance_blocks(2);

        let status = chain.query_status().await.unwrap();
        assert_eq!(status.height, Height::new(0, 3).unwrap());
        assert_eq!(status.timestamp, chain.ctx().latest_timestamp());
    }

    #[tokio::test]
    async fn transactions_signed_for_another_network_are_refused() {
        let chain = chain(2018);
        let signing = relayer_signing_context(&chain.id(), 3018, 9);
        let before = chain.ctx().latest_height();

        let result = chain.submit(&signing, vec![]).await;

        assert!(matches!(
            result,
            Err(RelayerError::InvalidTxSignature { .. })
        ));
        assert_eq!(chain.ctx().latest_height(), before);
    }

    #[tokio::test]
    async fn injected_failures_are_transient() {
        let chain = chain(2018);
        let signing = relayer_signing_context(&chain.id(), 2018, 9);
        chain.fail_next_submissions(1);

        let first = chain.submit(&signing, vec![]).await;
        assert!(first.unwrap_err().is_transient());

        let second = chain.submit(&signing, vec![]).await.unwrap();
        assert!(second.events.is_empty());
    }

    #[tokio::test]
    async fn lost_responses_still_land_the_transaction() {
        let chain = chain(2018);
        let signing = relayer_signing_context(&chain.id(), 2018, 9);
        let before = chain.ctx().latest_height();
        chain.lose_next_responses(1);

        let result = chain.submit(&signing, vec![]).await;

        assert!(result.unwrap_err().is_transient());
        assert_eq!(chain.ctx().latest_height(), before.increment());
    }

    #[tokio::test]
    async fn no_clients_track_an_unknown_chain() {
        let chain = chain(2018);
        let other = ChainId::new("ibc7").unwrap();

        assert!(chain
            .query_clients_tracking(&other)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn unknown_clients_are_not_found() {
        let chain = chain(2018);
        let client_id = ClientId::new("hb-ibft2", 0).unwrap();

        assert!(matches!(
            chain.query_client_latest_height(&client_id).await,
            Err(RelayerError::NotFound { .. })
        ));
    }
}
