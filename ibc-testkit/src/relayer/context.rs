use ibc_core::channel::types::channel::Order;
use ibc_core::channel::types::Version as ChannelVersion;
use ibc_core::host::types::identifiers::{ChainId, PortId};
use ibc_core::host::TimeoutPolicy;
use ibc_relayer::{
    spawn_chain_runtime, ChannelPair, ClientPair, ConnectionPair, RelayCoordinator, RelayerConfig,
    RelayerError,
};
use tokio::task::JoinHandle;

use crate::context::MockContext;
use crate::fixtures::{relayer_signing_context, MockContextConfig, DEFAULT_ETH_CHAIN_ID};
use crate::relayer::chain::MockChain;

/// Secret key byte of the relayer account on chain A.
pub const RELAYER_SEED_A: u8 = 101;

/// Secret key byte of the relayer account on chain B.
pub const RELAYER_SEED_B: u8 = 102;

/// Two mock chains with their runtimes and a coordinator between them.
///
/// Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct RelayerContext {
    pub chain_a: MockChain,
    pub chain_b: MockChain,
    pub coordinator: RelayCoordinator,
    runtimes: Vec<JoinHandle<()>>,
}

impl RelayerContext {
    pub fn new(ctx_a: MockContext, ctx_b: MockContext, config: RelayerConfig) -> Self {
        let chain_a = MockChain::new(ctx_a);
        let chain_b = MockChain::new(ctx_b);

        let signing_a = {
            let ctx = chain_a.ctx();
            relayer_signing_context(ctx.chain_id(), ctx.eth_chain_id(), RELAYER_SEED_A)
        };
        let signing_b = {
            let ctx = chain_b.ctx();
            relayer_signing_context(ctx.chain_id(), ctx.eth_chain_id(), RELAYER_SEED_B)
        };

        let (handle_a, runtime_a) = spawn_chain_runtime(chain_a.clone(), signing_a);
        let (handle_b, runtime_b) = spawn_chain_runtime(chain_b.clone(), signing_b);

        Self {
            chain_a,
            chain_b,
            coordinator: RelayCoordinator::new(handle_a, handle_b, config),
            runtimes: vec![runtime_a, runtime_b],
        }
    }

    /// Chains `ibc0` and `ibc1` with distinct validator sets, both funded
    /// with `balances`, under a fast polling configuration.
    pub fn with_balances(timeout_policy: TimeoutPolicy, balances: Vec<(String, u64)>) -> Self {
        let chain = |name: &str, eth_chain_id: u64, validator_seed: u8| -> MockContext {
            MockContextConfig::builder()
                .chain_id(ChainId::new(name).expect("Never fails"))
                .eth_chain_id(eth_chain_id)
                .validator_seed(validator_seed)
                .timeout_policy(timeout_policy)
                .balances(balances.clone())
                .build()
        };

        Self::new(
            chain("ibc0", DEFAULT_ETH_CHAIN_ID, 1),
            chain("ibc1", DEFAULT_ETH_CHAIN_ID + 1, 11),
            fast_relayer_config(),
        )
    }

    /// Creates both clients and opens a connection between them.
    pub async fn open_connection(&self) -> Result<ConnectionPair, RelayerError> {
        let clients: ClientPair = self.coordinator.create_clients().await?;
        self.coordinator.create_connection(&clients).await
    }

    /// Opens a token channel on the transfer ports of both chains.
    pub async fn open_transfer_channel(&self, ordering: Order) -> Result<ChannelPair, RelayerError> {
        let connection = self.open_connection().await?;
        self.coordinator
            .create_channel(
                &connection,
                PortId::transfer(),
                PortId::transfer(),
                ordering,
                ChannelVersion::empty(),
            )
            .await
    }
}

impl Drop for RelayerContext {
    fn drop(&mut self) {
        for runtime in &self.runtimes {
            runtime.abort();
        }
    }
}

/// Polls and backs off in milliseconds so that tests run quickly.
pub fn fast_relayer_config() -> RelayerConfig {
    RelayerConfig {
        max_retries: 3,
        initial_backoff_ms: 1,
        max_backoff_ms: 10,
        poll_interval_ms: 10,
        connection_delay_ms: 0,
    }
}
