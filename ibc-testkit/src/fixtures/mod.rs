//! Builders for mock chains and the keys that sign relayer transactions.

use core::time::Duration;

use ibc_core::host::types::identifiers::ChainId;
use ibc_core::host::TimeoutPolicy;
use ibc_primitives::{Signer, Timestamp};
use ibc_relayer::SigningContext;
use k256::ecdsa::SigningKey;
use typed_builder::TypedBuilder;

use crate::context::MockContext;
use crate::hosts::{HostParams, Ibft2Host, DEFAULT_BLOCK_TIME_SECS, GENESIS_TIMESTAMP};
use crate::testapp::ibc::applications::token::SimpleToken;
use crate::testapp::ibc::core::router::MockRouter;
use crate::testapp::ibc::core::types::MockIbcStore;

pub const DEFAULT_ETH_CHAIN_ID: u64 = 2018;

/// Address of the IBC host contract on every mock chain.
pub const DEFAULT_IBC_HOST_ADDRESS: [u8; 20] = [0x2f; 20];

/// Configuration of a [`MockContext`]. Building it seals the genesis block.
///
/// ```ignore
/// let ctx = MockContextConfig::builder()
///     .chain_id(ChainId::new("ibc1").unwrap())
///     .timeout_policy(TimeoutPolicy::CloseOrderedChannel)
///     .balances(vec![("alice".to_string(), 1_000)])
///     .build();
/// ```
#[derive(Debug, TypedBuilder)]
#[builder(build_method(into = MockContext))]
pub struct MockContextConfig {
    #[builder(default = ChainId::new("ibc0").expect("Never fails"))]
    pub chain_id: ChainId,

    /// Network id signatures of the chain's transactions commit to
    #[builder(default = DEFAULT_ETH_CHAIN_ID)]
    pub eth_chain_id: u64,

    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    pub block_time: Duration,

    #[builder(default = GENESIS_TIMESTAMP)]
    pub genesis_timestamp: Timestamp,

    #[builder(default = 4)]
    pub validator_count: u8,

    #[builder(default = 1)]
    pub validator_seed: u8,

    #[builder(default = DEFAULT_IBC_HOST_ADDRESS.to_vec())]
    pub ibc_host_address: Vec<u8>,

    pub timeout_policy: TimeoutPolicy,

    /// Initial token balances
    #[builder(default)]
    pub balances: Vec<(String, u64)>,
}

impl From<MockContextConfig> for MockContext {
    fn from(params: MockContextConfig) -> Self {
        let host = Ibft2Host::build(
            HostParams::builder()
                .chain_id(params.chain_id)
                .block_time(params.block_time)
                .genesis_timestamp(params.genesis_timestamp)
                .validator_count(params.validator_count)
                .validator_seed(params.validator_seed)
                .build(),
        );

        let ibc_store = MockIbcStore::new(
            params.ibc_host_address.clone(),
            params.timeout_policy,
            host.next_height(),
            host.next_timestamp(),
        )
        .expect("the IBC host address must not be empty");

        let router = MockRouter::new_with_token(SimpleToken::with_balances(params.balances));

        let mut ctx = MockContext::new(
            host,
            ibc_store,
            router,
            params.eth_chain_id,
            params.ibc_host_address,
        );
        ctx.advance_block();
        ctx
    }
}

/// The signing context a relayer uses on `chain_id`. The secret key is 32
/// bytes of `seed`.
pub fn relayer_signing_context(chain_id: &ChainId, eth_chain_id: u64, seed: u8) -> SigningContext {
    let key = SigningKey::from_slice(&[seed; 32]).expect("non-zero seed is a valid key");
    SigningContext::new(chain_id.clone(), eth_chain_id, key)
}

/// The signer of messages submitted outside of the relayer.
pub fn dummy_account_signer() -> Signer {
    Signer::new("0x0000000000000000000000000000000000000001".to_string())
}

#[cfg(test)]
mod tests {
    use ibc_core::client::types::Height;

    use super::*;

    #[test]
    fn genesis_block_is_sealed_on_build() {
        let ctx = MockContextConfig::builder()
            .timeout_policy(TimeoutPolicy::CloseOrderedChannel)
            .build();

        assert_eq!(ctx.latest_height(), Height::new(0, 1).unwrap());
        assert_eq!(ctx.latest_timestamp(), GENESIS_TIMESTAMP);
        assert_eq!(ctx.ibc_store.host_height, Height::new(0, 2).unwrap());
    }

    #[test]
    fn chain_revision_follows_the_chain_id() {
        let ctx = MockContextConfig::builder()
            .chain_id(ChainId::new("ibc-3").unwrap())
            .timeout_policy(TimeoutPolicy::KeepOpen)
            .build();

        assert_eq!(ctx.latest_height(), Height::new(3, 1).unwrap());
    }

    #[test]
    fn signing_contexts_are_deterministic() {
        let chain_id = ChainId::new("ibc0").unwrap();
        let a = relayer_signing_context(&chain_id, DEFAULT_ETH_CHAIN_ID, 7);
        let b = relayer_signing_context(&chain_id, DEFAULT_ETH_CHAIN_ID, 7);

        assert_eq!(a.address(), b.address());
        assert_eq!(a.eth_chain_id(), DEFAULT_ETH_CHAIN_ID);
    }
}
