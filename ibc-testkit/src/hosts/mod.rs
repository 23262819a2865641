//! A simulated IBFT2 chain: a validator set with deterministic keys and the
//! blocks it has sealed.

use core::fmt::{Debug, Formatter};
use core::time::Duration;

use displaydoc::Display;
use ibc_clients::ibft2::types::{Address, ClientState, ConsensusState, Header};
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentRoot;
use ibc_core::commitment_types::merkle::Hash;
use ibc_core::host::types::identifiers::ChainId;
use ibc_primitives::Timestamp;
use k256::ecdsa::SigningKey;
use typed_builder::TypedBuilder;

pub const DEFAULT_BLOCK_TIME_SECS: u64 = 3;

/// 2023-11-14T22:13:20Z
pub const GENESIS_TIMESTAMP: Timestamp = Timestamp::from_nanoseconds(1_700_000_000_000_000_000);

#[derive(Debug, Display)]
pub enum HostError {
    /// no block at height `{height}`
    UnknownBlock { height: Height },
    /// failed to build the light client state: `{description}`
    LightClient { description: String },
}

impl std::error::Error for HostError {}

#[derive(Debug, TypedBuilder)]
pub struct HostParams {
    #[builder(default = ChainId::new("ibc0").expect("Never fails"))]
    pub chain_id: ChainId,
    #[builder(default = Duration::from_secs(DEFAULT_BLOCK_TIME_SECS))]
    pub block_time: Duration,
    #[builder(default = GENESIS_TIMESTAMP)]
    pub genesis_timestamp: Timestamp,
    #[builder(default = 4)]
    pub validator_count: u8,
    /// Secret key of validator `i` is 32 bytes of `validator_seed + i`.
    #[builder(default = 1)]
    pub validator_seed: u8,
}

/// A sealed block: the state root the provable store committed at `height`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HostBlock {
    pub height: Height,
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
}

#[derive(Clone)]
pub struct Ibft2Host {
    chain_id: ChainId,
    block_time: Duration,
    genesis_timestamp: Timestamp,
    validators: Vec<SigningKey>,
    blocks: Vec<HostBlock>,
}

impl Debug for Ibft2Host {
    fn fmt(&self, f: &mut Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Ibft2Host")
            .field("chain_id", &self.chain_id)
            .field("block_time", &self.block_time)
            .field("validators", &self.validator_addresses())
            .field("latest", &self.blocks.last())
            .finish_non_exhaustive()
    }
}

impl Ibft2Host {
    pub fn build(params: HostParams) -> Self {
        let validators = (0..params.validator_count)
            .map(|i| {
                let secret = [params.validator_seed.wrapping_add(i); 32];
                SigningKey::from_slice(&secret).expect("non-zero seed is a valid key")
            })
            .collect();

        Self {
            chain_id: params.chain_id,
            block_time: params.block_time,
            genesis_timestamp: params.genesis_timestamp,
            validators,
            blocks: Vec::new(),
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn block_time(&self) -> Duration {
        self.block_time
    }

    pub fn validator_addresses(&self) -> Vec<Address> {
        self.validators
            .iter()
            .map(|key| Address::from_verifying_key(key.verifying_key()))
            .collect()
    }

    pub fn latest_block(&self) -> Option<&HostBlock> {
        self.blocks.last()
    }

    pub fn block(&self, height: Height) -> Option<&HostBlock> {
        self.blocks.iter().rev().find(|block| block.height == height)
    }

    /// Height of the block under construction.
    pub fn next_height(&self) -> Height {
        match self.latest_block() {
            Some(block) => block.height.increment(),
            None => Height::new(self.chain_id.revision_number(), 1).expect("Never fails"),
        }
    }

    /// Timestamp of the block under construction.
    pub fn next_timestamp(&self) -> Timestamp {
        match self.latest_block() {
            Some(block) => (block.timestamp + self.block_time).expect("Never fails"),
            None => self.genesis_timestamp,
        }
    }

    /// Seals the block under construction with the given state root.
    pub fn push_block(&mut self, root: Hash) -> HostBlock {
        let block = HostBlock {
            height: self.next_height(),
            timestamp: self.next_timestamp(),
            root: CommitmentRoot::from(root),
        };
        self.blocks.push(block.clone());
        block
    }

    /// A header for the block at `target_height`, sealed by every validator
    /// and verifiable against the consensus state at `trusted_height`.
    pub fn header(&self, trusted_height: Height, target_height: Height) -> Result<Header, HostError> {
        let block = self.block_at(target_height)?;
        self.block_at(trusted_height)?;

        Header {
            height: block.height,
            timestamp: block.timestamp,
            root: block.root.clone(),
            validators: self.validator_addresses(),
            seals: Vec::new(),
            trusted_height,
        }
        .sealed_by(&self.validators)
        .map_err(|e| HostError::LightClient {
            description: e.to_string(),
        })
    }

    pub fn consensus_state(&self, height: Height) -> Result<ConsensusState, HostError> {
        let block = self.block_at(height)?;
        ConsensusState::new(
            block.root.clone(),
            block.timestamp,
            self.validator_addresses(),
        )
        .map_err(|e| HostError::LightClient {
            description: e.to_string(),
        })
    }

    /// The client state a counterparty creates to track this chain from
    /// `height` on. Proofs are accepted under `ibc_store_address`.
    pub fn client_state(
        &self,
        ibc_store_address: Vec<u8>,
        height: Height,
    ) -> Result<ClientState, HostError> {
        self.block_at(height)?;
        ClientState::new(self.chain_id.clone(), ibc_store_address, height).map_err(|e| {
            HostError::LightClient {
                description: e.to_string(),
            }
        })
    }

    fn block_at(&self, height: Height) -> Result<&HostBlock, HostError> {
        self.block(height)
            .ok_or(HostError::UnknownBlock { height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Ibft2Host {
        let mut host = Ibft2Host::build(HostParams::builder().build());
        host.push_block([1; 32]);
        host.push_block([2; 32]);
        host
    }

    #[test]
    fn blocks_advance_height_and_time() {
        let host = host();
        let latest = host.latest_block().unwrap();

        assert_eq!(latest.height, Height::new(0, 2).unwrap());
        assert_eq!(
            latest.timestamp,
            (GENESIS_TIMESTAMP + Duration::from_secs(DEFAULT_BLOCK_TIME_SECS)).unwrap()
        );
        assert_eq!(host.next_height(), Height::new(0, 3).unwrap());
    }

    #[test]
    fn headers_are_sealed_by_every_validator() {
        let host = host();
        let header = host
            .header(Height::new(0, 1).unwrap(), Height::new(0, 2).unwrap())
            .unwrap();

        let signers = header.signers().unwrap();
        assert_eq!(signers.len(), 4);
        assert!(host
            .validator_addresses()
            .iter()
            .all(|address| signers.contains(address)));
    }

    #[test]
    fn unknown_heights_are_rejected() {
        let host = host();

        assert!(matches!(
            host.header(Height::new(0, 1).unwrap(), Height::new(0, 9).unwrap()),
            Err(HostError::UnknownBlock { .. })
        ));
        assert!(host.consensus_state(Height::new(0, 9).unwrap()).is_err());
    }
}
