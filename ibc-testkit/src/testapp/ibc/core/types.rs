//! The IBC state of a mock chain.

use ibc_core::client::types::error::ClientError;
use ibc_core::client::types::Height;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::TimeoutPolicy;
use ibc_primitives::{Signer, Timestamp};
use ibc_store::{InMemoryStore, ProvableStore, ProvableStoreConfig, StoreError};

pub type MockStore = ProvableStore<InMemoryStore>;

/// Everything the IBC handlers read and write on one chain.
///
/// Protocol objects live in the provable store. Counters, events and logs
/// are host bookkeeping and are not committed.
#[derive(Clone, Debug)]
pub struct MockIbcStore {
    pub store: MockStore,

    /// Height of the block under construction
    pub host_height: Height,

    /// Timestamp of the block under construction
    pub host_timestamp: Timestamp,

    pub client_counter: u64,
    pub connection_counter: u64,
    pub channel_counter: u64,

    pub timeout_policy: TimeoutPolicy,

    /// Address that signed the transaction being delivered. Messages must
    /// name it as their signer.
    pub tx_signer: Option<Signer>,

    /// Emitted IBC events in order
    pub events: Vec<IbcEvent>,

    /// Logs of the IBC handlers
    pub logs: Vec<String>,
}

impl MockIbcStore {
    pub fn new(
        ibc_host_address: Vec<u8>,
        timeout_policy: TimeoutPolicy,
        host_height: Height,
        host_timestamp: Timestamp,
    ) -> Result<Self, StoreError> {
        let store = ProvableStore::new(
            InMemoryStore::default(),
            ProvableStoreConfig::builder()
                .ibc_host_address(ibc_host_address)
                .build(),
        )?;

        Ok(Self {
            store,
            host_height,
            host_timestamp,
            client_counter: 0,
            connection_counter: 0,
            channel_counter: 0,
            timeout_policy,
            tx_signer: None,
            events: Vec::new(),
            logs: Vec::new(),
        })
    }
}

/// Store failures surface to the handlers as host errors, except a rewritten
/// consensus height, which clients report as `DuplicateHeight`.
pub(crate) fn store_error(e: StoreError) -> ContextError {
    match e {
        StoreError::DuplicateHeight { client_id, height } => {
            ClientError::DuplicateHeight { client_id, height }.into()
        }
        e => ContextError::HostError {
            description: e.to_string(),
        },
    }
}
