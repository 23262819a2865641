//! Relays IBC handshakes and packets between two chains.
//!
//! A [`RelayCoordinator`] holds no protocol state of its own. It reads from
//! the source chain, obtains a proof at a height the destination's light
//! client already accepted and submits the matching message, all through
//! [`ChainHandle`]s that forward requests to per-chain runtimes.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

pub mod chain;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod handle;
pub mod retry;
pub mod signer;

pub use chain::{Chain, ChainStatus, ClientInit, ProvenValue, TxResponse};
pub use config::{ChainConfig, RelayerConfig};
pub use coordinator::{
    ChannelPair, ClientPair, ConnectionPair, Delivery, PacketOutcome, RelayCoordinator, RelayTask,
    Side,
};
pub use error::RelayerError;
pub use handle::{spawn_chain_runtime, ChainHandle};
pub use retry::RetryPolicy;
pub use signer::{SignedTx, SigningContext};
