//! Exports the IBC light client implementations and the sum types that let a
//! host hold any of them behind a single client state type.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(any(test, feature = "std"))]
extern crate std;

mod client_state;
mod consensus_state;

pub use client_state::AnyClientState;
pub use consensus_state::AnyConsensusState;

/// Re-exports the implementation of the IBFT2 light client.
pub mod ibft2 {
    #[doc(inline)]
    pub use ibc_client_ibft2::*;
}
