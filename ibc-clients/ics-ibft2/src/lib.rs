//! IBFT2 light client implementation along with re-exporting the necessary
//! types from the `ibc-client-ibft2-types` crate.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(any(test, feature = "std"))]
extern crate std;

pub mod client_state;
pub mod consensus_state;

pub use ibc_client_ibft2_types::IBFT2_CLIENT_TYPE;

/// Re-exports IBFT2 light client data structures from the
/// `ibc-client-ibft2-types` crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_client_ibft2_types::*;
}
