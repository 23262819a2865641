//! Data structures of the Istanbul BFT (IBFT 2.0) light client, which tracks
//! EVM chains finalized by a Hyperledger Besu style validator set.
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

extern crate alloc;

#[cfg(any(test, feature = "std"))]
extern crate std;

use core::str::FromStr;

use ibc_core_host_types::identifiers::ClientType;

mod client_state;
mod consensus_state;
mod header;
mod validator;

pub use client_state::*;
pub use consensus_state::*;
pub use header::*;
pub use validator::*;

pub mod error;
pub mod proto;

pub const IBFT2_CLIENT_TYPE: &str = "hb-ibft2";

/// Returns the IBFT2 `ClientType`
pub fn client_type() -> ClientType {
    ClientType::from_str(IBFT2_CLIENT_TYPE).expect("Never fails because it's valid")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ibft2_client_type_is_valid() {
        assert_eq!(client_type().as_str(), IBFT2_CLIENT_TYPE);
    }
}
