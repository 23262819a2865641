//! ICS-04: Channel and packet semantics. Handlers for the channel handshake
//! and for the packet lifecycle, along with re-exporting data structures from
//! the `ibc-core-channel-types` crate.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

#[cfg(feature = "std")]
extern crate std;

pub mod context;
pub mod handler;

/// Re-exports ICS-04 data structures from the `ibc-core-channel-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_core_channel_types::*;
}
