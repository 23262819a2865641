//! Traits an application implements to plug into the IBC handlers, and the
//! router the host uses to find the application bound to a port.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod module;
pub mod router;

/// Re-exports router data structures from the `ibc-core-router-types` crate
pub mod types {
    #[doc(inline)]
    pub use ibc_core_router_types::*;
}
