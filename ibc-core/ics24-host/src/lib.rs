//! Provides the host-facing traits of the IBC core: the read-only
//! [`ValidationContext`] and the writable [`ExecutionContext`] a chain
//! implements on top of its provable store, plus the host policies the
//! handlers consult.
#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(trivial_numeric_casts, unused_import_braces)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub(crate) mod context;
pub use context::*;

/// Re-exports ICS-24 data structures from its corresponding crate.
pub mod types {
    #[doc(inline)]
    pub use ibc_core_host_types::*;
}
