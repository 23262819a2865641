//! Versioned storage and the provable store of an IBC host.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

pub mod config;
pub mod context;
pub mod error;
pub mod impls;
pub mod provable;
pub mod types;

pub use config::ProvableStoreConfig;
pub use context::Store;
pub use error::StoreError;
pub use impls::InMemoryStore;
pub use provable::ProvableStore;
