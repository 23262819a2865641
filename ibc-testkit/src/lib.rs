//! Mock IBFT2 chains for testing the IBC handlers and the relayer.
//!
//! A [`MockContext`](context::MockContext) is one chain: a provable store,
//! a validator set sealing its blocks and a router holding a token
//! application. [`MockChain`](relayer::MockChain) exposes a context to the
//! relay coordinator.
#![forbid(unsafe_code)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![deny(
    warnings,
    trivial_numeric_casts,
    unused_import_braces,
    unused_qualifications,
    rust_2018_idioms
)]

pub mod context;
pub mod fixtures;
pub mod hosts;
pub mod relayer;
pub mod testapp;
