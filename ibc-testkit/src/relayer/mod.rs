//! Relayer bindings for mock chains.

pub mod chain;
pub mod context;

pub use chain::MockChain;
pub use context::RelayerContext;
