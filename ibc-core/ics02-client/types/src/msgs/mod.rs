//! Defines the client message types that are sent to the chain by the relayer.

mod create_client;
mod update_client;

pub use create_client::*;
pub use update_client::*;

/// Encodes all the different client messages
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum ClientMsg {
    CreateClient(MsgCreateClient),
    UpdateClient(MsgUpdateClient),
}
