//! Message definitions for the connection handshake datagrams.
//!
//! Each of the four handshake steps has its own message. The counterparty
//! fields (client id, connection id and prefix) travel together as a
//! [`Counterparty`](crate::Counterparty). Proofs are opaque
//! `CommitmentProofBytes` checked by the light client tracking the sender.

mod conn_open_ack;
mod conn_open_confirm;
mod conn_open_init;
mod conn_open_try;

pub use conn_open_ack::*;
pub use conn_open_confirm::*;
pub use conn_open_init::*;
pub use conn_open_try::*;

/// Enumeration of all possible messages that the ICS3 protocol processes.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum ConnectionMsg {
    OpenInit(MsgConnectionOpenInit),
    OpenTry(MsgConnectionOpenTry),
    OpenAck(MsgConnectionOpenAck),
    OpenConfirm(MsgConnectionOpenConfirm),
}
