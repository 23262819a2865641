//! Handlers for the channel handshake and the packet lifecycle.
//!
//! Channel handshake steps and the local end they expect:
//!
//! | step          | local end before | local end after | proven counterparty end |
//! |---------------|------------------|-----------------|-------------------------|
//! | open init     | absent           | INIT            | none                    |
//! | open try      | absent           | TRYOPEN         | INIT                    |
//! | open ack      | INIT             | OPEN            | TRYOPEN                 |
//! | open confirm  | TRYOPEN          | OPEN            | OPEN                    |
//! | close init    | not CLOSED       | CLOSED          | none                    |
//! | close confirm | not CLOSED       | CLOSED          | CLOSED                  |

mod acknowledgement;
mod chan_close_confirm;
mod chan_close_init;
mod chan_open_ack;
mod chan_open_confirm;
mod chan_open_init;
mod chan_open_try;
mod recv_packet;
mod send_packet;
mod timeout;

pub use acknowledgement::*;
pub use chan_close_confirm::*;
pub use chan_close_init::*;
pub use chan_open_ack::*;
pub use chan_open_confirm::*;
pub use chan_open_init::*;
pub use chan_open_try::*;
pub use recv_packet::*;
pub use send_packet::*;
pub use timeout::*;

use ibc_core_channel_types::error::ChannelError;
use ibc_core_connection::types::ConnectionEnd;
use ibc_core_host::types::identifiers::ConnectionId;

/// Every handshake step past INIT needs its connection OPEN.
fn verify_connection_open(
    conn_id: &ConnectionId,
    conn_end: &ConnectionEnd,
) -> Result<(), ChannelError> {
    if !conn_end.is_open() {
        return Err(ChannelError::ConnectionNotOpen {
            connection_id: conn_id.clone(),
        });
    }
    Ok(())
}

/// The connection id the counterparty chain uses for the given local
/// connection.
fn counterparty_conn_id<'a>(
    conn_id: &ConnectionId,
    conn_end: &'a ConnectionEnd,
) -> Result<&'a ConnectionId, ChannelError> {
    conn_end
        .counterparty()
        .connection_id()
        .ok_or(ChannelError::MissingConnectionCounterparty {
            connection_id: conn_id.clone(),
        })
}
