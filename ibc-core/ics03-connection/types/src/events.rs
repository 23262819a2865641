//! Types for the IBC events emitted by the connection handshake handlers.

use ibc_core_host_types::identifiers::{ClientId, ConnectionId};
use ibc_primitives::prelude::*;

/// Connection event types
pub const CONNECTION_OPEN_INIT_EVENT: &str = "connection_open_init";
pub const CONNECTION_OPEN_TRY_EVENT: &str = "connection_open_try";
pub const CONNECTION_OPEN_ACK_EVENT: &str = "connection_open_ack";
pub const CONNECTION_OPEN_CONFIRM_EVENT: &str = "connection_open_confirm";

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
struct Attributes {
    connection_id: ConnectionId,
    client_id: ClientId,
    counterparty_connection_id: Option<ConnectionId>,
    counterparty_client_id: ClientId,
}

macro_rules! connection_event {
    ($(#[$doc:meta])* $name:ident, $event_type:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name(Attributes);

        impl $name {
            pub fn new(
                conn_id: ConnectionId,
                client_id: ClientId,
                counterparty_conn_id: Option<ConnectionId>,
                counterparty_client_id: ClientId,
            ) -> Self {
                Self(Attributes {
                    connection_id: conn_id,
                    client_id,
                    counterparty_connection_id: counterparty_conn_id,
                    counterparty_client_id,
                })
            }

            pub fn conn_id(&self) -> &ConnectionId {
                &self.0.connection_id
            }

            pub fn client_id(&self) -> &ClientId {
                &self.0.client_id
            }

            pub fn counterparty_conn_id(&self) -> Option<&ConnectionId> {
                self.0.counterparty_connection_id.as_ref()
            }

            pub fn counterparty_client_id(&self) -> &ClientId {
                &self.0.counterparty_client_id
            }

            pub fn event_type(&self) -> &str {
                $event_type
            }
        }
    };
}

connection_event!(
    /// Emitted when chain A starts a connection handshake.
    OpenInit,
    CONNECTION_OPEN_INIT_EVENT
);
connection_event!(
    /// Emitted when chain B answers a handshake with a proven INIT end.
    OpenTry,
    CONNECTION_OPEN_TRY_EVENT
);
connection_event!(
    /// Emitted when chain A opens its end after seeing B in TRYOPEN.
    OpenAck,
    CONNECTION_OPEN_ACK_EVENT
);
connection_event!(
    /// Emitted when chain B opens its end after seeing A in OPEN.
    OpenConfirm,
    CONNECTION_OPEN_CONFIRM_EVENT
);
