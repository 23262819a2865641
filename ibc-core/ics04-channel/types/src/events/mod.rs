//! Types for the IBC events emitted by the channel and packet handlers.
//!
//! The relayer discovers in-flight packets from [`SendPacket`] events and
//! the acknowledgements to return from [`WriteAcknowledgement`] events.

use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_primitives::prelude::*;

use crate::acknowledgement::Acknowledgement;
use crate::channel::Order;
use crate::packet::Packet;
use crate::Version;

/// Channel event types
pub const CHANNEL_OPEN_INIT_EVENT: &str = "channel_open_init";
pub const CHANNEL_OPEN_TRY_EVENT: &str = "channel_open_try";
pub const CHANNEL_OPEN_ACK_EVENT: &str = "channel_open_ack";
pub const CHANNEL_OPEN_CONFIRM_EVENT: &str = "channel_open_confirm";
pub const CHANNEL_CLOSE_INIT_EVENT: &str = "channel_close_init";
pub const CHANNEL_CLOSE_CONFIRM_EVENT: &str = "channel_close_confirm";
pub const CHANNEL_CLOSED_EVENT: &str = "channel_close";

/// Packet event types
pub const SEND_PACKET_EVENT: &str = "send_packet";
pub const RECEIVE_PACKET_EVENT: &str = "recv_packet";
pub const WRITE_ACK_EVENT: &str = "write_acknowledgement";
pub const ACK_PACKET_EVENT: &str = "acknowledge_packet";
pub const TIMEOUT_EVENT: &str = "timeout_packet";

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
struct ChannelAttributes {
    port_id: PortId,
    channel_id: ChannelId,
    counterparty_port_id: PortId,
    counterparty_channel_id: Option<ChannelId>,
    connection_id: ConnectionId,
    version: Version,
}

macro_rules! channel_event {
    ($(#[$doc:meta])* $name:ident, $event_type:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name(ChannelAttributes);

        impl $name {
            pub fn new(
                port_id: PortId,
                chan_id: ChannelId,
                counterparty_port_id: PortId,
                counterparty_chan_id: Option<ChannelId>,
                conn_id: ConnectionId,
                version: Version,
            ) -> Self {
                Self(ChannelAttributes {
                    port_id,
                    channel_id: chan_id,
                    counterparty_port_id,
                    counterparty_channel_id: counterparty_chan_id,
                    connection_id: conn_id,
                    version,
                })
            }

            pub fn port_id(&self) -> &PortId {
                &self.0.port_id
            }

            pub fn chan_id(&self) -> &ChannelId {
                &self.0.channel_id
            }

            pub fn counterparty_port_id(&self) -> &PortId {
                &self.0.counterparty_port_id
            }

            pub fn counterparty_chan_id(&self) -> Option<&ChannelId> {
                self.0.counterparty_channel_id.as_ref()
            }

            pub fn conn_id(&self) -> &ConnectionId {
                &self.0.connection_id
            }

            pub fn version(&self) -> &Version {
                &self.0.version
            }

            pub fn event_type(&self) -> &str {
                $event_type
            }
        }
    };
}

channel_event!(
    /// Emitted when chain A starts a channel handshake.
    OpenInit,
    CHANNEL_OPEN_INIT_EVENT
);
channel_event!(
    /// Emitted when chain B answers a handshake with a proven INIT end.
    OpenTry,
    CHANNEL_OPEN_TRY_EVENT
);
channel_event!(
    /// Emitted when chain A opens its end after seeing B in TRYOPEN.
    OpenAck,
    CHANNEL_OPEN_ACK_EVENT
);
channel_event!(
    /// Emitted when chain B opens its end after seeing A in OPEN.
    OpenConfirm,
    CHANNEL_OPEN_CONFIRM_EVENT
);
channel_event!(
    /// Emitted when a channel end is closed locally.
    CloseInit,
    CHANNEL_CLOSE_INIT_EVENT
);
channel_event!(
    /// Emitted when a channel end is closed after the counterparty closed.
    CloseConfirm,
    CHANNEL_CLOSE_CONFIRM_EVENT
);
channel_event!(
    /// Emitted when an ordered channel is closed by a packet timeout.
    ChannelClosed,
    CHANNEL_CLOSED_EVENT
);

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
struct PacketAttributes {
    packet: Packet,
    channel_ordering: Order,
    connection_id: ConnectionId,
}

macro_rules! packet_event {
    ($(#[$doc:meta])* $name:ident, $event_type:ident) => {
        $(#[$doc])*
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        #[derive(Clone, Debug, PartialEq, Eq)]
        pub struct $name(PacketAttributes);

        impl $name {
            pub fn new(packet: Packet, channel_ordering: Order, conn_id: ConnectionId) -> Self {
                Self(PacketAttributes {
                    packet,
                    channel_ordering,
                    connection_id: conn_id,
                })
            }

            pub fn packet(&self) -> &Packet {
                &self.0.packet
            }

            pub fn channel_ordering(&self) -> &Order {
                &self.0.channel_ordering
            }

            pub fn conn_id(&self) -> &ConnectionId {
                &self.0.connection_id
            }

            pub fn event_type(&self) -> &str {
                $event_type
            }
        }
    };
}

packet_event!(
    /// Emitted when a packet commitment is written on the sending chain.
    SendPacket,
    SEND_PACKET_EVENT
);
packet_event!(
    /// Emitted when the receiving chain accepts a packet.
    ReceivePacket,
    RECEIVE_PACKET_EVENT
);
packet_event!(
    /// Emitted when the sending chain clears a packet on acknowledgement.
    AcknowledgePacket,
    ACK_PACKET_EVENT
);
packet_event!(
    /// Emitted when the sending chain clears a packet on timeout.
    TimeoutPacket,
    TIMEOUT_EVENT
);

/// Emitted when the receiving chain commits an acknowledgement.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteAcknowledgement {
    packet: Packet,
    acknowledgement: Acknowledgement,
    connection_id: ConnectionId,
}

impl WriteAcknowledgement {
    pub fn new(packet: Packet, acknowledgement: Acknowledgement, conn_id: ConnectionId) -> Self {
        Self {
            packet,
            acknowledgement,
            connection_id: conn_id,
        }
    }

    pub fn packet(&self) -> &Packet {
        &self.packet
    }

    pub fn acknowledgement(&self) -> &Acknowledgement {
        &self.acknowledgement
    }

    pub fn conn_id(&self) -> &ConnectionId {
        &self.connection_id
    }

    pub fn event_type(&self) -> &str {
        WRITE_ACK_EVENT
    }
}
