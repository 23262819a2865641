//! Defines the packet type
use core::fmt::{Debug, Display, Error as FmtError, Formatter};

use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::{ChannelId, PortId, Sequence};
use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;
use ibc_proto::ibc::core::channel::v1::Packet as RawPacket;
use ibc_proto::Protobuf;

use crate::error::PacketError;
use crate::timeout::{TimeoutHeight, TimeoutTimestamp};

/// Marker stored for every packet received over an unordered channel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Receipt {
    Ok,
}

impl Receipt {
    /// The byte stored under a receipt path.
    pub const OK_BYTE: u8 = 1;

    pub fn as_bytes(&self) -> Vec<u8> {
        vec![Self::OK_BYTE]
    }
}

/// The packet type; this is what applications send to one another.
///
/// Each application defines the structure of the `data` field. Only the
/// commitment of a packet is stored, never the packet itself.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Hash, PartialEq, Eq)]
pub struct Packet {
    pub seq_on_a: Sequence,
    pub port_id_on_a: PortId,
    pub chan_id_on_a: ChannelId,
    pub port_id_on_b: PortId,
    pub chan_id_on_b: ChannelId,
    pub data: Vec<u8>,
    pub timeout_height_on_b: TimeoutHeight,
    pub timeout_timestamp_on_b: TimeoutTimestamp,
}

impl Debug for Packet {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> Result<(), FmtError> {
        formatter
            .debug_struct("Packet")
            .field("sequence", &self.seq_on_a)
            .field("source_port", &self.port_id_on_a)
            .field("source_channel", &self.chan_id_on_a)
            .field("destination_port", &self.port_id_on_b)
            .field("destination_channel", &self.chan_id_on_b)
            .field("data_len", &self.data.len())
            .field("timeout_height", &self.timeout_height_on_b)
            .field("timeout_timestamp", &self.timeout_timestamp_on_b)
            .finish()
    }
}

/// Omits the packet data
impl Display for Packet {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "seq:{}, path:{}/{}->{}/{}, toh:{}, tos:{}",
            self.seq_on_a,
            self.port_id_on_a,
            self.chan_id_on_a,
            self.port_id_on_b,
            self.chan_id_on_b,
            self.timeout_height_on_b,
            self.timeout_timestamp_on_b
        )
    }
}

impl Packet {
    /// Checks whether the packet has timed out relative to the given state of
    /// the destination chain. A timed-out packet can no longer be received;
    /// it must be timed out on the source instead.
    pub fn timed_out(&self, dst_chain_ts: &Timestamp, dst_chain_height: Height) -> bool {
        self.timeout_height_on_b.has_expired(dst_chain_height)
            || self.timeout_timestamp_on_b.has_expired(dst_chain_ts)
    }
}

impl Protobuf<RawPacket> for Packet {}

impl TryFrom<RawPacket> for Packet {
    type Error = PacketError;

    fn try_from(raw_pkt: RawPacket) -> Result<Self, Self::Error> {
        if Sequence::from(raw_pkt.sequence).is_zero() {
            return Err(PacketError::ZeroPacketSequence);
        }

        if raw_pkt.data.is_empty() {
            return Err(PacketError::ZeroPacketData);
        }

        let timeout_height_on_b: TimeoutHeight = raw_pkt.timeout_height.try_into()?;
        let timeout_timestamp_on_b = TimeoutTimestamp::from_nanoseconds(raw_pkt.timeout_timestamp);

        if !timeout_height_on_b.is_set() && !timeout_timestamp_on_b.is_set() {
            return Err(PacketError::MissingTimeout);
        }

        Ok(Packet {
            seq_on_a: Sequence::from(raw_pkt.sequence),
            port_id_on_a: raw_pkt.source_port.parse()?,
            chan_id_on_a: raw_pkt.source_channel.parse()?,
            port_id_on_b: raw_pkt.destination_port.parse()?,
            chan_id_on_b: raw_pkt.destination_channel.parse()?,
            data: raw_pkt.data,
            timeout_height_on_b,
            timeout_timestamp_on_b,
        })
    }
}

impl From<Packet> for RawPacket {
    fn from(packet: Packet) -> Self {
        RawPacket {
            sequence: packet.seq_on_a.value(),
            source_port: packet.port_id_on_a.to_string(),
            source_channel: packet.chan_id_on_a.to_string(),
            destination_port: packet.port_id_on_b.to_string(),
            destination_channel: packet.chan_id_on_b.to_string(),
            data: packet.data,
            timeout_height: packet.timeout_height_on_b.into(),
            timeout_timestamp: packet.timeout_timestamp_on_b.nanoseconds(),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_core_client_types::proto::v1::Height as RawHeight;
    use rstest::rstest;

    use super::*;

    fn raw_packet() -> RawPacket {
        RawPacket {
            sequence: 1,
            source_port: "transfer".to_string(),
            source_channel: "channel-0".to_string(),
            destination_port: "transfer".to_string(),
            destination_channel: "channel-1".to_string(),
            data: b"{\"amount\":100}".to_vec(),
            timeout_height: Some(RawHeight {
                revision_number: 0,
                revision_height: 100,
            }),
            timeout_timestamp: 0,
        }
    }

    #[test]
    fn packet_from_raw() {
        let packet = Packet::try_from(raw_packet()).unwrap();
        assert_eq!(packet.seq_on_a, Sequence::from(1));
        assert_eq!(packet.chan_id_on_b, ChannelId::new(1));
        assert!(!packet.timeout_timestamp_on_b.is_set());
    }

    #[rstest]
    #[case::zero_sequence(RawPacket { sequence: 0, ..raw_packet() })]
    #[case::empty_data(RawPacket { data: vec![], ..raw_packet() })]
    #[case::no_timeout(RawPacket { timeout_height: None, timeout_timestamp: 0, ..raw_packet() })]
    #[case::bad_port(RawPacket { source_port: "/".to_string(), ..raw_packet() })]
    fn invalid_packet(#[case] raw: RawPacket) {
        assert!(Packet::try_from(raw).is_err());
    }

    #[test]
    fn packet_timed_out_by_height_or_time() {
        let mut packet = Packet::try_from(raw_packet()).unwrap();
        let now = Timestamp::from_nanoseconds(5_000);

        assert!(!packet.timed_out(&now, Height::new(0, 99).unwrap()));
        assert!(packet.timed_out(&now, Height::new(0, 100).unwrap()));

        packet.timeout_height_on_b = TimeoutHeight::Never;
        packet.timeout_timestamp_on_b = TimeoutTimestamp::from_nanoseconds(5_000);
        assert!(packet.timed_out(&now, Height::new(0, 1).unwrap()));
        assert!(!packet.timed_out(
            &Timestamp::from_nanoseconds(4_999),
            Height::new(0, 1).unwrap()
        ));
    }
}
