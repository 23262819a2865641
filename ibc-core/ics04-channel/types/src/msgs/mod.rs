//! Message definitions for the channel handshake and packet datagrams.

mod acknowledgement;
mod chan_close_confirm;
mod chan_close_init;
mod chan_open_ack;
mod chan_open_confirm;
mod chan_open_init;
mod chan_open_try;
mod recv_packet;
mod timeout;

pub use acknowledgement::*;
pub use chan_close_confirm::*;
pub use chan_close_init::*;
pub use chan_open_ack::*;
pub use chan_open_confirm::*;
pub use chan_open_init::*;
pub use chan_open_try::*;
use ibc_core_host_types::identifiers::PortId;
pub use recv_packet::*;
pub use timeout::*;

/// All channel messages
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum ChannelMsg {
    OpenInit(MsgChannelOpenInit),
    OpenTry(MsgChannelOpenTry),
    OpenAck(MsgChannelOpenAck),
    OpenConfirm(MsgChannelOpenConfirm),
    CloseInit(MsgChannelCloseInit),
    CloseConfirm(MsgChannelCloseConfirm),
}

/// All packet messages
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum PacketMsg {
    Recv(MsgRecvPacket),
    Ack(MsgAcknowledgement),
    Timeout(MsgTimeout),
}

/// The local port a channel message is addressed to.
pub fn channel_msg_to_port_id(msg: &ChannelMsg) -> &PortId {
    match msg {
        ChannelMsg::OpenInit(msg) => &msg.port_id_on_a,
        ChannelMsg::OpenTry(msg) => &msg.port_id_on_b,
        ChannelMsg::OpenAck(msg) => &msg.port_id_on_a,
        ChannelMsg::OpenConfirm(msg) => &msg.port_id_on_b,
        ChannelMsg::CloseInit(msg) => &msg.port_id_on_a,
        ChannelMsg::CloseConfirm(msg) => &msg.port_id_on_b,
    }
}

/// The local port a packet message is addressed to.
pub fn packet_msg_to_port_id(msg: &PacketMsg) -> &PortId {
    match msg {
        PacketMsg::Recv(msg) => &msg.packet.port_id_on_b,
        PacketMsg::Ack(msg) => &msg.packet.port_id_on_a,
        PacketMsg::Timeout(msg) => &msg.packet.port_id_on_a,
    }
}

#[cfg(test)]
mod tests {
    use ibc_core_client_types::proto::v1::Height as RawHeight;
    use ibc_primitives::prelude::*;
    use ibc_proto::ibc::core::channel::v1::{
        Channel as RawChannel, Counterparty as RawCounterparty,
        MsgChannelCloseConfirm as RawMsgChannelCloseConfirm,
        MsgChannelOpenInit as RawMsgChannelOpenInit, MsgChannelOpenTry as RawMsgChannelOpenTry,
        MsgRecvPacket as RawMsgRecvPacket, MsgTimeout as RawMsgTimeout, Packet as RawPacket,
    };
    use rstest::rstest;

    use super::*;

    fn raw_channel(state: i32, counterparty_channel: &str) -> RawChannel {
        RawChannel {
            state,
            ordering: 1,
            counterparty: Some(RawCounterparty {
                port_id: "transfer".to_string(),
                channel_id: counterparty_channel.to_string(),
            }),
            connection_hops: vec!["connection-0".to_string()],
            version: "ics20-1".to_string(),
            upgrade_sequence: 0,
        }
    }

    fn raw_height(revision_height: u64) -> Option<RawHeight> {
        Some(RawHeight {
            revision_number: 0,
            revision_height,
        })
    }

    fn raw_packet() -> RawPacket {
        RawPacket {
            sequence: 3,
            source_port: "transfer".to_string(),
            source_channel: "channel-0".to_string(),
            destination_port: "transfer".to_string(),
            destination_channel: "channel-0".to_string(),
            data: vec![1, 2, 3],
            timeout_height: raw_height(50),
            timeout_timestamp: 0,
        }
    }

    #[rstest]
    #[case::init_without_counterparty_channel(1, "", true)]
    #[case::counterparty_channel_already_set(1, "channel-4", false)]
    #[case::wrong_state(2, "", false)]
    fn chan_open_init_from_raw(
        #[case] state: i32,
        #[case] counterparty_channel: &str,
        #[case] want_pass: bool,
    ) {
        let raw = RawMsgChannelOpenInit {
            port_id: "transfer".to_string(),
            channel: Some(raw_channel(state, counterparty_channel)),
            signer: "relayer".to_string(),
        };
        assert_eq!(MsgChannelOpenInit::try_from(raw).is_ok(), want_pass);
    }

    #[allow(deprecated)]
    fn raw_open_try() -> RawMsgChannelOpenTry {
        RawMsgChannelOpenTry {
            port_id: "transfer".to_string(),
            previous_channel_id: String::new(),
            channel: Some(raw_channel(2, "channel-0")),
            counterparty_version: "ics20-1".to_string(),
            proof_init: vec![1],
            proof_height: raw_height(10),
            signer: "relayer".to_string(),
        }
    }

    #[test]
    fn chan_open_try_needs_proof_and_counterparty_channel() {
        let msg = MsgChannelOpenTry::try_from(raw_open_try()).unwrap();
        assert_eq!(msg.chan_id_on_a.as_str(), "channel-0");
        assert_eq!(channel_msg_to_port_id(&msg.into()).as_str(), "transfer");

        assert!(MsgChannelOpenTry::try_from(RawMsgChannelOpenTry {
            proof_init: vec![],
            ..raw_open_try()
        })
        .is_err());
        assert!(MsgChannelOpenTry::try_from(RawMsgChannelOpenTry {
            proof_height: None,
            ..raw_open_try()
        })
        .is_err());
        assert!(MsgChannelOpenTry::try_from(RawMsgChannelOpenTry {
            channel: Some(raw_channel(2, "")),
            ..raw_open_try()
        })
        .is_err());
    }

    #[test]
    fn close_confirm_rejects_upgrades() {
        let raw = RawMsgChannelCloseConfirm {
            port_id: "transfer".to_string(),
            channel_id: "channel-0".to_string(),
            proof_init: vec![1],
            proof_height: raw_height(10),
            signer: "relayer".to_string(),
            counterparty_upgrade_sequence: 2,
        };
        assert!(MsgChannelCloseConfirm::try_from(raw).is_err());
    }

    #[test]
    fn packet_msgs_from_raw() {
        let recv = MsgRecvPacket::try_from(RawMsgRecvPacket {
            packet: Some(raw_packet()),
            proof_commitment: vec![1],
            proof_height: raw_height(20),
            signer: "relayer".to_string(),
        })
        .unwrap();
        assert_eq!(recv.proof_height_on_a.revision_height(), 20);

        let timeout = MsgTimeout::try_from(RawMsgTimeout {
            packet: Some(raw_packet()),
            proof_unreceived: vec![1],
            proof_height: raw_height(60),
            next_sequence_recv: 3,
            signer: "relayer".to_string(),
        })
        .unwrap();
        assert_eq!(timeout.next_seq_recv_on_b.value(), 3);

        assert!(MsgRecvPacket::try_from(RawMsgRecvPacket {
            packet: None,
            proof_commitment: vec![1],
            proof_height: raw_height(20),
            signer: "relayer".to_string(),
        })
        .is_err());
    }
}
