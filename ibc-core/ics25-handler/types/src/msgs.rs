use ibc_core_channel_types::msgs::{
    ChannelMsg, MsgAcknowledgement, MsgChannelCloseConfirm, MsgChannelCloseInit, MsgChannelOpenAck,
    MsgChannelOpenConfirm, MsgChannelOpenInit, MsgChannelOpenTry, MsgRecvPacket, MsgTimeout,
    PacketMsg, ACKNOWLEDGEMENT_TYPE_URL, CHAN_CLOSE_CONFIRM_TYPE_URL, CHAN_CLOSE_INIT_TYPE_URL,
    CHAN_OPEN_ACK_TYPE_URL, CHAN_OPEN_CONFIRM_TYPE_URL, CHAN_OPEN_INIT_TYPE_URL,
    CHAN_OPEN_TRY_TYPE_URL, RECV_PACKET_TYPE_URL, TIMEOUT_TYPE_URL,
};
use ibc_core_client_types::msgs::{
    ClientMsg, MsgCreateClient, MsgUpdateClient, CREATE_CLIENT_TYPE_URL, UPDATE_CLIENT_TYPE_URL,
};
use ibc_core_connection_types::msgs::{
    ConnectionMsg, MsgConnectionOpenAck, MsgConnectionOpenConfirm, MsgConnectionOpenInit,
    MsgConnectionOpenTry, CONN_OPEN_ACK_TYPE_URL, CONN_OPEN_CONFIRM_TYPE_URL,
    CONN_OPEN_INIT_TYPE_URL, CONN_OPEN_TRY_TYPE_URL,
};
use ibc_core_router_types::error::RouterError;
use ibc_primitives::prelude::*;
use ibc_proto::google::protobuf::Any;
use ibc_proto::Protobuf;

/// Enumeration of all messages that the handler entrypoint is capable of routing.
#[derive(Clone, Debug, PartialEq, Eq, derive_more::From)]
pub enum MsgEnvelope {
    Client(ClientMsg),
    Connection(ConnectionMsg),
    Channel(ChannelMsg),
    Packet(PacketMsg),
}

macro_rules! decode {
    ($msg:ty, $bytes:expr) => {
        <$msg>::decode_vec($bytes).map_err(|e| RouterError::MalformedMessageBytes {
            reason: e.to_string(),
        })
    };
}

impl TryFrom<Any> for MsgEnvelope {
    type Error = RouterError;

    fn try_from(any_msg: Any) -> Result<Self, Self::Error> {
        let value = any_msg.value.as_slice();
        let envelope: MsgEnvelope = match any_msg.type_url.as_str() {
            // ICS02
            CREATE_CLIENT_TYPE_URL => ClientMsg::CreateClient(decode!(MsgCreateClient, value)?).into(),
            UPDATE_CLIENT_TYPE_URL => ClientMsg::UpdateClient(decode!(MsgUpdateClient, value)?).into(),

            // ICS03
            CONN_OPEN_INIT_TYPE_URL => {
                ConnectionMsg::OpenInit(decode!(MsgConnectionOpenInit, value)?).into()
            }
            CONN_OPEN_TRY_TYPE_URL => {
                ConnectionMsg::OpenTry(decode!(MsgConnectionOpenTry, value)?).into()
            }
            CONN_OPEN_ACK_TYPE_URL => {
                ConnectionMsg::OpenAck(decode!(MsgConnectionOpenAck, value)?).into()
            }
            CONN_OPEN_CONFIRM_TYPE_URL => {
                ConnectionMsg::OpenConfirm(decode!(MsgConnectionOpenConfirm, value)?).into()
            }

            // ICS04 channel messages
            CHAN_OPEN_INIT_TYPE_URL => {
                ChannelMsg::OpenInit(decode!(MsgChannelOpenInit, value)?).into()
            }
            CHAN_OPEN_TRY_TYPE_URL => ChannelMsg::OpenTry(decode!(MsgChannelOpenTry, value)?).into(),
            CHAN_OPEN_ACK_TYPE_URL => ChannelMsg::OpenAck(decode!(MsgChannelOpenAck, value)?).into(),
            CHAN_OPEN_CONFIRM_TYPE_URL => {
                ChannelMsg::OpenConfirm(decode!(MsgChannelOpenConfirm, value)?).into()
            }
            CHAN_CLOSE_INIT_TYPE_URL => {
                ChannelMsg::CloseInit(decode!(MsgChannelCloseInit, value)?).into()
            }
            CHAN_CLOSE_CONFIRM_TYPE_URL => {
                ChannelMsg::CloseConfirm(decode!(MsgChannelCloseConfirm, value)?).into()
            }

            // ICS04 packet messages
            RECV_PACKET_TYPE_URL => PacketMsg::Recv(decode!(MsgRecvPacket, value)?).into(),
            ACKNOWLEDGEMENT_TYPE_URL => PacketMsg::Ack(decode!(MsgAcknowledgement, value)?).into(),
            TIMEOUT_TYPE_URL => PacketMsg::Timeout(decode!(MsgTimeout, value)?).into(),

            _ => {
                return Err(RouterError::UnknownMessageTypeUrl {
                    url: any_msg.type_url,
                })
            }
        };
        Ok(envelope)
    }
}

/// Packs a domain message into an `Any` under its type URL.
pub trait ToAny {
    fn to_any(self) -> Any;
}

macro_rules! impl_to_any {
    ($($msg:ty => $url:ident),* $(,)?) => {
        $(
            impl ToAny for $msg {
                fn to_any(self) -> Any {
                    Any {
                        type_url: $url.to_string(),
                        value: <$msg as Protobuf<_>>::encode_vec(self),
                    }
                }
            }
        )*
    };
}

impl_to_any!(
    MsgCreateClient => CREATE_CLIENT_TYPE_URL,
    MsgUpdateClient => UPDATE_CLIENT_TYPE_URL,
    MsgConnectionOpenInit => CONN_OPEN_INIT_TYPE_URL,
    MsgConnectionOpenTry => CONN_OPEN_TRY_TYPE_URL,
    MsgConnectionOpenAck => CONN_OPEN_ACK_TYPE_URL,
    MsgConnectionOpenConfirm => CONN_OPEN_CONFIRM_TYPE_URL,
    MsgChannelOpenInit => CHAN_OPEN_INIT_TYPE_URL,
    MsgChannelOpenTry => CHAN_OPEN_TRY_TYPE_URL,
    MsgChannelOpenAck => CHAN_OPEN_ACK_TYPE_URL,
    MsgChannelOpenConfirm => CHAN_OPEN_CONFIRM_TYPE_URL,
    MsgChannelCloseInit => CHAN_CLOSE_INIT_TYPE_URL,
    MsgChannelCloseConfirm => CHAN_CLOSE_CONFIRM_TYPE_URL,
    MsgRecvPacket => RECV_PACKET_TYPE_URL,
    MsgAcknowledgement => ACKNOWLEDGEMENT_TYPE_URL,
    MsgTimeout => TIMEOUT_TYPE_URL,
);

#[cfg(test)]
mod tests {
    use ibc_core_channel_types::msgs::MsgChannelCloseInit;
    use ibc_core_host_types::identifiers::{ChannelId, PortId};
    use ibc_primitives::Signer;

    use super::*;

    #[test]
    fn envelope_from_any() {
        let msg = MsgChannelCloseInit {
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: ChannelId::new(2),
            signer: Signer::from("relayer".to_string()),
        };
        let envelope = MsgEnvelope::try_from(msg.clone().to_any()).unwrap();
        assert_eq!(envelope, MsgEnvelope::Channel(ChannelMsg::CloseInit(msg)));
    }

    #[test]
    fn unknown_and_malformed_messages() {
        let unknown = Any {
            type_url: "/ibc.core.channel.v1.MsgTimeoutOnClose".to_string(),
            value: vec![],
        };
        assert!(matches!(
            MsgEnvelope::try_from(unknown),
            Err(RouterError::UnknownMessageTypeUrl { .. })
        ));

        let malformed = Any {
            type_url: RECV_PACKET_TYPE_URL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };
        assert!(matches!(
            MsgEnvelope::try_from(malformed),
            Err(RouterError::MalformedMessageBytes { .. })
        ));
    }
}
