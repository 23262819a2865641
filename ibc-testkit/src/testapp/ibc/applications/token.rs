//! A minimal fungible token moved across channels by escrow-free
//! debit and credit: the sender is debited when a packet is sent and the
//! receiver credited when it is received. Failed deliveries are refunded.

use std::collections::BTreeMap;

use displaydoc::Display;
use ibc_core::channel::types::acknowledgement::{
    Acknowledgement, AcknowledgementStatus, StatusValue,
};
use ibc_core::channel::types::channel::{Counterparty, Order};
use ibc_core::channel::types::error::{ChannelError, PacketError};
use ibc_core::channel::types::packet::Packet;
use ibc_core::channel::types::Version;
use ibc_core::host::types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_core::router::module::Module;
use ibc_core::router::types::event::ModuleEvent;
use ibc_core::router::types::module::{ModuleExtras, ModuleId};
use ibc_primitives::Signer;
use serde::{Deserialize, Serialize};

pub const TOKEN_MODULE_ID: &str = "simple-token";
pub const TOKEN_VERSION: &str = "simple-token-1";

pub fn token_module_id() -> ModuleId {
    ModuleId::new(TOKEN_MODULE_ID)
}

pub fn token_version() -> Version {
    Version::new(TOKEN_VERSION)
}

#[derive(Debug, Display, PartialEq, Eq)]
pub enum TokenError {
    /// account `{account}` holds `{balance}`, cannot debit `{amount}`
    InsufficientBalance {
        account: String,
        balance: u64,
        amount: u64,
    },
    /// crediting `{amount}` overflows the balance of `{account}`
    BalanceOverflow { account: String, amount: u64 },
    /// invalid packet data: `{description}`
    InvalidPacketData { description: String },
}

impl std::error::Error for TokenError {}

impl From<TokenError> for PacketError {
    fn from(e: TokenError) -> Self {
        PacketError::AppModule {
            description: e.to_string(),
        }
    }
}

/// The payload of a token packet, JSON encoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPacketData {
    pub sender: String,
    pub receiver: String,
    pub amount: u64,
}

impl TokenPacketData {
    pub fn encode(&self) -> Result<Vec<u8>, TokenError> {
        serde_json::to_vec(self).map_err(|e| TokenError::InvalidPacketData {
            description: e.to_string(),
        })
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, TokenError> {
        serde_json::from_slice(bytes).map_err(|e| TokenError::InvalidPacketData {
            description: e.to_string(),
        })
    }
}

#[derive(Clone, Debug, Default)]
pub struct SimpleToken {
    balances: BTreeMap<String, u64>,
}

impl SimpleToken {
    pub fn with_balances(balances: impl IntoIterator<Item = (String, u64)>) -> Self {
        Self {
            balances: balances.into_iter().collect(),
        }
    }

    pub fn balance_of(&self, account: &str) -> u64 {
        self.balances.get(account).copied().unwrap_or_default()
    }

    pub fn mint(&mut self, account: &str, amount: u64) -> Result<(), TokenError> {
        self.credit(account, amount)
    }

    pub fn debit(&mut self, account: &str, amount: u64) -> Result<(), TokenError> {
        let balance = self.balance_of(account);
        let remaining = balance
            .checked_sub(amount)
            .ok_or_else(|| TokenError::InsufficientBalance {
                account: account.to_string(),
                balance,
                amount,
            })?;
        self.balances.insert(account.to_string(), remaining);
        Ok(())
    }

    pub fn credit(&mut self, account: &str, amount: u64) -> Result<(), TokenError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| TokenError::BalanceOverflow {
                account: account.to_string(),
                amount,
            })?;
        self.balances.insert(account.to_string(), balance);
        Ok(())
    }

    fn refund(&mut self, packet: &Packet) -> Result<ModuleExtras, PacketError> {
        let data = TokenPacketData::decode(&packet.data)?;
        self.credit(&data.sender, data.amount)?;

        Ok(ModuleExtras {
            events: vec![token_event("refund", &data)],
            log: vec![format!(
                "refunded {} to {} for packet {}",
                data.amount, data.sender, packet.seq_on_a
            )],
        })
    }
}

fn token_event(kind: &str, data: &TokenPacketData) -> ModuleEvent {
    ModuleEvent {
        kind: kind.to_string(),
        attributes: vec![
            ("sender", &data.sender).into(),
            ("receiver", &data.receiver).into(),
            ("amount", data.amount).into(),
        ],
    }
}

fn verify_version(version: &Version) -> Result<(), ChannelError> {
    if version != &token_version() {
        return Err(ChannelError::VersionNotSupported {
            expected: token_version(),
            actual: version.clone(),
        });
    }
    Ok(())
}

/// An empty proposal picks the token version.
fn proposed_version(version: &Version) -> Result<Version, ChannelError> {
    if version.is_empty() {
        return Ok(token_version());
    }
    verify_version(version)?;
    Ok(version.clone())
}

fn status(value: &str) -> StatusValue {
    StatusValue::new(value).expect("status is never empty")
}

impl Module for SimpleToken {
    fn on_chan_open_init_validate(
        &self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &Version,
    ) -> Result<Version, ChannelError> {
        proposed_version(version)
    }

    fn on_chan_open_init_execute(
        &mut self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        version: &Version,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        Ok((ModuleExtras::empty(), proposed_version(version)?))
    }

    fn on_chan_open_try_validate(
        &self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<Version, ChannelError> {
        verify_version(counterparty_version)?;
        Ok(counterparty_version.clone())
    }

    fn on_chan_open_try_execute(
        &mut self,
        _order: Order,
        _connection_hops: &[ConnectionId],
        _port_id: &PortId,
        _channel_id: &ChannelId,
        _counterparty: &Counterparty,
        counterparty_version: &Version,
    ) -> Result<(ModuleExtras, Version), ChannelError> {
        verify_version(counterparty_version)?;
        Ok((ModuleExtras::empty(), counterparty_version.clone()))
    }

    fn on_chan_open_ack_validate(
        &self,
        _port_id: &PortId,
        _channel_id: &ChannelId,
        counterparty_version: &Version,
    ) -> Result<(), ChannelError> {
        verify_version(counterparty_version)
    }

    fn on_recv_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Acknowledgement) {
        let data = match TokenPacketData::decode(&packet.data) {
            Ok(data) => data,
            Err(e) => {
                let ack = AcknowledgementStatus::error(status(&e.to_string()));
                return (ModuleExtras::empty(), ack.into());
            }
        };

        match self.credit(&data.receiver, data.amount) {
            Ok(()) => {
                let extras = ModuleExtras {
                    events: vec![token_event("recv", &data)],
                    log: vec![format!("credited {} to {}", data.amount, data.receiver)],
                };
                (extras, AcknowledgementStatus::success(status("AQ==")).into())
            }
            Err(e) => (
                ModuleExtras::empty(),
                AcknowledgementStatus::error(status(&e.to_string())).into(),
            ),
        }
    }

    fn on_acknowledgement_packet_validate(
        &self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        TokenPacketData::decode(&packet.data)?;
        AcknowledgementStatus::from_ack(acknowledgement)
            .map(|_| ())
            .ok_or(PacketError::InvalidAcknowledgement)
    }

    fn on_acknowledgement_packet_execute(
        &mut self,
        packet: &Packet,
        acknowledgement: &Acknowledgement,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        match AcknowledgementStatus::from_ack(acknowledgement) {
            Some(ack) if ack.is_successful() => (ModuleExtras::empty(), Ok(())),
            Some(_) => match self.refund(packet) {
                Ok(extras) => (extras, Ok(())),
                Err(e) => (ModuleExtras::empty(), Err(e)),
            },
            None => (
                ModuleExtras::empty(),
                Err(PacketError::InvalidAcknowledgement),
            ),
        }
    }

    fn on_timeout_packet_validate(
        &self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> Result<(), PacketError> {
        TokenPacketData::decode(&packet.data)?;
        Ok(())
    }

    fn on_timeout_packet_execute(
        &mut self,
        packet: &Packet,
        _relayer: &Signer,
    ) -> (ModuleExtras, Result<(), PacketError>) {
        match self.refund(packet) {
            Ok(extras) => (extras, Ok(())),
            Err(e) => (ModuleExtras::empty(), Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
    use ibc_core::host::types::identifiers::Sequence;
    use rstest::rstest;

    use super::*;

    fn packet(data: Vec<u8>) -> Packet {
        Packet {
            seq_on_a: Sequence::from(1),
            port_id_on_a: PortId::transfer(),
            chan_id_on_a: ChannelId::new(0),
            port_id_on_b: PortId::transfer(),
            chan_id_on_b: ChannelId::new(0),
            data,
            timeout_height_on_b: TimeoutHeight::no_timeout(),
            timeout_timestamp_on_b: TimeoutTimestamp::from_nanoseconds(1),
        }
    }

    fn transfer(amount: u64) -> Vec<u8> {
        TokenPacketData {
            sender: "alice".to_string(),
            receiver: "bob".to_string(),
            amount,
        }
        .encode()
        .unwrap()
    }

    #[test]
    fn debit_never_goes_negative() {
        let mut token = SimpleToken::with_balances([("alice".to_string(), 10)]);

        assert!(matches!(
            token.debit("alice", 11),
            Err(TokenError::InsufficientBalance { balance: 10, .. })
        ));
        token.debit("alice", 10).unwrap();
        assert_eq!(token.balance_of("alice"), 0);
    }

    #[test]
    fn received_packets_credit_the_receiver() {
        let mut token = SimpleToken::default();
        let (extras, ack) =
            token.on_recv_packet_execute(&packet(transfer(100)), &Signer::new("relayer"));

        assert_eq!(token.balance_of("bob"), 100);
        assert!(AcknowledgementStatus::from_ack(&ack).unwrap().is_successful());
        assert_eq!(extras.events[0].kind, "recv");
    }

    #[test]
    fn garbage_data_gets_an_error_ack() {
        let mut token = SimpleToken::default();
        let (_, ack) =
            token.on_recv_packet_execute(&packet(b"not json".to_vec()), &Signer::new("relayer"));

        assert!(!AcknowledgementStatus::from_ack(&ack).unwrap().is_successful());
    }

    #[test]
    fn timeouts_and_error_acks_refund_the_sender() {
        let mut token = SimpleToken::default();
        let relayer = Signer::new("relayer");

        let (_, result) = token.on_timeout_packet_execute(&packet(transfer(7)), &relayer);
        result.unwrap();
        assert_eq!(token.balance_of("alice"), 7);

        let error_ack: Acknowledgement = AcknowledgementStatus::error(status("failed")).into();
        let (_, result) =
            token.on_acknowledgement_packet_execute(&packet(transfer(5)), &error_ack, &relayer);
        result.unwrap();
        assert_eq!(token.balance_of("alice"), 12);
    }

    #[rstest]
    #[case("", true)]
    #[case(TOKEN_VERSION, true)]
    #[case("ics20-1", false)]
    fn channel_versions_are_negotiated(#[case] proposed: &str, #[case] accepted: bool) {
        let token = SimpleToken::default();
        let result = token.on_chan_open_init_validate(
            Order::Unordered,
            &[ConnectionId::new(0)],
            &PortId::transfer(),
            &ChannelId::new(0),
            &Counterparty::new(PortId::transfer(), None),
            &Version::new(proposed),
        );

        assert_eq!(result.is_ok(), accepted);
        if accepted {
            assert_eq!(result.unwrap(), token_version());
        }
    }
}
