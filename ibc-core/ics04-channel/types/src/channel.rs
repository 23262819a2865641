//! Channel ends as stored by a host chain.

use core::fmt::{Display, Error as FmtError, Formatter};
use core::str::FromStr;

use ibc_core_host_types::identifiers::{ChannelId, ConnectionId, PortId};
use ibc_primitives::prelude::*;
use ibc_primitives::utils::PrettySlice;
use ibc_proto::ibc::core::channel::v1::{
    Channel as RawChannel, Counterparty as RawCounterparty,
};
use ibc_proto::Protobuf;

use crate::error::ChannelError;
use crate::Version;

/// One end of a channel
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChannelEnd {
    pub state: State,
    pub ordering: Order,
    pub remote: Counterparty,
    pub connection_hops: Vec<ConnectionId>,
    pub version: Version,
}

impl Display for ChannelEnd {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "ChannelEnd {{ state: {}, ordering: {}, remote: {}, connection_hops: {}, version: {} }}",
            self.state, self.ordering, self.remote, PrettySlice(&self.connection_hops), self.version
        )
    }
}

impl Protobuf<RawChannel> for ChannelEnd {}

impl TryFrom<RawChannel> for ChannelEnd {
    type Error = ChannelError;

    fn try_from(value: RawChannel) -> Result<Self, Self::Error> {
        if value.upgrade_sequence != 0 {
            return Err(ChannelError::UnsupportedChannelUpgradeSequence);
        }

        let remote = value
            .counterparty
            .ok_or(ChannelError::MissingCounterparty)?
            .try_into()?;

        let connection_hops = value
            .connection_hops
            .iter()
            .map(|conn_id| ConnectionId::from_str(conn_id))
            .collect::<Result<Vec<_>, _>>()?;

        ChannelEnd::new(
            State::try_from(value.state)?,
            Order::try_from(value.ordering)?,
            remote,
            connection_hops,
            value.version.into(),
        )
    }
}

impl From<ChannelEnd> for RawChannel {
    fn from(value: ChannelEnd) -> Self {
        RawChannel {
            state: value.state.into(),
            ordering: value.ordering.into(),
            counterparty: Some(value.remote.into()),
            connection_hops: value
                .connection_hops
                .iter()
                .map(ToString::to_string)
                .collect(),
            version: value.version.to_string(),
            upgrade_sequence: 0,
        }
    }
}

impl ChannelEnd {
    /// Creates a channel end without validating it; used where a message
    /// carries a channel end that is only checked once handled.
    pub(crate) fn new_without_validation(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
    ) -> Self {
        Self {
            state,
            ordering,
            remote,
            connection_hops,
            version,
        }
    }

    pub fn new(
        state: State,
        ordering: Order,
        remote: Counterparty,
        connection_hops: Vec<ConnectionId>,
        version: Version,
    ) -> Result<Self, ChannelError> {
        let channel_end =
            Self::new_without_validation(state, ordering, remote, connection_hops, version);
        channel_end.validate_basic()?;
        Ok(channel_end)
    }

    pub fn set_state(&mut self, s: State) {
        self.state = s;
    }

    pub fn set_version(&mut self, v: Version) {
        self.version = v;
    }

    pub fn set_counterparty_channel_id(&mut self, c: ChannelId) {
        self.remote.channel_id = Some(c);
    }

    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn ordering(&self) -> &Order {
        &self.ordering
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.remote
    }

    pub fn connection_hops(&self) -> &Vec<ConnectionId> {
        &self.connection_hops
    }

    pub fn version(&self) -> &Version {
        &self.version
    }

    pub fn validate_basic(&self) -> Result<(), ChannelError> {
        if self.state == State::Uninitialized {
            return Err(ChannelError::InvalidState {
                expected: "any state but UNINITIALIZED".to_string(),
                actual: self.state.to_string(),
            });
        }

        if self.ordering == Order::None {
            return Err(ChannelError::UnknownOrderType(self.ordering.to_string()));
        }

        verify_connection_hops_length(&self.connection_hops, 1)
    }

    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ChannelError> {
        if !self.state.eq(expected) {
            return Err(ChannelError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    pub fn verify_not_closed(&self) -> Result<(), ChannelError> {
        if self.state == State::Closed {
            return Err(ChannelError::ChannelClosed);
        }
        Ok(())
    }

    pub fn verify_counterparty_matches(&self, expected: &Counterparty) -> Result<(), ChannelError> {
        if !self.counterparty().eq(expected) {
            return Err(ChannelError::InvalidCounterparty {
                expected: expected.clone(),
                actual: self.counterparty().clone(),
            });
        }
        Ok(())
    }

    /// Only single-hop channels are supported.
    pub fn verify_connection_hops_length(&self) -> Result<(), ChannelError> {
        verify_connection_hops_length(&self.connection_hops, 1)
    }

    pub fn version_matches(&self, other: &Version) -> bool {
        self.version().eq(other)
    }
}

pub(crate) fn verify_connection_hops_length(
    connection_hops: &[ConnectionId],
    expected: usize,
) -> Result<(), ChannelError> {
    if connection_hops.len() != expected {
        return Err(ChannelError::InvalidConnectionHopsLength {
            expected,
            actual: connection_hops.len(),
        });
    }
    Ok(())
}

/// The port and, once known, the channel of the other end.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Counterparty {
    pub port_id: PortId,
    pub channel_id: Option<ChannelId>,
}

impl Counterparty {
    pub fn new(port_id: PortId, channel_id: Option<ChannelId>) -> Self {
        Self {
            port_id,
            channel_id,
        }
    }

    pub fn port_id(&self) -> &PortId {
        &self.port_id
    }

    pub fn channel_id(&self) -> Option<&ChannelId> {
        self.channel_id.as_ref()
    }

    /// The counterparty channel is unknown while initiating a handshake.
    pub(crate) fn verify_empty_channel_id(&self) -> Result<(), ChannelError> {
        if self.channel_id.is_some() {
            return Err(ChannelError::InvalidCounterparty {
                expected: Counterparty::new(self.port_id.clone(), None),
                actual: self.clone(),
            });
        }
        Ok(())
    }
}

impl Display for Counterparty {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        match &self.channel_id {
            Some(channel_id) => write!(f, "{}/{}", self.port_id, channel_id),
            None => write!(f, "{}/<unset>", self.port_id),
        }
    }
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = ChannelError;

    fn try_from(raw_counterparty: RawCounterparty) -> Result<Self, Self::Error> {
        let channel_id = if raw_counterparty.channel_id.is_empty() {
            None
        } else {
            Some(raw_counterparty.channel_id.parse()?)
        };

        Ok(Counterparty::new(
            raw_counterparty.port_id.parse()?,
            channel_id,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        RawCounterparty {
            port_id: value.port_id.to_string(),
            channel_id: value
                .channel_id
                .map_or_else(String::new, |id| id.to_string()),
        }
    }
}

/// Delivery guarantee of a channel
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    None = 0isize,
    Unordered = 1isize,
    Ordered = 2isize,
}

impl Order {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "ORDER_NONE_UNSPECIFIED",
            Self::Unordered => "ORDER_UNORDERED",
            Self::Ordered => "ORDER_ORDERED",
        }
    }
}

impl Display for Order {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for Order {
    type Error = ChannelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::None),
            1 => Ok(Self::Unordered),
            2 => Ok(Self::Ordered),
            _ => Err(ChannelError::UnknownOrderType(value.to_string())),
        }
    }
}

impl From<Order> for i32 {
    fn from(value: Order) -> Self {
        value as i32
    }
}

impl FromStr for Order {
    type Err = ChannelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().trim_start_matches("order_") {
            "none_unspecified" => Ok(Self::None),
            "unordered" => Ok(Self::Unordered),
            "ordered" => Ok(Self::Ordered),
            _ => Err(ChannelError::UnknownOrderType(s.to_string())),
        }
    }
}

/// Handshake progress of a [`ChannelEnd`]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Uninitialized = 0isize,
    Init = 1isize,
    TryOpen = 2isize,
    Open = 3isize,
    Closed = 4isize,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
        }
    }

    pub fn is_open(self) -> bool {
        self == State::Open
    }
}

impl TryFrom<i32> for State {
    type Error = ChannelError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Init),
            2 => Ok(Self::TryOpen),
            3 => Ok(Self::Open),
            4 => Ok(Self::Closed),
            _ => Err(ChannelError::InvalidState {
                expected: "one of 0, 1, 2, 3, 4".to_string(),
                actual: value.to_string(),
            }),
        }
    }
}

impl From<State> for i32 {
    fn from(value: State) -> Self {
        value as i32
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn raw_channel() -> RawChannel {
        RawChannel {
            state: 1,
            ordering: 2,
            counterparty: Some(RawCounterparty {
                port_id: "transfer".to_string(),
                channel_id: String::new(),
            }),
            connection_hops: vec!["connection-0".to_string()],
            version: "ics20-1".to_string(),
            upgrade_sequence: 0,
        }
    }

    #[test]
    fn channel_end_from_raw() {
        let channel_end = ChannelEnd::try_from(raw_channel()).unwrap();
        assert_eq!(channel_end.state, State::Init);
        assert_eq!(channel_end.ordering, Order::Ordered);
        assert_eq!(channel_end.counterparty().channel_id(), None);
        assert_eq!(channel_end.connection_hops()[0], ConnectionId::new(0));
    }

    #[rstest]
    #[case::uninitialized(RawChannel { state: 0, ..raw_channel() })]
    #[case::unknown_state(RawChannel { state: 7, ..raw_channel() })]
    #[case::unordered_none(RawChannel { ordering: 0, ..raw_channel() })]
    #[case::no_counterparty(RawChannel { counterparty: None, ..raw_channel() })]
    #[case::two_hops(RawChannel {
        connection_hops: vec!["connection-0".to_string(), "connection-1".to_string()],
        ..raw_channel()
    })]
    #[case::upgraded(RawChannel { upgrade_sequence: 1, ..raw_channel() })]
    fn invalid_channel_end(#[case] raw: RawChannel) {
        assert!(ChannelEnd::try_from(raw).is_err());
    }

    #[test]
    fn order_parsing() {
        assert_eq!("ORDER_ORDERED".parse::<Order>().unwrap(), Order::Ordered);
        assert_eq!("unordered".parse::<Order>().unwrap(), Order::Unordered);
        assert!("chaotic".parse::<Order>().is_err());
    }
}
