//! Defines the types that define a connection

use core::fmt::{Display, Error as FmtError, Formatter};
use core::time::Duration;

use ibc_core_commitment_types::commitment::CommitmentPrefix;
use ibc_core_host_types::identifiers::{ClientId, ConnectionId};
use ibc_primitives::prelude::*;
use ibc_proto::ibc::core::commitment::v1::MerklePrefix;
use ibc_proto::ibc::core::connection::v1::{
    ConnectionEnd as RawConnectionEnd, Counterparty as RawCounterparty,
};
use ibc_proto::Protobuf;

use crate::error::ConnectionError;
use crate::version::Version;

/// The connection end stored by a chain for one side of a connection.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ConnectionEnd {
    pub state: State,
    client_id: ClientId,
    counterparty: Counterparty,
    versions: Vec<Version>,
    delay_period: Duration,
}

impl Protobuf<RawConnectionEnd> for ConnectionEnd {}

impl TryFrom<RawConnectionEnd> for ConnectionEnd {
    type Error = ConnectionError;

    fn try_from(value: RawConnectionEnd) -> Result<Self, Self::Error> {
        let state = value.state.try_into()?;

        if value.versions.is_empty() {
            return Err(ConnectionError::EmptyVersions);
        }

        Self::new(
            state,
            value.client_id.parse()?,
            value
                .counterparty
                .ok_or(ConnectionError::MissingCounterparty)?
                .try_into()?,
            value
                .versions
                .into_iter()
                .map(Version::try_from)
                .collect::<Result<Vec<_>, _>>()?,
            Duration::from_nanos(value.delay_period),
        )
    }
}

impl From<ConnectionEnd> for RawConnectionEnd {
    fn from(value: ConnectionEnd) -> Self {
        RawConnectionEnd {
            client_id: value.client_id.to_string(),
            versions: value.versions.into_iter().map(Into::into).collect(),
            state: value.state.into(),
            counterparty: Some(value.counterparty.into()),
            delay_period: u64::try_from(value.delay_period.as_nanos()).unwrap_or(u64::MAX),
        }
    }
}

impl ConnectionEnd {
    pub fn new(
        state: State,
        client_id: ClientId,
        counterparty: Counterparty,
        versions: Vec<Version>,
        delay_period: Duration,
    ) -> Result<Self, ConnectionError> {
        // `versions` holds the proposed set in INIT and the single negotiated
        // version afterwards.
        if state != State::Init && versions.len() != 1 {
            return Err(ConnectionError::InvalidVersionLength);
        }

        Ok(Self {
            state,
            client_id,
            counterparty,
            versions,
            delay_period,
        })
    }

    /// Getter for the state of this connection end.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Setter for the `state` field.
    pub fn set_state(&mut self, new_state: State) {
        self.state = new_state;
    }

    /// Setter for the `counterparty` field.
    pub fn set_counterparty(&mut self, new_cparty: Counterparty) {
        self.counterparty = new_cparty;
    }

    /// Setter for the `version` field.
    pub fn set_version(&mut self, new_version: Version) {
        self.versions = vec![new_version];
    }

    /// Helper function to compare the client id of this end with another client identifier.
    pub fn client_id_matches(&self, other: &ClientId) -> bool {
        self.client_id.eq(other)
    }

    /// Helper function to determine whether the connection is open.
    pub fn is_open(&self) -> bool {
        self.state == State::Open
    }

    /// Checks if the state of this connection end matches with an expected state.
    pub fn verify_state_matches(&self, expected: &State) -> Result<(), ConnectionError> {
        if !self.state.eq(expected) {
            return Err(ConnectionError::InvalidState {
                expected: expected.to_string(),
                actual: self.state.to_string(),
            });
        }
        Ok(())
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn versions(&self) -> &[Version] {
        &self.versions
    }

    pub fn counterparty(&self) -> &Counterparty {
        &self.counterparty
    }

    /// The minimum delay between a client update and the use of its root for
    /// packet proofs. Stored and relayed; not enforced by the handlers.
    pub fn delay_period(&self) -> Duration {
        self.delay_period
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Counterparty {
    pub client_id: ClientId,
    pub connection_id: Option<ConnectionId>,
    pub prefix: CommitmentPrefix,
}

impl Protobuf<RawCounterparty> for Counterparty {}

impl TryFrom<RawCounterparty> for Counterparty {
    type Error = ConnectionError;

    fn try_from(raw_counterparty: RawCounterparty) -> Result<Self, Self::Error> {
        let connection_id = if raw_counterparty.connection_id.is_empty() {
            None
        } else {
            Some(raw_counterparty.connection_id.parse()?)
        };
        Ok(Counterparty::new(
            raw_counterparty.client_id.parse()?,
            connection_id,
            raw_counterparty
                .prefix
                .ok_or(ConnectionError::MissingCounterparty)?
                .key_prefix
                .try_into()
                .map_err(ConnectionError::InvalidPrefix)?,
        ))
    }
}

impl From<Counterparty> for RawCounterparty {
    fn from(value: Counterparty) -> Self {
        RawCounterparty {
            client_id: value.client_id.as_str().to_string(),
            connection_id: value
                .connection_id
                .map_or_else(String::new, |v| v.as_str().to_string()),
            prefix: Some(MerklePrefix {
                key_prefix: value.prefix.into_vec(),
            }),
        }
    }
}

impl Counterparty {
    pub fn new(
        client_id: ClientId,
        connection_id: Option<ConnectionId>,
        prefix: CommitmentPrefix,
    ) -> Self {
        Self {
            client_id,
            connection_id,
            prefix,
        }
    }

    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    pub fn connection_id(&self) -> Option<&ConnectionId> {
        self.connection_id.as_ref()
    }

    pub fn prefix(&self) -> &CommitmentPrefix {
        &self.prefix
    }

    /// Called upon initiating a connection handshake on the host chain to verify
    /// that the counterparty connection id has not been set.
    pub(crate) fn verify_empty_connection_id(&self) -> Result<(), ConnectionError> {
        if self.connection_id().is_some() {
            return Err(ConnectionError::InvalidCounterparty);
        }
        Ok(())
    }
}

#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum State {
    Uninitialized = 0isize,
    Init = 1isize,
    TryOpen = 2isize,
    Open = 3isize,
}

impl State {
    /// Yields the State as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uninitialized => "UNINITIALIZED",
            Self::Init => "INIT",
            Self::TryOpen => "TRYOPEN",
            Self::Open => "OPEN",
        }
    }

    pub fn is_open(self) -> bool {
        self == State::Open
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(f, "{}", self.as_str())
    }
}

impl TryFrom<i32> for State {
    type Error = ConnectionError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Uninitialized),
            1 => Ok(Self::Init),
            2 => Ok(Self::TryOpen),
            3 => Ok(Self::Open),
            _ => Err(ConnectionError::InvalidState {
                expected: "Must be one of: 0, 1, 2, 3".to_string(),
                actual: value.to_string(),
            }),
        }
    }
}

impl From<State> for i32 {
    fn from(value: State) -> Self {
        match value {
            State::Uninitialized => 0,
            State::Init => 1,
            State::TryOpen => 2,
            State::Open => 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use core::str::FromStr;

    use super::*;

    fn counterparty(connection_id: Option<ConnectionId>) -> Counterparty {
        Counterparty::new(
            ClientId::from_str("hb-ibft2-0").unwrap(),
            connection_id,
            CommitmentPrefix::try_from(vec![0xAA; 20]).unwrap(),
        )
    }

    #[test]
    fn open_end_requires_single_version() {
        let res = ConnectionEnd::new(
            State::Open,
            ClientId::from_str("hb-ibft2-1").unwrap(),
            counterparty(Some(ConnectionId::new(0))),
            vec![Version::default(), Version::new("2", vec![])],
            Duration::ZERO,
        );
        assert!(matches!(res, Err(ConnectionError::InvalidVersionLength)));
    }

    #[test]
    fn raw_end_keeps_fields() {
        let end = ConnectionEnd::new(
            State::TryOpen,
            ClientId::from_str("hb-ibft2-1").unwrap(),
            counterparty(Some(ConnectionId::new(3))),
            vec![Version::default()],
            Duration::from_secs(5),
        )
        .unwrap();

        let decoded = ConnectionEnd::decode_vec(&end.clone().encode_vec()).unwrap();
        assert_eq!(decoded, end);
        assert_eq!(decoded.counterparty().connection_id(), Some(&ConnectionId::new(3)));
    }

    #[test]
    fn unknown_state_is_rejected() {
        assert!(State::try_from(7).is_err());
        assert_eq!(State::try_from(2).unwrap(), State::TryOpen);
    }

    #[test]
    fn verify_state_matches_reports_both_states() {
        let end = ConnectionEnd::new(
            State::Init,
            ClientId::from_str("hb-ibft2-1").unwrap(),
            counterparty(None),
            Version::compatibles(),
            Duration::ZERO,
        )
        .unwrap();
        match end.verify_state_matches(&State::TryOpen) {
            Err(ConnectionError::InvalidState { expected, actual }) => {
                assert_eq!(expected, "TRYOPEN");
                assert_eq!(actual, "INIT");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
