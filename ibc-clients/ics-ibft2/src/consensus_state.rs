//! Implements the `ConsensusState` trait on a newtype wrapper around the
//! `ibc_client_ibft2_types::ConsensusState` type, so that the foreign trait
//! can be implemented on the foreign type.

use ibc_client_ibft2_types::error::Ibft2ClientError;
use ibc_client_ibft2_types::proto::v1::ConsensusState as RawIbft2ConsensusState;
use ibc_client_ibft2_types::{Address, ConsensusState as ConsensusStateType, Header};
use ibc_core_client::context::consensus_state::ConsensusState as ConsensusStateTrait;
use ibc_core_client::types::error::ClientError;
use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::{Any, Protobuf};
use ibc_primitives::Timestamp;

/// Newtype wrapper around the `ConsensusState` type imported from the
/// `ibc-client-ibft2-types` crate.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState(ConsensusStateType);

impl ConsensusState {
    pub fn inner(&self) -> &ConsensusStateType {
        &self.0
    }

    pub fn into_inner(self) -> ConsensusStateType {
        self.0
    }

    pub fn validators(&self) -> &[Address] {
        self.0.validators()
    }
}

impl From<ConsensusStateType> for ConsensusState {
    fn from(consensus_state: ConsensusStateType) -> Self {
        Self(consensus_state)
    }
}

impl From<Header> for ConsensusState {
    fn from(header: Header) -> Self {
        Self(ConsensusStateType::from(header))
    }
}

impl Protobuf<RawIbft2ConsensusState> for ConsensusState {}

impl TryFrom<RawIbft2ConsensusState> for ConsensusState {
    type Error = Ibft2ClientError;

    fn try_from(raw: RawIbft2ConsensusState) -> Result<Self, Self::Error> {
        Ok(Self(ConsensusStateType::try_from(raw)?))
    }
}

impl From<ConsensusState> for RawIbft2ConsensusState {
    fn from(consensus_state: ConsensusState) -> Self {
        consensus_state.0.into()
    }
}

impl Protobuf<Any> for ConsensusState {}

impl TryFrom<Any> for ConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        Ok(Self(ConsensusStateType::try_from(raw)?))
    }
}

impl From<ConsensusState> for Any {
    fn from(consensus_state: ConsensusState) -> Self {
        consensus_state.0.into()
    }
}

impl ConsensusStateTrait for ConsensusState {
    fn root(&self) -> &CommitmentRoot {
        self.0.root()
    }

    fn timestamp(&self) -> Timestamp {
        self.0.timestamp()
    }

    fn encode_vec(self) -> Vec<u8> {
        <Self as Protobuf<Any>>::encode_vec(self)
    }
}
