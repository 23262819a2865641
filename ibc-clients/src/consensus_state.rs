use derive_more::From;
use ibc_client_ibft2::consensus_state::ConsensusState as Ibft2ConsensusState;
use ibc_client_ibft2::types::{
    ConsensusState as Ibft2ConsensusStateType, IBFT2_CONSENSUS_STATE_TYPE_URL,
};
use ibc_core_client::context::consensus_state::ConsensusState;
use ibc_core_client::types::error::ClientError;
use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::{Any, Protobuf};
use ibc_primitives::Timestamp;

/// Consensus state of any supported light client, as stored by a host.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum AnyConsensusState {
    Ibft2(Ibft2ConsensusState),
}

impl ConsensusState for AnyConsensusState {
    fn root(&self) -> &CommitmentRoot {
        match self {
            Self::Ibft2(cs) => cs.root(),
        }
    }

    fn timestamp(&self) -> Timestamp {
        match self {
            Self::Ibft2(cs) => ConsensusState::timestamp(cs),
        }
    }

    fn encode_vec(self) -> Vec<u8> {
        match self {
            Self::Ibft2(cs) => ConsensusState::encode_vec(cs),
        }
    }
}

impl Protobuf<Any> for AnyConsensusState {}

impl TryFrom<Any> for AnyConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            IBFT2_CONSENSUS_STATE_TYPE_URL => Ok(Ibft2ConsensusState::try_from(raw)?.into()),
            _ => Err(ClientError::InvalidConsensusStateType(raw.type_url)),
        }
    }
}

impl From<AnyConsensusState> for Any {
    fn from(consensus_state: AnyConsensusState) -> Self {
        match consensus_state {
            AnyConsensusState::Ibft2(cs) => cs.into(),
        }
    }
}

impl From<Ibft2ConsensusStateType> for AnyConsensusState {
    fn from(consensus_state: Ibft2ConsensusStateType) -> Self {
        Self::Ibft2(consensus_state.into())
    }
}

impl TryFrom<AnyConsensusState> for Ibft2ConsensusStateType {
    type Error = ClientError;

    fn try_from(value: AnyConsensusState) -> Result<Self, Self::Error> {
        match value {
            AnyConsensusState::Ibft2(cs) => Ok(cs.into_inner()),
        }
    }
}
