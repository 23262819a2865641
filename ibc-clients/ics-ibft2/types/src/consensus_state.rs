//! Defines IBFT2's `ConsensusState` type

use ibc_core_client_types::error::ClientError;
use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_core_host_types::key::HASH_LENGTH;
use ibc_primitives::prelude::*;
use ibc_primitives::{DecodingError, Timestamp, ToProto};
use ibc_proto::google::protobuf::Any;
use ibc_proto::Protobuf;

use crate::error::Ibft2ClientError;
use crate::header::Header;
use crate::proto::v1::ConsensusState as RawConsensusState;
use crate::validator::Address;

pub const IBFT2_CONSENSUS_STATE_TYPE_URL: &str = "/ibc.lightclients.ibft2.v1.ConsensusState";

/// Defines the IBFT2 light client's consensus state: the state root, block
/// time and validator set of one verified block.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusState {
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
    pub validators: Vec<Address>,
}

impl ConsensusState {
    pub fn new(
        root: CommitmentRoot,
        timestamp: Timestamp,
        validators: Vec<Address>,
    ) -> Result<Self, Ibft2ClientError> {
        let consensus_state = Self {
            timestamp,
            root,
            validators,
        };
        consensus_state.validate()?;
        Ok(consensus_state)
    }

    pub fn validate(&self) -> Result<(), Ibft2ClientError> {
        if self.root.as_bytes().len() != HASH_LENGTH {
            return Err(Ibft2ClientError::InvalidRoot(self.root.as_bytes().len()));
        }
        if self.timestamp.is_zero() {
            return Err(Ibft2ClientError::ZeroTimestamp);
        }
        if self.validators.is_empty() {
            return Err(Ibft2ClientError::EmptyValidatorSet);
        }
        Ok(())
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    pub fn root(&self) -> &CommitmentRoot {
        &self.root
    }

    pub fn validators(&self) -> &[Address] {
        &self.validators
    }
}

impl Protobuf<RawConsensusState> for ConsensusState {}

impl TryFrom<RawConsensusState> for ConsensusState {
    type Error = Ibft2ClientError;

    fn try_from(raw: RawConsensusState) -> Result<Self, Self::Error> {
        let validators = raw
            .validators
            .iter()
            .map(|v| Address::try_from(v.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(
            raw.root.into(),
            Timestamp::from_nanoseconds(raw.timestamp),
            validators,
        )
    }
}

impl From<ConsensusState> for RawConsensusState {
    fn from(value: ConsensusState) -> Self {
        Self {
            timestamp: value.timestamp.nanoseconds(),
            root: value.root.into_vec(),
            validators: value.validators.into_iter().map(Into::into).collect(),
        }
    }
}

impl Protobuf<Any> for ConsensusState {}

impl TryFrom<Any> for ConsensusState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        fn decode_consensus_state(value: &[u8]) -> Result<ConsensusState, ClientError> {
            let consensus_state = Protobuf::<RawConsensusState>::decode(value).map_err(|e| {
                ClientError::Decoding(DecodingError::FailedToDecodeProto {
                    description: e.to_string(),
                })
            })?;
            Ok(consensus_state)
        }

        match raw.type_url.as_str() {
            IBFT2_CONSENSUS_STATE_TYPE_URL => decode_consensus_state(&raw.value),
            _ => Err(ClientError::InvalidConsensusStateType(raw.type_url)),
        }
    }
}

impl From<ConsensusState> for Any {
    fn from(consensus_state: ConsensusState) -> Self {
        ToProto::<RawConsensusState>::to_any(consensus_state)
    }
}

impl From<Header> for ConsensusState {
    fn from(header: Header) -> Self {
        Self {
            timestamp: header.timestamp,
            root: header.root,
            validators: header.validators,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn consensus_state_needs_root_time_and_validators() {
        let root = CommitmentRoot::from([1u8; HASH_LENGTH]);
        let validators = vec![Address::from_bytes([2u8; 20])];
        let now = Timestamp::from_nanoseconds(10);

        assert!(ConsensusState::new(root.clone(), now, validators.clone()).is_ok());
        assert!(matches!(
            ConsensusState::new(CommitmentRoot::from(vec![]), now, validators.clone()),
            Err(Ibft2ClientError::InvalidRoot(0))
        ));
        assert!(matches!(
            ConsensusState::new(root.clone(), Timestamp::default(), validators),
            Err(Ibft2ClientError::ZeroTimestamp)
        ));
        assert!(matches!(
            ConsensusState::new(root, now, vec![]),
            Err(Ibft2ClientError::EmptyValidatorSet)
        ));
    }

    #[test]
    fn any_roundtrip_keeps_validator_order() {
        let validators = vec![
            Address::from_bytes([9u8; 20]),
            Address::from_bytes([3u8; 20]),
        ];
        let consensus_state = ConsensusState::new(
            CommitmentRoot::from([1u8; HASH_LENGTH]),
            Timestamp::from_nanoseconds(10),
            validators.clone(),
        )
        .unwrap();

        let decoded = ConsensusState::try_from(Any::from(consensus_state)).unwrap();
        assert_eq!(decoded.validators(), validators.as_slice());
    }
}
