use derive_more::From;
use ibc_client_ibft2::client_state::ClientState as Ibft2ClientState;
use ibc_client_ibft2::types::{
    ClientState as Ibft2ClientStateType, ConsensusState as Ibft2ConsensusStateType,
    IBFT2_CLIENT_STATE_TYPE_URL,
};
use ibc_core_client::context::client_state::{
    ClientStateCommon, ClientStateExecution, ClientStateValidation,
};
use ibc_core_client::context::{ClientExecutionContext, ClientValidationContext, Convertible};
use ibc_core_client::types::error::ClientError;
use ibc_core_client::types::{Height, Status};
use ibc_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use ibc_core_host::types::identifiers::{ClientId, ClientType};
use ibc_core_host::types::path::Path;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::{Any, Protobuf};

/// Client state of any supported light client. The variant is chosen from
/// the type URL of the state submitted at client creation.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq, From)]
pub enum AnyClientState {
    Ibft2(Ibft2ClientState),
}

impl AnyClientState {
    pub fn is_frozen(&self) -> bool {
        match self {
            Self::Ibft2(cs) => cs.inner().is_frozen(),
        }
    }
}

impl Protobuf<Any> for AnyClientState {}

impl TryFrom<Any> for AnyClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        match raw.type_url.as_str() {
            IBFT2_CLIENT_STATE_TYPE_URL => Ok(Ibft2ClientState::try_from(raw)?.into()),
            _ => Err(ClientError::InvalidClientStateType(raw.type_url)),
        }
    }
}

impl From<AnyClientState> for Any {
    fn from(client_state: AnyClientState) -> Self {
        match client_state {
            AnyClientState::Ibft2(cs) => cs.into(),
        }
    }
}

impl From<Ibft2ClientStateType> for AnyClientState {
    fn from(client_state: Ibft2ClientStateType) -> Self {
        Self::Ibft2(client_state.into())
    }
}

impl ClientStateCommon for AnyClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.verify_consensus_state(consensus_state),
        }
    }

    fn client_type(&self) -> ClientType {
        match self {
            Self::Ibft2(cs) => cs.client_type(),
        }
    }

    fn latest_height(&self) -> Height {
        match self {
            Self::Ibft2(cs) => cs.latest_height(),
        }
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.validate_proof_height(proof_height),
        }
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.verify_membership(prefix, proof, root, path, value),
        }
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.verify_non_membership(prefix, proof, root, path),
        }
    }
}

impl<V> ClientStateValidation<V> for AnyClientState
where
    V: ClientValidationContext,
    Ibft2ConsensusStateType: Convertible<V::ConsensusStateRef>,
    <Ibft2ConsensusStateType as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.verify_client_message(ctx, client_id, client_message),
        }
    }

    fn status(&self, ctx: &V, client_id: &ClientId) -> Result<Status, ClientError> {
        match self {
            Self::Ibft2(cs) => cs.status(ctx, client_id),
        }
    }
}

impl<E> ClientStateExecution<E> for AnyClientState
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<Ibft2ClientStateType>,
    Ibft2ConsensusStateType: Convertible<E::ConsensusStateRef>,
    <Ibft2ConsensusStateType as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        match self {
            Self::Ibft2(cs) => cs.initialise(ctx, client_id, consensus_state),
        }
    }

    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        match self {
            Self::Ibft2(cs) => cs.update_state(ctx, client_id, header),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_core_host::types::identifiers::ChainId;

    use super::*;
    use crate::AnyConsensusState;

    #[test]
    fn variant_is_picked_from_type_url() {
        let client_state = Ibft2ClientStateType::new(
            ChainId::new("ibc-besu-0").unwrap(),
            vec![3u8; 20],
            Height::new(0, 1).unwrap(),
        )
        .unwrap();

        let any = Any::from(AnyClientState::from(client_state.clone()));
        let decoded = AnyClientState::try_from(any).unwrap();

        assert_eq!(decoded, AnyClientState::from(client_state));
        assert_eq!(decoded.client_type().as_str(), ibc_client_ibft2::IBFT2_CLIENT_TYPE);
    }

    #[test]
    fn unknown_type_urls_are_rejected() {
        let any = Any {
            type_url: "/ibc.lightclients.solomachine.v3.ClientState".to_string(),
            value: vec![],
        };
        assert!(matches!(
            AnyClientState::try_from(any.clone()),
            Err(ClientError::InvalidClientStateType(_))
        ));
        assert!(matches!(
            AnyConsensusState::try_from(any),
            Err(ClientError::InvalidConsensusStateType(_))
        ));
    }
}
