use ibc_clients::{AnyClientState, AnyConsensusState};
use ibc_core::client::context::{ClientExecutionContext, ClientValidationContext};
use ibc_core::client::types::error::ClientError;
use ibc_core::client::types::Height;
use ibc_core::handler::types::error::ContextError;
use ibc_core::host::types::identifiers::ClientId;
use ibc_core::host::types::path::{ClientConsensusStatePath, ClientStatePath};

use super::types::{store_error, MockIbcStore};

fn consensus_height(path: &ClientConsensusStatePath) -> Result<Height, ContextError> {
    Ok(Height::new(path.revision_number, path.revision_height)?)
}

impl ClientValidationContext for MockIbcStore {
    type ClientStateRef = AnyClientState;
    type ConsensusStateRef = AnyConsensusState;

    fn client_state(&self, client_id: &ClientId) -> Result<Self::ClientStateRef, ContextError> {
        self.store
            .get_client_state(client_id)
            .map_err(store_error)?
            .ok_or_else(|| ClientError::ClientNotFound(client_id.clone()).into())
    }

    fn consensus_state(
        &self,
        client_cons_state_path: &ClientConsensusStatePath,
    ) -> Result<Self::ConsensusStateRef, ContextError> {
        let client_id = &client_cons_state_path.client_id;
        let height = consensus_height(client_cons_state_path)?;

        self.store
            .get_consensus_state(client_id, height)
            .map_err(store_error)?
            .ok_or_else(|| {
                ClientError::ConsensusStateNotFound {
                    client_id: client_id.clone(),
                    height,
                }
                .into()
            })
    }
}

impl ClientExecutionContext for MockIbcStore {
    type ClientStateMut = AnyClientState;

    fn store_client_state(
        &mut self,
        client_state_path: ClientStatePath,
        client_state: Self::ClientStateRef,
    ) -> Result<(), ContextError> {
        self.store.set_client_state(&client_state_path.0, client_state);
        Ok(())
    }

    fn store_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
        consensus_state: Self::ConsensusStateRef,
    ) -> Result<(), ContextError> {
        let height = consensus_height(&consensus_state_path)?;
        self.store
            .set_consensus_state(&consensus_state_path.client_id, height, consensus_state)
            .map_err(store_error)
    }

    fn delete_consensus_state(
        &mut self,
        consensus_state_path: ClientConsensusStatePath,
    ) -> Result<(), ContextError> {
        let height = consensus_height(&consensus_state_path)?;
        self.store
            .delete_consensus_state(&consensus_state_path.client_id, height);
        Ok(())
    }
}
