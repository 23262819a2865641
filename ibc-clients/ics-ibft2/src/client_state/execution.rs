use ibc_client_ibft2_types::{
    ClientState as ClientStateType, ConsensusState as ConsensusStateType, Header,
};
use ibc_core_client::context::client_state::ClientStateExecution;
use ibc_core_client::context::{ClientExecutionContext, Convertible};
use ibc_core_client::types::error::ClientError;
use ibc_core_client::types::Height;
use ibc_core_host::types::identifiers::ClientId;
use ibc_core_host::types::path::{ClientConsensusStatePath, ClientStatePath};
use ibc_primitives::prelude::*;
use ibc_primitives::proto::Any;

use super::ClientState;

impl<E> ClientStateExecution<E> for ClientState
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientStateType>,
    ConsensusStateType: Convertible<E::ConsensusStateRef>,
    <ConsensusStateType as TryFrom<E::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn initialise(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        consensus_state: Any,
    ) -> Result<(), ClientError> {
        initialise(self.inner(), ctx, client_id, consensus_state)
    }

    fn update_state(
        &self,
        ctx: &mut E,
        client_id: &ClientId,
        header: Any,
    ) -> Result<Vec<Height>, ClientError> {
        update_state(self.inner(), ctx, client_id, header)
    }
}

/// Stores the client state and the genesis consensus state at the client's
/// latest height.
pub fn initialise<E>(
    client_state: &ClientStateType,
    ctx: &mut E,
    client_id: &ClientId,
    consensus_state: Any,
) -> Result<(), ClientError>
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientStateType>,
    ConsensusStateType: Convertible<E::ConsensusStateRef>,
{
    let latest_height = client_state.latest_height;
    let consensus_state: ConsensusStateType = consensus_state.try_into()?;

    ctx.store_client_state(
        ClientStatePath::new(client_id.clone()),
        client_state.clone().into(),
    )?;
    ctx.store_consensus_state(
        ClientConsensusStatePath::new(
            client_id.clone(),
            latest_height.revision_number(),
            latest_height.revision_height(),
        ),
        consensus_state.into(),
    )?;

    Ok(())
}

/// Writes the consensus state carried by a verified header and advances the
/// client's latest height. A header at an already stored height fails with
/// `DuplicateHeight` from the store.
pub fn update_state<E>(
    client_state: &ClientStateType,
    ctx: &mut E,
    client_id: &ClientId,
    header: Any,
) -> Result<Vec<Height>, ClientError>
where
    E: ClientExecutionContext,
    E::ClientStateRef: From<ClientStateType>,
    ConsensusStateType: Convertible<E::ConsensusStateRef>,
{
    let header = Header::try_from(header)?;
    let header_height = header.height;

    let new_client_state = client_state.clone().with_header(&header);
    let new_consensus_state = ConsensusStateType::from(header);

    ctx.store_consensus_state(
        ClientConsensusStatePath::new(
            client_id.clone(),
            header_height.revision_number(),
            header_height.revision_height(),
        ),
        new_consensus_state.into(),
    )?;
    ctx.store_client_state(
        ClientStatePath::new(client_id.clone()),
        new_client_state.into(),
    )?;

    Ok(vec![header_height])
}
