use ibc_client_ibft2_types::{
    ClientState as ClientStateType, ConsensusState as ConsensusStateType, Header,
    IBFT2_HEADER_TYPE_URL,
};
use ibc_core_client::context::client_state::ClientStateValidation;
use ibc_core_client::context::{ClientValidationContext, Convertible};
use ibc_core_client::types::error::ClientError;
use ibc_core_client::types::Status;
use ibc_core_host::types::identifiers::ClientId;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::Any;

use super::{verify_header, ClientState};

impl<V> ClientStateValidation<V> for ClientState
where
    V: ClientValidationContext,
    ConsensusStateType: Convertible<V::ConsensusStateRef>,
    <ConsensusStateType as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    fn verify_client_message(
        &self,
        ctx: &V,
        client_id: &ClientId,
        client_message: Any,
    ) -> Result<(), ClientError> {
        verify_client_message(self.inner(), ctx, client_id, client_message)
    }

    fn status(&self, _ctx: &V, _client_id: &ClientId) -> Result<Status, ClientError> {
        Ok(status(self.inner()))
    }
}

/// Verify the client message as part of the client state validation
/// process. Only sealed headers are accepted as client messages.
pub fn verify_client_message<V>(
    client_state: &ClientStateType,
    ctx: &V,
    client_id: &ClientId,
    client_message: Any,
) -> Result<(), ClientError>
where
    V: ClientValidationContext,
    ConsensusStateType: Convertible<V::ConsensusStateRef>,
    <ConsensusStateType as TryFrom<V::ConsensusStateRef>>::Error: Into<ClientError>,
{
    match client_message.type_url.as_str() {
        IBFT2_HEADER_TYPE_URL => {
            let header = Header::try_from(client_message)?;
            verify_header(client_state, ctx, client_id, &header)
        }
        _ => Err(ClientError::InvalidHeaderType(client_message.type_url)),
    }
}

/// A frozen client accepts neither headers nor proofs. IBFT2 clients do not
/// expire.
pub fn status(client_state: &ClientStateType) -> Status {
    if client_state.is_frozen() {
        Status::Frozen
    } else {
        Status::Active
    }
}
