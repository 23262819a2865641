//! This module includes trait implementations for the
//! `ibc_client_ibft2_types::ClientState` type. Implemented traits include
//! `ClientStateCommon`, `ClientStateValidation`, and `ClientStateExecution`.
//!
//! Note that this crate defines a newtype wrapper around the
//! `ibc_client_ibft2_types::ClientState` type in order to enable
//! implementing a foreign trait on a foreign type (i.e. the orphan rule in
//! Rust). As such, this module also includes some trait implementations that
//! serve to pass through traits implemented on the wrapped `ClientState` type.

use ibc_client_ibft2_types::error::Ibft2ClientError;
use ibc_client_ibft2_types::proto::v1::ClientState as RawIbft2ClientState;
use ibc_client_ibft2_types::ClientState as ClientStateType;
use ibc_core_client::types::error::ClientError;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::{Any, Protobuf};

mod common;
mod execution;
mod update_client;
mod validation;

pub use common::*;
pub use execution::*;
pub use update_client::*;
pub use validation::*;

/// Newtype wrapper around the `ClientState` type imported from the
/// `ibc-client-ibft2-types` crate. This wrapper exists so that we can
/// bypass Rust's orphan rules and implement traits from
/// `ibc_core_client::context` on the `ClientState` type.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientState(ClientStateType);

impl ClientState {
    pub fn inner(&self) -> &ClientStateType {
        &self.0
    }

    pub fn into_inner(self) -> ClientStateType {
        self.0
    }
}

impl From<ClientStateType> for ClientState {
    fn from(client_state: ClientStateType) -> Self {
        Self(client_state)
    }
}

impl Protobuf<RawIbft2ClientState> for ClientState {}

impl TryFrom<RawIbft2ClientState> for ClientState {
    type Error = Ibft2ClientError;

    fn try_from(raw: RawIbft2ClientState) -> Result<Self, Self::Error> {
        Ok(Self(ClientStateType::try_from(raw)?))
    }
}

impl From<ClientState> for RawIbft2ClientState {
    fn from(client_state: ClientState) -> Self {
        client_state.0.into()
    }
}

impl Protobuf<Any> for ClientState {}

impl TryFrom<Any> for ClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        Ok(Self(ClientStateType::try_from(raw)?))
    }
}

impl From<ClientState> for Any {
    fn from(client_state: ClientState) -> Self {
        client_state.0.into()
    }
}
