//! Contains the implementation of the IBFT2 `ClientState` domain type.

use core::cmp::max;
use core::str::FromStr;

use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::proto::v1::Height as RawHeight;
use ibc_core_client_types::Height;
use ibc_core_host_types::identifiers::ChainId;
use ibc_primitives::prelude::*;
use ibc_primitives::{DecodingError, ToProto};
use ibc_proto::google::protobuf::Any;
use ibc_proto::Protobuf;

use crate::error::Ibft2ClientError;
use crate::header::Header;
use crate::proto::v1::ClientState as RawIbft2ClientState;
use crate::validator::ADDRESS_LENGTH;

pub const IBFT2_CLIENT_STATE_TYPE_URL: &str = "/ibc.lightclients.ibft2.v1.ClientState";

/// Defines data structure for the IBFT2 client state.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    pub chain_id: ChainId,
    /// Address of the contract holding the counterparty provable store.
    /// Proofs are only accepted under this prefix.
    pub ibc_store_address: Vec<u8>,
    pub latest_height: Height,
    pub frozen: bool,
}

impl ClientState {
    /// Constructs a new IBFT2 `ClientState` and checks the parameters are
    /// valid. A new client is never frozen.
    pub fn new(
        chain_id: ChainId,
        ibc_store_address: Vec<u8>,
        latest_height: Height,
    ) -> Result<Self, Ibft2ClientError> {
        let client_state = Self {
            chain_id,
            ibc_store_address,
            latest_height,
            frozen: false,
        };
        client_state.validate()?;
        Ok(client_state)
    }

    pub fn validate(&self) -> Result<(), Ibft2ClientError> {
        if self.ibc_store_address.len() != ADDRESS_LENGTH {
            return Err(Ibft2ClientError::InvalidStoreAddress(
                self.ibc_store_address.len(),
            ));
        }

        if self.latest_height.revision_number() != self.chain_id.revision_number() {
            return Err(Ibft2ClientError::MismatchedRevision {
                expected: self.chain_id.revision_number(),
                actual: self.latest_height.revision_number(),
            });
        }

        Ok(())
    }

    pub fn with_header(self, header: &Header) -> Self {
        Self {
            latest_height: max(header.height, self.latest_height),
            ..self
        }
    }

    pub fn with_frozen(self) -> Self {
        Self {
            frozen: true,
            ..self
        }
    }

    pub fn chain_id(&self) -> &ChainId {
        &self.chain_id
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen
    }
}

pub(crate) fn decode_height(
    raw: Option<RawHeight>,
    field: &str,
) -> Result<Height, Ibft2ClientError> {
    raw.ok_or_else(|| DecodingError::missing_field(field))?
        .try_into()
        .map_err(|e: ClientError| Ibft2ClientError::InvalidHeight {
            field: field.to_string(),
            description: e.to_string(),
        })
}

impl Protobuf<RawIbft2ClientState> for ClientState {}

impl TryFrom<RawIbft2ClientState> for ClientState {
    type Error = Ibft2ClientError;

    fn try_from(raw: RawIbft2ClientState) -> Result<Self, Self::Error> {
        let client_state = Self {
            chain_id: ChainId::from_str(raw.chain_id.as_str())?,
            ibc_store_address: raw.ibc_store_address,
            latest_height: decode_height(raw.latest_height, "latest_height")?,
            frozen: raw.frozen,
        };
        client_state.validate()?;

        Ok(client_state)
    }
}

impl From<ClientState> for RawIbft2ClientState {
    fn from(value: ClientState) -> Self {
        Self {
            chain_id: value.chain_id.to_string(),
            ibc_store_address: value.ibc_store_address,
            latest_height: Some(value.latest_height.into()),
            frozen: value.frozen,
        }
    }
}

impl Protobuf<Any> for ClientState {}

impl TryFrom<Any> for ClientState {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        fn decode_client_state(value: &[u8]) -> Result<ClientState, ClientError> {
            let client_state = Protobuf::<RawIbft2ClientState>::decode(value).map_err(|e| {
                ClientError::Decoding(DecodingError::FailedToDecodeProto {
                    description: e.to_string(),
                })
            })?;
            Ok(client_state)
        }

        match raw.type_url.as_str() {
            IBFT2_CLIENT_STATE_TYPE_URL => decode_client_state(&raw.value),
            _ => Err(ClientError::InvalidClientStateType(raw.type_url)),
        }
    }
}

impl From<ClientState> for Any {
    fn from(client_state: ClientState) -> Self {
        ToProto::<RawIbft2ClientState>::to_any(client_state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_id() -> ChainId {
        ChainId::new("ibc-besu-0").unwrap()
    }

    #[test]
    fn any_roundtrip_keeps_type_url() {
        let client_state =
            ClientState::new(chain_id(), vec![7u8; 20], Height::new(0, 5).unwrap()).unwrap();
        let any = Any::from(client_state.clone());

        assert_eq!(any.type_url, IBFT2_CLIENT_STATE_TYPE_URL);
        assert_eq!(ClientState::try_from(any).unwrap(), client_state);
    }

    #[test]
    fn store_address_must_be_an_evm_address() {
        assert!(matches!(
            ClientState::new(chain_id(), vec![7u8; 32], Height::new(0, 5).unwrap()),
            Err(Ibft2ClientError::InvalidStoreAddress(32))
        ));
    }

    #[test]
    fn latest_height_follows_chain_revision() {
        assert!(matches!(
            ClientState::new(chain_id(), vec![7u8; 20], Height::new(1, 5).unwrap()),
            Err(Ibft2ClientError::MismatchedRevision {
                expected: 0,
                actual: 1
            })
        ));
    }

    #[test]
    fn foreign_type_url_is_rejected() {
        let any = Any {
            type_url: "/ibc.lightclients.tendermint.v1.ClientState".to_string(),
            value: vec![],
        };
        assert!(matches!(
            ClientState::try_from(any),
            Err(ClientError::InvalidClientStateType(_))
        ));
    }
}
