//! Defines the domain type for IBFT2 headers

use core::fmt::{Display, Error as FmtError, Formatter};

use alloc::collections::BTreeSet;

use ibc_core_client_types::error::ClientError;
use ibc_core_client_types::Height;
use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_core_host_types::key::{keccak256, HASH_LENGTH};
use ibc_primitives::prelude::*;
use ibc_primitives::utils::PrettySlice;
use ibc_primitives::{DecodingError, Timestamp, ToProto};
use ibc_proto::google::protobuf::Any;
use ibc_proto::Protobuf;
use k256::ecdsa::SigningKey;

use crate::client_state::decode_height;
use crate::error::Ibft2ClientError;
use crate::proto::v1::Header as RawHeader;
use crate::validator::{Address, Seal};

pub const IBFT2_HEADER_TYPE_URL: &str = "/ibc.lightclients.ibft2.v1.Header";

/// A block header of the counterparty chain together with the commit seals
/// of its validators. `trusted_height` names the consensus state the header
/// is verified against.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Header {
    pub height: Height,
    pub timestamp: Timestamp,
    pub root: CommitmentRoot,
    pub validators: Vec<Address>,
    pub seals: Vec<Seal>,
    pub trusted_height: Height,
}

impl Display for Header {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        write!(
            f,
            "Header {{ height: {}, timestamp: {}, validators: {}, seals: {}, trusted_height: {} }}",
            self.height,
            self.timestamp,
            PrettySlice(&self.validators),
            self.seals.len(),
            self.trusted_height
        )
    }
}

impl Header {
    pub fn height(&self) -> Height {
        self.height
    }

    pub fn timestamp(&self) -> Timestamp {
        self.timestamp
    }

    /// Stateless checks on the header fields.
    pub fn validate_basic(&self) -> Result<(), Ibft2ClientError> {
        if self.trusted_height.revision_number() != self.height.revision_number() {
            return Err(Ibft2ClientError::MismatchedRevision {
                expected: self.trusted_height.revision_number(),
                actual: self.height.revision_number(),
            });
        }
        if self.trusted_height >= self.height {
            return Err(Ibft2ClientError::InvalidTrustedHeight {
                trusted_height: self.trusted_height,
                header_height: self.height,
            });
        }
        if self.root.as_bytes().len() != HASH_LENGTH {
            return Err(Ibft2ClientError::InvalidRoot(self.root.as_bytes().len()));
        }
        if self.timestamp.is_zero() {
            return Err(Ibft2ClientError::ZeroTimestamp);
        }
        if self.validators.is_empty() {
            return Err(Ibft2ClientError::EmptyValidatorSet);
        }

        let mut seen = BTreeSet::new();
        for validator in &self.validators {
            if !seen.insert(validator) {
                return Err(Ibft2ClientError::DuplicateValidator(validator.to_string()));
            }
        }

        Ok(())
    }

    /// The digest every validator seals: the Keccak-256 hash of the
    /// protobuf encoding of the header without its seals.
    pub fn sign_digest(&self) -> [u8; HASH_LENGTH] {
        let unsealed = Self {
            seals: Vec::new(),
            ..self.clone()
        };
        keccak256(&Protobuf::<RawHeader>::encode_vec(unsealed))
    }

    /// Appends a seal from each of the given validator keys.
    pub fn sealed_by(mut self, keys: &[SigningKey]) -> Result<Self, Ibft2ClientError> {
        let digest = self.sign_digest();
        for key in keys {
            self.seals.push(Seal::sign(key, &digest)?);
        }
        Ok(self)
    }

    /// Recovers the distinct signers of the header. Two seals from the same
    /// validator are rejected.
    pub fn signers(&self) -> Result<BTreeSet<Address>, Ibft2ClientError> {
        let digest = self.sign_digest();
        let mut signers = BTreeSet::new();
        for seal in &self.seals {
            let signer = seal.recover(&digest)?;
            if !signers.insert(signer) {
                return Err(Ibft2ClientError::DuplicateSeal(signer.to_string()));
            }
        }
        Ok(signers)
    }
}

impl Protobuf<RawHeader> for Header {}

impl TryFrom<RawHeader> for Header {
    type Error = Ibft2ClientError;

    fn try_from(raw: RawHeader) -> Result<Self, Self::Error> {
        let validators = raw
            .validators
            .iter()
            .map(|v| Address::try_from(v.as_slice()))
            .collect::<Result<Vec<_>, _>>()?;
        let seals = raw
            .seals
            .into_iter()
            .map(Seal::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        let header = Self {
            height: decode_height(raw.height, "height")?,
            timestamp: Timestamp::from_nanoseconds(raw.timestamp),
            root: raw.root.into(),
            validators,
            seals,
            trusted_height: decode_height(raw.trusted_height, "trusted_height")?,
        };
        header.validate_basic()?;

        Ok(header)
    }
}

impl From<Header> for RawHeader {
    fn from(value: Header) -> Self {
        Self {
            height: Some(value.height.into()),
            timestamp: value.timestamp.nanoseconds(),
            root: value.root.into_vec(),
            validators: value.validators.into_iter().map(Into::into).collect(),
            seals: value.seals.into_iter().map(Into::into).collect(),
            trusted_height: Some(value.trusted_height.into()),
        }
    }
}

impl Protobuf<Any> for Header {}

impl TryFrom<Any> for Header {
    type Error = ClientError;

    fn try_from(raw: Any) -> Result<Self, Self::Error> {
        fn decode_header(value: &[u8]) -> Result<Header, ClientError> {
            let header = Protobuf::<RawHeader>::decode(value).map_err(|e| {
                ClientError::Decoding(DecodingError::FailedToDecodeProto {
                    description: e.to_string(),
                })
            })?;
            Ok(header)
        }

        match raw.type_url.as_str() {
            IBFT2_HEADER_TYPE_URL => decode_header(&raw.value),
            _ => Err(ClientError::InvalidHeaderType(raw.type_url)),
        }
    }
}

impl From<Header> for Any {
    fn from(header: Header) -> Self {
        ToProto::<RawHeader>::to_any(header)
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn keys() -> Vec<SigningKey> {
        (1u8..=4)
            .map(|seed| SigningKey::from_slice(&[seed; 32]).unwrap())
            .collect()
    }

    fn header(keys: &[SigningKey]) -> Header {
        Header {
            height: Height::new(0, 10).unwrap(),
            timestamp: Timestamp::from_nanoseconds(1_000),
            root: CommitmentRoot::from([5u8; HASH_LENGTH]),
            validators: keys
                .iter()
                .map(|k| Address::from_verifying_key(k.verifying_key()))
                .collect(),
            seals: vec![],
            trusted_height: Height::new(0, 9).unwrap(),
        }
    }

    #[test]
    fn seals_do_not_change_the_signing_digest() {
        let keys = keys();
        let unsealed = header(&keys);
        let sealed = unsealed.clone().sealed_by(&keys).unwrap();

        assert_eq!(unsealed.sign_digest(), sealed.sign_digest());
        assert_eq!(sealed.signers().unwrap().len(), keys.len());
    }

    #[test]
    fn repeated_seal_is_rejected() {
        let keys = keys();
        let sealed = header(&keys)
            .sealed_by(&[keys[0].clone(), keys[0].clone()])
            .unwrap();

        assert!(matches!(
            sealed.signers(),
            Err(Ibft2ClientError::DuplicateSeal(_))
        ));
    }

    #[test]
    fn any_roundtrip_keeps_seals_valid() {
        let keys = keys();
        let sealed = header(&keys).sealed_by(&keys[..3]).unwrap();
        let decoded = Header::try_from(Any::from(sealed.clone())).unwrap();

        assert_eq!(decoded, sealed);
        assert_eq!(decoded.signers().unwrap(), sealed.signers().unwrap());
    }

    #[rstest]
    #[case(9, 9)]
    #[case(9, 10)]
    fn trusted_height_must_be_below_header(#[case] height: u64, #[case] trusted: u64) {
        let mut header = header(&keys());
        header.height = Height::new(0, height).unwrap();
        header.trusted_height = Height::new(0, trusted).unwrap();

        assert!(matches!(
            header.validate_basic(),
            Err(Ibft2ClientError::InvalidTrustedHeight { .. })
        ));
    }

    #[test]
    fn duplicate_validator_is_rejected() {
        let keys = keys();
        let mut header = header(&keys);
        header.validators.push(header.validators[0]);

        assert!(matches!(
            header.validate_basic(),
            Err(Ibft2ClientError::DuplicateValidator(_))
        ));
    }
}
