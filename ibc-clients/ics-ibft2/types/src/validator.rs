//! Validator addresses and the commit seals they put on headers.

use core::fmt::{Debug, Display, Error as FmtError, Formatter};

use ibc_core_host_types::key::{keccak256, HASH_LENGTH};
use ibc_primitives::prelude::*;
use k256::ecdsa::{RecoveryId, Signature, SigningKey, VerifyingKey};
use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::PublicKey;
use subtle_encoding::hex;

use crate::error::Ibft2ClientError;

pub const ADDRESS_LENGTH: usize = 20;
pub const SEAL_LENGTH: usize = 65;

/// Ethereum style address of a validator: the last 20 bytes of the
/// Keccak-256 hash of its uncompressed public key.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address([u8; ADDRESS_LENGTH]);

impl Address {
    pub fn from_bytes(bytes: [u8; ADDRESS_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn from_verifying_key(key: &VerifyingKey) -> Self {
        let point = PublicKey::from(key).to_encoded_point(false);
        // skip the 0x04 tag of the uncompressed encoding
        let hash = keccak256(&point.as_bytes()[1..]);
        let mut bytes = [0u8; ADDRESS_LENGTH];
        bytes.copy_from_slice(&hash[HASH_LENGTH - ADDRESS_LENGTH..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_LENGTH] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = Ibft2ClientError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        bytes
            .try_into()
            .map(Self)
            .map_err(|_| Ibft2ClientError::InvalidValidatorAddress(bytes.len()))
    }
}

impl From<Address> for Vec<u8> {
    fn from(address: Address) -> Self {
        address.0.to_vec()
    }
}

impl Display for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let encoded = hex::encode(self.0);
        match core::str::from_utf8(&encoded) {
            Ok(s) => write!(f, "0x{s}"),
            Err(_) => Err(FmtError),
        }
    }
}

impl Debug for Address {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        Display::fmt(self, f)
    }
}

/// A 65-byte recoverable secp256k1 signature `r || s || v` over the
/// signing digest of a header.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq)]
pub struct Seal(Vec<u8>);

impl Seal {
    /// Seals `digest` with the given validator key.
    pub fn sign(key: &SigningKey, digest: &[u8; HASH_LENGTH]) -> Result<Self, Ibft2ClientError> {
        let (signature, recovery_id) =
            key.sign_prehash_recoverable(digest)
                .map_err(|e| Ibft2ClientError::FailedToSign {
                    description: e.to_string(),
                })?;
        let mut bytes = signature.to_bytes().to_vec();
        bytes.push(recovery_id.to_byte());
        Ok(Self(bytes))
    }

    /// Recovers the address of the validator that sealed `digest`.
    pub fn recover(&self, digest: &[u8; HASH_LENGTH]) -> Result<Address, Ibft2ClientError> {
        let invalid = |description: String| Ibft2ClientError::InvalidSeal { description };

        let signature = Signature::from_slice(&self.0[..SEAL_LENGTH - 1])
            .map_err(|e| invalid(e.to_string()))?;
        // Besu encodes v as 0/1, other signers as 27/28
        let v = match self.0[SEAL_LENGTH - 1] {
            v @ 27..=28 => v - 27,
            v => v,
        };
        let recovery_id =
            RecoveryId::from_byte(v).ok_or_else(|| invalid(format!("invalid recovery id {v}")))?;
        let key = VerifyingKey::recover_from_prehash(digest, &signature, recovery_id)
            .map_err(|e| invalid(e.to_string()))?;

        Ok(Address::from_verifying_key(&key))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl TryFrom<Vec<u8>> for Seal {
    type Error = Ibft2ClientError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.len() != SEAL_LENGTH {
            return Err(Ibft2ClientError::InvalidSealLength(bytes.len()));
        }
        Ok(Self(bytes))
    }
}

impl From<Seal> for Vec<u8> {
    fn from(seal: Seal) -> Self {
        seal.0
    }
}

impl Debug for Seal {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), FmtError> {
        let encoded = hex::encode(&self.0);
        match core::str::from_utf8(&encoded) {
            Ok(s) => write!(f, "Seal(0x{s})"),
            Err(_) => Err(FmtError),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(seed: u8) -> SigningKey {
        SigningKey::from_slice(&[seed; 32]).unwrap()
    }

    #[test]
    fn seal_recovers_signer_address() {
        let signer = key(1);
        let digest = keccak256(b"header");
        let seal = Seal::sign(&signer, &digest).unwrap();

        assert_eq!(seal.as_bytes().len(), SEAL_LENGTH);
        assert_eq!(
            seal.recover(&digest).unwrap(),
            Address::from_verifying_key(signer.verifying_key())
        );
    }

    #[test]
    fn seal_over_other_digest_recovers_other_address() {
        let signer = key(2);
        let seal = Seal::sign(&signer, &keccak256(b"header")).unwrap();
        let recovered = seal.recover(&keccak256(b"forged")).ok();

        assert_ne!(
            recovered,
            Some(Address::from_verifying_key(signer.verifying_key()))
        );
    }

    #[test]
    fn legacy_recovery_byte_is_accepted() {
        let signer = key(3);
        let digest = keccak256(b"header");
        let mut bytes: Vec<u8> = Seal::sign(&signer, &digest).unwrap().into();
        bytes[SEAL_LENGTH - 1] += 27;
        let seal = Seal::try_from(bytes).unwrap();

        assert_eq!(
            seal.recover(&digest).unwrap(),
            Address::from_verifying_key(signer.verifying_key())
        );
    }

    #[test]
    fn malformed_seals_are_rejected() {
        assert!(matches!(
            Seal::try_from(vec![0u8; 64]),
            Err(Ibft2ClientError::InvalidSealLength(64))
        ));
        let zero = Seal::try_from(vec![0u8; SEAL_LENGTH]).unwrap();
        assert!(zero.recover(&keccak256(b"header")).is_err());
    }

    #[test]
    fn address_display_is_prefixed_hex() {
        let address = Address::from_bytes([0xab; ADDRESS_LENGTH]);
        assert_eq!(address.to_string(), format!("0x{}", "ab".repeat(20)));
        assert!(Address::try_from(&[1u8; 19][..]).is_err());
    }
}
