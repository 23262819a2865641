//! Defines core commitment types

use core::fmt;

use ibc_core_host_types::key::{keccak256, HASH_LENGTH};
use ibc_primitives::prelude::*;
use subtle_encoding::{Encoding, Hex};

use crate::error::CommitmentError;
use crate::merkle::SparseMerkleProof;

fn hex_upper(bytes: &[u8]) -> Result<String, fmt::Error> {
    Hex::upper_case()
        .encode_to_string(bytes)
        .map_err(|_| fmt::Error)
}

/// Encodes a commitment root; the root hash of the provable store tree.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, PartialEq, Eq)]
pub struct CommitmentRoot {
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentRoot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommitmentRoot")
            .field(&hex_upper(&self.bytes)?)
            .finish()
    }
}

impl CommitmentRoot {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: Vec::from(bytes),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Interprets the root as a 32-byte hash.
    pub fn to_hash(&self) -> Result<[u8; HASH_LENGTH], CommitmentError> {
        self.bytes
            .as_slice()
            .try_into()
            .map_err(|_| CommitmentError::InvalidHashLength(self.bytes.len()))
    }
}

impl From<Vec<u8>> for CommitmentRoot {
    fn from(bytes: Vec<u8>) -> Self {
        Self { bytes }
    }
}

impl From<[u8; HASH_LENGTH]> for CommitmentRoot {
    fn from(bytes: [u8; HASH_LENGTH]) -> Self {
        Self::from_bytes(&bytes)
    }
}

/// Demonstrates membership or non-membership of a store entry, verifiable
/// in conjunction with a known commitment root.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Clone, PartialEq, Eq, derive_more::AsRef, derive_more::Into)]
#[as_ref(forward)]
pub struct CommitmentProofBytes {
    bytes: Vec<u8>,
}

impl fmt::Debug for CommitmentProofBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommitmentProof")
            .field(&hex_upper(&self.bytes)?)
            .finish()
    }
}

impl TryFrom<Vec<u8>> for CommitmentProofBytes {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::EmptyMerkleProof)
        } else {
            Ok(Self { bytes })
        }
    }
}

impl From<SparseMerkleProof> for CommitmentProofBytes {
    fn from(proof: SparseMerkleProof) -> Self {
        Self {
            bytes: proof.encode_vec(),
        }
    }
}

impl<'a> TryFrom<&'a CommitmentProofBytes> for SparseMerkleProof {
    type Error = CommitmentError;

    fn try_from(value: &'a CommitmentProofBytes) -> Result<Self, Self::Error> {
        SparseMerkleProof::decode_vec(value.as_ref())
    }
}

/// Defines a store prefix of the commitment proof. On EVM hosts this is the
/// address of the contract holding the provable store.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CommitmentPrefix {
    bytes: Vec<u8>,
}

impl CommitmentPrefix {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    pub fn empty() -> Self {
        Self { bytes: Vec::new() }
    }
}

impl TryFrom<Vec<u8>> for CommitmentPrefix {
    type Error = CommitmentError;

    fn try_from(bytes: Vec<u8>) -> Result<Self, Self::Error> {
        if bytes.is_empty() {
            Err(Self::Error::EmptyCommitmentPrefix)
        } else {
            Ok(Self { bytes })
        }
    }
}

impl fmt::Debug for CommitmentPrefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex_upper(&self.bytes)?)
    }
}

/// The hash a provable store publishes for a stored object.
///
/// Absent objects commit to the zero hash.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CommitmentHash([u8; HASH_LENGTH]);

impl CommitmentHash {
    pub const ZERO: CommitmentHash = CommitmentHash([0u8; HASH_LENGTH]);

    /// Commits to the serialized form of an object.
    pub fn of(bytes: &[u8]) -> Self {
        Self(keccak256(bytes))
    }

    pub fn from_bytes(bytes: [u8; HASH_LENGTH]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; HASH_LENGTH] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; HASH_LENGTH]
    }
}

impl fmt::Debug for CommitmentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("CommitmentHash")
            .field(&hex_upper(&self.0)?)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_proof_bytes_are_rejected() {
        assert_eq!(
            CommitmentProofBytes::try_from(Vec::new()),
            Err(CommitmentError::EmptyMerkleProof)
        );
    }

    #[test]
    fn commitment_hash_of_bytes_is_not_zero() {
        assert!(CommitmentHash::default().is_zero());
        assert!(!CommitmentHash::of(b"").is_zero());
        assert_eq!(CommitmentHash::of(b"abc"), CommitmentHash::of(b"abc"));
    }
}
