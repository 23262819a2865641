//! Defines the commitment error type

use displaydoc::Display;
use ibc_primitives::prelude::*;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum CommitmentError {
    /// empty commitment prefix
    EmptyCommitmentPrefix,
    /// empty merkle proof
    EmptyMerkleProof,
    /// empty merkle root
    EmptyMerkleRoot,
    /// invalid hash length: expected 32 bytes, got `{0}`
    InvalidHashLength(usize),
    /// proof of depth `{0}` exceeds the key length
    ProofTooDeep(usize),
    /// incorrect proof type: expected `{expected}`, got `{actual}`
    IncorrectProofType {
        expected: &'static str,
        actual: &'static str,
    },
    /// non-membership proof carries a leaf for the key itself
    LeafIsKey,
    /// non-membership proof node does not share the key prefix
    NotCommonPrefix,
    /// root hash mismatch: computed `{computed}`, expected `{expected}`
    RootHashMismatch { computed: String, expected: String },
    /// decoding commitment proof bytes failed: `{0}`
    DecodingFailure(String),
}

#[cfg(feature = "std")]
impl std::error::Error for CommitmentError {}
