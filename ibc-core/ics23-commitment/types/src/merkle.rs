//! Sparse binary Merkle tree over 256-bit storage slots.
//!
//! Leaves sit on the bit path of their slot. A subtree holding a single leaf
//! collapses into that leaf, so the depth of a leaf is the length of the
//! shortest prefix that distinguishes it from every other slot. Empty
//! subtrees hash to the zero hash.

use alloc::collections::BTreeMap;

use ibc_core_host_types::key::{keccak256, StorageSlot, HASH_LENGTH};
use ibc_primitives::prelude::*;
use prost::Message;

use crate::commitment::CommitmentRoot;
use crate::error::CommitmentError;

pub type Hash = [u8; HASH_LENGTH];

pub const ZERO_HASH: Hash = [0u8; HASH_LENGTH];

const LEAF_NODE_HASH_PREFIX: u8 = 0;
const INTERNAL_NODE_HASH_PREFIX: u8 = 1;
const KEY_BITS: usize = HASH_LENGTH * 8;

pub fn hash_leaf_node(slot: &StorageSlot, value_hash: &Hash) -> Hash {
    let mut preimage = Vec::with_capacity(1 + 2 * HASH_LENGTH);
    preimage.push(LEAF_NODE_HASH_PREFIX);
    preimage.extend_from_slice(slot.as_bytes());
    preimage.extend_from_slice(value_hash);
    keccak256(&preimage)
}

pub fn hash_internal_node(left: Option<&Hash>, right: Option<&Hash>) -> Hash {
    let mut preimage = Vec::with_capacity(1 + 2 * HASH_LENGTH);
    preimage.push(INTERNAL_NODE_HASH_PREFIX);
    preimage.extend_from_slice(left.unwrap_or(&ZERO_HASH));
    preimage.extend_from_slice(right.unwrap_or(&ZERO_HASH));
    keccak256(&preimage)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MerkleLeaf {
    pub slot: StorageSlot,
    pub value_hash: Hash,
}

impl MerkleLeaf {
    pub fn hash(&self) -> Hash {
        hash_leaf_node(&self.slot, &self.value_hash)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SparseMerkleProof {
    Membership {
        sibling_hashes: Vec<Option<Hash>>,
    },
    /// `leaf` is the collapsed leaf occupying the key's position, if any.
    NonMembership {
        leaf: Option<MerkleLeaf>,
        sibling_hashes: Vec<Option<Hash>>,
    },
}

impl SparseMerkleProof {
    fn kind(&self) -> &'static str {
        match self {
            Self::Membership { .. } => "membership",
            Self::NonMembership { .. } => "non-membership",
        }
    }

    pub fn encode_vec(self) -> Vec<u8> {
        RawSparseMerkleProof::from(self).encode_to_vec()
    }

    pub fn decode_vec(bytes: &[u8]) -> Result<Self, CommitmentError> {
        let raw = RawSparseMerkleProof::decode(bytes)
            .map_err(|e| CommitmentError::DecodingFailure(e.to_string()))?;
        Self::try_from(raw)
    }
}

#[derive(Clone, PartialEq, Message)]
pub struct RawMerkleLeaf {
    #[prost(bytes = "vec", tag = "1")]
    pub slot: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub value_hash: Vec<u8>,
}

/// Wire form of [`SparseMerkleProof`]. An empty sibling stands for an empty
/// subtree.
#[derive(Clone, PartialEq, Message)]
pub struct RawSparseMerkleProof {
    #[prost(bool, tag = "1")]
    pub membership: bool,
    #[prost(message, optional, tag = "2")]
    pub leaf: Option<RawMerkleLeaf>,
    #[prost(bytes = "vec", repeated, tag = "3")]
    pub sibling_hashes: Vec<Vec<u8>>,
}

fn to_hash(bytes: &[u8]) -> Result<Hash, CommitmentError> {
    bytes
        .try_into()
        .map_err(|_| CommitmentError::InvalidHashLength(bytes.len()))
}

impl TryFrom<RawSparseMerkleProof> for SparseMerkleProof {
    type Error = CommitmentError;

    fn try_from(raw: RawSparseMerkleProof) -> Result<Self, Self::Error> {
        if raw.sibling_hashes.len() > KEY_BITS {
            return Err(CommitmentError::ProofTooDeep(raw.sibling_hashes.len()));
        }
        let sibling_hashes = raw
            .sibling_hashes
            .iter()
            .map(|h| {
                if h.is_empty() {
                    Ok(None)
                } else {
                    to_hash(h).map(Some)
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        if raw.membership {
            return Ok(Self::Membership { sibling_hashes });
        }
        let leaf = raw
            .leaf
            .map(|leaf| -> Result<_, CommitmentError> {
                Ok(MerkleLeaf {
                    slot: StorageSlot::from_bytes(to_hash(&leaf.slot)?),
                    value_hash: to_hash(&leaf.value_hash)?,
                })
            })
            .transpose()?;
        Ok(Self::NonMembership {
            leaf,
            sibling_hashes,
        })
    }
}

impl From<SparseMerkleProof> for RawSparseMerkleProof {
    fn from(proof: SparseMerkleProof) -> Self {
        let encode_siblings = |siblings: Vec<Option<Hash>>| {
            siblings
                .into_iter()
                .map(|h| h.map(|h| h.to_vec()).unwrap_or_default())
                .collect()
        };
        match proof {
            SparseMerkleProof::Membership { sibling_hashes } => Self {
                membership: true,
                leaf: None,
                sibling_hashes: encode_siblings(sibling_hashes),
            },
            SparseMerkleProof::NonMembership {
                leaf,
                sibling_hashes,
            } => Self {
                membership: false,
                leaf: leaf.map(|leaf| RawMerkleLeaf {
                    slot: leaf.slot.as_bytes().to_vec(),
                    value_hash: leaf.value_hash.to_vec(),
                }),
                sibling_hashes: encode_siblings(sibling_hashes),
            },
        }
    }
}

/// Set of leaves from which roots and proofs are computed.
pub type Leaves = BTreeMap<StorageSlot, Hash>;

fn subtree_hash(leaves: &[(&StorageSlot, &Hash)], depth: usize) -> Option<Hash> {
    match leaves {
        [] => None,
        [(slot, value_hash)] => Some(hash_leaf_node(slot, value_hash)),
        _ => {
            // leaves are sorted, so the ones with a zero bit come first
            let split = leaves.partition_point(|(slot, _)| !slot.bit(depth));
            let (left, right) = leaves.split_at(split);
            Some(hash_internal_node(
                subtree_hash(left, depth + 1).as_ref(),
                subtree_hash(right, depth + 1).as_ref(),
            ))
        }
    }
}

pub fn compute_root(leaves: &Leaves) -> Hash {
    let leaves: Vec<_> = leaves.iter().collect();
    subtree_hash(&leaves, 0).unwrap_or(ZERO_HASH)
}

/// Builds a membership proof if `slot` is present, a non-membership proof
/// otherwise.
pub fn prove(leaves: &Leaves, slot: &StorageSlot) -> SparseMerkleProof {
    let all: Vec<_> = leaves.iter().collect();
    let mut current: &[(&StorageSlot, &Hash)] = &all;
    let mut sibling_hashes = Vec::new();
    let mut depth = 0;

    loop {
        match current {
            [] => break,
            [(leaf_slot, value_hash)] => {
                sibling_hashes.reverse();
                if *leaf_slot == slot {
                    return SparseMerkleProof::Membership { sibling_hashes };
                }
                return SparseMerkleProof::NonMembership {
                    leaf: Some(MerkleLeaf {
                        slot: **leaf_slot,
                        value_hash: **value_hash,
                    }),
                    sibling_hashes,
                };
            }
            _ => {
                let split = current.partition_point(|(s, _)| !s.bit(depth));
                let (left, right) = current.split_at(split);
                let (next, sibling) = if slot.bit(depth) {
                    (right, left)
                } else {
                    (left, right)
                };
                sibling_hashes.push(subtree_hash(sibling, depth + 1));
                current = next;
                depth += 1;
            }
        }
    }

    sibling_hashes.reverse();
    SparseMerkleProof::NonMembership {
        leaf: None,
        sibling_hashes,
    }
}

/// Verifies that `slot` maps to `value_hash` under `root`.
pub fn verify_membership(
    root: &CommitmentRoot,
    slot: &StorageSlot,
    value_hash: &Hash,
    proof: &SparseMerkleProof,
) -> Result<(), CommitmentError> {
    let SparseMerkleProof::Membership { sibling_hashes } = proof else {
        return Err(CommitmentError::IncorrectProofType {
            expected: "membership",
            actual: proof.kind(),
        });
    };

    let hash = hash_leaf_node(slot, value_hash);
    compute_and_compare_root_hash(root, slot, sibling_hashes, Some(hash))
}

/// Verifies that nothing is stored at `slot` under `root`.
pub fn verify_non_membership(
    root: &CommitmentRoot,
    slot: &StorageSlot,
    proof: &SparseMerkleProof,
) -> Result<(), CommitmentError> {
    let SparseMerkleProof::NonMembership {
        leaf,
        sibling_hashes,
    } = proof
    else {
        return Err(CommitmentError::IncorrectProofType {
            expected: "non-membership",
            actual: proof.kind(),
        });
    };

    let hash = match leaf {
        Some(leaf) => {
            if leaf.slot == *slot {
                return Err(CommitmentError::LeafIsKey);
            }
            if (0..sibling_hashes.len()).any(|i| leaf.slot.bit(i) != slot.bit(i)) {
                return Err(CommitmentError::NotCommonPrefix);
            }
            Some(leaf.hash())
        }
        None => None,
    };

    compute_and_compare_root_hash(root, slot, sibling_hashes, hash)
}

fn compute_and_compare_root_hash(
    root: &CommitmentRoot,
    slot: &StorageSlot,
    sibling_hashes: &[Option<Hash>],
    mut hash: Option<Hash>,
) -> Result<(), CommitmentError> {
    if sibling_hashes.len() > KEY_BITS {
        return Err(CommitmentError::ProofTooDeep(sibling_hashes.len()));
    }
    let expected = root.to_hash()?;

    // siblings are ordered from the deepest level up to the root
    for (depth, sibling) in (0..sibling_hashes.len()).rev().zip(sibling_hashes) {
        hash = Some(if slot.bit(depth) {
            hash_internal_node(sibling.as_ref(), hash.as_ref())
        } else {
            hash_internal_node(hash.as_ref(), sibling.as_ref())
        });
    }

    let computed = hash.unwrap_or(ZERO_HASH);
    if computed != expected {
        return Err(CommitmentError::RootHashMismatch {
            computed: format!("{:?}", StorageSlot::from_bytes(computed)),
            expected: format!("{:?}", StorageSlot::from_bytes(expected)),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slot(first: u8, last: u8) -> StorageSlot {
        let mut bytes = [0u8; HASH_LENGTH];
        bytes[0] = first;
        bytes[HASH_LENGTH - 1] = last;
        StorageSlot::from_bytes(bytes)
    }

    fn leaves(slots: &[StorageSlot]) -> Leaves {
        slots
            .iter()
            .enumerate()
            .map(|(i, s)| (*s, keccak256(&[u8::try_from(i).unwrap()])))
            .collect()
    }

    fn sample() -> (Leaves, CommitmentRoot) {
        let leaves = leaves(&[
            slot(0b0000_0000, 1),
            slot(0b0000_0000, 2),
            slot(0b0100_0000, 0),
            slot(0b1000_0000, 0),
            slot(0b1110_0000, 0),
        ]);
        let root = CommitmentRoot::from(compute_root(&leaves));
        (leaves, root)
    }

    #[test]
    fn empty_tree_has_zero_root() {
        let empty = Leaves::new();
        assert_eq!(compute_root(&empty), ZERO_HASH);
        let key = slot(1, 1);
        let proof = prove(&empty, &key);
        assert!(verify_non_membership(&CommitmentRoot::from(ZERO_HASH), &key, &proof).is_ok());
    }

    #[test]
    fn single_leaf_root_is_leaf_hash() {
        let leaves = leaves(&[slot(7, 7)]);
        let (key, value) = leaves.iter().next().unwrap();
        assert_eq!(compute_root(&leaves), hash_leaf_node(key, value));
    }

    #[test]
    fn every_leaf_has_a_valid_membership_proof() {
        let (leaves, root) = sample();
        for (key, value) in &leaves {
            let proof = prove(&leaves, key);
            assert!(verify_membership(&root, key, value, &proof).is_ok());
            // encoded form survives the wire
            let decoded = SparseMerkleProof::decode_vec(&proof.clone().encode_vec()).unwrap();
            assert_eq!(decoded, proof);
        }
    }

    #[test]
    fn membership_fails_for_wrong_value_or_root() {
        let (leaves, root) = sample();
        let (key, _) = leaves.iter().next().unwrap();
        let proof = prove(&leaves, key);
        assert!(verify_membership(&root, key, &keccak256(b"other"), &proof).is_err());
        let other_root = CommitmentRoot::from(keccak256(b"root"));
        let value = leaves.get(key).unwrap();
        assert!(verify_membership(&other_root, key, value, &proof).is_err());
        assert!(verify_non_membership(&root, key, &proof).is_err());
    }

    #[test]
    fn absent_keys_have_valid_non_membership_proofs() {
        let (leaves, root) = sample();
        // collapsed leaf on the path, empty subtree on the path, deep split
        for key in [slot(0b1100_0000, 0), slot(0b0010_0000, 0), slot(0, 3)] {
            let proof = prove(&leaves, &key);
            assert!(matches!(proof, SparseMerkleProof::NonMembership { .. }));
            assert!(verify_non_membership(&root, &key, &proof).is_ok());
            assert!(verify_membership(&root, &key, &ZERO_HASH, &proof).is_err());
        }
    }

    #[test]
    fn non_membership_proof_cannot_hide_present_key() {
        let (leaves, root) = sample();
        let present = slot(0b0100_0000, 0);
        let absent = slot(0b0110_0000, 0);
        let forged = prove(&leaves, &absent);
        assert!(verify_non_membership(&root, &present, &forged).is_err());
    }

    #[test]
    fn malformed_proof_bytes_are_rejected() {
        let raw = RawSparseMerkleProof {
            membership: true,
            leaf: None,
            sibling_hashes: vec![vec![1, 2, 3]],
        };
        assert_eq!(
            SparseMerkleProof::try_from(raw),
            Err(CommitmentError::InvalidHashLength(3))
        );
        assert!(SparseMerkleProof::decode_vec(&[0xff, 0xff]).is_err());
    }
}
