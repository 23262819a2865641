use std::fmt::Debug;

use ibc_core::commitment_types::merkle::{Hash, SparseMerkleProof};
use ibc_core::host::types::path::Path;

use crate::error::StoreError;
use crate::types::{RawHeight, StoreHeight};

/// A versioned key-value backend keyed by IBC paths.
///
/// Writes land in a pending block until `commit` seals them into a new
/// height. Each sealed height keeps the root of the sparse Merkle tree built
/// over its entries, so proofs can be served for any retained height.
pub trait Store: Debug {
    /// Set `value` for `path`, returning the previous pending value
    fn set(&mut self, path: Path, value: Vec<u8>) -> Option<Vec<u8>>;

    /// Get associated `value` for `path` at specified `height`
    fn get(&self, height: StoreHeight, path: &Path) -> Option<Vec<u8>>;

    /// Delete `path` from the pending block, returning the removed value
    fn delete(&mut self, path: &Path) -> Option<Vec<u8>>;

    /// Commit `Pending` block to canonical chain and create new `Pending`.
    /// Returns the root of the committed block.
    fn commit(&mut self) -> Result<Hash, StoreError>;

    /// Prune historic blocks up to specified `height`
    fn prune(&mut self, height: RawHeight) -> Result<RawHeight, StoreError> {
        Ok(height)
    }

    /// Return the current height of the chain
    fn current_height(&self) -> RawHeight;

    /// Return all pending paths whose string form starts with `key_prefix`
    fn get_keys(&self, key_prefix: &str) -> Vec<Path>;

    /// Return the state root at `height`
    fn root_hash(&self, height: StoreHeight) -> Option<Hash>;

    /// Return a membership or non-membership proof for `path` at `height`
    fn get_proof(&self, height: StoreHeight, path: &Path) -> Option<SparseMerkleProof>;
}
