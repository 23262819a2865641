use std::collections::BTreeMap;

use ibc_core::commitment_types::merkle::{compute_root, prove, Hash, Leaves, SparseMerkleProof};
use ibc_core::host::types::key::keccak256;
use ibc_core::host::types::path::Path;
use tracing::trace;

use crate::context::Store;
use crate::error::StoreError;
use crate::types::{RawHeight, StoreHeight};

/// A snapshot of the store at one block. Values are raw bytes so stored
/// types choose their own encoding.
pub type State = BTreeMap<Path, Vec<u8>>;

/// Builds the Merkle leaves of a state: each entry sits at the storage slot
/// of its path and commits to the Keccak-256 hash of its value.
pub fn state_leaves(state: &State) -> Leaves {
    state
        .iter()
        .map(|(path, value)| (path.storage_slot(), keccak256(value)))
        .collect()
}

#[derive(Clone, Debug)]
struct Block {
    state: State,
    leaves: Leaves,
    root: Hash,
}

/// An in-memory store keeping one sealed snapshot per committed height.
#[derive(Clone, Debug, Default)]
pub struct InMemoryStore {
    /// snapshots of every retained block height
    blocks: BTreeMap<RawHeight, Block>,
    /// height of the last committed block
    height: RawHeight,
    /// pending block state
    pending: State,
}

impl InMemoryStore {
    fn get_block(&self, height: RawHeight) -> Option<&Block> {
        self.blocks.get(&height)
    }

    fn get_state(&self, height: StoreHeight) -> Option<&State> {
        match height {
            StoreHeight::Pending => Some(&self.pending),
            StoreHeight::Latest => self.get_block(self.height).map(|b| &b.state),
            StoreHeight::Stable(height) => self.get_block(height).map(|b| &b.state),
        }
    }
}

impl Store for InMemoryStore {
    fn set(&mut self, path: Path, value: Vec<u8>) -> Option<Vec<u8>> {
        trace!("set at path = {path}");
        self.pending.insert(path, value)
    }

    fn get(&self, height: StoreHeight, path: &Path) -> Option<Vec<u8>> {
        trace!("get at path = {path} at height = {height}");
        self.get_state(height).and_then(|s| s.get(path).cloned())
    }

    fn delete(&mut self, path: &Path) -> Option<Vec<u8>> {
        trace!("delete at path = {path}");
        self.pending.remove(path)
    }

    fn commit(&mut self) -> Result<Hash, StoreError> {
        let height = self.height + 1;
        let leaves = state_leaves(&self.pending);
        let root = compute_root(&leaves);
        trace!("committing height: {height}");

        self.blocks.insert(
            height,
            Block {
                state: self.pending.clone(),
                leaves,
                root,
            },
        );
        self.height = height;

        Ok(root)
    }

    fn prune(&mut self, height: RawHeight) -> Result<RawHeight, StoreError> {
        if height >= self.height {
            return Err(StoreError::MissingHeight {
                height,
                latest: self.height,
            });
        }
        trace!("pruning blocks up to height: {height}");
        self.blocks = self.blocks.split_off(&(height + 1));
        Ok(height)
    }

    fn current_height(&self) -> RawHeight {
        self.height
    }

    fn get_keys(&self, key_prefix: &str) -> Vec<Path> {
        self.pending
            .keys()
            .filter(|path| path.to_string().starts_with(key_prefix))
            .cloned()
            .collect()
    }

    fn root_hash(&self, height: StoreHeight) -> Option<Hash> {
        match height {
            StoreHeight::Pending => Some(compute_root(&state_leaves(&self.pending))),
            StoreHeight::Latest => self.get_block(self.height).map(|b| b.root),
            StoreHeight::Stable(height) => self.get_block(height).map(|b| b.root),
        }
    }

    fn get_proof(&self, height: StoreHeight, path: &Path) -> Option<SparseMerkleProof> {
        trace!("get proof at path = {path} at height = {height}");
        let slot = path.storage_slot();
        match height {
            StoreHeight::Pending => Some(prove(&state_leaves(&self.pending), &slot)),
            StoreHeight::Latest => self.get_block(self.height).map(|b| prove(&b.leaves, &slot)),
            StoreHeight::Stable(height) => self.get_block(height).map(|b| prove(&b.leaves, &slot)),
        }
    }
}

#[cfg(test)]
mod tests {
    use ibc_core::commitment_types::commitment::CommitmentRoot;
    use ibc_core::commitment_types::merkle::{verify_membership, verify_non_membership};
    use ibc_core::host::types::identifiers::ConnectionId;
    use ibc_core::host::types::path::ConnectionPath;

    use super::*;

    fn connection_path(n: u64) -> Path {
        ConnectionPath::new(&ConnectionId::new(n)).into()
    }

    #[test]
    fn committed_heights_keep_their_snapshot() {
        let mut store = InMemoryStore::default();
        store.set(connection_path(0), b"v1".to_vec());
        let first_root = store.commit().unwrap();
        store.set(connection_path(0), b"v2".to_vec());
        store.commit().unwrap();

        assert_eq!(store.current_height(), 2);
        assert_eq!(
            store.get(StoreHeight::Stable(1), &connection_path(0)),
            Some(b"v1".to_vec())
        );
        assert_eq!(
            store.get(StoreHeight::Latest, &connection_path(0)),
            Some(b"v2".to_vec())
        );
        assert_eq!(store.root_hash(StoreHeight::Stable(1)), Some(first_root));
    }

    #[test]
    fn pending_writes_are_invisible_until_committed() {
        let mut store = InMemoryStore::default();
        store.set(connection_path(0), b"v".to_vec());

        assert_eq!(store.get(StoreHeight::Latest, &connection_path(0)), None);
        assert!(store.get(StoreHeight::Pending, &connection_path(0)).is_some());
    }

    #[test]
    fn proofs_verify_against_the_root_of_their_height() {
        let mut store = InMemoryStore::default();
        store.set(connection_path(0), b"v".to_vec());
        store.set(connection_path(1), b"w".to_vec());
        store.commit().unwrap();
        store.delete(&connection_path(1));
        store.commit().unwrap();

        let root_1 = CommitmentRoot::from(store.root_hash(StoreHeight::Stable(1)).unwrap());
        let root_2 = CommitmentRoot::from(store.root_hash(StoreHeight::Stable(2)).unwrap());
        let path = connection_path(1);

        let proof = store.get_proof(StoreHeight::Stable(1), &path).unwrap();
        assert!(verify_membership(&root_1, &path.storage_slot(), &keccak256(b"w"), &proof).is_ok());

        let proof = store.get_proof(StoreHeight::Stable(2), &path).unwrap();
        assert!(verify_non_membership(&root_2, &path.storage_slot(), &proof).is_ok());
    }

    #[test]
    fn pruned_heights_are_gone() {
        let mut store = InMemoryStore::default();
        for n in 0..3 {
            store.set(connection_path(n), vec![1]);
            store.commit().unwrap();
        }

        assert_eq!(store.prune(2), Ok(2));
        assert!(store.get_proof(StoreHeight::Stable(1), &connection_path(0)).is_none());
        assert!(store.get_proof(StoreHeight::Stable(3), &connection_path(0)).is_some());
        assert!(store.prune(3).is_err());
    }

    #[test]
    fn keys_are_listed_by_prefix() {
        let mut store = InMemoryStore::default();
        store.set(connection_path(0), vec![1]);
        store.set(connection_path(1), vec![1]);

        assert_eq!(store.get_keys("connections/").len(), 2);
        assert!(store.get_keys("channelEnds/").is_empty());
    }
}
