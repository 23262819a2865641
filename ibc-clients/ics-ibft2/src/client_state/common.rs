use ibc_client_ibft2_types::{
    client_type as ibft2_client_type, Address, ClientState as ClientStateType,
};
use ibc_core_client::context::client_state::ClientStateCommon;
use ibc_core_client::types::error::ClientError;
use ibc_core_client::types::Height;
use ibc_core_commitment_types::commitment::{
    CommitmentPrefix, CommitmentProofBytes, CommitmentRoot,
};
use ibc_core_commitment_types::merkle::{self, SparseMerkleProof};
use ibc_core_host::types::identifiers::ClientType;
use ibc_core_host::types::key::keccak256;
use ibc_core_host::types::path::Path;
use ibc_primitives::prelude::*;
use ibc_primitives::proto::Any;

use super::ClientState;
use crate::consensus_state::ConsensusState as Ibft2ConsensusState;

impl ClientStateCommon for ClientState {
    fn verify_consensus_state(&self, consensus_state: Any) -> Result<(), ClientError> {
        verify_consensus_state(consensus_state)
    }

    fn client_type(&self) -> ClientType {
        ibft2_client_type()
    }

    fn latest_height(&self) -> Height {
        self.0.latest_height
    }

    fn validate_proof_height(&self, proof_height: Height) -> Result<(), ClientError> {
        validate_proof_height(self.inner(), proof_height)
    }

    fn verify_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
        value: Vec<u8>,
    ) -> Result<(), ClientError> {
        verify_membership(self.inner(), prefix, proof, root, path, value)
    }

    fn verify_non_membership(
        &self,
        prefix: &CommitmentPrefix,
        proof: &CommitmentProofBytes,
        root: &CommitmentRoot,
        path: Path,
    ) -> Result<(), ClientError> {
        verify_non_membership(self.inner(), prefix, proof, root, path)
    }
}

/// Verify an `Any` consensus state by attempting to convert it to an IBFT2
/// `ConsensusState`, which checks the root, timestamp and validator set.
pub fn verify_consensus_state(consensus_state: Any) -> Result<(), ClientError> {
    Ibft2ConsensusState::try_from(consensus_state)?;

    Ok(())
}

/// Validate the given proof height against the client state's latest height,
/// returning an error if the proof height is greater than the latest height.
pub fn validate_proof_height(
    client_state: &ClientStateType,
    proof_height: Height,
) -> Result<(), ClientError> {
    let latest_height = client_state.latest_height;

    if latest_height < proof_height {
        return Err(ClientError::InvalidProofHeight {
            actual: proof_height,
            latest: latest_height,
        });
    }

    Ok(())
}

/// Proofs are only accepted for the store the client was created to track.
fn verify_prefix(
    client_state: &ClientStateType,
    prefix: &CommitmentPrefix,
) -> Result<(), ClientError> {
    if prefix.as_bytes() != client_state.ibc_store_address.as_slice() {
        let expected = Address::try_from(client_state.ibc_store_address.as_slice())
            .map(|address| address.to_string())
            .unwrap_or_default();
        return Err(ClientError::MismatchedCommitmentPrefix { expected });
    }

    Ok(())
}

/// Verifies a sparse Merkle proof that `keccak256(value)` sits at the storage
/// slot of `path` in the store rooted at `root`.
pub fn verify_membership(
    client_state: &ClientStateType,
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
    value: Vec<u8>,
) -> Result<(), ClientError> {
    verify_prefix(client_state, prefix)?;

    let proof = SparseMerkleProof::try_from(proof)?;

    merkle::verify_membership(root, &path.storage_slot(), &keccak256(&value), &proof)?;

    Ok(())
}

/// Verifies a sparse Merkle proof that the storage slot of `path` is empty
/// in the store rooted at `root`.
pub fn verify_non_membership(
    client_state: &ClientStateType,
    prefix: &CommitmentPrefix,
    proof: &CommitmentProofBytes,
    root: &CommitmentRoot,
    path: Path,
) -> Result<(), ClientError> {
    verify_prefix(client_state, prefix)?;

    let proof = SparseMerkleProof::try_from(proof)?;

    merkle::verify_non_membership(root, &path.storage_slot(), &proof)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use ibc_core_commitment_types::merkle::{compute_root, prove, Leaves};
    use ibc_core_host::types::identifiers::{ChainId, ChannelId, PortId, Sequence};
    use ibc_core_host::types::path::{CommitmentPath, ReceiptPath};

    use super::*;

    const STORE: [u8; 20] = [0x11; 20];

    fn client_state() -> ClientStateType {
        ClientStateType::new(
            ChainId::new("ibc-besu-0").unwrap(),
            STORE.to_vec(),
            Height::new(0, 10).unwrap(),
        )
        .unwrap()
    }

    fn commitment_path(sequence: u64) -> Path {
        Path::Commitment(CommitmentPath::new(
            &PortId::transfer(),
            &ChannelId::new(0),
            Sequence::from(sequence),
        ))
    }

    fn store_with(entries: &[(Path, &[u8])]) -> (Leaves, CommitmentRoot) {
        let leaves: Leaves = entries
            .iter()
            .map(|(path, value)| (path.storage_slot(), keccak256(value)))
            .collect();
        let root = CommitmentRoot::from(compute_root(&leaves));
        (leaves, root)
    }

    fn prefix(bytes: &[u8]) -> CommitmentPrefix {
        CommitmentPrefix::try_from(bytes.to_vec()).unwrap()
    }

    #[test]
    fn membership_proof_is_checked_against_value() {
        let path = commitment_path(1);
        let (leaves, root) = store_with(&[(path.clone(), b"packet"), (commitment_path(2), b"x")]);
        let proof = CommitmentProofBytes::from(prove(&leaves, &path.storage_slot()));

        assert!(verify_membership(
            &client_state(),
            &prefix(&STORE),
            &proof,
            &root,
            path.clone(),
            b"packet".to_vec()
        )
        .is_ok());
        assert!(matches!(
            verify_membership(
                &client_state(),
                &prefix(&STORE),
                &proof,
                &root,
                path,
                b"forged".to_vec()
            ),
            Err(ClientError::FailedProofVerification(_))
        ));
    }

    #[test]
    fn non_membership_proof_for_absent_receipt() {
        let receipt = Path::Receipt(ReceiptPath::new(
            &PortId::transfer(),
            &ChannelId::new(0),
            Sequence::from(7),
        ));
        let (leaves, root) = store_with(&[(commitment_path(1), b"packet")]);
        let proof = CommitmentProofBytes::from(prove(&leaves, &receipt.storage_slot()));

        assert!(
            verify_non_membership(&client_state(), &prefix(&STORE), &proof, &root, receipt)
                .is_ok()
        );
    }

    #[test]
    fn proofs_for_another_store_are_rejected() {
        let path = commitment_path(1);
        let (leaves, root) = store_with(&[(path.clone(), b"packet")]);
        let proof = CommitmentProofBytes::from(prove(&leaves, &path.storage_slot()));

        assert!(matches!(
            verify_membership(
                &client_state(),
                &prefix(&[0x22; 20]),
                &proof,
                &root,
                path,
                b"packet".to_vec()
            ),
            Err(ClientError::MismatchedCommitmentPrefix { .. })
        ));
    }

    #[test]
    fn garbage_proof_bytes_fail_closed() {
        let proof = CommitmentProofBytes::try_from(vec![0xff; 16]).unwrap();
        let root = CommitmentRoot::from([0u8; 32]);

        assert!(verify_non_membership(
            &client_state(),
            &prefix(&STORE),
            &proof,
            &root,
            commitment_path(1)
        )
        .is_err());
    }

    #[test]
    fn proof_height_above_latest_is_rejected() {
        assert!(validate_proof_height(&client_state(), Height::new(0, 10).unwrap()).is_ok());
        assert!(matches!(
            validate_proof_height(&client_state(), Height::new(0, 11).unwrap()),
            Err(ClientError::InvalidProofHeight { .. })
        ));
    }
}
