//! Defines the trait to be implemented by all concrete consensus state types

use ibc_core_commitment_types::commitment::CommitmentRoot;
use ibc_primitives::prelude::*;
use ibc_primitives::Timestamp;

/// Defines methods that all `ConsensusState`s should provide.
///
/// A consensus state is the pruned header kept on chain: the state root and
/// timestamp the handlers verify proofs against.
pub trait ConsensusState: Send + Sync {
    /// Commitment root of the consensus state, which is used for key-value pair verification.
    fn root(&self) -> &CommitmentRoot;

    /// The timestamp of the consensus state
    fn timestamp(&self) -> Timestamp;

    /// Serializes the `ConsensusState` through its raw protobuf type.
    fn encode_vec(self) -> Vec<u8>;
}
