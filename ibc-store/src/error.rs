use displaydoc::Display;
use ibc_core::client::types::Height;
use ibc_core::host::types::identifiers::{ClientId, Sequence};
use ibc_core::host::types::path::Path;

use crate::types::RawHeight;

#[derive(Debug, Display, PartialEq, Eq)]
pub enum StoreError {
    /// consensus state of client `{client_id}` at height `{height}` is already stored
    DuplicateHeight { client_id: ClientId, height: Height },
    /// sequence `{given}` at `{path}` must be greater than the stored `{current}`
    NonMonotonicSequence {
        path: Path,
        given: Sequence,
        current: Sequence,
    },
    /// failed to decode the value at `{path}`: `{description}`
    Decoding { path: Path, description: String },
    /// height `{height}` is not retained by the store (latest `{latest}`)
    MissingHeight { height: RawHeight, latest: RawHeight },
    /// the IBC host address cannot be empty
    EmptyHostAddress,
}

impl std::error::Error for StoreError {}
