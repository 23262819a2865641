//! Defines the relayer error type

use displaydoc::Display;
use ibc_core::client::types::Height;
use ibc_core::handler::types::error::{ContextError, ErrorKind};
use ibc_core::host::types::identifiers::{ChainId, ClientId};

#[derive(Debug, Display)]
pub enum RelayerError {
    /// transport failure talking to chain `{chain_id}`: {description}
    Transport {
        chain_id: ChainId,
        description: String,
    },
    /// transaction submission to chain `{chain_id}` failed: {description}
    Submission {
        chain_id: ChainId,
        description: String,
    },
    /// chain `{chain_id}` rejected the transaction with `{kind}`: {description}
    Rejected {
        chain_id: ChainId,
        kind: ErrorKind,
        description: String,
    },
    /// `{what}` not found on chain `{chain_id}`
    NotFound { chain_id: ChainId, what: String },
    /// transaction on chain `{chain_id}` emitted no `{expected}` event
    MissingEvent { chain_id: ChainId, expected: String },
    /// invalid proven value for `{what}` on chain `{chain_id}`: {description}
    InvalidValue {
        chain_id: ChainId,
        what: String,
        description: String,
    },
    /// client `{client_id}` on chain `{chain_id}` is at `{client_height}`, ahead of its counterparty at `{counterparty_height}`
    ClientAhead {
        chain_id: ChainId,
        client_id: ClientId,
        client_height: Height,
        counterparty_height: Height,
    },
    /// transaction signature from `{signer}` does not verify: {description}
    InvalidTxSignature { signer: String, description: String },
    /// failed to sign the transaction: {description}
    Signing { description: String },
    /// invalid configuration: {description}
    Config { description: String },
    /// runtime of chain `{chain_id}` is gone
    ChannelClosed { chain_id: ChainId },
    /// relay work item was cancelled
    Cancelled,
    /// gave up after `{attempts}` attempts: {last}
    RetriesExhausted {
        attempts: u32,
        last: Box<RelayerError>,
    },
}

impl RelayerError {
    /// Maps a handler error returned by a chain into a rejection.
    pub fn rejected(chain_id: &ChainId, e: &ContextError) -> Self {
        Self::Rejected {
            chain_id: chain_id.clone(),
            kind: e.kind(),
            description: e.to_string(),
        }
    }

    /// Returns true for failures worth retrying: the request may succeed if
    /// issued again. Protocol rejections are never transient.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. } | Self::Submission { .. })
    }

    /// The protocol error kind of a rejection, looking through exhausted
    /// retries.
    pub fn kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Rejected { kind, .. } => Some(*kind),
            Self::RetriesExhausted { last, .. } => last.kind(),
            _ => None,
        }
    }
}

impl std::error::Error for RelayerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::RetriesExhausted { last, .. } => Some(last.as_ref()),
            _ => None,
        }
    }
}
