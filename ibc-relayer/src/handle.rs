//! Message-passing access to a chain.
//!
//! Each chain is served by its own runtime task. A [`ChainHandle`] turns
//! method calls into [`ChainRequest`]s and waits for the reply. The runtime
//! answers queries on separate tasks so they proceed in parallel, and
//! performs submissions in arrival order, one at a time.

use std::sync::Arc;

use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::packet::Packet;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::host::types::identifiers::{ChainId, ChannelId, ClientId, PortId, Sequence};
use ibc_core::host::types::path::Path;
use ibc_primitives::proto::Any;
use ibc_primitives::Signer;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::chain::{Chain, ChainStatus, ClientInit, ProvenValue, TxResponse};
use crate::error::RelayerError;
use crate::signer::SigningContext;

type Reply<T> = oneshot::Sender<Result<T, RelayerError>>;

#[derive(Debug)]
pub enum ChainRequest {
    Status {
        reply: Reply<ChainStatus>,
    },
    CommitmentPrefix {
        reply: Reply<CommitmentPrefix>,
    },
    ClientLatestHeight {
        client_id: ClientId,
        reply: Reply<Height>,
    },
    ClientsTracking {
        chain_id: ChainId,
        reply: Reply<Vec<ClientId>>,
    },
    ClientInit {
        reply: Reply<ClientInit>,
    },
    Header {
        trusted_height: Height,
        target_height: Height,
        reply: Reply<Any>,
    },
    Proven {
        path: Path,
        height: Height,
        reply: Reply<ProvenValue>,
    },
    PendingPackets {
        port_id: PortId,
        channel_id: ChannelId,
        reply: Reply<Vec<Packet>>,
    },
    WrittenAck {
        port_id: PortId,
        channel_id: ChannelId,
        sequence: Sequence,
        reply: Reply<Option<Acknowledgement>>,
    },
    Submit {
        messages: Vec<Any>,
        reply: Reply<TxResponse>,
    },
}

/// Cheap to clone; all clones talk to the same runtime.
#[derive(Clone, Debug)]
pub struct ChainHandle {
    chain_id: ChainId,
    signer: Signer,
    sender: mpsc::UnboundedSender<ChainRequest>,
}

/// Starts the runtime of `chain`, which signs its submissions with
/// `signing`. The runtime stops once every handle is dropped.
pub fn spawn_chain_runtime<C: Chain>(
    chain: C,
    signing: SigningContext,
) -> (ChainHandle, JoinHandle<()>) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let handle = ChainHandle {
        chain_id: chain.id(),
        signer: signing.signer(),
        sender,
    };
    let task = tokio::spawn(run(Arc::new(chain), signing, receiver));
    (handle, task)
}

async fn run<C: Chain>(
    chain: Arc<C>,
    signing: SigningContext,
    mut receiver: mpsc::UnboundedReceiver<ChainRequest>,
) {
    debug!(chain_id = %chain.id(), "chain runtime started");

    while let Some(request) = receiver.recv().await {
        match request {
            ChainRequest::Submit { messages, reply } => {
                trace!(chain_id = %chain.id(), messages = messages.len(), "submitting");
                // the receiver is gone if the caller was cancelled
                let _ = reply.send(chain.submit(&signing, messages).await);
            }
            query => {
                let chain = Arc::clone(&chain);
                tokio::spawn(async move { serve_query(chain.as_ref(), query).await });
            }
        }
    }

    debug!(chain_id = %chain.id(), "chain runtime stopped");
}

async fn serve_query<C: Chain>(chain: &C, request: ChainRequest) {
    // replies to dropped receivers are discarded
    match request {
        ChainRequest::Status { reply } => {
            let _ = reply.send(chain.query_status().await);
        }
        ChainRequest::CommitmentPrefix { reply } => {
            let _ = reply.send(chain.query_commitment_prefix().await);
        }
        ChainRequest::ClientLatestHeight { client_id, reply } => {
            let _ = reply.send(chain.query_client_latest_height(&client_id).await);
        }
        ChainRequest::ClientsTracking { chain_id, reply } => {
            let _ = reply.send(chain.query_clients_tracking(&chain_id).await);
        }
        ChainRequest::ClientInit { reply } => {
            let _ = reply.send(chain.query_client_init().await);
        }
        ChainRequest::Header {
            trusted_height,
            target_height,
            reply,
        } => {
            let _ = reply.send(chain.query_header(trusted_height, target_height).await);
        }
        ChainRequest::Proven {
            path,
            height,
            reply,
        } => {
            let _ = reply.send(chain.query_proven(path, height).await);
        }
        ChainRequest::PendingPackets {
            port_id,
            channel_id,
            reply,
        } => {
            let _ = reply.send(chain.query_pending_packets(&port_id, &channel_id).await);
        }
        ChainRequest::WrittenAck {
            port_id,
            channel_id,
            sequence,
            reply,
        } => {
            let _ = reply.send(
                chain
                    .query_written_ack(&port_id, &channel_id, sequence)
                    .await,
            );
        }
        ChainRequest::Submit { reply, .. } => {
            let _ = reply.send(Err(RelayerError::Submission {
                chain_id: chain.id(),
                description: "submissions are not served as queries".to_string(),
            }));
        }
    }
}

impl ChainHandle {
    pub fn id(&self) -> &ChainId {
        &self.chain_id
    }

    /// The signer of this chain's relayer key, as put into IBC messages.
    pub fn signer(&self) -> Signer {
        self.signer.clone()
    }

    async fn request<T>(
        &self,
        request: impl FnOnce(Reply<T>) -> ChainRequest,
    ) -> Result<T, RelayerError> {
        let closed = || RelayerError::ChannelClosed {
            chain_id: self.chain_id.clone(),
        };

        let (reply, response) = oneshot::channel();
        self.sender.send(request(reply)).map_err(|_| closed())?;
        response.await.map_err(|_| closed())?
    }

    pub async fn query_status(&self) -> Result<ChainStatus, RelayerError> {
        self.request(|reply| ChainRequest::Status { reply }).await
    }

    pub async fn query_commitment_prefix(&self) -> Result<CommitmentPrefix, RelayerError> {
        self.request(|reply| ChainRequest::CommitmentPrefix { reply })
            .await
    }

    pub async fn query_client_latest_height(
        &self,
        client_id: &ClientId,
    ) -> Result<Height, RelayerError> {
        self.request(|reply| ChainRequest::ClientLatestHeight {
            client_id: client_id.clone(),
            reply,
        })
        .await
    }

    pub async fn query_clients_tracking(
        &self,
        chain_id: &ChainId,
    ) -> Result<Vec<ClientId>, RelayerError> {
        self.request(|reply| ChainRequest::ClientsTracking {
            chain_id: chain_id.clone(),
            reply,
        })
        .await
    }

    pub async fn query_client_init(&self) -> Result<ClientInit, RelayerError> {
        self.request(|reply| ChainRequest::ClientInit { reply }).await
    }

    pub async fn query_header(
        &self,
        trusted_height: Height,
        target_height: Height,
    ) -> Result<Any, RelayerError> {
        self.request(|reply| ChainRequest::Header {
            trusted_height,
            target_height,
            reply,
        })
        .await
    }

    pub async fn query_proven(
        &self,
        path: impl Into<Path>,
        height: Height,
    ) -> Result<ProvenValue, RelayerError> {
        let path = path.into();
        self.request(|reply| ChainRequest::Proven {
            path,
            height,
            reply,
        })
        .await
    }

    pub async fn query_pending_packets(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
    ) -> Result<Vec<Packet>, RelayerError> {
        self.request(|reply| ChainRequest::PendingPackets {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            reply,
        })
        .await
    }

    pub async fn query_written_ack(
        &self,
        port_id: &PortId,
        channel_id: &ChannelId,
        sequence: Sequence,
    ) -> Result<Option<Acknowledgement>, RelayerError> {
        self.request(|reply| ChainRequest::WrittenAck {
            port_id: port_id.clone(),
            channel_id: channel_id.clone(),
            sequence,
            reply,
        })
        .await
    }

    pub async fn submit(&self, messages: Vec<Any>) -> Result<TxResponse, RelayerError> {
        self.request(|reply| ChainRequest::Submit { messages, reply })
            .await
    }
}
