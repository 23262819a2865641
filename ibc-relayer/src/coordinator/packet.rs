//! Packet relaying: receive and acknowledge, or time out.

use futures::future::{abortable, join_all, AbortHandle, Aborted};
use ibc_core::channel::types::acknowledgement::Acknowledgement;
use ibc_core::channel::types::channel::Order;
use ibc_core::channel::types::msgs::{MsgAcknowledgement, MsgRecvPacket, MsgTimeout};
use ibc_core::channel::types::packet::Packet;
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::ToAny;
use ibc_core::host::types::identifiers::{ChainId, Sequence};
use ibc_core::host::types::path::{AckPath, CommitmentPath, ReceiptPath, SeqRecvPath};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, info_span, warn, Instrument};

use super::{expect_event, require_value, ChannelPair, RelayCoordinator, Side};
use crate::error::RelayerError;
use crate::handle::ChainHandle;

/// How a packet left the pending set of its source chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Delivery {
    /// Received on the destination and acknowledged on the source.
    Acknowledged,
    /// Timed out on the source without being received.
    TimedOut,
}

/// The result of relaying one packet.
#[derive(Debug)]
pub struct PacketOutcome {
    pub source: ChainId,
    pub sequence: Sequence,
    pub result: Result<Delivery, RelayerError>,
}

/// A packet relay running on its own task.
#[derive(Debug)]
pub struct RelayTask {
    join: JoinHandle<Result<Result<Delivery, RelayerError>, Aborted>>,
    abort: AbortHandle,
}

impl RelayTask {
    /// Stops the relay at its next suspension point. A submission already
    /// handed to a chain runtime still completes there.
    pub fn cancel(&self) {
        self.abort.abort();
    }

    pub async fn join(self) -> Result<Delivery, RelayerError> {
        match self.join.await {
            Ok(Ok(result)) => result,
            Ok(Err(Aborted)) | Err(_) => Err(RelayerError::Cancelled),
        }
    }
}

impl RelayCoordinator {
    /// Orients `channel` so that its A end is on the chain `side` names.
    fn oriented(side: Side, channel: &ChannelPair) -> ChannelPair {
        match side {
            Side::A => channel.clone(),
            Side::B => channel.flipped(),
        }
    }

    /// Packets sent from `side` over `channel` that still await relaying.
    pub async fn pending_packets(
        &self,
        side: Side,
        channel: &ChannelPair,
    ) -> Result<Vec<Packet>, RelayerError> {
        let (src, _) = self.chains(side);
        let channel = Self::oriented(side, channel);
        src.query_pending_packets(&channel.port_on_a, &channel.chan_on_a)
            .await
    }

    /// Relays every pending packet of `channel`, both directions at once.
    pub async fn relay_packets(&self, channel: &ChannelPair) -> Vec<PacketOutcome> {
        let (mut from_a, from_b) = tokio::join!(
            self.relay_direction(Side::A, channel),
            self.relay_direction(Side::B, channel),
        );
        from_a.extend(from_b);
        from_a
    }

    async fn relay_direction(&self, side: Side, channel: &ChannelPair) -> Vec<PacketOutcome> {
        let (src, _) = self.chains(side);

        let mut packets = match self.pending_packets(side, channel).await {
            Ok(packets) => packets,
            Err(e) => {
                warn!(chain_id = %src.id(), error = %e, "failed to list pending packets");
                return Vec::new();
            }
        };
        packets.sort_by_key(|packet| packet.seq_on_a);

        if channel.ordering == Order::Ordered {
            // a gap would block every later packet of the channel
            let mut outcomes = Vec::with_capacity(packets.len());
            for packet in packets {
                let outcome = self.relay_outcome(side, channel, packet).await;
                let failed = outcome.result.is_err();
                outcomes.push(outcome);
                if failed {
                    break;
                }
            }
            outcomes
        } else {
            join_all(
                packets
                    .into_iter()
                    .map(|packet| self.relay_outcome(side, channel, packet)),
            )
            .await
        }
    }

    async fn relay_outcome(
        &self,
        side: Side,
        channel: &ChannelPair,
        packet: Packet,
    ) -> PacketOutcome {
        let (src, _) = self.chains(side);
        let source = src.id().clone();
        let sequence = packet.seq_on_a;
        let result = self.relay_packet(side, channel, packet).await;
        PacketOutcome {
            source,
            sequence,
            result,
        }
    }

    /// Carries one packet sent from `side` to completion: received and
    /// acknowledged, or timed out on its source.
    pub async fn relay_packet(
        &self,
        side: Side,
        channel: &ChannelPair,
        packet: Packet,
    ) -> Result<Delivery, RelayerError> {
        let (src, dst) = self.chains(side);
        let channel = Self::oriented(side, channel);
        let span = info_span!(
            "relay_packet",
            chain_id = %src.id(),
            channel_id = %packet.chan_id_on_a,
            sequence = %packet.seq_on_a,
        );

        async {
            let result = self
                .step("relay_packet", || {
                    self.deliver_packet(src, dst, &channel, &packet)
                })
                .await;
            match &result {
                Ok(delivery) => info!(?delivery, "packet relayed"),
                Err(e) => warn!(error = %e, "packet not relayed"),
            }
            result
        }
        .instrument(span)
        .await
    }

    /// Starts relaying one packet on its own task.
    pub fn spawn_packet_relay(
        &self,
        side: Side,
        channel: &ChannelPair,
        packet: Packet,
    ) -> RelayTask {
        let coordinator = self.clone();
        let channel = channel.clone();
        let (relay, abort) = abortable(async move {
            coordinator.relay_packet(side, &channel, packet).await
        });

        RelayTask {
            join: tokio::spawn(relay),
            abort,
        }
    }

    /// Relays pending packets of `channel` every poll interval until
    /// `shutdown` turns true or its sender is dropped.
    pub async fn run(&self, channel: &ChannelPair, mut shutdown: watch::Receiver<bool>) {
        info!(
            chan_on_a = %channel.chan_on_a,
            chan_on_b = %channel.chan_on_b,
            "relaying packets"
        );

        loop {
            let outcomes = self.relay_packets(channel).await;
            for outcome in outcomes.iter().filter(|o| o.result.is_err()) {
                debug!(
                    source = %outcome.source,
                    sequence = %outcome.sequence,
                    "packet left for the next round"
                );
            }

            let stop = tokio::select! {
                _ = futures_timer::Delay::new(self.config.poll_interval()) => false,
                changed = shutdown.changed() => changed.is_err(),
            };
            if stop || *shutdown.borrow() {
                break;
            }
        }

        info!("packet relaying stopped");
    }

    async fn deliver_packet(
        &self,
        src: &ChainHandle,
        dst: &ChainHandle,
        channel: &ChannelPair,
        packet: &Packet,
    ) -> Result<Delivery, RelayerError> {
        let status = dst.query_status().await?;
        if packet.timed_out(&status.timestamp, status.height) {
            return self.timeout_packet(src, dst, channel, packet).await;
        }

        let written = dst
            .query_written_ack(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a)
            .await?;
        let acknowledgement = match written {
            Some(ack) => ack,
            None => match self.recv_packet(dst, src, channel, packet).await {
                Ok(ack) => ack,
                Err(e) if e.kind() == Some(ErrorKind::PacketTimedOut) => {
                    debug!("packet expired before it was received");
                    return self.timeout_packet(src, dst, channel, packet).await;
                }
                Err(e) => return Err(e),
            },
        };

        self.ack_packet(src, dst, channel, packet, acknowledgement)
            .await
    }

    async fn recv_packet(
        &self,
        dst: &ChainHandle,
        src: &ChainHandle,
        channel: &ChannelPair,
        packet: &Packet,
    ) -> Result<Acknowledgement, RelayerError> {
        let proof_height = self
            .update_client_on(dst, src, &channel.connection.clients.client_on_b)
            .await?;
        let proven = src
            .query_proven(
                CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a),
                proof_height,
            )
            .await?;
        require_value(src, "packet commitment", &proven)?;

        let msg = MsgRecvPacket {
            packet: packet.clone(),
            proof_commitment_on_a: proven.proof,
            proof_height_on_a: proof_height,
            signer: dst.signer(),
        };

        let response = dst.submit(vec![msg.to_any()]).await?;
        expect_event(dst, &response, "write_acknowledgement", |event| match event {
            IbcEvent::WriteAcknowledgement(e) if e.packet().seq_on_a == packet.seq_on_a => {
                Some(e.acknowledgement().clone())
            }
            _ => None,
        })
    }

    async fn ack_packet(
        &self,
        src: &ChainHandle,
        dst: &ChainHandle,
        channel: &ChannelPair,
        packet: &Packet,
        acknowledgement: Acknowledgement,
    ) -> Result<Delivery, RelayerError> {
        let proof_height = self
            .update_client_on(src, dst, &channel.connection.clients.client_on_a)
            .await?;
        let proven = dst
            .query_proven(
                AckPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a),
                proof_height,
            )
            .await?;
        require_value(dst, "packet acknowledgement", &proven)?;

        let msg = MsgAcknowledgement {
            packet: packet.clone(),
            acknowledgement,
            proof_acked_on_b: proven.proof,
            proof_height_on_b: proof_height,
            signer: src.signer(),
        };

        match src.submit(vec![msg.to_any()]).await {
            Ok(response) => {
                expect_event(src, &response, "acknowledge_packet", |event| {
                    matches!(event, IbcEvent::AcknowledgePacket(_)).then_some(())
                })?;
            }
            Err(e) if e.kind() == Some(ErrorKind::AlreadyAcknowledged) => {
                debug!("packet already acknowledged");
            }
            Err(e) => return Err(e),
        }
        Ok(Delivery::Acknowledged)
    }

    async fn timeout_packet(
        &self,
        src: &ChainHandle,
        dst: &ChainHandle,
        channel: &ChannelPair,
        packet: &Packet,
    ) -> Result<Delivery, RelayerError> {
        let proof_height = self
            .update_client_on(src, dst, &channel.connection.clients.client_on_a)
            .await?;

        let (proven, next_seq_recv_on_b) = match channel.ordering {
            Order::Ordered => {
                let proven = dst
                    .query_proven(
                        SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b),
                        proof_height,
                    )
                    .await?;
                let bytes = require_value(dst, "next receive sequence", &proven)?;
                let next_seq = <[u8; 8]>::try_from(bytes).map_err(|_| {
                    RelayerError::InvalidValue {
                        chain_id: dst.id().clone(),
                        what: "next receive sequence".to_string(),
                        description: format!("expected 8 bytes, got {}", bytes.len()),
                    }
                })?;
                let next_seq = Sequence::from(u64::from_be_bytes(next_seq));
                (proven, next_seq)
            }
            _ => {
                let proven = dst
                    .query_proven(
                        ReceiptPath::new(
                            &packet.port_id_on_b,
                            &packet.chan_id_on_b,
                            packet.seq_on_a,
                        ),
                        proof_height,
                    )
                    .await?;
                if proven.value.is_some() {
                    return Err(RelayerError::InvalidValue {
                        chain_id: dst.id().clone(),
                        what: "packet receipt".to_string(),
                        description: "packet was received before it timed out".to_string(),
                    });
                }
                (proven, packet.seq_on_a)
            }
        };

        let msg = MsgTimeout {
            packet: packet.clone(),
            next_seq_recv_on_b,
            proof_unreceived_on_b: proven.proof,
            proof_height_on_b: proof_height,
            signer: src.signer(),
        };

        let response = src.submit(vec![msg.to_any()]).await?;
        expect_event(src, &response, "timeout_packet", |event| {
            matches!(event, IbcEvent::TimeoutPacket(_)).then_some(())
        })?;
        Ok(Delivery::TimedOut)
    }
}
