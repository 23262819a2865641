//! Implementation of the host contexts for the mock IBC store.

use ibc_core::channel::types::channel::ChannelEnd;
use ibc_core::channel::types::commitment::{AcknowledgementCommitment, PacketCommitment};
use ibc_core::channel::types::error::ChannelError;
use ibc_core::channel::types::packet::Receipt;
use ibc_core::client::types::Height;
use ibc_core::commitment_types::commitment::CommitmentPrefix;
use ibc_core::connection::types::error::ConnectionError;
use ibc_core::connection::types::ConnectionEnd;
use ibc_core::handler::types::error::ContextError;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::{ConnectionId, Sequence};
use ibc_core::host::types::path::{
    AckPath, ChannelEndPath, CommitmentPath, ConnectionPath, ReceiptPath, SeqAckPath, SeqRecvPath,
    SeqSendPath,
};
use ibc_core::host::{ExecutionContext, TimeoutPolicy, ValidationContext};
use ibc_primitives::{Signer, Timestamp};
use tracing::debug;

use super::types::{store_error, MockIbcStore};

impl ValidationContext for MockIbcStore {
    type V = Self;

    fn get_client_validation_context(&self) -> &Self::V {
        self
    }

    fn host_height(&self) -> Result<Height, ContextError> {
        Ok(self.host_height)
    }

    fn host_timestamp(&self) -> Result<Timestamp, ContextError> {
        Ok(self.host_timestamp)
    }

    fn client_counter(&self) -> Result<u64, ContextError> {
        Ok(self.client_counter)
    }

    fn connection_end(&self, conn_id: &ConnectionId) -> Result<ConnectionEnd, ContextError> {
        self.store
            .get_connection(conn_id)
            .map_err(store_error)?
            .ok_or_else(|| {
                ConnectionError::ConnectionNotFound {
                    connection_id: conn_id.clone(),
                }
                .into()
            })
    }

    fn commitment_prefix(&self) -> CommitmentPrefix {
        self.store.commitment_prefix()
    }

    fn connection_counter(&self) -> Result<u64, ContextError> {
        Ok(self.connection_counter)
    }

    fn channel_end(&self, channel_end_path: &ChannelEndPath) -> Result<ChannelEnd, ContextError> {
        self.store
            .get_channel(channel_end_path)
            .map_err(store_error)?
            .ok_or_else(|| {
                ChannelError::ChannelNotFound {
                    port_id: channel_end_path.0.clone(),
                    channel_id: channel_end_path.1.clone(),
                }
                .into()
            })
    }

    fn get_next_sequence_send(
        &self,
        seq_send_path: &SeqSendPath,
    ) -> Result<Sequence, ContextError> {
        Ok(self
            .store
            .get_next_sequence_send(seq_send_path)
            .map_err(store_error)?
            .unwrap_or_default())
    }

    fn get_next_sequence_recv(
        &self,
        seq_recv_path: &SeqRecvPath,
    ) -> Result<Sequence, ContextError> {
        Ok(self
            .store
            .get_next_sequence_recv(seq_recv_path)
            .map_err(store_error)?
            .unwrap_or_default())
    }

    fn get_next_sequence_ack(&self, seq_ack_path: &SeqAckPath) -> Result<Sequence, ContextError> {
        Ok(self
            .store
            .get_next_sequence_ack(seq_ack_path)
            .map_err(store_error)?
            .unwrap_or_default())
    }

    fn get_packet_commitment(
        &self,
        commitment_path: &CommitmentPath,
    ) -> Result<Option<PacketCommitment>, ContextError> {
        Ok(self.store.get_packet_commitment(commitment_path))
    }

    fn get_packet_receipt(
        &self,
        receipt_path: &ReceiptPath,
    ) -> Result<Option<Receipt>, ContextError> {
        self.store
            .get_packet_receipt(receipt_path)
            .map_err(store_error)
    }

    fn get_packet_acknowledgement(
        &self,
        ack_path: &AckPath,
    ) -> Result<Option<AcknowledgementCommitment>, ContextError> {
        Ok(self.store.get_packet_acknowledgement(ack_path))
    }

    fn channel_counter(&self) -> Result<u64, ContextError> {
        Ok(self.channel_counter)
    }

    fn timeout_policy(&self) -> TimeoutPolicy {
        self.timeout_policy
    }

    fn validate_message_signer(&self, signer: &Signer) -> Result<(), ContextError> {
        if signer.is_empty() {
            return Err(ContextError::HostError {
                description: "message signer is empty".to_string(),
            });
        }
        match &self.tx_signer {
            Some(tx_signer) if tx_signer != signer => Err(ContextError::HostError {
                description: format!(
                    "message signer `{signer}` did not sign the transaction (signed by `{tx_signer}`)"
                ),
            }),
            _ => Ok(()),
        }
    }
}

impl ExecutionContext for MockIbcStore {
    type E = Self;

    fn get_client_execution_context(&mut self) -> &mut Self::E {
        self
    }

    fn increase_client_counter(&mut self) -> Result<(), ContextError> {
        self.client_counter += 1;
        Ok(())
    }

    fn store_connection(
        &mut self,
        connection_path: &ConnectionPath,
        connection_end: ConnectionEnd,
    ) -> Result<(), ContextError> {
        self.store.set_connection(&connection_path.0, connection_end);
        Ok(())
    }

    fn increase_connection_counter(&mut self) -> Result<(), ContextError> {
        self.connection_counter += 1;
        Ok(())
    }

    fn store_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
        commitment: PacketCommitment,
    ) -> Result<(), ContextError> {
        self.store.set_packet_commitment(commitment_path, commitment);
        Ok(())
    }

    fn delete_packet_commitment(
        &mut self,
        commitment_path: &CommitmentPath,
    ) -> Result<(), ContextError> {
        self.store.delete_packet_commitment(commitment_path);
        Ok(())
    }

    fn store_packet_receipt(
        &mut self,
        receipt_path: &ReceiptPath,
        receipt: Receipt,
    ) -> Result<(), ContextError> {
        self.store.set_packet_receipt(receipt_path, receipt);
        Ok(())
    }

    fn store_packet_acknowledgement(
        &mut self,
        ack_path: &AckPath,
        ack_commitment: AcknowledgementCommitment,
    ) -> Result<(), ContextError> {
        self.store
            .set_packet_acknowledgement(ack_path, ack_commitment);
        Ok(())
    }

    fn delete_packet_acknowledgement(&mut self, ack_path: &AckPath) -> Result<(), ContextError> {
        self.store.delete_packet_acknowledgement(ack_path);
        Ok(())
    }

    fn store_channel(
        &mut self,
        channel_end_path: &ChannelEndPath,
        channel_end: ChannelEnd,
    ) -> Result<(), ContextError> {
        self.store.set_channel(channel_end_path, channel_end);
        Ok(())
    }

    fn store_next_sequence_send(
        &mut self,
        seq_send_path: &SeqSendPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.store
            .set_next_sequence_send(seq_send_path, seq)
            .map_err(store_error)
    }

    fn store_next_sequence_recv(
        &mut self,
        seq_recv_path: &SeqRecvPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.store
            .set_next_sequence_recv(seq_recv_path, seq)
            .map_err(store_error)
    }

    fn store_next_sequence_ack(
        &mut self,
        seq_ack_path: &SeqAckPath,
        seq: Sequence,
    ) -> Result<(), ContextError> {
        self.store
            .set_next_sequence_ack(seq_ack_path, seq)
            .map_err(store_error)
    }

    fn increase_channel_counter(&mut self) -> Result<(), ContextError> {
        self.channel_counter += 1;
        Ok(())
    }

    fn emit_ibc_event(&mut self, event: IbcEvent) -> Result<(), ContextError> {
        self.events.push(event);
        Ok(())
    }

    fn log_message(&mut self, message: String) -> Result<(), ContextError> {
        debug!(height = %self.host_height, "{message}");
        self.logs.push(message);
        Ok(())
    }
}
