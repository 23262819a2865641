use ibc_core_channel_types::channel::{Counterparty, Order, State};
use ibc_core_channel_types::error::{ChannelError, PacketError};
use ibc_core_channel_types::events::{ChannelClosed, TimeoutPacket};
use ibc_core_channel_types::msgs::MsgTimeout;
use ibc_core_client::context::prelude::*;
use ibc_core_handler_types::error::ContextError;
use ibc_core_handler_types::events::{IbcEvent, MessageEvent};
use ibc_core_host::types::path::{
    ChannelEndPath, ClientConsensusStatePath, CommitmentPath, Path, ReceiptPath, SeqRecvPath,
};
use ibc_core_host::{ExecutionContext, ValidationContext};
use ibc_core_router::module::Module;
use ibc_primitives::prelude::*;

use super::acknowledgement::verify_packet_commitment;
use super::send_packet::verify_channel_open;

pub fn timeout_packet_validate<ValCtx>(
    ctx_a: &ValCtx,
    module: &dyn Module,
    msg: MsgTimeout,
) -> Result<(), ContextError>
where
    ValCtx: ValidationContext,
{
    validate(ctx_a, &msg)?;

    module
        .on_timeout_packet_validate(&msg.packet, &msg.signer)
        .map_err(ContextError::PacketError)
}

pub fn timeout_packet_execute<ExecCtx>(
    ctx_a: &mut ExecCtx,
    module: &mut dyn Module,
    msg: MsgTimeout,
) -> Result<(), ContextError>
where
    ExecCtx: ExecutionContext,
{
    let MsgTimeout { packet, signer, .. } = msg;

    let chan_end_path_on_a = ChannelEndPath::new(&packet.port_id_on_a, &packet.chan_id_on_a);
    let chan_end_on_a = ctx_a.channel_end(&chan_end_path_on_a)?;
    let conn_id_on_a = chan_end_on_a.connection_hops()[0].clone();
    let ordering = *chan_end_on_a.ordering();

    let (extras, cb_result) = module.on_timeout_packet_execute(&packet, &signer);

    cb_result?;

    // apply state changes
    let closes_channel = ctx_a.timeout_policy().closes_channel(ordering);
    {
        let commitment_path_on_a =
            CommitmentPath::new(&packet.port_id_on_a, &packet.chan_id_on_a, packet.seq_on_a);
        ctx_a.delete_packet_commitment(&commitment_path_on_a)?;

        if closes_channel {
            let mut closed_chan_end_on_a = chan_end_on_a.clone();
            closed_chan_end_on_a.set_state(State::Closed);
            ctx_a.store_channel(&chan_end_path_on_a, closed_chan_end_on_a)?;
        }
    }

    // emit events and logs
    {
        ctx_a.log_message(format!(
            "success: packet timeout: sequence {} on {}/{}",
            packet.seq_on_a, packet.port_id_on_a, packet.chan_id_on_a
        ))?;

        let event = IbcEvent::TimeoutPacket(TimeoutPacket::new(
            packet.clone(),
            ordering,
            conn_id_on_a.clone(),
        ));
        ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
        ctx_a.emit_ibc_event(event)?;

        if closes_channel {
            let event = IbcEvent::ChannelClosed(ChannelClosed::new(
                packet.port_id_on_a.clone(),
                packet.chan_id_on_a.clone(),
                chan_end_on_a.counterparty().port_id().clone(),
                chan_end_on_a.counterparty().channel_id().cloned(),
                conn_id_on_a,
                chan_end_on_a.version().clone(),
            ));
            ctx_a.emit_ibc_event(IbcEvent::Message(MessageEvent::Channel))?;
            ctx_a.emit_ibc_event(event)?;
            ctx_a.log_message(format!(
                "success: channel {} closed after a packet timeout",
                packet.chan_id_on_a
            ))?;
        }

        for module_event in extras.events {
            ctx_a.emit_ibc_event(IbcEvent::Module(module_event))?;
        }

        for log_message in extras.log {
            ctx_a.log_message(log_message)?;
        }
    }

    Ok(())
}

fn validate<Ctx>(ctx_a: &Ctx, msg: &MsgTimeout) -> Result<(), ContextError>
where
    Ctx: ValidationContext,
{
    ctx_a.validate_message_signer(&msg.signer)?;

    let packet = &msg.packet;
    let chan_end_on_a = ctx_a.channel_end(&ChannelEndPath::new(
        &packet.port_id_on_a,
        &packet.chan_id_on_a,
    ))?;

    verify_channel_open(&chan_end_on_a, &packet.chan_id_on_a)?;

    let counterparty = Counterparty::new(
        packet.port_id_on_b.clone(),
        Some(packet.chan_id_on_b.clone()),
    );
    chan_end_on_a.verify_counterparty_matches(&counterparty)?;

    let conn_id_on_a = &chan_end_on_a.connection_hops()[0];
    let conn_end_on_a = ctx_a.connection_end(conn_id_on_a)?;

    verify_packet_commitment(ctx_a, packet)?;

    // Verify proofs
    {
        let client_id_on_a = conn_end_on_a.client_id();
        let client_val_ctx_a = ctx_a.get_client_validation_context();
        let client_state_of_b_on_a = client_val_ctx_a.client_state(client_id_on_a)?;

        client_state_of_b_on_a
            .status(client_val_ctx_a, client_id_on_a)?
            .verify_is_active()?;

        client_state_of_b_on_a.validate_proof_height(msg.proof_height_on_b)?;

        // the timeout must have passed on B as of the proven height
        let client_cons_state_path_on_a = ClientConsensusStatePath::new(
            client_id_on_a.clone(),
            msg.proof_height_on_b.revision_number(),
            msg.proof_height_on_b.revision_height(),
        );
        let consensus_state_of_b_on_a =
            client_val_ctx_a.consensus_state(&client_cons_state_path_on_a)?;
        let timestamp_of_b = consensus_state_of_b_on_a.timestamp();

        if !packet.timed_out(&timestamp_of_b, msg.proof_height_on_b) {
            return Err(PacketError::TimeoutNotReached {
                proof_height: msg.proof_height_on_b,
                proof_timestamp: timestamp_of_b,
            }
            .into());
        }

        let unreceived_verification_result = match chan_end_on_a.ordering() {
            Order::Ordered => {
                // B's receive counter never reached this packet.
                if packet.seq_on_a < msg.next_seq_recv_on_b {
                    return Err(PacketError::PacketReceived {
                        sequence: packet.seq_on_a,
                        next_seq_recv: msg.next_seq_recv_on_b,
                    }
                    .into());
                }
                let seq_recv_path_on_b =
                    SeqRecvPath::new(&packet.port_id_on_b, &packet.chan_id_on_b);

                client_state_of_b_on_a.verify_membership(
                    conn_end_on_a.counterparty().prefix(),
                    &msg.proof_unreceived_on_b,
                    consensus_state_of_b_on_a.root(),
                    Path::SeqRecv(seq_recv_path_on_b),
                    msg.next_seq_recv_on_b.to_vec(),
                )
            }
            Order::Unordered => {
                let receipt_path_on_b =
                    ReceiptPath::new(&packet.port_id_on_b, &packet.chan_id_on_b, packet.seq_on_a);

                client_state_of_b_on_a.verify_non_membership(
                    conn_end_on_a.counterparty().prefix(),
                    &msg.proof_unreceived_on_b,
                    consensus_state_of_b_on_a.root(),
                    Path::Receipt(receipt_path_on_b),
                )
            }
            Order::None => {
                return Err(ChannelError::UnknownOrderType(Order::None.to_string()).into());
            }
        };

        unreceived_verification_result.map_err(|e| PacketError::PacketVerificationFailed {
            sequence: packet.seq_on_a,
            client_error: e,
        })?;
    }

    Ok(())
}
