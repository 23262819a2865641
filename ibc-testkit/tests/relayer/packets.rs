use core::time::Duration;

use ibc_core::channel::types::channel::{Order, State};
use ibc_core::channel::types::timeout::TimeoutHeight;
use ibc_core::host::TimeoutPolicy;
use ibc_relayer::{Delivery, RelayerError, Side};
use tokio::sync::watch;

use super::{channel_state, relayer_context, transfer, ALICE, BOB, INITIAL_BALANCE};

#[test_log::test(tokio::test)]
async fn tokens_are_relayed_and_acknowledged() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();

    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, TimeoutHeight::no_timeout()))
        .expect("success");

    let outcomes = ctx.coordinator.relay_packets(&channel).await;

    assert_eq!(outcomes.len(), 1);
    assert_eq!(outcomes[0].sequence, packet.seq_on_a);
    assert_eq!(&outcomes[0].source, ctx.chain_a.ctx().chain_id());
    assert!(matches!(outcomes[0].result, Ok(Delivery::Acknowledged)));

    assert_eq!(ctx.chain_a.ctx().balance_of(ALICE), INITIAL_BALANCE - 100);
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 100);
    assert!(ctx
        .coordinator
        .pending_packets(Side::A, &channel)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn packets_flow_in_both_directions() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();

    ctx.chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 30, TimeoutHeight::no_timeout()))
        .unwrap();
    ctx.chain_b
        .ctx()
        .send_tokens(transfer(&channel.chan_on_b, 70, TimeoutHeight::no_timeout()))
        .unwrap();

    let outcomes = ctx.coordinator.relay_packets(&channel).await;

    assert_eq!(outcomes.len(), 2);
    assert!(outcomes
        .iter()
        .all(|outcome| matches!(outcome.result, Ok(Delivery::Acknowledged))));
    assert_eq!(ctx.chain_a.ctx().balance_of(BOB), 70);
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 30);
}

#[tokio::test]
async fn ordered_packets_are_relayed_in_sequence() {
    let ctx = relayer_context(TimeoutPolicy::CloseOrderedChannel);
    let channel = ctx.open_transfer_channel(Order::Ordered).await.unwrap();

    for amount in [10, 20, 30] {
        ctx.chain_a
            .ctx()
            .send_tokens(transfer(&channel.chan_on_a, amount, TimeoutHeight::no_timeout()))
            .unwrap();
    }

    let outcomes = ctx.coordinator.relay_packets(&channel).await;

    let sequences: Vec<u64> = outcomes
        .iter()
        .map(|outcome| outcome.sequence.value())
        .collect();
    assert_eq!(sequences, vec![1, 2, 3]);
    assert!(outcomes.iter().all(|outcome| outcome.result.is_ok()));
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 60);
}

#[tokio::test]
async fn expired_packets_are_timed_out_and_refunded() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();

    let timeout_height = TimeoutHeight::At(ctx.chain_b.ctx().latest_height().add(2));
    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, timeout_height))
        .unwrap();
    assert_eq!(ctx.chain_a.ctx().balance_of(ALICE), INITIAL_BALANCE - 100);
    ctx.chain_b.ctx().advance_blocks(3);

    let delivery = ctx
        .coordinator
        .relay_packet(Side::A, &channel, packet)
        .await
        .expect("success");

    assert_eq!(delivery, Delivery::TimedOut);
    assert_eq!(ctx.chain_a.ctx().balance_of(ALICE), INITIAL_BALANCE);
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 0);
}

#[tokio::test]
async fn ordered_timeouts_close_the_channel_under_the_closing_policy() {
    let ctx = relayer_context(TimeoutPolicy::CloseOrderedChannel);
    let channel = ctx.open_transfer_channel(Order::Ordered).await.unwrap();

    let timeout_height = TimeoutHeight::At(ctx.chain_b.ctx().latest_height().add(2));
    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, timeout_height))
        .unwrap();
    ctx.chain_b.ctx().advance_blocks(3);

    let delivery = ctx
        .coordinator
        .relay_packet(Side::A, &channel, packet)
        .await
        .unwrap();

    assert_eq!(delivery, Delivery::TimedOut);
    assert_eq!(
        channel_state(&ctx.chain_a.ctx(), &channel.chan_on_a),
        State::Closed
    );
}

#[tokio::test]
async fn transient_failures_are_retried() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();
    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, TimeoutHeight::no_timeout()))
        .unwrap();
    ctx.chain_b.fail_next_submissions(1);

    let delivery = ctx
        .coordinator
        .relay_packet(Side::A, &channel, packet)
        .await
        .expect("success");

    assert_eq!(delivery, Delivery::Acknowledged);
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 100);
}

#[tokio::test]
async fn exhausted_retries_leave_the_packet_pending() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();
    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, TimeoutHeight::no_timeout()))
        .unwrap();
    ctx.chain_b.fail_next_submissions(u32::MAX);

    let err = ctx
        .coordinator
        .relay_packet(Side::A, &channel, packet.clone())
        .await
        .unwrap_err();
    assert!(matches!(err, RelayerError::RetriesExhausted { .. }));
    assert_eq!(
        ctx.coordinator
            .pending_packets(Side::A, &channel)
            .await
            .unwrap(),
        vec![packet.clone()]
    );

    ctx.chain_b.fail_next_submissions(0);
    let delivery = ctx
        .coordinator
        .relay_packet(Side::A, &channel, packet)
        .await
        .unwrap();
    assert_eq!(delivery, Delivery::Acknowledged);
}

#[tokio::test]
async fn cancelled_relays_deliver_nothing() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();
    let packet = ctx
        .chain_a
        .ctx()
        .send_tokens(transfer(&channel.chan_on_a, 100, TimeoutHeight::no_timeout()))
        .unwrap();

    let task = ctx
        .coordinator
        .spawn_packet_relay(Side::A, &channel, packet);
    task.cancel();

    assert!(matches!(task.join().await, Err(RelayerError::Cancelled)));
    assert_eq!(ctx.chain_b.ctx().balance_of(BOB), 0);
    assert_eq!(
        ctx.coordinator
            .pending_packets(Side::A, &channel)
            .await
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn the_relay_loop_drains_packets_until_shutdown() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let coordinator = ctx.coordinator.clone();
    let relay_channel = channel.clone();
    let relay_loop =
        tokio::spawn(async move { coordinator.run(&relay_channel, shutdown_rx).await });

    for amount in [5, 15] {
        ctx.chain_a
            .ctx()
            .send_tokens(transfer(&channel.chan_on_a, amount, TimeoutHeight::no_timeout()))
            .unwrap();
    }

    let mut attempts = 0;
    while ctx.chain_b.ctx().balance_of(BOB) < 20 {
        attempts += 1;
        assert!(attempts < 500, "packets were not relayed");
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    shutdown_tx.send(true).unwrap();
    relay_loop.await.unwrap();

    assert!(ctx
        .coordinator
        .pending_packets(Side::A, &channel)
        .await
        .unwrap()
        .is_empty());
}
