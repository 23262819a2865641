use ibc_core::channel::types::acknowledgement::AcknowledgementStatus;
use ibc_core::channel::types::channel::{Order, State};
use ibc_core::channel::types::timeout::TimeoutHeight;
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::host::types::path::ChannelEndPath;
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use rstest::{fixture, rstest};

use super::{last_event, Chains, ALICE, BOB, INITIAL_BALANCE};

#[fixture]
fn chains() -> Chains {
    Chains::new(TimeoutPolicy::KeepOpen)
}

/// A timeout height two blocks past the latest block of B.
fn soon(chains: &Chains) -> TimeoutHeight {
    TimeoutHeight::At(chains.b.latest_height().add(2))
}

fn pending_on_a(chains: &Chains, chan_id_on_a: &ChannelId) -> usize {
    chains
        .a
        .pending_packets(&PortId::transfer(), chan_id_on_a)
        .len()
}

#[rstest]
fn tokens_move_across_and_the_commitment_is_cleared(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);

    let packet = chains
        .send(&chan_id_on_a, 100, TimeoutHeight::no_timeout())
        .expect("success");
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE - 100);
    assert_eq!(pending_on_a(&chains, &chan_id_on_a), 1);

    let ack = chains.recv_on_b(&packet).expect("success");
    assert_eq!(chains.b.balance_of(BOB), 100);
    assert!(AcknowledgementStatus::from_ack(&ack)
        .expect("status acknowledgement")
        .is_successful());

    chains.ack_on_a(&packet, ack).expect("success");
    assert_eq!(pending_on_a(&chains, &chan_id_on_a), 0);
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE - 100);

    let acked = last_event(&chains.a, |e| match e {
        IbcEvent::AcknowledgePacket(e) => Some(e.packet().seq_on_a),
        _ => None,
    });
    assert_eq!(acked, packet.seq_on_a);
}

#[rstest]
fn acknowledging_twice_fails(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let packet = chains
        .send(&chan_id_on_a, 10, TimeoutHeight::no_timeout())
        .unwrap();
    let ack = chains.recv_on_b(&packet).unwrap();
    chains.ack_on_a(&packet, ack.clone()).unwrap();

    let err = chains.ack_on_a(&packet, ack).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AlreadyAcknowledged);
}

#[rstest]
fn receiving_twice_on_an_unordered_channel_fails(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let packet = chains
        .send(&chan_id_on_a, 10, TimeoutHeight::no_timeout())
        .unwrap();
    chains.recv_on_b(&packet).unwrap();

    let err = chains.recv_on_b(&packet).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::DuplicatePacket);
    assert_eq!(chains.b.balance_of(BOB), 10);
}

#[rstest]
fn ordered_channels_receive_in_sequence(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Ordered);
    let first = chains
        .send(&chan_id_on_a, 10, TimeoutHeight::no_timeout())
        .unwrap();
    let second = chains
        .send(&chan_id_on_a, 20, TimeoutHeight::no_timeout())
        .unwrap();

    let err = chains.recv_on_b(&second).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedSequence);

    chains.recv_on_b(&first).expect("success");
    chains.recv_on_b(&second).expect("success");
    assert_eq!(chains.b.balance_of(BOB), 30);
}

#[rstest]
fn sending_with_an_elapsed_timeout_fails(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let tracked = chains
        .a
        .client_latest_height(&chains.client_on_a)
        .unwrap();

    let err = chains
        .send(&chan_id_on_a, 10, TimeoutHeight::At(tracked))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TimeoutElapsed);
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
    assert_eq!(pending_on_a(&chains, &chan_id_on_a), 0);
}

#[rstest]
fn sending_more_than_the_balance_fails(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let before = chains.a.latest_height();

    assert!(chains
        .send(&chan_id_on_a, INITIAL_BALANCE + 1, TimeoutHeight::no_timeout())
        .is_err());
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
    assert_eq!(chains.a.latest_height(), before);
}

#[rstest]
fn expired_packets_are_refunded_once(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let packet = chains.send(&chan_id_on_a, 100, soon(&chains)).unwrap();
    chains.b.advance_blocks(3);

    let err = chains.recv_on_b(&packet).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PacketTimedOut);
    assert_eq!(chains.b.balance_of(BOB), 0);

    chains.timeout_on_a(&packet).expect("success");
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
    assert_eq!(pending_on_a(&chains, &chan_id_on_a), 0);

    let err = chains.timeout_on_a(&packet).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AlreadyAcknowledged);
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
}

#[rstest]
fn timeouts_before_expiry_are_rejected(mut chains: Chains) {
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let packet = chains
        .send(
            &chan_id_on_a,
            100,
            TimeoutHeight::At(chains.b.latest_height().add(100)),
        )
        .unwrap();

    assert!(chains.timeout_on_a(&packet).is_err());
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE - 100);
    assert_eq!(pending_on_a(&chains, &chan_id_on_a), 1);
}

#[rstest]
#[case::closes(TimeoutPolicy::CloseOrderedChannel, State::Closed)]
#[case::keeps_open(TimeoutPolicy::KeepOpen, State::Open)]
fn ordered_timeouts_follow_the_host_policy(#[case] policy: TimeoutPolicy, #[case] expected: State) {
    let mut chains = Chains::new(policy);
    let (chan_id_on_a, _) = chains.open_channel(Order::Ordered);
    let packet = chains.send(&chan_id_on_a, 100, soon(&chains)).unwrap();
    chains.b.advance_blocks(3);

    chains.timeout_on_a(&packet).expect("success");

    let chan_end_on_a = chains
        .a
        .ibc_store
        .channel_end(&ChannelEndPath::new(&PortId::transfer(), &chan_id_on_a))
        .unwrap();
    assert_eq!(chan_end_on_a.state(), &expected);
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
}

#[test_log::test]
fn unordered_timeouts_keep_the_channel_open() {
    let mut chains = Chains::new(TimeoutPolicy::CloseOrderedChannel);
    let (chan_id_on_a, _) = chains.open_channel(Order::Unordered);
    let packet = chains.send(&chan_id_on_a, 100, soon(&chains)).unwrap();
    chains.b.advance_blocks(3);

    chains.timeout_on_a(&packet).expect("success");

    let chan_end_on_a = chains
        .a
        .ibc_store
        .channel_end(&ChannelEndPath::new(&PortId::transfer(), &chan_id_on_a))
        .unwrap();
    assert_eq!(chan_end_on_a.state(), &State::Open);
}
