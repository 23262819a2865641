use ibc_core::channel::types::channel::{Order, State};
use ibc_core::channel::types::timeout::TimeoutHeight;
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::host::types::path::ChannelEndPath;
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use ibc_testkit::context::MockContext;
use ibc_testkit::testapp::ibc::applications::token::token_version;
use rstest::{fixture, rstest};

use super::{last_event, Chains, ALICE, INITIAL_BALANCE};

#[fixture]
fn chains() -> Chains {
    Chains::new(TimeoutPolicy::KeepOpen)
}

fn channel_state(ctx: &MockContext, chan_id: &ChannelId) -> State {
    *ctx.ibc_store
        .channel_end(&ChannelEndPath::new(&PortId::transfer(), chan_id))
        .expect("channel exists")
        .state()
}

#[rstest]
#[case::unordered(Order::Unordered)]
#[case::ordered(Order::Ordered)]
fn handshake_opens_both_ends(mut chains: Chains, #[case] ordering: Order) {
    let (chan_id_on_a, chan_id_on_b) = chains.open_channel(ordering);

    for (ctx, chan_id, counterparty_chan_id) in [
        (&chains.a, &chan_id_on_a, &chan_id_on_b),
        (&chains.b, &chan_id_on_b, &chan_id_on_a),
    ] {
        let chan_end = ctx
            .ibc_store
            .channel_end(&ChannelEndPath::new(&PortId::transfer(), chan_id))
            .unwrap();
        assert_eq!(chan_end.state(), &State::Open);
        assert_eq!(chan_end.ordering(), &ordering);
        assert_eq!(chan_end.version(), &token_version());
        assert_eq!(
            chan_end.counterparty().channel_id(),
            Some(counterparty_chan_id)
        );
    }

    let confirmed = last_event(&chains.b, |e| match e {
        IbcEvent::OpenConfirmChannel(e) => Some(e.chan_id().clone()),
        _ => None,
    });
    assert_eq!(confirmed, chan_id_on_b);
}

#[rstest]
fn init_picks_the_application_version(mut chains: Chains) {
    let (conn_id_on_a, _) = chains.open_connection();

    let chan_id_on_a = chains.chan_open_init(&conn_id_on_a, Order::Unordered);

    let chan_end = chains
        .a
        .ibc_store
        .channel_end(&ChannelEndPath::new(&PortId::transfer(), &chan_id_on_a))
        .unwrap();
    assert_eq!(chan_end.state(), &State::Init);
    assert_eq!(chan_end.version(), &token_version());
    assert_eq!(chan_end.counterparty().channel_id(), None);
}

#[rstest]
fn close_handshake_closes_both_ends(mut chains: Chains) {
    let (chan_id_on_a, chan_id_on_b) = chains.open_channel(Order::Unordered);

    chains.chan_close_init(&chan_id_on_a).expect("success");
    assert_eq!(channel_state(&chains.a, &chan_id_on_a), State::Closed);
    assert_eq!(channel_state(&chains.b, &chan_id_on_b), State::Open);

    chains
        .chan_close_confirm(&chan_id_on_a, &chan_id_on_b)
        .expect("success");
    assert_eq!(channel_state(&chains.b, &chan_id_on_b), State::Closed);
}

#[rstest]
fn closed_channels_reject_handshake_steps_and_packets(mut chains: Chains) {
    let (chan_id_on_a, chan_id_on_b) = chains.open_channel(Order::Unordered);
    chains.chan_close_init(&chan_id_on_a).expect("success");

    let err = chains.chan_close_init(&chan_id_on_a).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let err = chains
        .chan_open_ack(&chan_id_on_a, &chan_id_on_b)
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);

    let err = chains
        .send(&chan_id_on_a, 10, TimeoutHeight::no_timeout())
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(chains.a.balance_of(ALICE), INITIAL_BALANCE);
}
