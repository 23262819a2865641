use ibc_core::channel::types::channel::{Order, State as ChannelState};
use ibc_core::channel::types::timeout::TimeoutHeight;
use ibc_core::connection::types::State as ConnectionState;
use ibc_core::host::types::identifiers::ClientId;
use ibc_core::host::types::path::ChannelEndPath;
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use ibc_relayer::{RelayerError, Side};
use ibc_testkit::testapp::ibc::applications::token::token_version;

use super::{channel_state, relayer_context, transfer};

#[test_log::test(tokio::test)]
async fn connection_handshake_opens_both_ends() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);

    let connection = ctx.open_connection().await.expect("success");

    let conn_end_on_a = ctx
        .chain_a
        .ctx()
        .ibc_store
        .connection_end(&connection.conn_on_a)
        .unwrap();
    let conn_end_on_b = ctx
        .chain_b
        .ctx()
        .ibc_store
        .connection_end(&connection.conn_on_b)
        .unwrap();

    assert_eq!(conn_end_on_a.state(), &ConnectionState::Open);
    assert_eq!(conn_end_on_b.state(), &ConnectionState::Open);
    assert_eq!(conn_end_on_a.client_id(), &connection.clients.client_on_a);
    assert_eq!(conn_end_on_b.client_id(), &connection.clients.client_on_b);
    assert_eq!(
        conn_end_on_a.counterparty().connection_id(),
        Some(&connection.conn_on_b)
    );
}

#[tokio::test]
async fn channel_handshake_agrees_on_the_token_version() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);

    let channel = ctx
        .open_transfer_channel(Order::Ordered)
        .await
        .expect("success");

    for (chain, port_id, chan_id, counterparty_chan_id) in [
        (&ctx.chain_a, &channel.port_on_a, &channel.chan_on_a, &channel.chan_on_b),
        (&ctx.chain_b, &channel.port_on_b, &channel.chan_on_b, &channel.chan_on_a),
    ] {
        let chan_end = chain
            .ctx()
            .ibc_store
            .channel_end(&ChannelEndPath::new(port_id, chan_id))
            .unwrap();
        assert_eq!(chan_end.state(), &ChannelState::Open);
        assert_eq!(chan_end.ordering(), &Order::Ordered);
        assert_eq!(chan_end.version(), &token_version());
        assert_eq!(
            chan_end.counterparty().channel_id(),
            Some(counterparty_chan_id)
        );
    }
}

#[tokio::test]
async fn handshakes_survive_transient_submission_failures() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    ctx.chain_b.fail_next_submissions(2);

    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .expect("success");

    assert_eq!(
        channel_state(&ctx.chain_b.ctx(), &channel.chan_on_b),
        ChannelState::Open
    );
}

#[tokio::test]
async fn lost_create_client_responses_do_not_duplicate_clients() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    ctx.chain_a.lose_next_responses(1);

    let clients = ctx.coordinator.create_clients().await.expect("success");

    let chain_id_b = ctx.chain_b.ctx().chain_id().clone();
    assert_eq!(
        ctx.chain_a.ctx().clients_tracking(&chain_id_b),
        vec![clients.client_on_a.clone()]
    );
    assert_eq!(ctx.chain_a.ctx().ibc_store.client_counter().unwrap(), 1);
}

#[tokio::test]
async fn closing_a_channel_closes_both_ends() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let channel = ctx
        .open_transfer_channel(Order::Unordered)
        .await
        .unwrap();

    ctx.coordinator
        .close_channel(&channel)
        .await
        .expect("success");

    assert_eq!(
        channel_state(&ctx.chain_a.ctx(), &channel.chan_on_a),
        ChannelState::Closed
    );
    assert_eq!(
        channel_state(&ctx.chain_b.ctx(), &channel.chan_on_b),
        ChannelState::Closed
    );

    let sent = ctx.chain_a.ctx().send_tokens(transfer(
        &channel.chan_on_a,
        10,
        TimeoutHeight::no_timeout(),
    ));
    assert!(sent.is_err());
}

#[tokio::test]
async fn update_client_follows_the_counterparty() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let clients = ctx.coordinator.create_clients().await.unwrap();
    ctx.chain_b.ctx().advance_blocks(4);
    let latest_on_b = ctx.chain_b.ctx().latest_height();

    let trusted = ctx
        .coordinator
        .update_client(Side::A, &clients.client_on_a)
        .await
        .expect("success");

    assert_eq!(trusted, latest_on_b);
    assert_eq!(
        ctx.chain_a
            .ctx()
            .client_latest_height(&clients.client_on_a)
            .unwrap(),
        latest_on_b
    );

    // Already current: nothing to submit.
    let before = ctx.chain_a.ctx().latest_height();
    let again = ctx
        .coordinator
        .update_client(Side::A, &clients.client_on_a)
        .await
        .unwrap();
    assert_eq!(again, latest_on_b);
    assert_eq!(ctx.chain_a.ctx().latest_height(), before);
}

#[tokio::test]
async fn updating_an_unknown_client_is_not_retried() {
    let ctx = relayer_context(TimeoutPolicy::KeepOpen);
    let unknown = ClientId::new("hb-ibft2", 7).unwrap();

    let err = ctx
        .coordinator
        .update_client(Side::B, &unknown)
        .await
        .unwrap_err();

    assert!(matches!(err, RelayerError::NotFound { .. }));
    assert!(!err.is_transient());
}
