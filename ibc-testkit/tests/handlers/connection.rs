use ibc_core::connection::types::State;
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::host::types::identifiers::ConnectionId;
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use rstest::{fixture, rstest};

use super::Chains;

#[fixture]
fn chains() -> Chains {
    Chains::new(TimeoutPolicy::KeepOpen)
}

#[rstest]
fn handshake_opens_both_ends(mut chains: Chains) {
    let (conn_id_on_a, conn_id_on_b) = chains.open_connection();

    let conn_end_on_a = chains.a.ibc_store.connection_end(&conn_id_on_a).unwrap();
    let conn_end_on_b = chains.b.ibc_store.connection_end(&conn_id_on_b).unwrap();

    assert_eq!(conn_end_on_a.state(), &State::Open);
    assert_eq!(conn_end_on_b.state(), &State::Open);
    assert_eq!(
        conn_end_on_a.counterparty().connection_id(),
        Some(&conn_id_on_b)
    );
    assert_eq!(
        conn_end_on_b.counterparty().connection_id(),
        Some(&conn_id_on_a)
    );
    assert_eq!(conn_end_on_a.versions(), conn_end_on_b.versions());
    assert_eq!(conn_end_on_a.client_id(), &chains.client_on_a);
}

#[rstest]
fn init_leaves_the_counterparty_unknown(mut chains: Chains) {
    let conn_id_on_a = chains.conn_open_init();

    let conn_end_on_a = chains.a.ibc_store.connection_end(&conn_id_on_a).unwrap();
    assert_eq!(conn_end_on_a.state(), &State::Init);
    assert_eq!(conn_end_on_a.counterparty().connection_id(), None);
}

#[rstest]
fn try_without_init_is_an_invalid_state(mut chains: Chains) {
    let err = chains
        .conn_open_try(&ConnectionId::new(0))
        .expect_err("no connection to prove on A");

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[rstest]
fn ack_twice_is_an_invalid_state(mut chains: Chains) {
    let conn_id_on_a = chains.conn_open_init();
    let conn_id_on_b = chains.conn_open_try(&conn_id_on_a).unwrap();
    chains.conn_open_ack(&conn_id_on_a, &conn_id_on_b).unwrap();

    let err = chains
        .conn_open_ack(&conn_id_on_a, &conn_id_on_b)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
}

#[rstest]
fn confirm_on_an_open_connection_is_an_invalid_state(mut chains: Chains) {
    let (conn_id_on_a, conn_id_on_b) = chains.open_connection();
    let before = chains.b.latest_height();

    let err = chains
        .conn_open_confirm(&conn_id_on_a, &conn_id_on_b)
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert_eq!(chains.b.latest_height(), before);
}
