use ibc_core::client::context::client_state::ClientStateCommon;
use ibc_core::client::context::ClientValidationContext;
use ibc_core::client::types::msgs::{ClientMsg, MsgUpdateClient};
use ibc_core::handler::types::error::ErrorKind;
use ibc_core::handler::types::events::IbcEvent;
use ibc_core::handler::types::msgs::MsgEnvelope;
use ibc_core::host::TimeoutPolicy;
use ibc_testkit::fixtures::{dummy_account_signer, DEFAULT_ETH_CHAIN_ID};
use test_log::test;

use super::{chain, last_event, update_client, Chains};

#[test]
fn create_client_tracks_the_counterparty_block() {
    let chains = Chains::new(TimeoutPolicy::KeepOpen);

    let client_state = chains
        .a
        .ibc_store
        .client_state(&chains.client_on_a)
        .expect("client exists");
    assert!(client_state.latest_height() <= chains.b.latest_height());

    let (client_id, consensus_height) = last_event(&chains.a, |e| match e {
        IbcEvent::CreateClient(e) => Some((e.client_id().clone(), *e.consensus_height())),
        _ => None,
    });
    assert_eq!(client_id, chains.client_on_a);
    assert_eq!(consensus_height, client_state.latest_height());
}

#[test]
fn update_client_moves_to_the_counterparty_height() {
    let mut chains = Chains::new(TimeoutPolicy::KeepOpen);
    chains.b.advance_blocks(5);

    let target = update_client(&mut chains.a, &chains.client_on_a, &chains.b).expect("success");

    assert_eq!(target, chains.b.latest_height());
    assert_eq!(
        chains.a.client_latest_height(&chains.client_on_a).unwrap(),
        target
    );
    let updated_to = last_event(&chains.a, |e| match e {
        IbcEvent::UpdateClient(e) => Some(*e.consensus_height()),
        _ => None,
    });
    assert_eq!(updated_to, target);
}

#[test]
fn update_client_to_a_known_height_is_stale() {
    let mut chains = Chains::new(TimeoutPolicy::KeepOpen);
    chains.b.advance_blocks(2);
    update_client(&mut chains.a, &chains.client_on_a, &chains.b).expect("success");
    let before = chains.a.latest_height();

    let err = update_client(&mut chains.a, &chains.client_on_a, &chains.b).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::StaleHeader);
    assert_eq!(chains.a.latest_height(), before);
}

#[test]
fn headers_sealed_by_a_foreign_validator_set_are_rejected() {
    let mut chains = Chains::new(TimeoutPolicy::KeepOpen);
    let trusted_height = chains
        .a
        .client_latest_height(&chains.client_on_a)
        .expect("client exists");

    // Same chain id and block schedule as B, different validators.
    let mut impostor = chain("ibc1", DEFAULT_ETH_CHAIN_ID + 1, 99, TimeoutPolicy::KeepOpen);
    impostor.advance_blocks(trusted_height.revision_height() + 3);

    let msg = MsgUpdateClient {
        client_id: chains.client_on_a.clone(),
        client_message: impostor
            .header(trusted_height, impostor.latest_height())
            .expect("sealed blocks"),
        signer: dummy_account_signer(),
    };
    let err = chains
        .a
        .deliver(MsgEnvelope::Client(ClientMsg::UpdateClient(msg)))
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::InvalidSignature);
    assert_eq!(
        chains.a.client_latest_height(&chains.client_on_a).unwrap(),
        trusted_height
    );
}
