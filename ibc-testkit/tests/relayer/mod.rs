use ibc_core::channel::types::channel::State;
use ibc_core::channel::types::timeout::{TimeoutHeight, TimeoutTimestamp};
use ibc_core::host::types::identifiers::{ChannelId, PortId};
use ibc_core::host::types::path::ChannelEndPath;
use ibc_core::host::{TimeoutPolicy, ValidationContext};
use ibc_testkit::context::{MockContext, TokenTransfer};
use ibc_testkit::relayer::RelayerContext;

pub mod handshake;
pub mod packets;

pub const ALICE: &str = "alice";
pub const BOB: &str = "bob";
pub const INITIAL_BALANCE: u64 = 1_000;

/// Two chains funding [`ALICE`] on both sides.
pub fn relayer_context(timeout_policy: TimeoutPolicy) -> RelayerContext {
    RelayerContext::with_balances(
        timeout_policy,
        vec![(ALICE.to_string(), INITIAL_BALANCE)],
    )
}

/// A transfer from [`ALICE`] to [`BOB`] over the transfer port.
pub fn transfer(channel_id: &ChannelId, amount: u64, timeout_height: TimeoutHeight) -> TokenTransfer {
    let timeout_timestamp = if timeout_height.is_set() {
        TimeoutTimestamp::Never
    } else {
        TimeoutTimestamp::from_nanoseconds(u64::MAX)
    };
    TokenTransfer {
        port_id: PortId::transfer(),
        channel_id: channel_id.clone(),
        sender: ALICE.to_string(),
        receiver: BOB.to_string(),
        amount,
        timeout_height,
        timeout_timestamp,
    }
}

pub fn channel_state(ctx: &MockContext, chan_id: &ChannelId) -> State {
    *ctx.ibc_store
        .channel_end(&ChannelEndPath::new(&PortId::transfer(), chan_id))
        .expect("channel exists")
        .state()
}
