use typed_builder::TypedBuilder;

/// Settings of a chain's provable store.
#[derive(Clone, Debug, TypedBuilder)]
pub struct ProvableStoreConfig {
    /// Address of the IBC host contract. Objects are committed under it,
    /// and counterparties use it as the commitment prefix.
    #[builder(setter(into))]
    pub ibc_host_address: Vec<u8>,
    /// Number of committed heights kept for proofs. All heights are kept
    /// when unset.
    #[builder(default, setter(strip_option))]
    pub retained_heights: Option<u64>,
}
