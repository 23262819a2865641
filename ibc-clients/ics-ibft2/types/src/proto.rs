//! Wire types of the IBFT2 light client.
//!
//! Heights reuse the ICS-02 `Height` message; timestamps are unix
//! nanoseconds.

pub mod v1 {
    use ibc_primitives::prelude::*;
    use ibc_proto::ibc::core::client::v1::Height;

    const PACKAGE: &str = "ibc.lightclients.ibft2.v1";

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ClientState {
        #[prost(string, tag = "1")]
        pub chain_id: String,
        #[prost(bytes = "vec", tag = "2")]
        pub ibc_store_address: Vec<u8>,
        #[prost(message, optional, tag = "3")]
        pub latest_height: Option<Height>,
        #[prost(bool, tag = "4")]
        pub frozen: bool,
    }

    impl ::prost::Name for ClientState {
        const NAME: &'static str = "ClientState";
        const PACKAGE: &'static str = PACKAGE;
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct ConsensusState {
        #[prost(uint64, tag = "1")]
        pub timestamp: u64,
        #[prost(bytes = "vec", tag = "2")]
        pub root: Vec<u8>,
        #[prost(bytes = "vec", repeated, tag = "3")]
        pub validators: Vec<Vec<u8>>,
    }

    impl ::prost::Name for ConsensusState {
        const NAME: &'static str = "ConsensusState";
        const PACKAGE: &'static str = PACKAGE;
    }

    #[derive(Clone, PartialEq, ::prost::Message)]
    pub struct Header {
        #[prost(message, optional, tag = "1")]
        pub height: Option<Height>,
        #[prost(uint64, tag = "2")]
        pub timestamp: u64,
        #[prost(bytes = "vec", tag = "3")]
        pub root: Vec<u8>,
        #[prost(bytes = "vec", repeated, tag = "4")]
        pub validators: Vec<Vec<u8>>,
        #[prost(bytes = "vec", repeated, tag = "5")]
        pub seals: Vec<Vec<u8>>,
        #[prost(message, optional, tag = "6")]
        pub trusted_height: Option<Height>,
    }

    impl ::prost::Name for Header {
        const NAME: &'static str = "Header";
        const PACKAGE: &'static str = PACKAGE;
    }
}
