pub mod ibc;
