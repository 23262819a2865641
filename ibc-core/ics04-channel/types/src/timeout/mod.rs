//! Packet timeouts, expressed as a height or a timestamp of the receiving
//! chain. Either may be unset, but not both.

mod height;
mod timestamp;

pub use height::*;
pub use timestamp::*;
