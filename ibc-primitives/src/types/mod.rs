mod error;
mod signer;
mod timestamp;

pub use error::*;
pub use signer::*;
pub use timestamp::*;
